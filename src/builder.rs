//! # Query Builder Seam
//!
//! The dispatch pipeline never evaluates a predicate itself; handlers only
//! decide *which* mutation to apply and with what arguments. [`QueryBuilder`]
//! is the interface those mutations go through, and [`SelectBuilder`] is the
//! canonical adapter over a Sea-ORM [`Select`].
//!
//! Dynamic column names are rendered through `Expr::col(Alias::new(..))`, so
//! a predicate against `title` becomes `"title" LIKE '%foo%'` regardless of
//! which entity the select targets.

use sea_orm::sea_query::{Alias, Condition, Expr, IntoColumnRef, Order, SimpleExpr};
use sea_orm::{EntityTrait, QueryTrait, Select};

use crate::dispatch::QuerySource;

/// Direction of an ordering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Comparison operator of a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Like,
}

/// A single column comparison produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl Predicate {
    /// Exact-match predicate (`column = value`).
    #[must_use]
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: Operator::Eq,
            value: value.into(),
        }
    }

    /// Pattern-match predicate (`column LIKE pattern`).
    #[must_use]
    pub fn like(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: Operator::Like,
            value: pattern.into(),
        }
    }
}

/// Mutations the dispatch pipeline requires of a query builder.
///
/// One builder is exclusively owned by one dispatch run for its duration.
pub trait QueryBuilder {
    /// AND a single predicate onto the query.
    fn push_where(&mut self, predicate: Predicate);

    /// AND one OR-combined predicate group onto the query.
    fn push_where_any(&mut self, predicates: Vec<Predicate>);

    /// Apply one ordering instruction.
    fn order_by(&mut self, column: &str, direction: SortDirection);

    /// Skip the first `offset` results.
    fn skip(&mut self, offset: u64);

    /// Cap the number of results.
    fn limit(&mut self, cap: u64);

    /// Set the pagination page size.
    fn set_per_page(&mut self, per_page: u64);

    /// Current pagination page size.
    fn per_page(&self) -> u64;
}

/// Page size of a freshly bound builder.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// [`QueryBuilder`] adapter over a Sea-ORM [`Select`].
#[derive(Debug, Clone)]
pub struct SelectBuilder<E: EntityTrait> {
    select: Select<E>,
    per_page: u64,
}

impl<E: EntityTrait> SelectBuilder<E> {
    /// Start from the entity's unconstrained select.
    #[must_use]
    pub fn new() -> Self {
        Self::from_select(E::find())
    }

    /// Wrap an existing select, keeping the constraints it already carries.
    #[must_use]
    pub fn from_select(select: Select<E>) -> Self {
        Self {
            select,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Hand the mutated select back for execution.
    #[must_use]
    pub fn into_select(self) -> Select<E> {
        self.select
    }
}

impl<E: EntityTrait> Default for SelectBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn predicate_expr(predicate: &Predicate) -> SimpleExpr {
    let column = Expr::col(Alias::new(&predicate.column));
    match predicate.operator {
        Operator::Eq => column.eq(predicate.value.as_str()),
        Operator::Like => column.like(predicate.value.as_str()),
    }
}

impl<E: EntityTrait> QueryBuilder for SelectBuilder<E> {
    fn push_where(&mut self, predicate: Predicate) {
        self.select.query().cond_where(predicate_expr(&predicate));
    }

    fn push_where_any(&mut self, predicates: Vec<Predicate>) {
        if predicates.is_empty() {
            return;
        }
        let mut group = Condition::any();
        for predicate in &predicates {
            group = group.add(predicate_expr(predicate));
        }
        self.select.query().cond_where(group);
    }

    fn order_by(&mut self, column: &str, direction: SortDirection) {
        let column = SimpleExpr::Column(Alias::new(column).into_column_ref());
        self.select.query().order_by_expr(column, direction.into());
    }

    fn skip(&mut self, offset: u64) {
        self.select.query().offset(offset);
    }

    fn limit(&mut self, cap: u64) {
        self.select.query().limit(cap);
    }

    fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page;
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }
}

impl<E: EntityTrait> From<Select<E>> for QuerySource<SelectBuilder<E>> {
    fn from(select: Select<E>) -> Self {
        Self::Builder(SelectBuilder::from_select(select))
    }
}

impl<E: EntityTrait> From<SelectBuilder<E>> for QuerySource<SelectBuilder<E>> {
    fn from(builder: SelectBuilder<E>) -> Self {
        Self::Builder(builder)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_constructors_set_the_operator() {
        let eq = Predicate::equals("status", "published");
        assert_eq!(eq.operator, Operator::Eq);
        assert_eq!(eq.column, "status");

        let like = Predicate::like("title", "%foo%");
        assert_eq!(like.operator, Operator::Like);
        assert_eq!(like.value, "%foo%");
    }

    #[test]
    fn recording_builder_tracks_per_page() {
        use recording::{Op, RecordingBuilder};

        let mut builder = RecordingBuilder::default();
        assert_eq!(builder.per_page(), 0);
        builder.set_per_page(25);
        assert_eq!(builder.per_page(), 25);
        assert_eq!(builder.ops, vec![Op::PerPage(25)]);
    }
}
