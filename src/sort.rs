//! # Sortable Capability
//!
//! Lets clients pick the ordering of a result set, constrained by a declared
//! allow-list. The `sort` and `sortBy` handlers only *record* the selection
//! on the filter instance during the dispatch pass; the one `order_by` call
//! happens in the extension's initialize hook, after the whole pass, so the
//! materialized ordering always reflects the final pending state no matter
//! where the sort parameters landed in dispatch order.

use crate::builder::{QueryBuilder, SortDirection};
use crate::dispatch::{Filter, FilterContext};
use crate::extension::ExtensionDescriptor;
use crate::registry::HandlerTable;

/// Pending sort selection accumulated during one dispatch run.
#[derive(Debug, Default, Clone)]
pub struct SortState {
    column: Option<String>,
    direction: Option<SortDirection>,
}

impl SortState {
    /// The pending column, if a `sort_by` parameter selected one.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// The pending direction, if a `sort` parameter selected one.
    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }
}

/// A filter that supports client-selected ordering.
pub trait Sortable: Filter {
    /// Columns a client may sort by.
    fn sortable() -> &'static [&'static str] {
        &[]
    }

    /// Column and direction used when the request selects none.
    fn default_sort() -> (&'static str, SortDirection) {
        ("created_at", SortDirection::Desc)
    }

    /// The per-run sort selection owned by the filter instance.
    fn sort_state(&mut self) -> &mut SortState;
}

/// Extension descriptor wiring the sort handlers and the ordering hook.
#[must_use]
pub fn sortable_extension<F: Sortable>() -> ExtensionDescriptor<F> {
    ExtensionDescriptor::new("sortable")
        .with_register(register_handlers::<F>)
        .with_initialize(initialize_sortable::<F>)
}

fn register_handlers<F: Sortable>(table: &mut HandlerTable<F>) {
    table.insert("sort", sort::<F>);
    table.insert("sortBy", sort_by::<F>);
}

/// `sort=asc` selects ascending; any other value falls back to descending.
fn sort<F: Sortable>(filter: &mut F, _ctx: &mut FilterContext<'_, F::Builder>, direction: &str) {
    filter.sort_state().direction = Some(if direction == "asc" {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    });
}

/// `sort_by=<column>` updates the pending column only for declared columns;
/// anything else keeps the default.
fn sort_by<F: Sortable>(filter: &mut F, _ctx: &mut FilterContext<'_, F::Builder>, column: &str) {
    if F::sortable().iter().any(|declared| *declared == column) {
        filter.sort_state().column = Some(column.to_string());
    } else {
        tracing::trace!(column = %column, "sort column not declared, keeping default");
    }
}

/// Applies the one ordering instruction, after the main dispatch pass.
fn initialize_sortable<F: Sortable>(filter: &mut F, ctx: &mut FilterContext<'_, F::Builder>) {
    let (default_column, default_direction) = F::default_sort();
    let state = filter.sort_state();
    let column = state
        .column
        .take()
        .unwrap_or_else(|| default_column.to_string());
    let direction = state.direction.take().unwrap_or(default_direction);
    ctx.query.order_by(&column, direction);
}
