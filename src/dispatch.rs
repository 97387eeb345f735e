//! # Filter Dispatch Pipeline
//!
//! The core of the crate: turn an arbitrary mapping of parameter names to
//! values into a deterministic sequence of query-builder mutations.
//!
//! A run proceeds in strict order:
//!
//! 1. `index_query`, the override point for base constraints;
//! 2. `before_handle`;
//! 3. the dispatch loop: every parameter key is normalized, the pairs are
//!    sorted lexicographically by normalized key (so mutation order never
//!    depends on how the source map happened to iterate), and each
//!    dispatchable name's handler runs with the raw value;
//! 4. `after_handle`;
//! 5. the composed extensions' initialize hooks, exactly once each.
//!
//! Handlers never fail on inapplicable input: a per-page value off the
//! allow-list or a non-numeric offset is ignored, not an error. The only
//! surfaced error is [`FilterError::InvalidQuerySource`] when binding the
//! query source itself.
//!
//! ```rust,ignore
//! let params: Params = [("search", "foo"), ("per_page", "20")].into_iter().collect();
//! let select = PostFilter::of(params, SelectBuilder::new())?.into_select();
//! ```

use crate::builder::QueryBuilder;
use crate::errors::FilterError;
use crate::extension::{self, ExtensionDescriptor};
use crate::normalize::normalize;
use crate::params::Params;
use crate::registry::{self, HandlerTable};

/// Per-page values accepted by the built-in `perPage` handler: multiples of
/// five up to one hundred, plus one.
pub const DEFAULT_ALLOWED_PER_PAGE: [u64; 21] = [
    1, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100,
];

/// A concrete filter type: its handler registrations, composed extensions,
/// and lifecycle hooks.
///
/// One implementation per resource family. The dispatch engine computes the
/// type's handler table and extension hook set once and reuses them across
/// every instance.
pub trait Filter: Default + 'static {
    /// The query builder this filter mutates.
    type Builder: QueryBuilder;

    /// Register the filter's own handlers, keyed by normalized name.
    fn register(table: &mut HandlerTable<Self>);

    /// Extra normalized names that must never dispatch for this filter.
    fn ignore() -> &'static [&'static str] {
        &[]
    }

    /// The extensions this filter composes, in declaration order.
    fn extensions() -> Vec<ExtensionDescriptor<Self>> {
        Vec::new()
    }

    /// Per-page values the built-in `perPage` handler accepts.
    fn allowed_per_page() -> &'static [u64] {
        &DEFAULT_ALLOWED_PER_PAGE
    }

    /// Resolve a named query source to a builder.
    ///
    /// Returning `None` makes `of`/`set_query` fail with
    /// [`FilterError::InvalidQuerySource`] for that name.
    fn resolve(name: &str) -> Option<Self::Builder> {
        let _ = name;
        None
    }

    /// Base constraints applied before anything else. No-op by default.
    fn index_query(&mut self, ctx: &mut FilterContext<'_, Self::Builder>) {
        let _ = ctx;
    }

    /// Hook run before the dispatch loop. No-op by default.
    fn before_handle(&mut self, ctx: &mut FilterContext<'_, Self::Builder>) {
        let _ = ctx;
    }

    /// Hook run after the dispatch loop, before extension initializers.
    /// No-op by default.
    fn after_handle(&mut self, ctx: &mut FilterContext<'_, Self::Builder>) {
        let _ = ctx;
    }

    /// Run the whole pipeline against `source` and hand back the mutated
    /// builder.
    fn of(
        params: Params,
        source: impl Into<QuerySource<Self::Builder>>,
    ) -> Result<Self::Builder, FilterError> {
        Dispatcher::new(Self::default(), params).of(source)
    }
}

/// The query source accepted when binding a filter run.
///
/// Existing builders (and, for the Sea-ORM adapter, bare selects) convert
/// via `From`; string identifiers go through [`QuerySource::named`] and are
/// resolved by [`Filter::resolve`].
#[derive(Debug)]
pub enum QuerySource<B> {
    /// An already-constructed builder.
    Builder(B),
    /// A name to resolve through the filter type's factory hook.
    Named(String),
}

impl<B> QuerySource<B> {
    /// Source referring to a registered factory by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

/// Everything a handler may touch during one dispatch run.
///
/// Exclusively owned by that run; never shared across concurrent runs.
pub struct FilterContext<'a, B> {
    /// The raw parameter source, for side-channel lookups.
    pub params: &'a Params,
    /// The builder being mutated.
    pub query: &'a mut B,
}

/// One dispatch run over a filter instance and a parameter map.
pub struct Dispatcher<F: Filter> {
    filter: F,
    params: Params,
}

impl<F: Filter> Dispatcher<F> {
    /// Build a dispatcher, booting the filter type's extensions if this is
    /// the first instantiation of `F` in the process.
    pub fn new(filter: F, params: Params) -> Self {
        extension::bootstrap::<F>();
        Self { filter, params }
    }

    /// Bind `source` and run the pipeline.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidQuerySource`] when a named source does not
    /// resolve to a builder.
    pub fn of(
        self,
        source: impl Into<QuerySource<F::Builder>>,
    ) -> Result<F::Builder, FilterError> {
        let query = Self::set_query(source.into())?;
        Ok(self.handle(query))
    }

    /// Resolve a query source to a builder.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidQuerySource`] when a named source does not
    /// resolve.
    pub fn set_query(source: QuerySource<F::Builder>) -> Result<F::Builder, FilterError> {
        match source {
            QuerySource::Builder(builder) => Ok(builder),
            QuerySource::Named(name) => {
                F::resolve(&name).ok_or(FilterError::InvalidQuerySource { given: name })
            }
        }
    }

    /// Run the pipeline against an already-bound builder.
    pub fn handle(self, mut query: F::Builder) -> F::Builder {
        let Self { mut filter, params } = self;
        let table = registry::handler_table::<F>();
        let hooks = extension::hook_set::<F>();

        let mut ctx = FilterContext {
            params: &params,
            query: &mut query,
        };

        filter.index_query(&mut ctx);
        filter.before_handle(&mut ctx);

        for (name, value) in sorted_filters(&params) {
            if registry::is_dispatchable::<F>(table, &name) {
                if let Some(handler) = table.get(&name) {
                    tracing::debug!(filter = %name, "dispatching handler");
                    handler(&mut filter, &mut ctx, value);
                }
            } else {
                tracing::trace!(filter = %name, "skipping non-dispatchable parameter");
            }
        }

        filter.after_handle(&mut ctx);

        for (name, initialize) in hooks.initializers() {
            tracing::debug!(extension = %name, "running initialize hook");
            initialize(&mut filter, &mut ctx);
        }

        drop(ctx);
        query
    }

    /// Normalized parameter pairs in dispatch order.
    #[must_use]
    pub fn filters(&self) -> Vec<(String, &str)> {
        sorted_filters(&self.params)
    }
}

/// Normalize every key and sort by normalized name, ascending. This is the
/// ordering guarantee: mutation order is reproducible whatever the source
/// map's iteration order was.
fn sorted_filters(params: &Params) -> Vec<(String, &str)> {
    let mut pairs: Vec<(String, &str)> = params
        .iter()
        .map(|(key, value)| (normalize(key), value))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

/// Built-in handlers present in every filter's table.
pub(crate) fn register_builtins<F: Filter>(table: &mut HandlerTable<F>) {
    table.insert("perPage", per_page::<F>);
    table.insert("skip", skip::<F>);
    table.insert("offset", skip::<F>);
    table.insert("take", take::<F>);
    table.insert("limit", take::<F>);
}

fn parse_count(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

/// Loose integer coercion for `per_page`: fractional values truncate toward
/// zero, so `20.5` coerces to 20 before the allow-list check.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_count(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse() {
        return Some(n);
    }
    let fractional: f64 = trimmed.parse().ok()?;
    if !fractional.is_finite() || fractional < 0.0 {
        return None;
    }
    Some(fractional.trunc() as u64)
}

/// `per_page=<n>` sets the page size iff `n`, coerced to an integer, is on
/// the allow-list.
fn per_page<F: Filter>(_filter: &mut F, ctx: &mut FilterContext<'_, F::Builder>, value: &str) {
    let Some(n) = coerce_count(value) else { return };
    if F::allowed_per_page().contains(&n) {
        ctx.query.set_per_page(n);
    } else {
        tracing::trace!(per_page = n, "per-page value outside the allow-list");
    }
}

/// `skip`/`offset` set the result offset; non-numeric values are ignored.
fn skip<F: Filter>(_filter: &mut F, ctx: &mut FilterContext<'_, F::Builder>, value: &str) {
    if let Some(n) = parse_count(value) {
        ctx.query.skip(n);
    }
}

/// `take`/`limit` cap the result count; non-numeric values are ignored.
fn take<F: Filter>(_filter: &mut F, ctx: &mut FilterContext<'_, F::Builder>, value: &str) {
    if let Some(n) = parse_count(value) {
        ctx.query.limit(n);
    }
}
