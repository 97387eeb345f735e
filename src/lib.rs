//! # filtercrate
//!
//! Convention-based translation of request parameters into Sea-ORM query
//! mutations. A concrete filter type registers handlers under normalized
//! parameter names; the dispatcher normalizes and orders the incoming
//! parameter map, invokes each matching handler, and runs composed
//! extensions (search, sort) around the main pass. Built-in handlers cover
//! pagination (`per_page`, `skip`/`offset`, `take`/`limit`) out of the box.
//!
//! ```rust,ignore
//! use filtercrate::{
//!     searchable_extension, sortable_extension, ExtensionDescriptor, Filter,
//!     HandlerTable, Params, Predicate, Searchable, SelectBuilder, SortState, Sortable,
//! };
//!
//! #[derive(Default)]
//! struct PostFilter {
//!     sort: SortState,
//! }
//!
//! impl Filter for PostFilter {
//!     type Builder = SelectBuilder<posts::Entity>;
//!
//!     fn register(table: &mut HandlerTable<Self>) {
//!         table.insert("status", |_filter, ctx, value| {
//!             ctx.query.push_where(Predicate::equals("status", value));
//!         });
//!     }
//!
//!     fn extensions() -> Vec<ExtensionDescriptor<Self>> {
//!         vec![searchable_extension(), sortable_extension()]
//!     }
//! }
//!
//! impl Searchable for PostFilter {
//!     fn searchable() -> &'static [&'static str] {
//!         &["title", "tags"]
//!     }
//! }
//!
//! impl Sortable for PostFilter {
//!     fn sortable() -> &'static [&'static str] {
//!         &["id", "created_at"]
//!     }
//!
//!     fn sort_state(&mut self) -> &mut SortState {
//!         &mut self.sort
//!     }
//! }
//!
//! // GET /posts?search=rust*&sort_by=id&sort=asc&per_page=20
//! let select = PostFilter::of(params, SelectBuilder::new())?.into_select();
//! ```
//!
//! Dispatch order is deterministic (lexicographic by normalized name), the
//! per-type handler table and extension hook set are computed once per
//! process, and malformed client input never aborts a run, it just fails
//! to take effect.

pub mod builder;
pub mod dispatch;
pub mod errors;
pub mod extension;
pub mod normalize;
pub mod params;
pub mod registry;
pub mod scaffold;
pub mod search;
pub mod sort;

pub use builder::{
    Operator, Predicate, QueryBuilder, SelectBuilder, SortDirection, DEFAULT_PER_PAGE,
};
pub use dispatch::{
    Dispatcher, Filter, FilterContext, QuerySource, DEFAULT_ALLOWED_PER_PAGE,
};
pub use errors::{FilterError, ScaffoldError};
pub use extension::{ExtensionDescriptor, InitializerFn};
pub use normalize::normalize;
pub use params::Params;
pub use registry::{HandlerFn, HandlerTable};
pub use search::{searchable_extension, Searchable};
pub use sort::{sortable_extension, SortState, Sortable};
