//! # Searchable Capability
//!
//! Keyword search across a declared column set, or a single explicitly
//! selected column. The keyword's `*` wildcards decide the match position:
//!
//! | keyword   | pattern   | matches            |
//! |-----------|-----------|--------------------|
//! | `foo`     | `%foo%`   | substring          |
//! | `foo*`    | `foo%`    | prefix             |
//! | `*foo`    | `%foo`    | suffix             |
//!
//! The leading-`*` branch is checked first, so a keyword starred on both
//! ends resolves as a suffix match and keeps its trailing `*` literal
//! (`*foo*` → `%foo*`). That left bias is long-standing observable behavior;
//! keep the branch order.
//!
//! A `search_by` parameter narrows the search to one column, but only if
//! that column is declared searchable. An undeclared selection skips the
//! search entirely rather than touching the query.

use crate::builder::{Predicate, QueryBuilder};
use crate::dispatch::{Filter, FilterContext};
use crate::extension::ExtensionDescriptor;
use crate::registry::HandlerTable;

/// Side-channel parameter selecting a single search column.
const SEARCH_BY_PARAM: &str = "search_by";

/// A filter that supports keyword search.
pub trait Searchable: Filter {
    /// Columns the keyword is matched against.
    fn searchable() -> &'static [&'static str] {
        &[]
    }
}

/// Extension descriptor wiring the `search` handler and its `q` alias.
#[must_use]
pub fn searchable_extension<F: Searchable>() -> ExtensionDescriptor<F> {
    ExtensionDescriptor::new("searchable").with_register(register_handlers::<F>)
}

fn register_handlers<F: Searchable>(table: &mut HandlerTable<F>) {
    table.insert("search", search::<F>);
    table.insert("q", search::<F>);
}

/// Apply the keyword search. No-op when nothing is declared searchable or
/// the keyword is empty.
fn search<F: Searchable>(_filter: &mut F, ctx: &mut FilterContext<'_, F::Builder>, keyword: &str) {
    let columns = F::searchable();
    if columns.is_empty() || keyword.is_empty() {
        return;
    }

    let pattern = like_pattern(keyword);

    if ctx.params.filled(SEARCH_BY_PARAM) {
        if let Some(column) = ctx.params.get(SEARCH_BY_PARAM) {
            if columns.iter().any(|declared| *declared == column) {
                ctx.query.push_where(Predicate::like(column, pattern));
            } else {
                tracing::trace!(column = %column, "search column not declared, skipping search");
            }
        }
        return;
    }

    let group = columns
        .iter()
        .map(|column| Predicate::like(*column, pattern.clone()))
        .collect();
    ctx.query.push_where_any(group);
}

/// Translate a keyword's `*` wildcards into a LIKE pattern.
///
/// Left-biased: the leading-`*` check wins when both ends are starred.
fn like_pattern(keyword: &str) -> String {
    let suffix_match = keyword.starts_with('*');
    let prefix_match = keyword.ends_with('*');

    if !suffix_match && !prefix_match {
        return format!("%{keyword}%");
    }
    if suffix_match {
        return format!("%{}", keyword.trim_start_matches('*'));
    }
    format!("{}%", keyword.trim_end_matches('*'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::recording::{Op, RecordingBuilder};
    use crate::dispatch::Dispatcher;
    use crate::params::Params;

    #[derive(Default)]
    struct ArticleFilter;

    impl Filter for ArticleFilter {
        type Builder = RecordingBuilder;

        fn register(_table: &mut HandlerTable<Self>) {}

        fn extensions() -> Vec<ExtensionDescriptor<Self>> {
            vec![searchable_extension()]
        }
    }

    impl Searchable for ArticleFilter {
        fn searchable() -> &'static [&'static str] {
            &["title", "tags"]
        }
    }

    fn run(params: Params) -> Vec<Op> {
        Dispatcher::new(ArticleFilter, params)
            .handle(RecordingBuilder::default())
            .ops
    }

    #[test]
    fn wildcard_positions_shape_the_pattern() {
        assert_eq!(like_pattern("foo"), "%foo%");
        assert_eq!(like_pattern("foo*"), "foo%");
        assert_eq!(like_pattern("*foo"), "%foo");
        assert_eq!(like_pattern("foo**"), "foo%");
        assert_eq!(like_pattern("*"), "%");
    }

    #[test]
    fn both_ends_starred_is_left_biased() {
        // The trailing `*` survives as a literal; see the module doc.
        assert_eq!(like_pattern("*foo*"), "%foo*");
    }

    #[test]
    fn keyword_searches_every_declared_column() {
        let params: Params = [("search", "foo")].into_iter().collect();
        assert_eq!(
            run(params),
            vec![Op::WhereAny(vec![
                Predicate::like("title", "%foo%"),
                Predicate::like("tags", "%foo%"),
            ])]
        );
    }

    #[test]
    fn q_is_an_alias_for_search() {
        let params: Params = [("q", "bar*")].into_iter().collect();
        assert_eq!(
            run(params),
            vec![Op::WhereAny(vec![
                Predicate::like("title", "bar%"),
                Predicate::like("tags", "bar%"),
            ])]
        );
    }

    #[test]
    fn search_by_narrows_to_a_declared_column() {
        let params: Params = [("search", "foo"), ("search_by", "title")]
            .into_iter()
            .collect();
        assert_eq!(run(params), vec![Op::Where(Predicate::like("title", "%foo%"))]);
    }

    #[test]
    fn search_by_with_undeclared_column_skips_the_search() {
        let params: Params = [("search", "foo"), ("search_by", "secret")]
            .into_iter()
            .collect();
        assert!(run(params).is_empty());
    }

    #[test]
    fn empty_search_by_falls_back_to_all_columns() {
        let params: Params = [("search", "foo"), ("search_by", "")].into_iter().collect();
        assert_eq!(
            run(params),
            vec![Op::WhereAny(vec![
                Predicate::like("title", "%foo%"),
                Predicate::like("tags", "%foo%"),
            ])]
        );
    }

    #[test]
    fn empty_keyword_is_a_no_op() {
        let params: Params = [("search", "")].into_iter().collect();
        assert!(run(params).is_empty());
    }

    #[test]
    fn no_declared_columns_means_no_search() {
        #[derive(Default)]
        struct BareFilter;

        impl Filter for BareFilter {
            type Builder = RecordingBuilder;

            fn register(_table: &mut HandlerTable<Self>) {}

            fn extensions() -> Vec<ExtensionDescriptor<Self>> {
                vec![searchable_extension()]
            }
        }

        impl Searchable for BareFilter {}

        let params: Params = [("search", "foo")].into_iter().collect();
        let ops = Dispatcher::new(BareFilter, params)
            .handle(RecordingBuilder::default())
            .ops;
        assert!(ops.is_empty());
    }
}
