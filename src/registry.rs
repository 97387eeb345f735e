//! # Handler Registry
//!
//! Every concrete filter type gets one [`HandlerTable`]: an explicit map
//! from normalized parameter name to a plain `fn` handler, assembled exactly
//! once per type and reused by every dispatch run for the process lifetime.
//! The table is built from three layers, in order: the built-in pagination
//! handlers, each composed extension's registration, and the filter type's
//! own [`register`](crate::Filter::register).
//!
//! Whether a normalized name actually dispatches is decided at run time by
//! [`is_dispatchable`]: reserved prefixes and structural pipeline names are
//! never dispatchable, ignore-listed names are skipped, and anything not in
//! the table is silently dropped. Unmatched parameters are policy no-ops,
//! not errors.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, OnceLock, PoisonError};

use crate::dispatch::{Filter, FilterContext};

/// Handler invoked when its registered name matches an incoming parameter.
///
/// Receives the filter instance, the run context, and the raw (unnormalized)
/// parameter value. Handlers self-validate: an inapplicable value means a
/// no-op, never a failure.
pub type HandlerFn<F> = fn(&mut F, &mut FilterContext<'_, <F as Filter>::Builder>, &str);

/// Name prefixes reserved for pipeline internals and extension hooks.
pub const RESERVED_PREFIXES: [&str; 3] = ["__", "boot", "initialize"];

/// Structural pipeline names that can never be dispatched to.
pub const STRUCTURAL_NAMES: [&str; 10] = [
    "of",
    "indexQuery",
    "setQuery",
    "getQuery",
    "getRequest",
    "beforeHandle",
    "afterHandle",
    "handle",
    "getFilters",
    "ignoreFilters",
];

/// Whether a normalized name is reserved for internals.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
        || STRUCTURAL_NAMES.contains(&name)
}

/// Explicit mapping from normalized parameter name to handler.
pub struct HandlerTable<F: Filter> {
    handlers: HashMap<&'static str, HandlerFn<F>>,
}

impl<F: Filter> HandlerTable<F> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` under a normalized name.
    ///
    /// Registering a reserved name is allowed but pointless: the dispatch
    /// guard blocks it unconditionally.
    pub fn insert(&mut self, name: &'static str, handler: HandlerFn<F>) {
        self.handlers.insert(name, handler);
    }

    /// Handler registered under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<HandlerFn<F>> {
        self.handlers.get(name).copied()
    }

    /// Whether a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Whether a normalized parameter name dispatches for filter type `F`.
pub(crate) fn is_dispatchable<F: Filter>(table: &HandlerTable<F>, name: &str) -> bool {
    if is_reserved(name) {
        return false;
    }
    if F::ignore().iter().any(|ignored| *ignored == name) {
        return false;
    }
    table.contains(name)
}

/// Per-type cache with compute-once-publish-once semantics.
///
/// Values are keyed by `TypeId` and leaked to `'static` once computed. The
/// outer mutex only guards cell creation and is never held while an
/// initializer runs, so initializing one type cannot block or deadlock
/// against another. Concurrent first use of the same type blocks on the
/// type's `OnceLock` until the first caller publishes, which is what makes
/// "exactly once per type" hold under multi-threaded instantiation.
pub(crate) struct TypeCache {
    cells: Mutex<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>,
}

impl TypeCache {
    pub(crate) fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_init<T: Send + Sync + 'static>(
        &self,
        key: TypeId,
        init: impl FnOnce() -> T,
    ) -> &'static T {
        let cell: &'static (dyn Any + Send + Sync) = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            *cells
                .entry(key)
                .or_insert_with(|| Box::leak(Box::new(OnceLock::<T>::new())))
        };
        let cell = cell
            .downcast_ref::<OnceLock<T>>()
            .expect("cache cells are keyed by TypeId");
        cell.get_or_init(init)
    }

    /// Peek at a published value without initializing it.
    pub(crate) fn get<T: Send + Sync + 'static>(&self, key: TypeId) -> Option<&'static T> {
        let cell: &'static (dyn Any + Send + Sync) = {
            let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            *cells.get(&key)?
        };
        cell.downcast_ref::<OnceLock<T>>().and_then(OnceLock::get)
    }
}

static TABLES: LazyLock<TypeCache> = LazyLock::new(TypeCache::new);

/// The handler table for `F`, built on first use and cached for the process
/// lifetime.
pub(crate) fn handler_table<F: Filter>() -> &'static HandlerTable<F> {
    TABLES.get_or_init(TypeId::of::<F>(), || {
        let mut table = HandlerTable::new();
        crate::dispatch::register_builtins(&mut table);
        for extension in F::extensions() {
            if let Some(register) = extension.register {
                register(&mut table);
            }
        }
        F::register(&mut table);
        tracing::debug!(
            filter = std::any::type_name::<F>(),
            handlers = table.len(),
            "handler table built"
        );
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::recording::RecordingBuilder;

    #[derive(Default)]
    struct BareFilter;

    impl Filter for BareFilter {
        type Builder = RecordingBuilder;

        fn register(table: &mut HandlerTable<Self>) {
            table.insert("status", |_filter, _ctx, _value| {});
        }

        fn ignore() -> &'static [&'static str] {
            &["status2"]
        }
    }

    #[test]
    fn reserved_prefixes_and_structural_names() {
        assert!(is_reserved("__meta"));
        assert!(is_reserved("bootSortable"));
        assert!(is_reserved("initializeSortable"));
        assert!(is_reserved("handle"));
        assert!(is_reserved("getFilters"));
        assert!(is_reserved("ignoreFilters"));

        assert!(!is_reserved("search"));
        assert!(!is_reserved("sortBy"));
        assert!(!is_reserved("perPage"));
    }

    #[test]
    fn dispatchability_rules_apply_in_order() {
        let table = handler_table::<BareFilter>();

        // Registered and unreserved.
        assert!(is_dispatchable(table, "status"));
        // Built-ins are part of every table.
        assert!(is_dispatchable(table, "perPage"));
        assert!(is_dispatchable(table, "skip"));
        // Unregistered names are silently skipped.
        assert!(!is_dispatchable(table, "unknown"));
        // Ignore-listed names never dispatch.
        assert!(!is_dispatchable(table, "status2"));
    }

    #[test]
    fn reserved_names_never_dispatch_even_if_registered() {
        let mut table = HandlerTable::<BareFilter>::new();
        table.insert("handle", |_filter, _ctx, _value| {});
        table.insert("bootThing", |_filter, _ctx, _value| {});

        assert!(table.contains("handle"));
        assert!(!is_dispatchable(&table, "handle"));
        assert!(!is_dispatchable(&table, "bootThing"));
    }

    #[test]
    fn handler_table_is_computed_once_per_type() {
        let first: *const HandlerTable<BareFilter> = handler_table::<BareFilter>();
        let second: *const HandlerTable<BareFilter> = handler_table::<BareFilter>();
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_first_use_builds_one_table() {
        use std::sync::Barrier;
        use std::thread;

        #[derive(Default)]
        struct RacedFilter;

        impl Filter for RacedFilter {
            type Builder = RecordingBuilder;

            fn register(table: &mut HandlerTable<Self>) {
                table.insert("status", |_filter, _ctx, _value| {});
            }
        }

        let barrier = Barrier::new(8);
        let addresses: Vec<usize> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        std::ptr::from_ref(handler_table::<RacedFilter>()) as usize
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert!(
            addresses.windows(2).all(|pair| pair[0] == pair[1]),
            "every thread must observe the same table"
        );
    }
}
