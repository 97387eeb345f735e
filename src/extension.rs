//! # Extension Bootstrapping
//!
//! Extensions are composed behaviors (search, sort, …) a filter type
//! declares explicitly through [`Filter::extensions`](crate::Filter::extensions).
//! Each one is a small descriptor with three optional hooks:
//!
//! - `boot`: run exactly once per filter type, before its first dispatch;
//! - `register`: contributes handlers to the type's handler table;
//! - `initialize`: run once per dispatch run, after the main pass.
//!
//! An absent hook is simply skipped: extensions are optional capabilities,
//! not required ones. A panicking boot hook is fatal and propagates.
//!
//! Boot state per type moves `unbooted → booting → booted`, realized by a
//! `TypeId`-keyed `OnceLock` cell: the first dispatcher built for a type
//! runs the boot hooks, concurrent constructions block until that finishes,
//! and nothing ever boots twice.

use std::any::TypeId;
use std::sync::LazyLock;

use crate::dispatch::{Filter, FilterContext};
use crate::registry::{HandlerTable, TypeCache};

/// Per-run hook applied once after the main dispatch pass.
pub type InitializerFn<F> = fn(&mut F, &mut FilterContext<'_, <F as Filter>::Builder>);

/// Declaration of one composed extension.
pub struct ExtensionDescriptor<F: Filter> {
    /// Extension name, used for logging and hook bookkeeping.
    pub name: &'static str,
    /// One-time-per-type hook.
    pub boot: Option<fn()>,
    /// Handler registration into the type's handler table.
    pub register: Option<fn(&mut HandlerTable<F>)>,
    /// Per-run hook, applied after the main dispatch pass.
    pub initialize: Option<InitializerFn<F>>,
}

impl<F: Filter> ExtensionDescriptor<F> {
    /// Descriptor with no hooks; chain `with_*` to declare them.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            boot: None,
            register: None,
            initialize: None,
        }
    }

    #[must_use]
    pub fn with_boot(mut self, boot: fn()) -> Self {
        self.boot = Some(boot);
        self
    }

    #[must_use]
    pub fn with_register(mut self, register: fn(&mut HandlerTable<F>)) -> Self {
        self.register = Some(register);
        self
    }

    #[must_use]
    pub fn with_initialize(mut self, initialize: InitializerFn<F>) -> Self {
        self.initialize = Some(initialize);
        self
    }
}

/// The hooks a filter type's extensions declare, computed once per type.
pub(crate) struct HookSet<F: Filter> {
    boot_hooks: Vec<&'static str>,
    initializers: Vec<(&'static str, InitializerFn<F>)>,
}

impl<F: Filter> HookSet<F> {
    fn compute() -> Self {
        let mut boot_hooks: Vec<&'static str> = Vec::new();
        let mut initializers: Vec<(&'static str, InitializerFn<F>)> = Vec::new();

        for extension in F::extensions() {
            if extension.boot.is_some() && !boot_hooks.contains(&extension.name) {
                boot_hooks.push(extension.name);
            }
            if let Some(initialize) = extension.initialize {
                // An extension listed twice still initializes once.
                if !initializers.iter().any(|(name, _)| *name == extension.name) {
                    initializers.push((extension.name, initialize));
                }
            }
        }

        Self {
            boot_hooks,
            initializers,
        }
    }

    /// Names of extensions declaring a boot hook.
    pub(crate) fn boot_hooks(&self) -> &[&'static str] {
        &self.boot_hooks
    }

    /// Initialize hooks in declaration order.
    pub(crate) fn initializers(
        &self,
    ) -> impl Iterator<Item = (&'static str, InitializerFn<F>)> + '_ {
        self.initializers.iter().copied()
    }
}

static HOOKS: LazyLock<TypeCache> = LazyLock::new(TypeCache::new);
static BOOTS: LazyLock<TypeCache> = LazyLock::new(TypeCache::new);

/// The cached hook set for `F`.
pub(crate) fn hook_set<F: Filter>() -> &'static HookSet<F> {
    HOOKS.get_or_init(TypeId::of::<F>(), HookSet::compute)
}

struct BootRecord {
    hooks_run: Vec<&'static str>,
}

/// Run every composed extension's boot hook exactly once per filter type.
pub(crate) fn bootstrap<F: Filter>() {
    BOOTS.get_or_init(TypeId::of::<F>(), || {
        let mut hooks_run: Vec<&'static str> = Vec::new();
        for extension in F::extensions() {
            if let Some(boot) = extension.boot {
                // An extension listed twice still boots once.
                if hooks_run.contains(&extension.name) {
                    continue;
                }
                tracing::debug!(extension = extension.name, "running boot hook");
                boot();
                hooks_run.push(extension.name);
            }
        }
        BootRecord { hooks_run }
    });
}

/// Boot-hook names already run for `F`, if the type has booted.
pub fn booted_hooks<F: Filter>() -> Option<&'static [&'static str]> {
    BOOTS
        .get::<BootRecord>(TypeId::of::<F>())
        .map(|record| record.hooks_run.as_slice())
}
