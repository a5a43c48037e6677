//! RAII guard for temporary handler overrides.

use crate::kind::CallbackKind;
use crate::registry::core::CallbackRegistry;

/// Pops the pushed binding when dropped.
///
/// Created by [`CallbackRegistry::push_scoped`]; used for "silent
/// probing" scopes where a handler is overridden for the duration of one
/// operation and must be restored afterwards no matter how the scope
/// exits.
#[must_use = "dropping the guard immediately undoes the override"]
pub struct HandlerGuard<'a> {
    registry: &'a CallbackRegistry,
    kind: CallbackKind,
}

impl<'a> HandlerGuard<'a> {
    pub(crate) fn new(registry: &'a CallbackRegistry, kind: CallbackKind) -> Self {
        Self { registry, kind }
    }

    /// The kind this guard overrides.
    pub fn kind(&self) -> CallbackKind {
        self.kind
    }
}

impl Drop for HandlerGuard<'_> {
    fn drop(&mut self) {
        self.registry.clear_handler(self.kind);
    }
}
