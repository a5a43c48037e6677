//! # Callback registry - per-kind handler stacks.
//!
//! [`CallbackRegistry`] maps every [`CallbackKind`] to a LIFO stack of
//! [`HandlerBinding`]s. Only the top of each stack is active; pushing
//! temporarily overrides, popping restores the previous binding
//! (possibly none).
//!
//! ## Rules
//! - Registration failure (malformed name, unresolvable module) is
//!   logged and leaves the kind's stack **unchanged**. It is reported as
//!   an error so the failure is visible, but callers may ignore it - the
//!   contract is non-fatal.
//! - Popping an empty stack is a no-op.
//! - Namespace resolution happens here, once per registration; it may
//!   re-enter the sink environment's initialization logic, so it is
//!   performed *before* the stack lock is taken.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::RegistrationError;
use crate::kind::CallbackKind;
use crate::registry::binding::HandlerBinding;
use crate::registry::guard::HandlerGuard;
use crate::sink::{HandlerResolver, SinkEnv};

/// Per-kind stacks of handler bindings.
pub struct CallbackRegistry {
    resolver: HandlerResolver,
    stacks: RwLock<HashMap<CallbackKind, Vec<HandlerBinding>>>,
}

impl CallbackRegistry {
    /// Creates an empty registry over the given sink environment.
    pub fn new(env: Arc<dyn SinkEnv>) -> Self {
        Self { resolver: HandlerResolver::new(env), stacks: RwLock::new(HashMap::new()) }
    }

    /// The resolver used for registration and per-dispatch symbol lookup.
    pub fn resolver(&self) -> &HandlerResolver {
        &self.resolver
    }

    /// Parses `module::symbol`, resolves the module once, and pushes a
    /// new binding on `kind`'s stack.
    ///
    /// On failure the stack is left unchanged and the error is returned
    /// (and logged); by contract this is a no-op failure, not a fatal one.
    pub fn set_handler(
        &self,
        kind: CallbackKind,
        qualified: &str,
    ) -> Result<(), RegistrationError> {
        let (module, symbol) = parse_qualified(qualified)?;
        let namespace = self
            .resolver
            .resolve(module)
            .ok_or_else(|| RegistrationError::ModuleNotFound { module: module.to_owned() })?;

        let binding = HandlerBinding::new(module, symbol, namespace);
        debug!(kind = kind.as_label(), module, symbol, "handler registered");
        self.stacks.write().entry(kind).or_default().push(binding);
        Ok(())
    }

    /// Pops the top binding for `kind`. Popping an empty stack is a no-op.
    pub fn clear_handler(&self, kind: CallbackKind) {
        let mut stacks = self.stacks.write();
        if let Some(stack) = stacks.get_mut(&kind) {
            if stack.pop().is_some() {
                debug!(kind = kind.as_label(), "handler unregistered");
            }
            if stack.is_empty() {
                stacks.remove(&kind);
            }
        }
    }

    /// True iff `kind` currently has an active binding.
    pub fn is_active(&self, kind: CallbackKind) -> bool {
        self.stacks.read().get(&kind).is_some_and(|s| !s.is_empty())
    }

    /// Returns the active (top) binding for `kind`, if any.
    pub fn active(&self, kind: CallbackKind) -> Option<HandlerBinding> {
        self.stacks.read().get(&kind).and_then(|s| s.last()).cloned()
    }

    /// Pushes a temporary override and returns a guard that pops it on
    /// drop, so the override cannot leak past its scope even on early
    /// return.
    ///
    /// Guards must be dropped in LIFO order relative to other pushes on
    /// the same kind; interleaving defeats the stack discipline.
    pub fn push_scoped(
        &self,
        kind: CallbackKind,
        qualified: &str,
    ) -> Result<HandlerGuard<'_>, RegistrationError> {
        self.set_handler(kind, qualified)?;
        Ok(HandlerGuard::new(self, kind))
    }
}

/// Splits a qualified handler name on its **last** `::`, so nested
/// module paths stay in the module half.
fn parse_qualified(qualified: &str) -> Result<(&str, &str), RegistrationError> {
    match qualified.rsplit_once("::") {
        Some((module, symbol)) if !module.is_empty() && !symbol.is_empty() => {
            Ok((module, symbol))
        }
        _ => {
            warn!(name = qualified, "malformed handler name; registration skipped");
            Err(RegistrationError::MalformedName { name: qualified.to_owned() })
        }
    }
}
