//! # Handler name resolution.
//!
//! [`HandlerResolver`] is the only component that touches the sink
//! environment during registration. Module resolution happens once per
//! registration (namespace lookup and initialization are not free);
//! symbol resolution happens on **every** dispatch, because the
//! namespace may be reloaded between calls and a cached call handle
//! would go stale invisibly.

use std::sync::Arc;

use tracing::warn;

use crate::registry::HandlerBinding;
use crate::sink::env::{Invocable, Namespace, SinkEnv};

/// Resolves external handler names inside the sink environment.
pub struct HandlerResolver {
    env: Arc<dyn SinkEnv>,
}

impl HandlerResolver {
    pub fn new(env: Arc<dyn SinkEnv>) -> Self {
        Self { env }
    }

    /// Resolves a module name to an initialized namespace.
    ///
    /// Registration-time only. A missing component or a namespace that
    /// fails to initialize is logged and reported as `None`; the caller
    /// leaves the previous binding untouched.
    pub fn resolve(&self, module: &str) -> Option<Arc<dyn Namespace>> {
        let ns = self.env.lookup(module);
        if ns.is_none() {
            warn!(module, "module not found in sink environment");
        }
        ns
    }

    /// Creates a fresh call handle for the binding's symbol.
    ///
    /// Called on every dispatch. A symbol that has disappeared since
    /// registration (environment reload) is logged once per dispatch and
    /// the dispatch falls back to the engine default, observably the
    /// same as having no handler at all.
    pub fn create_call(&self, binding: &HandlerBinding) -> Option<Box<dyn Invocable>> {
        let call = binding.namespace().create_call(binding.symbol());
        if call.is_none() {
            warn!(
                module = binding.module(),
                symbol = binding.symbol(),
                "bound symbol no longer resolves; falling back to engine default"
            );
        }
        call
    }
}
