//! Handler binding: one registered `module::symbol` pair plus the
//! namespace resolved for it at registration time.

use std::fmt;
use std::sync::Arc;

use crate::sink::Namespace;

/// A registered handler.
///
/// The namespace reference is obtained once, when the binding is
/// created; the *symbol* inside it is re-resolved on every dispatch
/// (see [`HandlerResolver::create_call`](crate::HandlerResolver::create_call)).
#[derive(Clone)]
pub struct HandlerBinding {
    module: String,
    symbol: String,
    namespace: Arc<dyn Namespace>,
}

impl HandlerBinding {
    pub fn new(
        module: impl Into<String>,
        symbol: impl Into<String>,
        namespace: Arc<dyn Namespace>,
    ) -> Self {
        Self { module: module.into(), symbol: symbol.into(), namespace }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn namespace(&self) -> &Arc<dyn Namespace> {
        &self.namespace
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("module", &self.module)
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}
