//! # Sink environment boundary.
//!
//! The sink is an external, untrusted customization point: a collection
//! of named modules ("namespaces") whose symbols are invocable policy
//! functions over [`Value`]. The bridge only ever touches the sink
//! through the three traits below:
//!
//! ```text
//! SinkEnv::lookup(module)            once per registration
//!     └─► Namespace::create_call(symbol)   fresh on every dispatch
//!               └─► Invocable::invoke(args)    blocks until the sink answers
//! ```
//!
//! ## Rules
//! - `lookup` may initialize the namespace; it is never called during dispatch.
//! - `create_call` is cheap and repeatable; the namespace may have been
//!   reloaded between dispatches, so call handles are never cached.
//! - `invoke` is a synchronous policy function, not I/O; it is expected
//!   to return promptly and must not be given work that blocks forever.
//!
//! For embedders without a real scripting boundary, [`FnNamespace`] and
//! [`MapSinkEnv`] register plain Rust closures under the same contract.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::DispatchError;
use crate::value::Value;

/// A single invocable sink function.
pub trait Invocable: Send + Sync {
    /// Invokes the sink with the marshaled arguments and blocks until it
    /// returns an answer (or a failure, which callers substitute with a
    /// documented default).
    fn invoke(&self, args: &[Value]) -> Result<Value, DispatchError>;
}

/// A named module inside the sink environment.
pub trait Namespace: Send + Sync {
    /// Looks the symbol up and returns a fresh call handle, or `None`
    /// if the symbol does not exist (anymore).
    fn create_call(&self, symbol: &str) -> Option<Box<dyn Invocable>>;
}

/// The sink environment's component registry.
pub trait SinkEnv: Send + Sync {
    /// Resolves a module name to an initialized namespace. Returns
    /// `None` when the component is missing or fails to initialize.
    fn lookup(&self, module: &str) -> Option<Arc<dyn Namespace>>;
}

/// Shared handler closure stored by [`FnNamespace`].
pub type HandlerFn = Arc<dyn Fn(&[Value]) -> Result<Value, DispatchError> + Send + Sync>;

struct FnInvocable(HandlerFn);

impl Invocable for FnInvocable {
    fn invoke(&self, args: &[Value]) -> Result<Value, DispatchError> {
        (self.0)(args)
    }
}

/// Closure-backed [`Namespace`].
///
/// Symbols can be defined after the namespace has been registered and
/// even after handlers were bound to it - `create_call` sees the current
/// symbol table on every dispatch, mirroring a reloadable scripting
/// module.
#[derive(Default)]
pub struct FnNamespace {
    symbols: RwLock<HashMap<String, HandlerFn>>,
}

impl FnNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or replaces) a symbol.
    pub fn define<F>(&self, symbol: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        self.symbols.write().insert(symbol.into(), Arc::new(f));
    }

    /// Removes a symbol; subsequent dispatches fall back to the engine
    /// default as if the namespace had been reloaded without it.
    pub fn undefine(&self, symbol: &str) {
        self.symbols.write().remove(symbol);
    }

    /// Builder-style [`FnNamespace::define`].
    pub fn with<F>(self, symbol: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        self.define(symbol, f);
        self
    }
}

impl Namespace for FnNamespace {
    fn create_call(&self, symbol: &str) -> Option<Box<dyn Invocable>> {
        let f = self.symbols.read().get(symbol).cloned()?;
        Some(Box::new(FnInvocable(f)))
    }
}

/// In-memory [`SinkEnv`] over registered namespaces.
#[derive(Default)]
pub struct MapSinkEnv {
    modules: RwLock<HashMap<String, Arc<dyn Namespace>>>,
}

impl MapSinkEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a module.
    pub fn register(&self, module: impl Into<String>, ns: Arc<dyn Namespace>) {
        self.modules.write().insert(module.into(), ns);
    }

    /// Builder-style [`MapSinkEnv::register`].
    pub fn with(self, module: impl Into<String>, ns: Arc<dyn Namespace>) -> Self {
        self.register(module, ns);
        self
    }
}

impl SinkEnv for MapSinkEnv {
    fn lookup(&self, module: &str) -> Option<Arc<dyn Namespace>> {
        self.modules.read().get(module).cloned()
    }
}
