//! # Sink boundary: environment traits, name resolution, call building.
//!
//! Everything that touches the externally supplied handler code lives
//! here. The rest of the crate sees three small pieces:
//!
//! ```text
//! registration:  CallbackRegistry ──► HandlerResolver::resolve(module)
//! dispatch:      adapter ──► CallbackInvoker ──► HandlerResolver::create_call
//!                                   └─► Invocable::invoke(&[Value]) ──► answer
//! ```

mod env;
mod invoker;
mod resolver;

pub use env::{FnNamespace, HandlerFn, Invocable, MapSinkEnv, Namespace, SinkEnv};
pub use invoker::CallbackInvoker;
pub use resolver::HandlerResolver;
