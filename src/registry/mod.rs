//! # Handler registry: per-kind binding stacks with save/restore semantics.

mod binding;
mod core;
mod guard;

pub use binding::HandlerBinding;
pub use core::CallbackRegistry;
pub use guard::HandlerGuard;
