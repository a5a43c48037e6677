//! Error types used by the callback bridge.
//!
//! This module defines two main error enums:
//!
//! - [`RegistrationError`]: failures while binding a handler to a callback kind.
//! - [`DispatchError`]: failures while invoking an already-bound handler.
//!
//! Both are deliberately non-fatal by contract: a failed registration leaves
//! the previous binding in place, and a failed dispatch is substituted by the
//! engine's documented default at the call site. The enums exist so that the
//! substitution is visible in code instead of being buried in a catch-all.

use thiserror::Error;

/// # Errors raised while registering a handler.
///
/// Registration failure is a no-op: the callback kind keeps whatever
/// binding (possibly none) it had before the call.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The qualified name did not parse as `module::symbol`.
    #[error("malformed handler name {name:?}: expected \"module::symbol\"")]
    MalformedName {
        /// The name as supplied by the caller.
        name: String,
    },

    /// The sink environment has no component with this module name,
    /// or the component's namespace failed to initialize.
    #[error("module {module:?} not found in sink environment")]
    ModuleNotFound {
        /// The module half of the qualified name.
        module: String,
    },
}

impl RegistrationError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrationError::MalformedName { .. } => "malformed_name",
            RegistrationError::ModuleNotFound { .. } => "module_not_found",
        }
    }
}

/// # Errors raised while dispatching to a bound handler.
///
/// None of these propagate to the engine; the invoker logs them and the
/// adapter substitutes the channel's documented default decision.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The symbol disappeared from the namespace between registration
    /// and dispatch (e.g. the sink environment was reloaded).
    #[error("symbol {symbol:?} not found in module {module:?}")]
    SymbolNotFound {
        /// Module half of the stale binding.
        module: String,
        /// Symbol half of the stale binding.
        symbol: String,
    },

    /// The sink was invoked but reported a failure of its own.
    #[error("sink invocation failed: {reason}")]
    SinkFailed {
        /// Sink-supplied failure description.
        reason: String,
    },

    /// The sink returned a value with an unexpected tag.
    #[error("expected {expected} answer, sink returned {actual}")]
    WrongAnswerType {
        /// Tag the adapter asked for.
        expected: &'static str,
        /// Tag the sink actually returned.
        actual: &'static str,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::SymbolNotFound { .. } => "symbol_not_found",
            DispatchError::SinkFailed { .. } => "sink_failed",
            DispatchError::WrongAnswerType { .. } => "wrong_answer_type",
        }
    }
}
