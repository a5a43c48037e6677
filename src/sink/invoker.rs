//! # Per-dispatch call builder.
//!
//! [`CallbackInvoker`] assembles exactly one sink call: it captures the
//! active handler (if any) at construction, collects the ordered
//! argument list, invokes the sink, and decodes the typed answer with a
//! safe fallback.
//!
//! ## Rules
//! - One invoker per dispatch. Handlers are looked up at construction;
//!   if the kind has no active binding, **no call handle is created**
//!   and every later step is a harmless no-op.
//! - Argument order is part of each kind's contract. Adapters append in
//!   the documented order; the invoker never reorders or infers.
//! - Absence of a handler is indistinguishable from "accept the
//!   default": the typed evaluators return the caller-supplied default
//!   without logging. Only a *present but misbehaving* sink (failed
//!   invocation, wrong answer tag) is logged.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::kind::CallbackKind;
use crate::registry::CallbackRegistry;
use crate::sink::env::Invocable;
use crate::value::Value;

/// Builder and executor for a single callback dispatch.
pub struct CallbackInvoker {
    kind: CallbackKind,
    call: Option<Box<dyn Invocable>>,
    args: Vec<Value>,
}

impl CallbackInvoker {
    /// Captures the active handler for `kind`, if any.
    ///
    /// When the registry has no active binding the invoker is "unset":
    /// no symbol lookup happens and no `Invocable` is constructed.
    pub fn new(registry: &CallbackRegistry, kind: CallbackKind) -> Self {
        let call = registry
            .active(kind)
            .and_then(|binding| registry.resolver().create_call(&binding));
        Self { kind, call, args: Vec::new() }
    }

    /// True if a handler was captured and the dispatch will reach the sink.
    pub fn is_set(&self) -> bool {
        self.call.is_some()
    }

    fn push(&mut self, value: Value) -> &mut Self {
        if self.call.is_some() {
            self.args.push(value);
        }
        self
    }

    pub fn arg_str(&mut self, value: impl Into<String>) -> &mut Self {
        self.push(Value::Str(value.into()))
    }

    pub fn arg_int(&mut self, value: i64) -> &mut Self {
        self.push(Value::Int(value))
    }

    pub fn arg_bool(&mut self, value: bool) -> &mut Self {
        self.push(Value::Bool(value))
    }

    pub fn arg_symbol(&mut self, value: impl Into<String>) -> &mut Self {
        self.push(Value::Symbol(value.into()))
    }

    pub fn arg_map(&mut self, value: BTreeMap<String, Value>) -> &mut Self {
        self.push(Value::Map(value))
    }

    pub fn arg_list(&mut self, value: Vec<Value>) -> &mut Self {
        self.push(Value::List(value))
    }

    /// Invokes the sink with the accumulated arguments, blocking the
    /// calling (engine) thread until it answers.
    ///
    /// Returns `None` when no handler is set or the sink failed; a sink
    /// failure is logged, handler absence is not.
    pub fn evaluate(&mut self) -> Option<Value> {
        let call = self.call.take()?;
        match call.invoke(&self.args) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    kind = self.kind.as_label(),
                    error = %err,
                    label = err.as_label(),
                    "sink invocation failed; using engine default"
                );
                None
            }
        }
    }

    /// Evaluates and decodes a boolean answer, substituting `default`
    /// when there is no handler, the sink failed, or the tag is wrong.
    pub fn evaluate_bool(&mut self, default: bool) -> bool {
        match self.evaluate() {
            Some(Value::Bool(b)) => b,
            Some(other) => self.mismatch("bool", &other, default),
            None => default,
        }
    }

    /// Evaluates and decodes an integer answer; see [`Self::evaluate_bool`].
    pub fn evaluate_int(&mut self, default: i64) -> i64 {
        match self.evaluate() {
            Some(Value::Int(n)) => n,
            Some(other) => self.mismatch("int", &other, default),
            None => default,
        }
    }

    /// Evaluates and decodes a string answer; see [`Self::evaluate_bool`].
    pub fn evaluate_str(&mut self, default: &str) -> String {
        match self.evaluate() {
            Some(Value::Str(s)) => s,
            Some(other) => self.mismatch("str", &other, default.to_owned()),
            None => default.to_owned(),
        }
    }

    /// Evaluates and decodes a symbol answer; see [`Self::evaluate_bool`].
    pub fn evaluate_symbol(&mut self, default: &str) -> String {
        match self.evaluate() {
            Some(Value::Symbol(s)) => s,
            Some(other) => self.mismatch("symbol", &other, default.to_owned()),
            None => default.to_owned(),
        }
    }

    /// Evaluates and decodes a map answer; see [`Self::evaluate_bool`].
    pub fn evaluate_map(&mut self, default: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
        match self.evaluate() {
            Some(Value::Map(m)) => m,
            Some(other) => self.mismatch("map", &other, default),
            None => default,
        }
    }

    /// Logs a type mismatch as an explicit [`DispatchError`] and hands
    /// back the substituted default.
    fn mismatch<T>(&self, expected: &'static str, actual: &Value, default: T) -> T {
        let err = DispatchError::WrongAnswerType { expected, actual: actual.tag() };
        warn!(kind = self.kind.as_label(), error = %err, "sink answer type mismatch; using engine default");
        debug!(kind = self.kind.as_label(), ?actual, "mismatched sink answer");
        default
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::sink::env::{FnNamespace, MapSinkEnv, Namespace, SinkEnv};

    fn registry_with(symbol: &str, ns: Arc<FnNamespace>) -> CallbackRegistry {
        let env = MapSinkEnv::new().with("Pkg", ns as Arc<dyn Namespace>);
        let registry = CallbackRegistry::new(Arc::new(env));
        registry
            .set_handler(CallbackKind::ProgressDownload, &format!("Pkg::{symbol}"))
            .expect("registration succeeds");
        registry
    }

    #[test]
    fn test_no_handler_constructs_no_invocable() {
        struct Counting {
            calls: AtomicUsize,
        }
        impl Namespace for Counting {
            fn create_call(&self, _symbol: &str) -> Option<Box<dyn super::Invocable>> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                None
            }
        }

        let ns = Arc::new(Counting { calls: AtomicUsize::new(0) });
        let env = MapSinkEnv::new().with("Pkg", ns.clone() as Arc<dyn Namespace>);
        let registry = CallbackRegistry::new(Arc::new(env));

        // Kind never registered: the namespace must never be consulted.
        let mut invoker = CallbackInvoker::new(&registry, CallbackKind::MediaChange);
        assert!(!invoker.is_set());
        assert_eq!(invoker.evaluate(), None);
        assert!(invoker.evaluate_bool(true), "default must come back unchanged");
        assert_eq!(ns.calls.load(Ordering::SeqCst), 0, "no Invocable may be constructed");
    }

    #[test]
    fn test_arguments_arrive_in_append_order() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_in = seen.clone();
        let ns = Arc::new(FnNamespace::new().with("cb", move |args| {
            *seen_in.lock().unwrap() = args.to_vec();
            Ok(Value::from(true))
        }));
        let registry = registry_with("cb", ns);

        let mut invoker = CallbackInvoker::new(&registry, CallbackKind::ProgressDownload);
        invoker.arg_str("ftp://host/pkg.rpm").arg_int(42).arg_bool(true);
        assert!(invoker.evaluate_bool(false));

        let args = seen.lock().unwrap().clone();
        assert_eq!(
            args,
            vec![Value::from("ftp://host/pkg.rpm"), Value::from(42), Value::from(true)],
            "argument order is part of the kind's contract"
        );
    }

    #[test]
    fn test_wrong_typed_answer_substitutes_default() {
        let ns = Arc::new(FnNamespace::new().with("cb", |_| Ok(Value::from("yes"))));
        let registry = registry_with("cb", ns);

        let mut invoker = CallbackInvoker::new(&registry, CallbackKind::ProgressDownload);
        assert!(invoker.is_set());
        assert!(invoker.evaluate_bool(true), "str answer to bool question must use default");
    }

    #[test]
    fn test_sink_failure_substitutes_default() {
        let ns = Arc::new(FnNamespace::new().with("cb", |_| {
            Err(DispatchError::SinkFailed { reason: "boom".into() })
        }));
        let registry = registry_with("cb", ns);

        let mut invoker = CallbackInvoker::new(&registry, CallbackKind::ProgressDownload);
        assert_eq!(invoker.evaluate_str("fallback"), "fallback");
    }

    #[test]
    fn test_args_are_dropped_without_handler() {
        let registry = CallbackRegistry::new(Arc::new(MapSinkEnv::new()));
        let mut invoker = CallbackInvoker::new(&registry, CallbackKind::StartProvide);
        invoker.arg_str("pkg").arg_int(1);
        assert_eq!(invoker.evaluate(), None);
    }
}
