//! # Commit adapters: package installation and removal.
//!
//! Argument orders (fixed, part of each kind's contract):
//! ```text
//! StartPackage     name (str), summary (str), size_kib (int), is_update (bool)
//! ProgressPackage  percent (int)
//! ProblemPackage   name (str), code (int), description (str)
//! DonePackage      name (str), code (int), reason (str)
//! StartRemove      name (str)
//! ProgressRemove   percent (int)
//! ProblemRemove    name (str), code (int), description (str)
//! DoneRemove       name (str), code (int), reason (str)
//! ```
//!
//! Install problems default to abort (a half-installed transaction is
//! worse than a stopped one); removal problems default to ignore so one
//! stubborn package does not block the rest of the transaction.

use parking_lot::Mutex;

use crate::decision::ProblemResponse;
use crate::engine::{InstallReport, RemoveReport};
use crate::kind::CallbackKind;
use crate::receivers::{decode_problem, BridgeContext, ProgressGate, StartGate};

#[derive(Default)]
struct CommitState {
    start: StartGate,
    gate: ProgressGate,
}

/// Adapter for the install-resolvable channel.
pub struct InstallReceiver {
    ctx: BridgeContext,
    state: Mutex<CommitState>,
}

impl InstallReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, state: Mutex::new(CommitState::default()) }
    }
}

impl InstallReport for InstallReceiver {
    fn start(&self, name: &str, summary: &str, size_kib: i64, is_update: bool) {
        let mut state = self.state.lock();
        if !state.start.begin(name) {
            return;
        }
        state.gate.reset();
        drop(state);

        self.ctx
            .invoker(CallbackKind::StartPackage)
            .arg_str(name)
            .arg_str(summary)
            .arg_int(size_kib)
            .arg_bool(is_update)
            .evaluate();
    }

    fn progress(&self, percent: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressPackage);
        if !invoker.is_set() {
            return true;
        }
        if !self.state.lock().gate.admit(percent) {
            return true;
        }
        invoker.arg_int(percent).evaluate_bool(true)
    }

    fn problem(&self, name: &str, code: i64, description: &str) -> ProblemResponse {
        let mut invoker = self.ctx.invoker(CallbackKind::ProblemPackage);
        invoker.arg_str(name).arg_int(code).arg_str(description);
        let decision = decode_problem(&mut invoker, ProblemResponse::Abort);
        if decision == ProblemResponse::Abort {
            let mut state = self.state.lock();
            state.start.finish();
            state.gate.reset();
        }
        decision
    }

    fn finish(&self, name: &str, code: i64, reason: &str) {
        self.ctx
            .invoker(CallbackKind::DonePackage)
            .arg_str(name)
            .arg_int(code)
            .arg_str(reason)
            .evaluate();
        let mut state = self.state.lock();
        state.start.finish();
        state.gate.reset();
    }
}

/// Adapter for the remove-resolvable channel.
pub struct RemoveReceiver {
    ctx: BridgeContext,
    state: Mutex<CommitState>,
}

impl RemoveReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, state: Mutex::new(CommitState::default()) }
    }
}

impl RemoveReport for RemoveReceiver {
    fn start(&self, name: &str) {
        let mut state = self.state.lock();
        if !state.start.begin(name) {
            return;
        }
        state.gate.reset();
        drop(state);

        self.ctx.invoker(CallbackKind::StartRemove).arg_str(name).evaluate();
    }

    fn progress(&self, percent: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressRemove);
        if !invoker.is_set() {
            return true;
        }
        if !self.state.lock().gate.admit(percent) {
            return true;
        }
        invoker.arg_int(percent).evaluate_bool(true)
    }

    fn problem(&self, name: &str, code: i64, description: &str) -> ProblemResponse {
        let mut invoker = self.ctx.invoker(CallbackKind::ProblemRemove);
        invoker.arg_str(name).arg_int(code).arg_str(description);
        decode_problem(&mut invoker, ProblemResponse::Ignore)
    }

    fn finish(&self, name: &str, code: i64, reason: &str) {
        self.ctx
            .invoker(CallbackKind::DoneRemove)
            .arg_str(name)
            .arg_int(code)
            .arg_str(reason)
            .evaluate();
        let mut state = self.state.lock();
        state.start.finish();
        state.gate.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;
    use crate::registry::CallbackRegistry;
    use crate::sink::{FnNamespace, MapSinkEnv, Namespace};
    use crate::value::Value;

    fn fixture() -> (BridgeContext, Arc<FnNamespace>, Arc<CallbackRegistry>) {
        let ns = Arc::new(FnNamespace::new());
        let env = MapSinkEnv::new().with("Pkg", ns.clone() as Arc<dyn Namespace>);
        let registry = Arc::new(CallbackRegistry::new(Arc::new(env)));
        (BridgeContext::new(registry.clone()), ns, registry)
    }

    #[test]
    fn test_install_duplicate_start_forwards_exactly_one_event() {
        let (ctx, ns, registry) = fixture();
        let starts = Arc::new(StdMutex::new(Vec::<String>::new()));
        let starts_in = starts.clone();
        ns.define("start", move |args| {
            starts_in.lock().unwrap().push(args[0].as_str().unwrap().to_owned());
            Ok(Value::None)
        });
        registry.set_handler(CallbackKind::StartPackage, "Pkg::start").unwrap();

        let receiver = InstallReceiver::new(ctx);
        receiver.start("itemA", "Item A", 100, false);
        receiver.start("itemA", "Item A", 100, false);

        assert_eq!(*starts.lock().unwrap(), vec!["itemA".to_owned()]);
    }

    #[test]
    fn test_install_problem_retry_keeps_operation_started() {
        let (ctx, ns, registry) = fixture();
        ns.define("problem", |_| Ok(Value::from("R")));
        let starts = Arc::new(StdMutex::new(0usize));
        let starts_in = starts.clone();
        ns.define("start", move |_| {
            *starts_in.lock().unwrap() += 1;
            Ok(Value::None)
        });
        registry.set_handler(CallbackKind::ProblemPackage, "Pkg::problem").unwrap();
        registry.set_handler(CallbackKind::StartPackage, "Pkg::start").unwrap();

        let receiver = InstallReceiver::new(ctx);
        receiver.start("itemA", "Item A", 100, false);
        assert_eq!(receiver.problem("itemA", 7, "script failed"), ProblemResponse::Retry);

        // Retry re-enters Started: the engine re-sends start for the same
        // identity and the duplicate is suppressed.
        receiver.start("itemA", "Item A", 100, false);
        assert_eq!(*starts.lock().unwrap(), 1);
    }

    #[test]
    fn test_install_problem_abort_returns_to_idle() {
        let (ctx, ns, registry) = fixture();
        ns.define("problem", |_| Ok(Value::from("C")));
        let starts = Arc::new(StdMutex::new(0usize));
        let starts_in = starts.clone();
        ns.define("start", move |_| {
            *starts_in.lock().unwrap() += 1;
            Ok(Value::None)
        });
        registry.set_handler(CallbackKind::ProblemPackage, "Pkg::problem").unwrap();
        registry.set_handler(CallbackKind::StartPackage, "Pkg::start").unwrap();

        let receiver = InstallReceiver::new(ctx);
        receiver.start("itemA", "Item A", 100, false);
        assert_eq!(receiver.problem("itemA", 7, "disk full"), ProblemResponse::Abort);

        // After abort the same identity may legitimately start over.
        receiver.start("itemA", "Item A", 100, false);
        assert_eq!(*starts.lock().unwrap(), 2);
    }

    #[test]
    fn test_remove_problem_defaults_to_ignore() {
        let (ctx, _ns, _registry) = fixture();
        let receiver = RemoveReceiver::new(ctx);
        assert_eq!(
            receiver.problem("itemA", 1, "file busy"),
            ProblemResponse::Ignore,
            "removal engine default must not abort the transaction"
        );
    }

    #[test]
    fn test_remove_finish_resets_dedup() {
        let (ctx, ns, registry) = fixture();
        let starts = Arc::new(StdMutex::new(0usize));
        let starts_in = starts.clone();
        ns.define("start", move |_| {
            *starts_in.lock().unwrap() += 1;
            Ok(Value::None)
        });
        registry.set_handler(CallbackKind::StartRemove, "Pkg::start").unwrap();

        let receiver = RemoveReceiver::new(ctx);
        receiver.start("itemA");
        receiver.finish("itemA", 0, "");
        receiver.start("itemA");
        assert_eq!(*starts.lock().unwrap(), 2);
    }
}
