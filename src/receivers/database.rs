//! # Database maintenance adapters: rebuild, convert, scan.
//!
//! Argument orders (fixed, part of each kind's contract):
//! ```text
//! StartRebuildDb     path (str)            StartConvertDb     path (str)
//! ProgressRebuildDb  percent (int)         ProgressConvertDb  percent (int)
//! NotifyRebuildDb    message (str)         NotifyConvertDb    message (str)
//! StopRebuildDb      error (int), reason (str)
//! StopConvertDb      error (int), reason (str)
//!
//! StartScanDb        (no arguments)
//! ProgressScanDb     percent (int)
//! ErrorScanDb        code (int), description (str)
//! DoneScanDb         code (int), reason (str)
//! ```

use parking_lot::Mutex;

use crate::decision::ProblemResponse;
use crate::engine::{ConvertDbReport, RebuildDbReport, ScanDbReport};
use crate::kind::CallbackKind;
use crate::receivers::{decode_problem, BridgeContext, ProgressGate};

/// Adapter for the rebuild-db channel.
pub struct RebuildDbReceiver {
    ctx: BridgeContext,
    gate: Mutex<ProgressGate>,
}

impl RebuildDbReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, gate: Mutex::new(ProgressGate::default()) }
    }
}

impl RebuildDbReport for RebuildDbReceiver {
    fn start(&self, path: &str) {
        self.gate.lock().reset();
        self.ctx.invoker(CallbackKind::StartRebuildDb).arg_str(path).evaluate();
    }

    fn progress(&self, percent: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressRebuildDb);
        if !invoker.is_set() {
            return true;
        }
        if !self.gate.lock().admit(percent) {
            return true;
        }
        invoker.arg_int(percent).evaluate_bool(true)
    }

    fn notify(&self, message: &str) {
        self.ctx.invoker(CallbackKind::NotifyRebuildDb).arg_str(message).evaluate();
    }

    fn stop(&self, error: i64, reason: &str) {
        self.ctx
            .invoker(CallbackKind::StopRebuildDb)
            .arg_int(error)
            .arg_str(reason)
            .evaluate();
        self.gate.lock().reset();
    }
}

/// Adapter for the convert-db channel. Same shape as rebuild.
pub struct ConvertDbReceiver {
    ctx: BridgeContext,
    gate: Mutex<ProgressGate>,
}

impl ConvertDbReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, gate: Mutex::new(ProgressGate::default()) }
    }
}

impl ConvertDbReport for ConvertDbReceiver {
    fn start(&self, path: &str) {
        self.gate.lock().reset();
        self.ctx.invoker(CallbackKind::StartConvertDb).arg_str(path).evaluate();
    }

    fn progress(&self, percent: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressConvertDb);
        if !invoker.is_set() {
            return true;
        }
        if !self.gate.lock().admit(percent) {
            return true;
        }
        invoker.arg_int(percent).evaluate_bool(true)
    }

    fn notify(&self, message: &str) {
        self.ctx.invoker(CallbackKind::NotifyConvertDb).arg_str(message).evaluate();
    }

    fn stop(&self, error: i64, reason: &str) {
        self.ctx
            .invoker(CallbackKind::StopConvertDb)
            .arg_int(error)
            .arg_str(reason)
            .evaluate();
        self.gate.lock().reset();
    }
}

/// Adapter for the scan-db channel.
pub struct ScanDbReceiver {
    ctx: BridgeContext,
    gate: Mutex<ProgressGate>,
}

impl ScanDbReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, gate: Mutex::new(ProgressGate::default()) }
    }
}

impl ScanDbReport for ScanDbReceiver {
    fn start(&self) {
        self.gate.lock().reset();
        self.ctx.invoker(CallbackKind::StartScanDb).evaluate();
    }

    fn progress(&self, percent: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressScanDb);
        if !invoker.is_set() {
            return true;
        }
        if !self.gate.lock().admit(percent) {
            return true;
        }
        invoker.arg_int(percent).evaluate_bool(true)
    }

    fn error(&self, code: i64, description: &str) -> ProblemResponse {
        let mut invoker = self.ctx.invoker(CallbackKind::ErrorScanDb);
        invoker.arg_int(code).arg_str(description);
        decode_problem(&mut invoker, ProblemResponse::Abort)
    }

    fn done(&self, code: i64, reason: &str) {
        self.ctx
            .invoker(CallbackKind::DoneScanDb)
            .arg_int(code)
            .arg_str(reason)
            .evaluate();
        self.gate.lock().reset();
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
    fn test_rebuild_flow_resets_gate_per_operation() {
        let (ctx, ns, registry) = fixture();
        let seen: Arc<StdMutex<Vec<i64>>> = Arc::new(StdMutex::new(Vec::new()));
        let seen_in = seen.clone();
        ns.define("progress", move |args| {
            seen_in.lock().unwrap().push(args[0].as_int().unwrap());
            Ok(Value::from(true))
        });
        registry.set_handler(CallbackKind::ProgressRebuildDb, "Pkg::progress").unwrap();

        let receiver = RebuildDbReceiver::new(ctx);
        receiver.start("/var/lib/rpm");
        assert!(receiver.progress(0));
        assert!(receiver.progress(2)); // coalesced
        assert!(receiver.progress(50));
        receiver.stop(0, "ok");

        receiver.start("/var/lib/rpm");
        // Without the reset the delta against 50 would dispatch this.
        assert!(receiver.progress(2));
        assert!(receiver.progress(5));

        assert_eq!(*seen.lock().unwrap(), vec![0, 50, 5]);
    }

    #[test]
    fn test_scan_error_decodes_answer() {
        let (ctx, ns, registry) = fixture();
        ns.define("error", |args| {
            assert_eq!(args[0].as_int(), Some(13));
            Ok(Value::from(""))
        });
        registry.set_handler(CallbackKind::ErrorScanDb, "Pkg::error").unwrap();

        let receiver = ScanDbReceiver::new(ctx);
        assert_eq!(receiver.error(13, "corrupt header"), ProblemResponse::Retry);
    }

    #[test]
    fn test_scan_error_without_handler_aborts() {
        let (ctx, _ns, _registry) = fixture();
        let receiver = ScanDbReceiver::new(ctx);
        assert_eq!(receiver.error(13, "corrupt header"), ProblemResponse::Abort);
    }

    #[test]
    fn test_convert_notify_forwards_text() {
        let (ctx, ns, registry) = fixture();
        let notes: Arc<StdMutex<Vec<String>>> = Arc::new(StdMutex::new(Vec::new()));
        let notes_in = notes.clone();
        ns.define("notify", move |args| {
            notes_in.lock().unwrap().push(args[0].as_str().unwrap().to_owned());
            Ok(Value::None)
        });
        registry.set_handler(CallbackKind::NotifyConvertDb, "Pkg::notify").unwrap();

        let receiver = ConvertDbReceiver::new(ctx);
        receiver.notify("duplicate entry dropped");
        assert_eq!(*notes.lock().unwrap(), vec!["duplicate entry dropped".to_owned()]);
    }
}
