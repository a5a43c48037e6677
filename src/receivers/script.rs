//! # Script execution and message adapters.
//!
//! Argument orders (fixed, part of each kind's contract):
//! ```text
//! ScriptStart     package (str), path (str)
//! ScriptProgress  ping (bool), output (str)
//! ScriptProblem   description (str)
//! ScriptFinish    (no arguments)
//! Message         package (str), text (str)
//! ```
//!
//! Script progress is not percent-based (the engine cannot predict how
//! long a maintainer script runs), so there is no coalescing gate here;
//! the answer is a bare "continue" bool and `false` aborts the script.

use parking_lot::Mutex;

use crate::decision::ProblemResponse;
use crate::engine::{MessageReport, ScriptExecReport};
use crate::kind::CallbackKind;
use crate::receivers::{decode_problem, BridgeContext, StartGate};

/// Adapter for the script-exec channel.
pub struct ScriptExecReceiver {
    ctx: BridgeContext,
    start: Mutex<StartGate>,
}

impl ScriptExecReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, start: Mutex::new(StartGate::default()) }
    }
}

impl ScriptExecReport for ScriptExecReceiver {
    fn start(&self, package: &str, path: &str) {
        let identity = format!("{package}:{path}");
        if !self.start.lock().begin(&identity) {
            return;
        }
        self.ctx
            .invoker(CallbackKind::ScriptStart)
            .arg_str(package)
            .arg_str(path)
            .evaluate();
    }

    fn progress(&self, ping: bool, output: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::ScriptProgress)
            .arg_bool(ping)
            .arg_str(output)
            .evaluate_bool(true)
    }

    fn problem(&self, description: &str) -> ProblemResponse {
        let mut invoker = self.ctx.invoker(CallbackKind::ScriptProblem);
        invoker.arg_str(description);
        decode_problem(&mut invoker, ProblemResponse::Abort)
    }

    fn finish(&self) {
        self.ctx.invoker(CallbackKind::ScriptFinish).evaluate();
        self.start.lock().finish();
    }
}

/// Adapter for the message channel.
pub struct MessageReceiver {
    ctx: BridgeContext,
}

impl MessageReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx }
    }
}

impl MessageReport for MessageReceiver {
    fn show(&self, package: &str, text: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::Message)
            .arg_str(package)
            .arg_str(text)
            .evaluate_bool(true)
    }
}
