//! # Transfer adapters: resolvable provide and byte-level download.
//!
//! Two channels share this module:
//!
//! - [`DownloadResolvableReceiver`] mirrors the provide channel: one
//!   `start`/`finish` pair per resolvable, percent progress in between.
//!   It also owns the "source changed" notice: when the current item
//!   lives on a different (source, medium) pair than the previous one,
//!   a [`CallbackKind::SourceChange`] callback is dispatched first.
//! - [`DownloadProgressReceiver`] mirrors the raw download channel that
//!   reports per-file byte progress with transfer rates.
//!
//! Argument orders (fixed, part of each kind's contract):
//! ```text
//! SourceChange       source (str), medium (int)
//! StartProvide       name (str), url (str), size_kib (int), remote (bool)
//! ProgressProvide    percent (int)
//! ProblemProvide     url (str), code (int), description (str)
//! DoneProvide        code (int), reason (str)
//! StartDownload      url (str), local_path (str)
//! ProgressDownload   percent (int), bps_avg (int), bps_now (int)
//! ProblemDownload    url (str), code (int), description (str)
//! DoneDownload       url (str), code (int), reason (str)
//! ```

use parking_lot::Mutex;

use crate::decision::ProblemResponse;
use crate::engine::{DownloadProgressReport, DownloadResolvableReport};
use crate::kind::CallbackKind;
use crate::receivers::{decode_problem, BridgeContext, ProgressGate, StartGate};

#[derive(Default)]
struct ProvideState {
    start: StartGate,
    gate: ProgressGate,
}

/// Adapter for the download-resolvable (provide) channel.
pub struct DownloadResolvableReceiver {
    ctx: BridgeContext,
    state: Mutex<ProvideState>,
}

impl DownloadResolvableReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, state: Mutex::new(ProvideState::default()) }
    }
}

impl DownloadResolvableReport for DownloadResolvableReceiver {
    fn start(&self, source: &str, medium: i64, name: &str, url: &str, size_kib: i64, remote: bool) {
        if self.ctx.source_changed(source, medium) {
            self.ctx
                .invoker(CallbackKind::SourceChange)
                .arg_str(source)
                .arg_int(medium)
                .evaluate();
        }

        let mut state = self.state.lock();
        if !state.start.begin(url) {
            return;
        }
        state.gate.reset();
        drop(state);

        self.ctx
            .invoker(CallbackKind::StartProvide)
            .arg_str(name)
            .arg_str(url)
            .arg_int(size_kib)
            .arg_bool(remote)
            .evaluate();
    }

    fn progress(&self, percent: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressProvide);
        if !invoker.is_set() {
            return true;
        }
        if !self.state.lock().gate.admit(percent) {
            return true;
        }
        invoker.arg_int(percent).evaluate_bool(true)
    }

    fn problem(&self, url: &str, code: i64, description: &str) -> ProblemResponse {
        let mut invoker = self.ctx.invoker(CallbackKind::ProblemProvide);
        invoker.arg_str(url).arg_int(code).arg_str(description);
        let decision = decode_problem(&mut invoker, ProblemResponse::Abort);
        if decision == ProblemResponse::Abort {
            // Abort returns the operation to Idle.
            let mut state = self.state.lock();
            state.start.finish();
            state.gate.reset();
        }
        decision
    }

    fn finish(&self, code: i64, reason: &str) {
        self.ctx
            .invoker(CallbackKind::DoneProvide)
            .arg_int(code)
            .arg_str(reason)
            .evaluate();
        let mut state = self.state.lock();
        state.start.finish();
        state.gate.reset();
    }
}

#[derive(Default)]
struct DownloadState {
    gate: ProgressGate,
}

/// Adapter for the byte-level download-progress channel.
pub struct DownloadProgressReceiver {
    ctx: BridgeContext,
    state: Mutex<DownloadState>,
}

impl DownloadProgressReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, state: Mutex::new(DownloadState::default()) }
    }
}

impl DownloadProgressReport for DownloadProgressReceiver {
    fn start(&self, url: &str, local_path: &str) {
        self.state.lock().gate.reset();
        self.ctx
            .invoker(CallbackKind::StartDownload)
            .arg_str(url)
            .arg_str(local_path)
            .evaluate();
    }

    fn progress(&self, percent: i64, bps_avg: i64, bps_now: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressDownload);
        if !invoker.is_set() {
            return true;
        }
        if !self.state.lock().gate.admit(percent) {
            return true;
        }
        invoker.arg_int(percent).arg_int(bps_avg).arg_int(bps_now).evaluate_bool(true)
    }

    fn problem(&self, url: &str, code: i64, description: &str) -> ProblemResponse {
        let mut invoker = self.ctx.invoker(CallbackKind::ProblemDownload);
        invoker.arg_str(url).arg_int(code).arg_str(description);
        decode_problem(&mut invoker, ProblemResponse::Abort)
    }

    fn finish(&self, url: &str, code: i64, reason: &str) {
        self.ctx
            .invoker(CallbackKind::DoneDownload)
            .arg_str(url)
            .arg_int(code)
            .arg_str(reason)
            .evaluate();
        self.state.lock().gate.reset();
    }
}
