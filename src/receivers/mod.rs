//! # Event receiver adapters.
//!
//! One adapter per engine report channel. Each adapter mirrors the
//! channel's per-operation state machine and forwards into the bridge:
//!
//! ```text
//! Idle ──► Started ──► {Progressing}* ──► Finished ──► Idle
//!              ▲               │
//!              │           Problem ──► Retry → Started
//!              └───────────────┤        Abort → Idle
//!                              └──────  Ignore → Finished
//! ```
//!
//! ## Rules
//! - Adapters never interpret engine-reported domain errors; they
//!   forward `(code, description)` verbatim and decode only the answer.
//! - Progress notifications are coalesced by [`ProgressGate`]: a value is
//!   dispatched iff it is a boundary (`0` or `100`) or at least
//!   [`PROGRESS_STEP`] away from the last *dispatched* value, where the
//!   baseline starts (and resets) at zero. The no-handler path returns
//!   the engine default **without** consuming the gate.
//! - Duplicate `start` calls for the same operation identity are
//!   suppressed by [`StartGate`]; `finish` re-arms it.
//! - All adapter state sits behind a `parking_lot::Mutex` scoped to one
//!   dispatch, so a multi-threaded engine cannot interleave mutation of
//!   the same adapter's dedup state.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::decision::ProblemResponse;
use crate::kind::CallbackKind;
use crate::registry::CallbackRegistry;
use crate::sink::CallbackInvoker;
use crate::value::Value;

mod commit;
mod database;
mod media;
mod progress;
mod script;
mod security;
mod transfer;

pub use commit::{InstallReceiver, RemoveReceiver};
pub use database::{ConvertDbReceiver, RebuildDbReceiver, ScanDbReceiver};
pub use media::{AuthenticationReceiver, MediaChangeReceiver};
pub use progress::ProgressReceiver;
pub use script::{MessageReceiver, ScriptExecReceiver};
pub use security::{DigestReceiver, KeyringConfirmReceiver, KeyringSignalReceiver};
pub use transfer::{DownloadProgressReceiver, DownloadResolvableReceiver};

/// Minimum distance between two dispatched progress values.
///
/// Bounds sink traffic to at most ~21 calls per 0..100 sweep.
pub(crate) const PROGRESS_STEP: i64 = 5;

/// Shared per-bridge context handed to every adapter.
///
/// Cloning shares the underlying registry and the cross-adapter medium
/// correlation state (both are owned by the
/// [`LifecycleManager`](crate::LifecycleManager), never by a
/// process-wide singleton).
#[derive(Clone)]
pub struct BridgeContext {
    registry: Arc<CallbackRegistry>,
    media: Arc<Mutex<MediaCorrelation>>,
}

impl BridgeContext {
    pub fn new(registry: Arc<CallbackRegistry>) -> Self {
        Self { registry, media: Arc::new(Mutex::new(MediaCorrelation::default())) }
    }

    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    pub(crate) fn invoker(&self, kind: CallbackKind) -> CallbackInvoker {
        CallbackInvoker::new(&self.registry, kind)
    }

    /// Records the (source, medium) pair of the current item and reports
    /// whether it differs from the last recorded one. Used to suppress
    /// redundant "source changed" notices when consecutive items come
    /// from the same medium.
    pub(crate) fn source_changed(&self, source: &str, medium: i64) -> bool {
        self.media.lock().changed(source, medium)
    }
}

/// Last reported (source, medium) identity, shared across adapters.
#[derive(Default)]
pub(crate) struct MediaCorrelation {
    last: Option<(String, i64)>,
}

impl MediaCorrelation {
    fn changed(&mut self, source: &str, medium: i64) -> bool {
        let same = self.last.as_ref().is_some_and(|(s, m)| s == source && *m == medium);
        if !same {
            self.last = Some((source.to_owned(), medium));
        }
        !same
    }
}

/// Progress coalescing gate.
///
/// `admit` answers "should this value reach the sink?" and updates the
/// last-reported mark only on yes. The mark starts at zero, so an early
/// value close to zero (e.g. 3) is coalesced away; the boundary values
/// 0 and 100 always pass.
pub(crate) struct ProgressGate {
    last: i64,
}

impl Default for ProgressGate {
    fn default() -> Self {
        Self { last: 0 }
    }
}

impl ProgressGate {
    pub(crate) fn admit(&mut self, value: i64) -> bool {
        let pass =
            value == 0 || value == 100 || (value - self.last).abs() >= PROGRESS_STEP;
        if pass {
            self.last = value;
        }
        pass
    }

    pub(crate) fn reset(&mut self) {
        self.last = 0;
    }
}

/// Evaluates a Problem-class invoker and decodes the answer against the
/// shared problem table. Sinks may answer with either a string or a
/// symbol; both carry the same code set.
///
/// No handler, a failed sink, or any other answer tag all collapse to
/// the channel's documented `default`.
pub(crate) fn decode_problem(
    invoker: &mut CallbackInvoker,
    default: ProblemResponse,
) -> ProblemResponse {
    match invoker.evaluate() {
        Some(Value::Str(answer)) | Some(Value::Symbol(answer)) => {
            ProblemResponse::decode(&answer, default)
        }
        Some(other) => {
            warn!(
                actual = other.tag(),
                "problem answer must be a string or symbol; using default"
            );
            default
        }
        None => default,
    }
}

/// Duplicate-start suppression keyed by operation identity.
#[derive(Default)]
pub(crate) struct StartGate {
    current: Option<String>,
}

impl StartGate {
    /// Returns true when this `start` should be forwarded; false when an
    /// operation with the same identity is already started.
    pub(crate) fn begin(&mut self, identity: &str) -> bool {
        if self.current.as_deref() == Some(identity) {
            return false;
        }
        self.current = Some(identity.to_owned());
        true
    }

    pub(crate) fn finish(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_gate_full_sweep() {
        let mut gate = ProgressGate::default();
        let admitted: Vec<i64> = (0..=100).filter(|v| gate.admit(*v)).collect();
        let expected: Vec<i64> = (0..=100).step_by(5).collect();
        assert_eq!(admitted, expected, "0..=100 sweep must dispatch exactly every 5th value");
    }

    #[test]
    fn test_progress_gate_terminal_value_always_passes() {
        let mut gate = ProgressGate::default();
        assert!(gate.admit(98));
        assert!(gate.admit(100), "100 must pass regardless of prior delta");
    }

    #[test]
    fn test_progress_gate_coalesces_early_values() {
        let mut gate = ProgressGate::default();
        assert!(!gate.admit(3), "baseline is zero, delta 3 < 5");
        assert!(gate.admit(0), "0 is a boundary value");
        assert!(gate.admit(100), "100 is a boundary value");
    }

    #[test]
    fn test_progress_gate_updates_only_on_dispatch() {
        let mut gate = ProgressGate::default();
        assert!(gate.admit(0));
        assert!(!gate.admit(3), "delta 3 < 5");
        assert!(gate.admit(8), "delta vs last *dispatched* (0) is 8");
    }

    #[test]
    fn test_progress_gate_reset_returns_baseline_to_zero() {
        let mut gate = ProgressGate::default();
        assert!(gate.admit(50));
        assert!(!gate.admit(52), "delta 2 < 5");
        gate.reset();
        assert!(gate.admit(52), "after reset the delta is measured from zero");
        gate.reset();
        assert!(!gate.admit(3), "reset must not admit a near-zero value");
    }

    #[test]
    fn test_start_gate_dedup() {
        let mut gate = StartGate::default();
        assert!(gate.begin("pkgA"));
        assert!(!gate.begin("pkgA"), "same identity must be suppressed");
        assert!(gate.begin("pkgB"), "different identity passes");
        gate.finish();
        assert!(gate.begin("pkgB"), "finish re-arms the gate");
    }

    #[test]
    fn test_media_correlation() {
        let mut corr = MediaCorrelation::default();
        assert!(corr.changed("repo-1", 1));
        assert!(!corr.changed("repo-1", 1), "same medium must not re-notify");
        assert!(corr.changed("repo-1", 2), "medium number change notifies");
        assert!(corr.changed("repo-2", 2), "source change notifies");
    }
}
