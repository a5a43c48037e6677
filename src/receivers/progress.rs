//! # Generic progress ticket adapter.
//!
//! Unlike the per-channel adapters, this one multiplexes: the engine
//! opens numbered tickets (`start`) for arbitrary long operations and
//! reports against them concurrently. Each ticket carries its own
//! coalescing gate, and values are normalized to percent against the
//! ticket's announced total before gating.
//!
//! Argument orders (fixed, part of each kind's contract):
//! ```text
//! ProgressStart     id (int), label (str), total (int)
//! ProgressProgress  id (int), value (int)
//! ProgressDone      id (int)
//! ```

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::warn;

use crate::engine::ProgressReport;
use crate::kind::CallbackKind;
use crate::receivers::{BridgeContext, ProgressGate};

struct Ticket {
    total: i64,
    gate: ProgressGate,
}

/// Adapter for the generic-progress channel.
pub struct ProgressReceiver {
    ctx: BridgeContext,
    tickets: Mutex<HashMap<i64, Ticket>>,
}

impl ProgressReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx, tickets: Mutex::new(HashMap::new()) }
    }

    /// Converts a raw value to percent against the ticket's total. A
    /// ticket with `total <= 0` reports raw values and they pass through
    /// unscaled.
    fn to_percent(total: i64, value: i64) -> i64 {
        if total > 0 {
            value.saturating_mul(100) / total
        } else {
            value
        }
    }
}

impl ProgressReport for ProgressReceiver {
    fn start(&self, id: i64, label: &str, total: i64) {
        self.tickets.lock().insert(id, Ticket { total, gate: ProgressGate::default() });
        self.ctx
            .invoker(CallbackKind::ProgressStart)
            .arg_int(id)
            .arg_str(label)
            .arg_int(total)
            .evaluate();
    }

    fn progress(&self, id: i64, value: i64) -> bool {
        let mut invoker = self.ctx.invoker(CallbackKind::ProgressProgress);
        if !invoker.is_set() {
            return true;
        }

        let mut tickets = self.tickets.lock();
        let Some(ticket) = tickets.get_mut(&id) else {
            warn!(id, "progress for unknown ticket; forwarding unscaled");
            drop(tickets);
            return invoker.arg_int(id).arg_int(value).evaluate_bool(true);
        };
        let percent = Self::to_percent(ticket.total, value);
        if !ticket.gate.admit(percent) {
            return true;
        }
        drop(tickets);

        invoker.arg_int(id).arg_int(percent).evaluate_bool(true)
    }

    fn done(&self, id: i64) {
        self.tickets.lock().remove(&id);
        self.ctx.invoker(CallbackKind::ProgressDone).arg_int(id).evaluate();
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

    fn record_progress(
        ns: &FnNamespace,
        registry: &CallbackRegistry,
    ) -> Arc<StdMutex<Vec<(i64, i64)>>> {
        let seen: Arc<StdMutex<Vec<(i64, i64)>>> = Arc::new(StdMutex::new(Vec::new()));
        let seen_in = seen.clone();
        ns.define("progress", move |args| {
            seen_in
                .lock()
                .unwrap()
                .push((args[0].as_int().unwrap(), args[1].as_int().unwrap()));
            Ok(Value::from(true))
        });
        registry.set_handler(CallbackKind::ProgressProgress, "Pkg::progress").unwrap();
        seen
    }

    #[test]
    fn test_values_normalized_against_total() {
        let (ctx, ns, registry) = fixture();
        let seen = record_progress(&ns, &registry);

        let receiver = ProgressReceiver::new(ctx);
        receiver.start(1, "refreshing", 200);
        assert!(receiver.progress(1, 10)); // 5%
        assert!(receiver.progress(1, 200)); // 100%
        receiver.done(1);

        assert_eq!(*seen.lock().unwrap(), vec![(1, 5), (1, 100)]);
    }

    #[test]
    fn test_tickets_gate_independently() {
        let (ctx, ns, registry) = fixture();
        let seen = record_progress(&ns, &registry);

        let receiver = ProgressReceiver::new(ctx);
        receiver.start(1, "a", 100);
        receiver.start(2, "b", 100);
        assert!(receiver.progress(1, 0));
        assert!(receiver.progress(2, 0)); // own gate, not coalesced by ticket 1
        assert!(receiver.progress(1, 2)); // coalesced
        assert!(receiver.progress(2, 7));

        assert_eq!(*seen.lock().unwrap(), vec![(1, 0), (2, 0), (2, 7)]);
    }

    #[test]
    fn test_zero_total_passes_raw_values() {
        let (ctx, ns, registry) = fixture();
        let seen = record_progress(&ns, &registry);

        let receiver = ProgressReceiver::new(ctx);
        receiver.start(3, "unbounded", 0);
        assert!(receiver.progress(3, 7));
        assert_eq!(*seen.lock().unwrap(), vec![(3, 7)]);
    }

    #[test]
    fn test_unknown_ticket_still_forwards() {
        let (ctx, ns, registry) = fixture();
        let seen = record_progress(&ns, &registry);

        let receiver = ProgressReceiver::new(ctx);
        assert!(receiver.progress(9, 42));
        assert_eq!(*seen.lock().unwrap(), vec![(9, 42)]);
    }

    #[test]
    fn test_done_releases_ticket_state() {
        let (ctx, ns, registry) = fixture();
        let seen = record_progress(&ns, &registry);

        let receiver = ProgressReceiver::new(ctx);
        receiver.start(1, "a", 100);
        assert!(receiver.progress(1, 50));
        receiver.done(1);
        receiver.start(1, "a again", 100);
        assert!(receiver.progress(1, 51), "fresh ticket, fresh gate");

        assert_eq!(*seen.lock().unwrap(), vec![(1, 50), (1, 51)]);
    }

    #[test]
    fn test_no_handler_never_touches_gate() {
        let (ctx, ns, registry) = fixture();
        let receiver = ProgressReceiver::new(ctx);
        receiver.start(1, "a", 100);
        assert!(receiver.progress(1, 7));
        assert!(receiver.progress(1, 9));

        // Late handler: the baseline is still zero. Had the no-handler
        // calls consumed the gate, the mark would sit at 9 and 5 would
        // be coalesced away.
        let seen = record_progress(&ns, &registry);
        assert!(receiver.progress(1, 5));
        assert_eq!(*seen.lock().unwrap(), vec![(1, 5)]);
    }
}
