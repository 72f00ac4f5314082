//! Metrics sink boundary.
//!
//! Core fold logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between merge logic
//! and the thread-local metrics state.
use crate::{error::ConflictKind, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    FoldStart,
    FoldFinish { rows_merged: u64, rows_skipped: u64 },
    MemberInserted,
    Conflict { kind: ConflictKind },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::FoldStart => {
                m.ops.fold_calls = m.ops.fold_calls.saturating_add(1);
            }
            MetricsEvent::FoldFinish {
                rows_merged,
                rows_skipped,
            } => {
                m.ops.rows_merged = m.ops.rows_merged.saturating_add(rows_merged);
                m.ops.rows_skipped = m.ops.rows_skipped.saturating_add(rows_skipped);
            }
            MetricsEvent::MemberInserted => {
                m.ops.members_inserted = m.ops.members_inserted.saturating_add(1);
            }
            MetricsEvent::Conflict { kind } => m.ops.record_conflict(kind),
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's fold counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all fold counters on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on every exit, including unwinding.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish events for one fold.
/// Ensures finish accounting happens even on unwind.

pub(crate) struct Span {
    rows_merged: u64,
    rows_skipped: u64,
    finished: bool,
}

impl Span {
    /// Start a metrics span for one fold.
    #[must_use]
    pub(crate) fn new() -> Self {
        record(MetricsEvent::FoldStart);

        Self {
            rows_merged: 0,
            rows_skipped: 0,
            finished: false,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows_merged: u64, rows_skipped: u64) {
        self.rows_merged = rows_merged;
        self.rows_skipped = rows_skipped;
    }

    /// Emit the finish event now instead of at drop.
    pub(crate) fn finish(&mut self) {
        if !self.finished {
            record(MetricsEvent::FoldFinish {
                rows_merged: self.rows_merged,
                rows_skipped: self.rows_skipped,
            });
            self.finished = true;
        }
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        self.finish();
    }
}

///
/// TESTS
///
