//! Module: aggregate
//! Responsibility: fold a row sequence through the caller's accessor into one
//! accumulator tree, then materialize it.
//! Does not own: merge rules (see `accumulator`) or row sourcing.
//! Boundary: the public entrypoints; every fold starts from an empty root.

use crate::{
    accumulator::{Accumulator, MergeContext},
    config::AggregateConfig,
    error::AggregationConflictError,
    field::Field,
    key::KeyStringifier,
    materialize::to_value,
    obs::sink::Span,
    value::Value,
};
use std::sync::Arc;

///
/// Aggregator
///
/// Configured orchestrator. Holds policy only; every `aggregate` or `fold`
/// call builds a fresh accumulator tree.
///

#[derive(Clone, Debug)]
pub struct Aggregator {
    config: AggregateConfig,
    stringifier: Arc<dyn KeyStringifier>,
    default: Option<Value>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AggregateConfig::default())
    }
}

impl Aggregator {
    #[must_use]
    pub fn new(config: AggregateConfig) -> Self {
        Self {
            config,
            stringifier: config.key_encoding.stringifier(),
            default: None,
        }
    }

    /// Value returned when the row sequence is empty.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Replace the key projection selected by the config.
    #[must_use]
    pub fn with_stringifier(mut self, stringifier: impl KeyStringifier + 'static) -> Self {
        self.stringifier = Arc::new(stringifier);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Start an incremental fold.
    #[must_use]
    pub fn fold(&self) -> Fold<'_> {
        Fold::new(self)
    }

    /// Fold every row and materialize the result.
    ///
    /// The accessor may return `Field` or `Option<Field>`; rows mapped to
    /// `None` are skipped.
    pub fn aggregate<R, D>(
        &self,
        mut accessor: impl FnMut(R) -> D,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Option<Value>, AggregationConflictError>
    where
        D: Into<Option<Field>>,
    {
        let mut fold = self.fold();
        for row in rows {
            fold.push(accessor(row))?;
        }

        fold.finish()
    }

    fn merge_context(&self) -> MergeContext<'_> {
        MergeContext::new(self.stringifier.as_ref(), self.config.scalar_policy)
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.config.debug {
            println!("[debug] {}", s.as_ref());
        }
    }
}

///
/// Fold
///
/// Incremental fold for row sources that arrive in chunks.
/// The first conflict poisons the fold: every later call returns it.
///

pub struct Fold<'a> {
    aggregator: &'a Aggregator,
    root: Option<Accumulator>,
    rows_seen: u64,
    rows_merged: u64,
    rows_skipped: u64,
    poisoned: Option<AggregationConflictError>,
    span: Span,
}

impl<'a> Fold<'a> {
    fn new(aggregator: &'a Aggregator) -> Self {
        aggregator.debug_log(format!(
            "fold start: scalar_policy={:?} key_encoding={:?}",
            aggregator.config.scalar_policy, aggregator.config.key_encoding
        ));

        Self {
            aggregator,
            root: None,
            rows_seen: 0,
            rows_merged: 0,
            rows_skipped: 0,
            poisoned: None,
            span: Span::new(),
        }
    }

    #[must_use]
    pub const fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Merge one row's descriptor; `None` skips the row.
    pub fn push(&mut self, descriptor: impl Into<Option<Field>>) -> Result<(), AggregationConflictError> {
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }

        self.rows_seen += 1;
        let Some(field) = descriptor.into() else {
            self.rows_skipped += 1;
            self.span.set_rows(self.rows_merged, self.rows_skipped);
            self.aggregator
                .debug_log(format!("row {} skipped: no descriptor", self.rows_seen));
            return Ok(());
        };

        let cx = self.aggregator.merge_context();
        let result = match self.root.as_mut() {
            Some(root) => root.merge(field, cx),
            None => {
                self.root = Some(Accumulator::from_field(field, cx));
                Ok(())
            }
        };

        match result {
            Ok(()) => {
                self.rows_merged += 1;
                self.span.set_rows(self.rows_merged, self.rows_skipped);
                Ok(())
            }
            Err(err) => {
                self.aggregator
                    .debug_log(format!("row {} conflict: {err}", self.rows_seen));
                self.poisoned = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Merge every descriptor in order, stopping at the first conflict.
    pub fn extend<D>(
        &mut self,
        descriptors: impl IntoIterator<Item = D>,
    ) -> Result<(), AggregationConflictError>
    where
        D: Into<Option<Field>>,
    {
        descriptors
            .into_iter()
            .try_for_each(|descriptor| self.push(descriptor))
    }

    /// Materialize the folded tree.
    ///
    /// No rows → the aggregator default. Rows without any descriptor, or a
    /// root that never received a value → `None`.
    pub fn finish(mut self) -> Result<Option<Value>, AggregationConflictError> {
        if let Some(err) = self.poisoned.take() {
            return Err(err);
        }

        let value = if self.rows_seen == 0 {
            self.aggregator.default.clone()
        } else {
            self.root.as_ref().and_then(to_value)
        };

        self.aggregator.debug_log(format!(
            "fold finish: rows merged={} skipped={} present={}",
            self.rows_merged,
            self.rows_skipped,
            value.is_some()
        ));
        self.span.finish();

        Ok(value)
    }
}

/// Fold `rows` with the default configuration.
pub fn aggregate<R, D>(
    accessor: impl FnMut(R) -> D,
    rows: impl IntoIterator<Item = R>,
) -> Result<Option<Value>, AggregationConflictError>
where
    D: Into<Option<Field>>,
{
    Aggregator::default().aggregate(accessor, rows)
}

/// Fold `rows`, returning `default` when there are none.
pub fn aggregate_or<R, D>(
    accessor: impl FnMut(R) -> D,
    rows: impl IntoIterator<Item = R>,
    default: impl Into<Value>,
) -> Result<Option<Value>, AggregationConflictError>
where
    D: Into<Option<Field>>,
{
    Aggregator::default()
        .with_default(default)
        .aggregate(accessor, rows)
}

/// Fold loosely shaped input: `None` is empty, a list is the row sequence and
/// any other value is a single row.
pub fn aggregate_value<D>(
    accessor: impl FnMut(Value) -> D,
    data: Option<Value>,
) -> Result<Option<Value>, AggregationConflictError>
where
    D: Into<Option<Field>>,
{
    let rows = match data {
        None => Vec::new(),
        Some(Value::List(rows)) => rows,
        Some(row) => vec![row],
    };

    aggregate(accessor, rows)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ScalarPolicy,
        error::ConflictKind,
        field::{many, one, one_keyed},
        key::StableHashStringifier,
        obs::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink},
        record,
    };
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct CapturingSink {
        events: RefCell<Vec<MetricsEvent>>,
    }

    impl MetricsSink for CapturingSink {
        fn record(&self, event: MetricsEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn empty_rows_return_the_default() {
        let rows: Vec<u64> = Vec::new();
        assert_eq!(aggregate(|id| one_keyed(id, id), rows.clone()), Ok(None));
        assert_eq!(
            aggregate_or(|id| many(id, id), rows, "fallback"),
            Ok(Some(Value::from("fallback")))
        );
    }

    #[test]
    fn rows_without_descriptors_return_none_not_default() {
        let out = Aggregator::default()
            .with_default("fallback")
            .aggregate(|_: u64| None::<Field>, [1, 2, 3]);
        assert_eq!(out, Ok(None));
    }

    #[test]
    fn skipped_rows_do_not_interrupt_the_fold() {
        let out = aggregate(
            |id: u64| (id % 2 == 0).then(|| many(id, id)),
            1..=6,
        );
        assert_eq!(out, Ok(Some(Value::from_list(vec![2u64, 4, 6]))));
    }

    #[test]
    fn aggregate_value_accepts_single_rows_and_lists() {
        let accessor = |row: Value| one_keyed(row["id"].clone(), row);
        let row = Value::from_map([("id", 1u64)]);

        assert_eq!(aggregate_value(accessor, None), Ok(None));
        assert_eq!(
            aggregate_value(accessor, Some(row.clone())),
            Ok(Some(row.clone()))
        );
        assert_eq!(
            aggregate_value(accessor, Some(Value::List(vec![row.clone(), row.clone()]))),
            Ok(Some(row))
        );
    }

    #[test]
    fn fold_accepts_chunks_and_matches_one_shot_aggregate() {
        let describe = |n: u64| many(n % 3, n % 3);
        let aggregator = Aggregator::default();

        let mut fold = aggregator.fold();
        fold.extend((0..4).map(describe)).expect("first chunk");
        fold.extend((4..9).map(describe)).expect("second chunk");
        assert_eq!(fold.rows_seen(), 9);

        assert_eq!(fold.finish(), aggregator.aggregate(describe, 0..9));
    }

    #[test]
    fn conflicts_poison_the_fold() {
        let aggregator = Aggregator::default();
        let mut fold = aggregator.fold();

        fold.push(one_keyed(1u64, "a")).expect("first row");
        let err = fold.push(one_keyed(2u64, "b")).expect_err("identity conflict");
        assert!(fold.is_poisoned());

        assert_eq!(fold.push(one_keyed(1u64, "a")), Err(err.clone()));
        assert_eq!(fold.finish(), Err(err));
    }

    #[test]
    fn strict_config_reaches_the_merge() {
        let rows = [(1u64, "a"), (1u64, "b")];
        let describe = |(id, name): (u64, &str)| many(id, record! { "name" => name });

        let lenient = Aggregator::default().aggregate(describe, rows);
        assert!(lenient.is_ok());

        let strict = Aggregator::new(AggregateConfig::strict()).aggregate(describe, rows);
        assert_eq!(strict.map_err(|err| err.kind()), Err(ConflictKind::Value));
        assert_eq!(
            AggregateConfig::strict().scalar_policy,
            ScalarPolicy::Strict
        );
    }

    #[test]
    fn debug_logging_does_not_change_output() {
        let describe = |n: u64| (n != 2).then(|| many(n % 2, n));
        let quiet = Aggregator::default().aggregate(describe, 0..5);
        let noisy =
            Aggregator::new(AggregateConfig::new().with_debug(true)).aggregate(describe, 0..5);

        assert_eq!(quiet, noisy);
        assert_eq!(quiet, Ok(Some(Value::from_list(vec![0u64, 1]))));
    }

    #[test]
    fn stringifier_choice_does_not_change_output() {
        let rows = [("a", "user"), ("a", "user"), ("b", "admin")];
        let describe = |(name, role): (&str, &str)| {
            many(
                Value::from_map([("name", name), ("role", role)]),
                record! { "name" => name, "role" => role },
            )
        };

        let canonical = Aggregator::default().aggregate(describe, rows);
        let hashed = Aggregator::default()
            .with_stringifier(StableHashStringifier)
            .aggregate(describe, rows);

        assert_eq!(canonical, hashed);
        assert_eq!(
            canonical
                .expect("aggregate")
                .as_ref()
                .and_then(Value::as_list)
                .map(Vec::len),
            Some(2)
        );
    }

    #[test]
    fn fold_reports_metrics_events() {
        let sink = Rc::new(CapturingSink::default());

        with_metrics_sink(sink.clone(), || {
            let out = aggregate(|n: u64| (n > 0).then(|| many(n, n)), [0, 1, 2, 1]);
            assert!(out.is_ok());
        });

        assert_eq!(
            *sink.events.borrow(),
            vec![
                MetricsEvent::FoldStart,
                MetricsEvent::MemberInserted,
                MetricsEvent::MemberInserted,
                MetricsEvent::FoldFinish {
                    rows_merged: 3,
                    rows_skipped: 1,
                },
            ]
        );
    }

    #[test]
    fn conflicts_are_counted_in_the_global_report() {
        metrics_reset_all();

        let err = aggregate(
            |n: u64| if n == 0 { one(n) } else { many(n, n) },
            [0, 1],
        );
        assert!(err.is_err());

        let ops = metrics_report().ops;
        assert_eq!(ops.fold_calls, 1);
        assert_eq!(ops.arity_conflicts, 1);
        assert_eq!(ops.rows_merged, 1);
    }
}
