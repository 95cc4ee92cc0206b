//! Telemetry related to the SQLite persistent store.
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::Counter;
use prometheus::CounterVec;
use prometheus::HistogramOpts;
use prometheus::HistogramTimer;
use prometheus::HistogramVec;
use prometheus::Opts;

/// Duration (in seconds) of SQLite operations.
pub static OPS_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shipcore_store_sqlite_ops_duration",
            "Duration (in seconds) of SQLite operations",
        )
        .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["op"],
    )
    .expect("failed to initialise OPS_DURATION histogram")
});

/// Number of SQLite operations that resulted in error.
pub static OPS_ERR: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        Opts::new(
            "shipcore_store_sqlite_ops_error",
            "Number of SQLite operations that resulted in error",
        ),
        &["op"],
    )
    .expect("failed to initialise OPS_ERR counter")
});

/// Ensure metrics are registered only once.
static METRICS_REGISTERED: AtomicBool = AtomicBool::new(false);

/// The first time this method is called it will register the SQLite store backend metrics.
pub fn register_metrics(reg: &prometheus::Registry) -> Result<()> {
    // Skip registration if already done before.
    if METRICS_REGISTERED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }

    let collectors: [Box<dyn prometheus::core::Collector>; 2] =
        [Box::new(OPS_DURATION.clone()), Box::new(OPS_ERR.clone())];
    for collector in collectors {
        reg.register(collector)?;
    }
    Ok(())
}

/// Observe the execution of an SQLite operation.
///
/// ## Returns
///
/// - A [`Counter`] to increment in case of error.
/// - A started timer to observe the duration of the operation.
#[inline]
pub fn observe_op(op: &str) -> (Counter, HistogramTimer) {
    let err_count = OPS_ERR.with_label_values(&[op]);
    let timer = OPS_DURATION.with_label_values(&[op]).start_timer();
    (err_count, timer)
}

/// Await an SQLite operation, recording its duration and counting failures.
pub async fn observe<F, T, E>(op: &str, operation: F) -> std::result::Result<T, E>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    let (err_count, _timer) = observe_op(op);
    let result = operation.await;
    if result.is_err() {
        err_count.inc();
    }
    result
}
