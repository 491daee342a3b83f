//! Sequential, order-preserving batch submission.
//!
//! [`Batcher`] cuts a slice into contiguous pieces of at most
//! `batch_size` items and hands each piece to a [`BatchSink`], one after
//! the other. Every item lands in exactly one batch, in input order.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinedex_push::{BatchPolicy, Batcher};
//!
//! let batcher = Batcher::new(BatchPolicy::fields());
//! let report = batcher.run(&fields, &field_submitter).await;
//! println!("{report}");
//! ```

use std::fmt;
use std::ops::Range;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::BatchPolicy;
use crate::error::Result;

/// A destination that accepts one batch at a time.
///
/// Implementations perform the remote call(s) for a batch and return an
/// error if the batch was not accepted. The [`Batcher`] decides what
/// happens next.
#[async_trait]
pub trait BatchSink<T: Sync + 'static>: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    /// Submit a single batch.
    async fn submit(&self, batch: &[T]) -> Result<()>;
}

/// Index ranges covering `0..len` in steps of `batch_size`.
///
/// Yields `ceil(len / batch_size)` ranges; a `batch_size` of zero is
/// treated as one.
pub fn batch_ranges(len: usize, batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    let batch_size = batch_size.max(1);
    (0..len.div_ceil(batch_size)).map(move |i| {
        let start = i * batch_size;
        start..(start + batch_size).min(len)
    })
}

/// What happened to one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Submitted,
    /// The sink rejected the batch; holds the rendered error.
    Failed(String),
    /// Never attempted because an earlier batch failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub index: usize,
    pub range: Range<usize>,
    pub status: BatchStatus,
}

/// Per-batch outcome of a [`Batcher::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total_items: usize,
    pub batches: Vec<BatchResult>,
}

impl BatchReport {
    pub fn submitted(&self) -> usize {
        self.count(|s| matches!(s, BatchStatus::Submitted))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, BatchStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, BatchStatus::Skipped))
    }

    /// `true` when every batch was submitted.
    pub fn is_success(&self) -> bool {
        self.submitted() == self.batches.len()
    }

    fn count(&self, pred: impl Fn(&BatchStatus) -> bool) -> usize {
        self.batches.iter().filter(|b| pred(&b.status)).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} batches submitted ({} items), {} failed, {} skipped",
            self.submitted(),
            self.batches.len(),
            self.total_items,
            self.failed(),
            self.skipped()
        )
    }
}

/// Drives a [`BatchSink`] over a slice according to a [`BatchPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    policy: BatchPolicy,
}

impl Batcher {
    pub fn new(policy: BatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Submit `items` batch by batch.
    ///
    /// Batches run strictly in order; the next one starts only after the
    /// previous submission has returned. A failed batch is logged and
    /// recorded, then the run continues unless the policy says to stop,
    /// in which case the remaining batches are recorded as skipped.
    pub async fn run<T, S>(&self, items: &[T], sink: &S) -> BatchReport
    where
        T: Sync + 'static,
        S: BatchSink<T> + ?Sized,
    {
        let total = items.len();
        let mut report = BatchReport { total_items: total, batches: Vec::new() };
        let mut stopped = false;

        for (index, range) in batch_ranges(total, self.policy.batch_size).enumerate() {
            if stopped {
                report.batches.push(BatchResult { index, range, status: BatchStatus::Skipped });
                continue;
            }

            info!(
                sink = sink.name(),
                batch = index,
                "{} to {} of {}",
                range.start,
                range.end,
                total
            );

            let status = match sink.submit(&items[range.clone()]).await {
                Ok(()) => BatchStatus::Submitted,
                Err(e) => {
                    error!(sink = sink.name(), batch = index, error = %e, "batch failed");
                    if self.policy.stop_on_first_failure {
                        warn!(sink = sink.name(), "stopping after first failed batch");
                        stopped = true;
                    }
                    BatchStatus::Failed(e.to_string())
                }
            };
            report.batches.push(BatchResult { index, range, status });
        }

        report
    }
}
