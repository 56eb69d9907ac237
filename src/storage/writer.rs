//! Single-owner writer task
//!
//! During a crawl the record store is moved into one blocking task that
//! receives batches over a channel. Workers only ever hold a [`RecordWriter`]
//! handle, so persisted storage has at most one writer.

use crate::keywords::annotate_batch;
use crate::storage::{NewsRecord, RecordStore, StorageResult};
use crate::KhabarError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Totals reported by the writer when it shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterTotals {
    /// Batches merged into the store
    pub batches: usize,
    /// Records received across all batches
    pub records_received: usize,
    /// Rows in the store after the last merge
    pub total_rows: usize,
}

/// Cloneable handle for sending batches to the writer
#[derive(Debug, Clone)]
pub struct RecordWriter {
    tx: mpsc::Sender<Vec<NewsRecord>>,
}

impl RecordWriter {
    /// Queues a batch for merging
    ///
    /// Empty batches are dropped here. Fails only when the writer task has
    /// stopped, which happens after a persistence error.
    pub async fn send(&self, batch: Vec<NewsRecord>) -> Result<(), KhabarError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.tx.send(batch).await.map_err(|_| KhabarError::WriterGone)
    }
}

/// Moves a store into a new writer task
///
/// The task computes keywords for each batch, merges it, and persists it.
/// Once every [`RecordWriter`] is dropped it drains the queue and returns the
/// store together with its totals.
///
/// # Arguments
///
/// * `store` - The record store to own
/// * `capacity` - Maximum number of batches queued before senders wait
pub fn spawn_writer<S>(
    mut store: S,
    capacity: usize,
) -> (RecordWriter, JoinHandle<StorageResult<(S, WriterTotals)>>)
where
    S: RecordStore + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Vec<NewsRecord>>(capacity.max(1));

    let handle = tokio::task::spawn_blocking(move || {
        let mut totals = WriterTotals::default();

        while let Some(mut batch) = rx.blocking_recv() {
            annotate_batch(&mut batch);
            let report = store.save_batch(batch)?;

            totals.batches += 1;
            totals.records_received += report.received;
            totals.total_rows = report.total;

            tracing::debug!(
                "Saved batch of {} records ({} replaced, {} rows total)",
                report.received,
                report.replaced,
                report.total
            );
        }

        Ok((store, totals))
    });

    (RecordWriter { tx }, handle)
}
