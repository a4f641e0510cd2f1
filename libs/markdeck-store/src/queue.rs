//! Debounced writes.
//!
//! Callers request a save and move on. Requests for the same key coalesce:
//! only the latest value is written, once the key has been quiet for the
//! debounce delay. A host flushes either on its own tick via
//! [`SaveQueue::flush_due`] or by running a [`Flusher`].

use crate::error::Result;
use crate::kv::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
enum PendingOp {
    Set(String),
    Delete,
}

#[derive(Debug, Clone)]
struct PendingWrite {
    op: PendingOp,
    due_at: DateTime<Utc>,
}

/// Pending writes waiting for their debounce deadline.
#[derive(Debug)]
pub struct SaveQueue {
    debounce: Duration,
    pending: Mutex<HashMap<String, PendingWrite>>,
}

impl SaveQueue {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::milliseconds(i64::try_from(millis).unwrap_or(i64::MAX)))
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Schedule `value` to be written under `key`.
    pub fn request_save(&self, key: &str, value: String, now: DateTime<Utc>) {
        self.enqueue(key, PendingOp::Set(value), now);
    }

    /// Schedule `key` to be removed.
    pub fn request_delete(&self, key: &str, now: DateTime<Utc>) {
        self.enqueue(key, PendingOp::Delete, now);
    }

    fn enqueue(&self, key: &str, op: PendingOp, now: DateTime<Utc>) {
        let due_at = now
            .checked_add_signed(self.debounce)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        tracing::debug!(key, %due_at, "save requested");
        self.pending()
            .insert(key.to_string(), PendingWrite { op, due_at });
    }

    pub fn pending_len(&self) -> usize {
        self.pending().len()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending().contains_key(key)
    }

    /// Earliest deadline among pending writes.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending().values().map(|write| write.due_at).min()
    }

    /// Write every entry whose deadline is at or before `now`.
    pub fn flush_due<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let due: Vec<(String, PendingWrite)> = {
            let mut pending = self.pending();
            let keys: Vec<String> = pending
                .iter()
                .filter(|(_, write)| write.due_at <= now)
                .map(|(key, _)| key.clone())
                .collect();
            keys.into_iter()
                .filter_map(|key| pending.remove_entry(&key))
                .collect()
        };
        self.write(store, due)
    }

    /// Write everything regardless of deadlines.
    pub fn flush_all<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<usize> {
        let all: Vec<(String, PendingWrite)> = self.pending().drain().collect();
        self.write(store, all)
    }

    fn write<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        writes: Vec<(String, PendingWrite)>,
    ) -> Result<usize> {
        let mut written = 0;
        let mut remaining = writes.into_iter();

        while let Some((key, write)) = remaining.next() {
            let outcome = match &write.op {
                PendingOp::Set(value) => store.set(&key, value),
                PendingOp::Delete => store.delete(&key),
            };

            if let Err(err) = outcome {
                // Put the unwritten entries back; anything requested since wins.
                let mut pending = self.pending();
                for (key, write) in std::iter::once((key, write)).chain(remaining) {
                    pending.entry(key).or_insert(write);
                }
                return Err(err);
            }
            written += 1;
        }

        if written > 0 {
            tracing::debug!(written, "flushed pending saves");
        }
        Ok(written)
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<String, PendingWrite>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Messages to control a running flusher.
#[derive(Debug)]
enum FlusherMessage {
    /// Write everything now, keep running.
    FlushNow,
    /// Write everything and stop.
    Shutdown,
}

/// Handle for a background task that flushes a [`SaveQueue`] periodically.
pub struct Flusher {
    sender: mpsc::Sender<FlusherMessage>,
    handle: JoinHandle<()>,
}

impl Flusher {
    /// Spawn the flush loop on the current tokio runtime.
    pub fn spawn<S>(queue: Arc<SaveQueue>, store: Arc<S>, period: std::time::Duration) -> Self
    where
        S: KeyValueStore + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(flush_loop(queue, store, period, rx));
        Self { sender: tx, handle }
    }

    /// Ask the loop to write everything on its next turn.
    pub fn flush_now(&self) {
        match self.sender.try_send(FlusherMessage::FlushNow) {
            Ok(()) => {}
            // A flush is already queued.
            Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("flush requested after the flusher stopped");
            }
        }
    }

    /// Write what is pending and wait for the loop to end.
    pub async fn shutdown(self) {
        let _ = self.sender.send(FlusherMessage::Shutdown).await;
        if let Err(err) = self.handle.await {
            tracing::warn!("flusher task ended abnormally: {}", err);
        }
    }
}

async fn flush_loop<S>(
    queue: Arc<SaveQueue>,
    store: Arc<S>,
    period: std::time::Duration,
    mut rx: mpsc::Receiver<FlusherMessage>,
) where
    S: KeyValueStore + ?Sized + 'static,
{
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = queue.flush_due(store.as_ref(), Utc::now()) {
                    tracing::warn!("background flush failed: {}", err);
                }
            }
            message = rx.recv() => {
                let shutdown = !matches!(message, Some(FlusherMessage::FlushNow));
                if let Err(err) = queue.flush_all(store.as_ref()) {
                    tracing::warn!("flush failed: {}", err);
                }
                if shutdown {
                    break;
                }
            }
        }
    }
}
