//! Reference handoff between the feeder and the download workers.
//!
//! An unbounded channel carries [`ReferenceRecord`]s from the single feeder
//! task to the worker pool. Workers share one receiver, so each record is
//! consumed exactly once; a drained-and-closed queue means normal
//! exhaustion, not an error.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::discovery::ReferenceRecord;

/// Thread-safe FIFO handoff of image references to download workers.
///
/// Clones share the same underlying receiver; `pop` waits while the queue is
/// empty but still open.
#[derive(Clone)]
pub struct ReferenceQueue {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<ReferenceRecord>>>,
}

impl ReferenceQueue {
    /// Creates an unbounded queue, returning the producer handle and the
    /// shared consumer side.
    #[must_use]
    pub fn unbounded() -> (UnboundedSender<ReferenceRecord>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            sender,
            Self {
                receiver: Arc::new(Mutex::new(receiver)),
            },
        )
    }

    /// Pops the next reference, waiting while the queue is empty but open.
    ///
    /// Returns `None` once the producer side is dropped and the buffer is
    /// drained - the normal termination signal for workers.
    pub async fn pop(&self) -> Option<ReferenceRecord> {
        self.receiver.lock().await.recv().await
    }
}

/// Spawns the single feeder task: drains the discovered list from its tail
/// into the queue and closes the queue when the list is exhausted.
///
/// Tail order reverses discovery order, which is acceptable - no ordering is
/// promised to consumers. Pushes never block (the queue is unbounded) and
/// never retry.
pub fn spawn_feeder(
    mut records: Vec<ReferenceRecord>,
    sender: UnboundedSender<ReferenceRecord>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let total = records.len();
        while let Some(record) = records.pop() {
            if sender.send(record).is_err() {
                // All workers are gone; nothing left to feed.
                debug!("reference queue closed before feeder finished");
                return;
            }
        }
        debug!(fed = total, "feeder drained source list");
    })
}
