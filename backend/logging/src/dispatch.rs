//! Rendezvous hand-off between producers and the writer.
//!
//! A producer's `submit` completes only once the writer has dequeued the
//! event, so a writer that stops dequeuing stalls producers.
//!
//! This bounds the hand-off only. The writer dequeues without waiting for
//! earlier writes, so behind a slow disk the parked write tasks, one per
//! accepted event, grow without limit in the writer's task set.

use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, Result};
use crate::event::LogEvent;

/// One slot: the event being handed over. Its producer is still parked on
/// the acknowledgement until the writer takes it.
const HANDOFF_SLOTS: usize = 1;

struct Envelope {
    event: LogEvent,
    accepted: oneshot::Sender<()>,
}

/// Producer side of the queue. Cheap to clone.
#[derive(Clone)]
pub struct Producer {
    tx: mpsc::Sender<Envelope>,
}

/// Consumer side, owned by the writer.
pub struct Consumer {
    rx: mpsc::Receiver<Envelope>,
}

pub fn channel() -> (Producer, Consumer) {
    let (tx, rx) = mpsc::channel(HANDOFF_SLOTS);
    (Producer { tx }, Consumer { rx })
}

impl Producer {
    /// Hand `event` to the writer, waiting until it has been dequeued.
    pub async fn submit(&self, event: LogEvent) -> Result<()> {
        let (accepted, ack) = oneshot::channel();
        self.tx
            .send(Envelope { event, accepted })
            .await
            .map_err(|_| Error::Closed)?;
        ack.await.map_err(|_| Error::Closed)
    }

    /// Blocking variant of [`Producer::submit`] for threads outside the
    /// runtime. Panics if called from within an async context.
    pub fn blocking_submit(&self, event: LogEvent) -> Result<()> {
        let (accepted, ack) = oneshot::channel();
        self.tx
            .blocking_send(Envelope { event, accepted })
            .map_err(|_| Error::Closed)?;
        ack.blocking_recv().map_err(|_| Error::Closed)
    }
}

impl Consumer {
    /// Take the next event and release its producer.
    ///
    /// Returns `None` once every producer is gone and the queue is empty.
    pub async fn next(&mut self) -> Option<LogEvent> {
        let Envelope { event, accepted } = self.rx.recv().await?;
        // The producer may have given up waiting; the event is still ours.
        let _ = accepted.send(());
        Some(event)
    }
}
