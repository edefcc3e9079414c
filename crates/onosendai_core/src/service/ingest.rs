//! Hand-off queue from background relay tasks to the update tick.
//!
//! # Invariants
//! - Producers on any thread only enqueue; the cache is written by the tick.
//! - One drain takes at most the events queued when it started, so a busy
//!   producer cannot stretch a tick.

use crate::model::event::Event;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Cloneable producer handle for background ingestion.
#[derive(Debug, Clone)]
pub struct IngestSender {
    sender: Sender<Event>,
}

impl IngestSender {
    /// Queues one event for the next tick.
    ///
    /// Returns `false` when the owning controller is gone.
    pub fn send(&self, event: Event) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Multi-producer, single-consumer event queue.
#[derive(Debug)]
pub struct IngestQueue {
    sender: Sender<Event>,
    receiver: Receiver<Event>,
}

impl Default for IngestQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> IngestSender {
        IngestSender {
            sender: self.sender.clone(),
        }
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Takes every event queued before this call.
    pub fn drain(&self) -> Vec<Event> {
        let pending = self.receiver.len();
        self.receiver.try_iter().take(pending).collect()
    }
}
