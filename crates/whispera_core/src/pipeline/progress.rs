//! Progress reporting from the worker thread.
//!
//! The pipeline emits `(message, percent)` pairs into a bounded channel
//! that the interaction layer drains on its own schedule. Sends never
//! block: when the channel is full the update is dropped. Progress is an
//! observation channel only - it has no effect on control flow.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

/// One progress checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Human-readable status line.
    pub message: String,
    /// Completion estimate, 0-100.
    pub percent: u8,
}

/// Sending half handed to the pipeline.
#[derive(Clone)]
pub struct ProgressSender {
    tx: SyncSender<ProgressUpdate>,
}

impl ProgressSender {
    /// Emit an update; silently dropped if the receiver lags or is gone.
    pub fn send(&self, message: impl Into<String>, percent: u8) {
        let update = ProgressUpdate {
            message: message.into(),
            percent,
        };
        let _ = self.tx.try_send(update);
    }
}

/// Create a bounded progress channel.
pub fn progress_channel(capacity: usize) -> (ProgressSender, Receiver<ProgressUpdate>) {
    let (tx, rx) = sync_channel(capacity);
    (ProgressSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_updates_in_order() {
        let (tx, rx) = progress_channel(8);
        tx.send("Processing file...", 10);
        tx.send("Complete!", 100);
        drop(tx);

        let updates: Vec<ProgressUpdate> = rx.iter().collect();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].message, "Processing file...");
        assert_eq!(updates[0].percent, 10);
        assert_eq!(updates[1].percent, 100);
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (tx, rx) = progress_channel(1);
        tx.send("first", 10);
        tx.send("second", 20);

        assert_eq!(rx.try_recv().unwrap().message, "first");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_after_receiver_dropped_is_harmless() {
        let (tx, rx) = progress_channel(1);
        drop(rx);
        tx.send("late", 50);
    }
}
