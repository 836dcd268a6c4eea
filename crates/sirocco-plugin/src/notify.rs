//! One-way notification channel toward the UI.
//!
//! Best effort by contract: the audio thread never blocks on it and audio
//! correctness never depends on a notification arriving.

use crossbeam_channel::{bounded, Receiver};
use serde::{Deserialize, Serialize};
use sirocco_core::TransportState;
use sirocco_dsp::UiState;

const DEFAULT_CAPACITY: usize = 64;

/// Messages the plugins push to an attached UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// Engine internals snapshot, sent once per block while a UI listens.
    UiState(UiState),
    /// Echo of the last host position update.
    Position(TransportState),
}

/// Sending half; drops on a full channel instead of blocking.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    tx: crossbeam_channel::Sender<Notification>,
}

impl NotificationSender {
    pub fn send(&self, notification: Notification) {
        if self.tx.try_send(notification).is_err() {
            tracing::trace!("notification dropped, UI not draining");
        }
    }
}

pub fn notification_channel() -> (NotificationSender, Receiver<Notification>) {
    let (tx, rx) = bounded(DEFAULT_CAPACITY);
    (NotificationSender { tx }, rx)
}
