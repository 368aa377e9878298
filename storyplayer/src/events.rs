use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::model::{ItemSnapshot, MaxProgress};

/// Outbound playback notifications, delivered through the event bus after
/// the triggering call returns to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    /// The playlist entered `playing`.
    Start,
    /// An item was revealed and started (or queued behind its media load).
    ItemStart { item: ItemSnapshot },
    /// An item was closed; its snapshot shows the forced-complete progress.
    ItemClose { item: ItemSnapshot },
    /// An item reached natural completion while default navigation is
    /// disabled; the host decides what happens next.
    ItemPlayComplete { id: String },
    ItemPause,
    ItemResume,
    Mute,
    Unmute,
    /// The playlist closed; carries the per-item high-water report.
    Close {
        max_progress: HashMap<String, MaxProgress>,
    },
}

/// Fan-out bus for player notifications. Each subscriber gets its own
/// unbounded channel; senders whose receiver was dropped are pruned on the
/// next broadcast.
#[derive(Clone, Default)]
pub struct PlayerEventBus {
    subscribers: Arc<Mutex<Vec<Sender<PlayerEvent>>>>,
}

impl PlayerEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        let (tx, rx) = unbounded::<PlayerEvent>();
        {
            let mut subscribers = self.subscribers.lock().unwrap();
            subscribers.push(tx);
        }
        rx
    }

    pub(crate) fn broadcast(&self, event: PlayerEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
