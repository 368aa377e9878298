use std::sync::Arc;

use storyutils::Progress;

use crate::capabilities::ItemSurface;
use crate::items::StartDisposition;
use crate::model::ItemState;

/// An image story item. Its display duration is driven by a pausable timer
/// owned by the playlist controller, never by the item itself, so exactly
/// one timer exists per player.
pub struct ImageItem {
    id: String,
    duration_secs: f64,
    has_overlay: bool,
    state: ItemState,
    loading: bool,
    progress: Progress,
    surface: Arc<dyn ItemSurface>,
}

impl ImageItem {
    pub(crate) fn new(
        id: String,
        duration_secs: f64,
        has_overlay: bool,
        surface: Arc<dyn ItemSurface>,
    ) -> Self {
        Self {
            id,
            duration_secs,
            has_overlay,
            state: ItemState::Closed,
            // Media is loading until the host reports readiness.
            loading: true,
            progress: Progress::default(),
            surface,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn has_overlay(&self) -> bool {
        self.has_overlay
    }

    /// Configured display duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub(crate) fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    pub(crate) fn surface(&self) -> &Arc<dyn ItemSurface> {
        &self.surface
    }

    /// Mark the media resource ready. Returns true when a start was queued
    /// behind the load, in which case the controller starts the item now.
    pub(crate) fn set_ready(&mut self) -> bool {
        self.loading = false;
        self.state == ItemState::PlayQueued
    }

    pub(crate) fn start(&mut self) -> StartDisposition {
        match self.state {
            ItemState::Closed if self.loading => {
                self.state = ItemState::PlayQueued;
                StartDisposition::Queued
            }
            ItemState::Closed | ItemState::PlayQueued => {
                self.state = ItemState::Playing;
                self.progress.reset();
                StartDisposition::Started
            }
            _ => StartDisposition::Ignored,
        }
    }

    pub(crate) fn pause(&mut self) {
        if self.state == ItemState::Playing {
            self.state = ItemState::Paused;
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.state == ItemState::Paused {
            self.state = ItemState::Playing;
        }
    }

    /// Allowed from any state; the controller destroys the active timer.
    pub(crate) fn close(&mut self) {
        self.state = ItemState::Closed;
    }
}
