use std::sync::Arc;

use storyutils::Progress;
use tokio::time::Duration;
use tracing::warn;

use crate::capabilities::{ItemSurface, VideoTransport};
use crate::items::StartDisposition;
use crate::model::ItemState;

/// A video story item. Playback itself runs on the host's transport; the
/// item tracks state and maps the media clock onto its progress tracker.
pub struct VideoItem {
    id: String,
    has_overlay: bool,
    state: ItemState,
    loading: bool,
    muted: bool,
    /// Natural media length in seconds, once reported by the host.
    duration_secs: Option<f64>,
    progress: Progress,
    surface: Arc<dyn ItemSurface>,
    transport: Arc<dyn VideoTransport>,
}

impl VideoItem {
    pub(crate) fn new(
        id: String,
        has_overlay: bool,
        muted: bool,
        surface: Arc<dyn ItemSurface>,
        transport: Arc<dyn VideoTransport>,
    ) -> Self {
        let duration_secs = transport.duration().map(|d| d.as_secs_f64());
        Self {
            id,
            has_overlay,
            state: ItemState::Closed,
            loading: true,
            muted,
            duration_secs,
            progress: Progress::default(),
            surface,
            transport,
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

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
            .or_else(|| self.transport.duration().map(|d| d.as_secs_f64()))
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

    pub(crate) fn set_ready(&mut self) -> bool {
        self.loading = false;
        self.state == ItemState::PlayQueued
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Err(error) = self.transport.set_muted(muted) {
            warn!(item = %self.id, %error, "video transport rejected mute change");
        }
    }

    pub(crate) fn start(&mut self) -> StartDisposition {
        match self.state {
            ItemState::Closed if self.loading => {
                self.state = ItemState::PlayQueued;
                StartDisposition::Queued
            }
            ItemState::Closed | ItemState::PlayQueued => {
                self.progress.reset();
                self.command("rewind", self.transport.rewind());
                self.command("set_muted", self.transport.set_muted(self.muted));
                self.command("play", self.transport.play());
                self.state = ItemState::Playing;
                StartDisposition::Started
            }
            _ => StartDisposition::Ignored,
        }
    }

    pub(crate) fn pause(&mut self) {
        if self.state == ItemState::Playing {
            self.command("pause", self.transport.pause());
            self.state = ItemState::Paused;
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.state == ItemState::Paused {
            self.command("play", self.transport.play());
            self.state = ItemState::Playing;
        }
    }

    /// Allowed from any state: pauses and rewinds native playback.
    pub(crate) fn close(&mut self) {
        self.command("pause", self.transport.pause());
        self.command("rewind", self.transport.rewind());
        self.state = ItemState::Closed;
    }

    /// Media-clock report from the host. Progress only accrues while the
    /// item is actually playing.
    pub(crate) fn on_position(&mut self, position: Duration, duration: Duration) {
        if duration > Duration::ZERO {
            self.duration_secs = Some(duration.as_secs_f64());
        }
        if self.state == ItemState::Playing && duration > Duration::ZERO {
            self.progress
                .set_value(position.as_secs_f64() * 100.0 / duration.as_secs_f64());
        }
    }

    /// Transport failures are environmental: logged, never propagated.
    fn command(&self, operation: &'static str, result: anyhow::Result<()>) {
        if let Err(error) = result {
            warn!(item = %self.id, operation, %error, "video transport command failed");
        }
    }
}
