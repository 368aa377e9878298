//! Playback items: the tagged Image/Video variant behind a single
//! method surface, so the controller never branches on media type except
//! where the semantics genuinely differ.

mod image;
mod video;

use std::sync::Arc;

pub use image::ImageItem;
pub use video::VideoItem;

use storyutils::Progress;

use crate::capabilities::ItemSurface;
use crate::model::{ItemSnapshot, ItemState, MediaKind};

/// Outcome of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartDisposition {
    /// Playback began; for images the controller now spawns the timer.
    Started,
    /// The media is still loading; the start is consumed by the readiness
    /// signal.
    Queued,
    /// The item was not in a startable state.
    Ignored,
}

/// One playback item, polymorphic over the two media variants.
pub enum PlaybackItem {
    Image(ImageItem),
    Video(VideoItem),
}

impl PlaybackItem {
    pub fn id(&self) -> &str {
        match self {
            PlaybackItem::Image(item) => item.id(),
            PlaybackItem::Video(item) => item.id(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            PlaybackItem::Image(_) => MediaKind::Image,
            PlaybackItem::Video(_) => MediaKind::Video,
        }
    }

    pub fn state(&self) -> ItemState {
        match self {
            PlaybackItem::Image(item) => item.state(),
            PlaybackItem::Video(item) => item.state(),
        }
    }

    pub fn loading(&self) -> bool {
        match self {
            PlaybackItem::Image(item) => item.loading(),
            PlaybackItem::Video(item) => item.loading(),
        }
    }

    pub fn has_overlay(&self) -> bool {
        match self {
            PlaybackItem::Image(item) => item.has_overlay(),
            PlaybackItem::Video(item) => item.has_overlay(),
        }
    }

    /// Seconds; always known for images, known for videos once the host
    /// reported a media length.
    pub fn duration_secs(&self) -> Option<f64> {
        match self {
            PlaybackItem::Image(item) => Some(item.duration_secs()),
            PlaybackItem::Video(item) => item.duration_secs(),
        }
    }

    pub fn progress(&self) -> &Progress {
        match self {
            PlaybackItem::Image(item) => item.progress(),
            PlaybackItem::Video(item) => item.progress(),
        }
    }

    pub(crate) fn progress_mut(&mut self) -> &mut Progress {
        match self {
            PlaybackItem::Image(item) => item.progress_mut(),
            PlaybackItem::Video(item) => item.progress_mut(),
        }
    }

    pub(crate) fn surface(&self) -> &Arc<dyn ItemSurface> {
        match self {
            PlaybackItem::Image(item) => item.surface(),
            PlaybackItem::Video(item) => item.surface(),
        }
    }

    pub(crate) fn set_ready(&mut self) -> bool {
        match self {
            PlaybackItem::Image(item) => item.set_ready(),
            PlaybackItem::Video(item) => item.set_ready(),
        }
    }

    pub(crate) fn start(&mut self) -> StartDisposition {
        match self {
            PlaybackItem::Image(item) => item.start(),
            PlaybackItem::Video(item) => item.start(),
        }
    }

    pub(crate) fn pause(&mut self) {
        match self {
            PlaybackItem::Image(item) => item.pause(),
            PlaybackItem::Video(item) => item.pause(),
        }
    }

    pub(crate) fn resume(&mut self) {
        match self {
            PlaybackItem::Image(item) => item.resume(),
            PlaybackItem::Video(item) => item.resume(),
        }
    }

    pub(crate) fn close(&mut self) {
        match self {
            PlaybackItem::Image(item) => item.close(),
            PlaybackItem::Video(item) => item.close(),
        }
    }

    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id().to_string(),
            kind: self.kind(),
            state: self.state(),
            loading: self.loading(),
            has_overlay: self.has_overlay(),
            progress_value: self.progress().value(),
            progress_percentage: self.progress().percentage(),
            duration_secs: self.duration_secs(),
        }
    }
}
