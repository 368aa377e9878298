use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminates the two playback media variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Immutable input description of one media unit to play.
///
/// The `type` field discriminates the variant; only images carry a display
/// `duration` (seconds). The `overlay` payload is opaque to the engine and
/// is handed back to the rendering host untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemDescriptor {
    #[serde(rename_all = "camelCase")]
    Image {
        id: String,
        image_url: String,
        /// Display duration in seconds. Optional at the parse stage so a
        /// missing value is reported with its index by validation, which
        /// requires a positive finite number.
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        overlay: Option<serde_json::Value>,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        id: String,
        video_url: String,
        #[serde(default)]
        overlay: Option<serde_json::Value>,
    },
}

impl ItemDescriptor {
    pub fn id(&self) -> &str {
        match self {
            ItemDescriptor::Image { id, .. } => id,
            ItemDescriptor::Video { id, .. } => id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            ItemDescriptor::Image { .. } => MediaKind::Image,
            ItemDescriptor::Video { .. } => MediaKind::Video,
        }
    }

    pub fn source_url(&self) -> &str {
        match self {
            ItemDescriptor::Image { image_url, .. } => image_url,
            ItemDescriptor::Video { video_url, .. } => video_url,
        }
    }

    pub fn overlay(&self) -> Option<&serde_json::Value> {
        match self {
            ItemDescriptor::Image { overlay, .. } => overlay.as_ref(),
            ItemDescriptor::Video { overlay, .. } => overlay.as_ref(),
        }
    }
}

/// Player instance configuration. All fields have serde defaults so a
/// partial JSON object (or `PlayerConfig::default()`) is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    /// Registry key for this instance. A uuid is generated when absent.
    pub id: Option<String>,
    /// Explicit play sequence; defaults to descriptor order.
    pub order: Option<Vec<String>>,
    /// Start playing the first item as soon as `start` is called.
    pub autostart: bool,
    pub muted: bool,
    /// Ask the host for native (per-element) fullscreen instead of the
    /// container-level one.
    pub native_fullscreen: bool,
    /// When disabled, gestures and play-completion no longer drive
    /// navigation; the host listens for `ItemPlayComplete` and calls the
    /// navigation methods itself.
    pub default_navigation: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            id: None,
            order: None,
            autostart: true,
            muted: false,
            native_fullscreen: false,
            default_navigation: true,
        }
    }
}

/// Instance-level state machine of the playlist controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Closed,
    Playing,
    Paused,
    Destroyed,
}

impl PlayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Closed => "closed",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-item playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemState {
    Closed,
    PlayQueued,
    Playing,
    Paused,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Closed => "closed",
            ItemState::PlayQueued => "play-queued",
            ItemState::Playing => "playing",
            ItemState::Paused => "paused",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-water playback mark for one item, reported on close.
///
/// `value` is the mark converted back into seconds of media
/// (`duration × percentage / 100`), 0 when the duration is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaxProgress {
    pub percentage: f64,
    pub value: f64,
}

/// Read-only view of one playback item, carried by notifications and the
/// query surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSnapshot {
    pub id: String,
    pub kind: MediaKind,
    pub state: ItemState,
    pub loading: bool,
    pub has_overlay: bool,
    pub progress_value: f64,
    pub progress_percentage: f64,
    /// Seconds. Unknown for a video that never reported its length.
    pub duration_secs: Option<f64>,
}
