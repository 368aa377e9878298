use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::Duration;

use crate::model::ItemDescriptor;

/// Visual surface of one playback item. The engine only ever asks the host
/// to reveal or hide it; layout and styling are entirely the host's
/// business.
pub trait ItemSurface: Send + Sync {
    fn show(&self);
    fn hide(&self);
    fn show_overlay(&self) {}
    fn hide_overlay(&self) {}
}

/// Native playback controls for one video item.
///
/// Readiness, position, and natural-end signals travel the other way: the
/// host reports them through `Player::media_ready`, `Player::media_position`
/// and `Player::media_ended`.
pub trait VideoTransport: Send + Sync {
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    /// Reset the playback position to the beginning.
    fn rewind(&self) -> Result<()>;
    fn set_muted(&self, muted: bool) -> Result<()>;
    /// Natural media length, when already known to the host.
    fn duration(&self) -> Option<Duration>;
}

/// Host environment consumed by the playlist controller: per-item surfaces,
/// the stage container, and the fullscreen facility.
#[async_trait]
pub trait MediaHost: Send + Sync {
    fn create_surface(&self, descriptor: &ItemDescriptor) -> Arc<dyn ItemSurface>;
    fn create_video_transport(&self, descriptor: &ItemDescriptor) -> Arc<dyn VideoTransport>;
    fn show_stage(&self);
    fn hide_stage(&self);
    /// Attempt fullscreen entry. A failure here is an environmental
    /// condition: the player logs it and proceeds windowed.
    async fn enter_fullscreen(&self, native: bool) -> Result<()>;
    fn leave_fullscreen(&self, native: bool);
}

/// No-op surface, for headless players and tests.
pub struct NullSurface;

impl ItemSurface for NullSurface {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Transport that accepts every command and knows no duration.
pub struct NullTransport;

impl VideoTransport for NullTransport {
    fn play(&self) -> Result<()> {
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        Ok(())
    }

    fn rewind(&self) -> Result<()> {
        Ok(())
    }

    fn set_muted(&self, _muted: bool) -> Result<()> {
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        None
    }
}

/// Host with no visual output at all.
pub struct NullHost;

#[async_trait]
impl MediaHost for NullHost {
    fn create_surface(&self, _descriptor: &ItemDescriptor) -> Arc<dyn ItemSurface> {
        Arc::new(NullSurface)
    }

    fn create_video_transport(&self, _descriptor: &ItemDescriptor) -> Arc<dyn VideoTransport> {
        Arc::new(NullTransport)
    }

    fn show_stage(&self) {}

    fn hide_stage(&self) {}

    async fn enter_fullscreen(&self, _native: bool) -> Result<()> {
        Ok(())
    }

    fn leave_fullscreen(&self, _native: bool) {}
}
