//! Shared test fixtures: a host whose surfaces and transports record every
//! call, plus descriptor builders and an event drain.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use crossbeam_channel::Receiver;
use tokio::time::Duration;

use storyplayer::capabilities::{ItemSurface, MediaHost, VideoTransport};
use storyplayer::model::ItemDescriptor;
use storyplayer::PlayerEvent;

/// Append-only call journal shared by every surface and transport a
/// [`RecordingHost`] hands out.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.lock().unwrap().iter().any(|e| e == entry)
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

pub struct RecordingSurface {
    id: String,
    log: CallLog,
}

impl ItemSurface for RecordingSurface {
    fn show(&self) {
        self.log.push(format!("{}.show", self.id));
    }

    fn hide(&self) {
        self.log.push(format!("{}.hide", self.id));
    }

    fn show_overlay(&self) {
        self.log.push(format!("{}.show_overlay", self.id));
    }

    fn hide_overlay(&self) {
        self.log.push(format!("{}.hide_overlay", self.id));
    }
}

pub struct RecordingTransport {
    id: String,
    log: CallLog,
    duration: Option<Duration>,
}

impl VideoTransport for RecordingTransport {
    fn play(&self) -> Result<()> {
        self.log.push(format!("{}.play", self.id));
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.log.push(format!("{}.pause", self.id));
        Ok(())
    }

    fn rewind(&self) -> Result<()> {
        self.log.push(format!("{}.rewind", self.id));
        Ok(())
    }

    fn set_muted(&self, muted: bool) -> Result<()> {
        self.log.push(format!("{}.set_muted({muted})", self.id));
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Host whose every capability call lands in a shared [`CallLog`].
#[derive(Default)]
pub struct RecordingHost {
    pub log: CallLog,
    /// Natural length reported by every transport this host creates.
    pub video_duration: Option<Duration>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_video_duration(duration: Duration) -> Arc<Self> {
        Arc::new(Self {
            log: CallLog::default(),
            video_duration: Some(duration),
        })
    }
}

#[async_trait]
impl MediaHost for RecordingHost {
    fn create_surface(&self, descriptor: &ItemDescriptor) -> Arc<dyn ItemSurface> {
        Arc::new(RecordingSurface {
            id: descriptor.id().to_string(),
            log: self.log.clone(),
        })
    }

    fn create_video_transport(&self, descriptor: &ItemDescriptor) -> Arc<dyn VideoTransport> {
        Arc::new(RecordingTransport {
            id: descriptor.id().to_string(),
            log: self.log.clone(),
            duration: self.video_duration,
        })
    }

    fn show_stage(&self) {
        self.log.push("stage.show");
    }

    fn hide_stage(&self) {
        self.log.push("stage.hide");
    }

    async fn enter_fullscreen(&self, native: bool) -> Result<()> {
        self.log.push(format!("stage.enter_fullscreen({native})"));
        Ok(())
    }

    fn leave_fullscreen(&self, native: bool) {
        self.log.push(format!("stage.leave_fullscreen({native})"));
    }
}

pub fn image(id: &str, duration_secs: f64) -> ItemDescriptor {
    ItemDescriptor::Image {
        id: id.to_string(),
        image_url: format!("{id}.jpg"),
        duration: Some(duration_secs),
        overlay: None,
    }
}

pub fn video(id: &str) -> ItemDescriptor {
    ItemDescriptor::Video {
        id: id.to_string(),
        video_url: format!("{id}.mp4"),
        overlay: None,
    }
}

/// Collect every notification delivered so far.
pub fn drain(events: &Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Short tags of the drained notifications, for sequence assertions.
pub fn drain_tags(events: &Receiver<PlayerEvent>) -> Vec<String> {
    drain(events)
        .into_iter()
        .map(|event| match event {
            PlayerEvent::Start => "start".to_string(),
            PlayerEvent::ItemStart { item } => format!("item_start:{}", item.id),
            PlayerEvent::ItemClose { item } => format!("item_close:{}", item.id),
            PlayerEvent::ItemPlayComplete { id } => format!("item_play_complete:{id}"),
            PlayerEvent::ItemPause => "item_pause".to_string(),
            PlayerEvent::ItemResume => "item_resume".to_string(),
            PlayerEvent::Mute => "mute".to_string(),
            PlayerEvent::Unmute => "unmute".to_string(),
            PlayerEvent::Close { .. } => "close".to_string(),
        })
        .collect()
}
