//! Playlist controller: owns the items, the cursor, the instance state
//! machine, and the single active image timer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crossbeam_channel::Receiver;
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use storyutils::PausableTimer;

use crate::capabilities::{MediaHost, NullHost};
use crate::errors::{PlayerError, Result};
use crate::events::{PlayerEvent, PlayerEventBus};
use crate::gestures::{Gesture, GestureClassifier, LONG_PRESS_THRESHOLD};
use crate::items::{ImageItem, PlaybackItem, StartDisposition, VideoItem};
use crate::model::{
    ItemDescriptor, ItemSnapshot, ItemState, MaxProgress, MediaKind, PlayerConfig, PlayerState,
};
use crate::{registry, validator};

/// Tick cadence for image display timers (~60Hz).
const IMAGE_TICK_INTERVAL: Duration = Duration::from_millis(16);

struct PlayerInner {
    state: PlayerState,
    items: HashMap<String, PlaybackItem>,
    /// Descriptor order, fixed at construction; backs the `items` query.
    insertion_order: Vec<String>,
    /// Play sequence; mutable only while closed. May reference a subset of
    /// the items; ids unknown to the playlist are skipped during playback.
    order: Vec<String>,
    /// Index into `order`. None exactly when closed or destroyed.
    current_index: Option<usize>,
    muted: bool,
    autostart: bool,
    native_fullscreen: bool,
    /// High-water progress percentage per item id. Never decreases.
    max_progress: HashMap<String, f64>,
    /// The single image timer. Owned here, never by an item; replaced or
    /// dropped (and therefore destroyed) whenever the active item changes.
    active_timer: Option<PausableTimer>,
    gestures: GestureClassifier,
}

impl PlayerInner {
    fn current_id(&self) -> Option<String> {
        let index = self.current_index?;
        self.order.get(index).cloned()
    }

    fn max_progress_map(&self) -> HashMap<String, MaxProgress> {
        self.max_progress
            .iter()
            .map(|(id, &percentage)| {
                let duration = self
                    .items
                    .get(id)
                    .and_then(|item| item.duration_secs())
                    .filter(|duration| duration.is_finite())
                    .unwrap_or(0.0);
                let report = MaxProgress {
                    percentage,
                    value: duration * percentage / 100.0,
                };
                (id.clone(), report)
            })
            .collect()
    }
}

/// The story player: sequences image and video items through a guarded
/// state machine. Cheap to clone; all clones share the same instance.
///
/// Construction validates the descriptor list, builds one playback item per
/// descriptor through the host's capability factories, and registers the
/// instance for static lookup. The instance stays registered until
/// [`Player::destroy`].
#[derive(Clone)]
pub struct Player {
    inner: Arc<Mutex<PlayerInner>>,
    events: PlayerEventBus,
    host: Arc<dyn MediaHost>,
    id: Arc<str>,
    default_navigation: bool,
}

/// Weak handle captured by timer and long-press tasks, so a dropped player
/// never has background work keeping it alive.
#[derive(Clone)]
struct WeakPlayer {
    inner: Weak<Mutex<PlayerInner>>,
    events: PlayerEventBus,
    host: Arc<dyn MediaHost>,
    id: Arc<str>,
    default_navigation: bool,
}

impl WeakPlayer {
    fn upgrade(&self) -> Option<Player> {
        Some(Player {
            inner: self.inner.upgrade()?,
            events: self.events.clone(),
            host: Arc::clone(&self.host),
            id: Arc::clone(&self.id),
            default_navigation: self.default_navigation,
        })
    }
}

impl Player {
    /// Build a player over the given host environment.
    pub fn new(
        descriptors: Vec<ItemDescriptor>,
        config: PlayerConfig,
        host: Arc<dyn MediaHost>,
    ) -> Result<Self> {
        validator::validate_descriptors(&descriptors)?;

        let mut items = HashMap::new();
        let mut insertion_order = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            let id = descriptor.id().to_string();
            let surface = host.create_surface(descriptor);
            let has_overlay = descriptor.overlay().is_some();
            let item = match descriptor {
                ItemDescriptor::Image {
                    duration: Some(duration),
                    ..
                } => PlaybackItem::Image(ImageItem::new(
                    id.clone(),
                    *duration,
                    has_overlay,
                    surface,
                )),
                ItemDescriptor::Image { .. } => {
                    return Err(PlayerError::validation(
                        index,
                        "duration must be a positive number",
                    ));
                }
                ItemDescriptor::Video { .. } => PlaybackItem::Video(VideoItem::new(
                    id.clone(),
                    has_overlay,
                    config.muted,
                    surface,
                    host.create_video_transport(descriptor),
                )),
            };
            insertion_order.push(id.clone());
            items.insert(id, item);
        }

        let order = config.order.unwrap_or_else(|| insertion_order.clone());
        let instance_id = config
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let player = Self {
            inner: Arc::new(Mutex::new(PlayerInner {
                state: PlayerState::Closed,
                items,
                insertion_order,
                order,
                current_index: None,
                muted: config.muted,
                autostart: config.autostart,
                native_fullscreen: config.native_fullscreen,
                max_progress: HashMap::new(),
                active_timer: None,
                gestures: GestureClassifier::new(),
            })),
            events: PlayerEventBus::new(),
            host,
            id: Arc::from(instance_id),
            default_navigation: config.default_navigation,
        };

        registry::register(&player);
        debug!(player = %player.id, "player created");
        Ok(player)
    }

    /// Build a player with no visual output; media signals can still be
    /// fed through the `media_*` methods.
    pub fn headless(descriptors: Vec<ItemDescriptor>, config: PlayerConfig) -> Result<Self> {
        Self::new(descriptors, config, Arc::new(NullHost))
    }

    /// Parse a JSON descriptor list, then construct as [`Player::new`].
    pub fn from_json(
        descriptors: &str,
        config: PlayerConfig,
        host: Arc<dyn MediaHost>,
    ) -> Result<Self> {
        let descriptors: Vec<ItemDescriptor> = serde_json::from_str(descriptors)?;
        Self::new(descriptors, config, host)
    }

    /// Static lookup of a live instance by id.
    pub fn instance(id: &str) -> Option<Player> {
        registry::get(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    // ---- queries ---------------------------------------------------------

    pub fn state(&self) -> PlayerState {
        self.lock().state
    }

    pub fn muted(&self) -> bool {
        self.lock().muted
    }

    pub fn autostart(&self) -> bool {
        self.lock().autostart
    }

    pub fn set_autostart(&self, autostart: bool) {
        self.lock().autostart = autostart;
    }

    pub fn native_fullscreen(&self) -> bool {
        self.lock().native_fullscreen
    }

    pub fn set_native_fullscreen(&self, native: bool) {
        self.lock().native_fullscreen = native;
    }

    /// Defensive copy of the play sequence.
    pub fn order(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.lock().current_index
    }

    pub fn current_item(&self) -> Option<ItemSnapshot> {
        let inner = self.lock();
        let id = inner.current_id()?;
        inner.items.get(&id).map(PlaybackItem::snapshot)
    }

    /// Snapshots of every item, in descriptor order. Prefer the event
    /// stream and `current_item` for anything stateful.
    pub fn items(&self) -> Vec<ItemSnapshot> {
        let inner = self.lock();
        inner
            .insertion_order
            .iter()
            .filter_map(|id| inner.items.get(id))
            .map(PlaybackItem::snapshot)
            .collect()
    }

    /// Aggregated high-water report, as carried by the close notification.
    pub fn max_progress_map(&self) -> HashMap<String, MaxProgress> {
        self.lock().max_progress_map()
    }

    // ---- state machine ---------------------------------------------------

    /// Reveal the stage, attempt fullscreen (failure tolerated), and move
    /// to `playing` on the first item of the order. With autostart off the
    /// first item is revealed but not started.
    pub async fn start(&self) {
        let native = {
            let inner = self.lock();
            if inner.state != PlayerState::Closed {
                return;
            }
            inner.native_fullscreen
        };

        self.host.show_stage();
        if let Err(error) = self.host.enter_fullscreen(native).await {
            warn!(player = %self.id, %error, "fullscreen entry failed, continuing windowed");
        }

        let autostart = {
            let mut inner = self.lock();
            // A concurrent start may have won while fullscreen was pending.
            if inner.state != PlayerState::Closed {
                return;
            }
            inner.current_index = Some(0);
            inner.state = PlayerState::Playing;
            inner.autostart
        };

        if autostart {
            self.play_current_item();
        } else {
            self.show_current_item();
        }
        debug!(player = %self.id, "player started");
        self.events.broadcast(PlayerEvent::Start);
    }

    /// Leave fullscreen, close the current item (recording its high-water
    /// mark), hide the stage, and reset every item's progress.
    pub fn close(&self) {
        let mut inner = self.lock();
        self.close_locked(&mut inner);
    }

    /// Pause the current item only.
    pub fn pause(&self) {
        let mut inner = self.lock();
        if inner.state != PlayerState::Playing {
            return;
        }
        inner.state = PlayerState::Paused;

        if let Some(id) = inner.current_id() {
            if let Some(item) = inner.items.get_mut(&id) {
                item.pause();
            }
            if let Some(timer) = &inner.active_timer {
                if let Err(error) = timer.pause() {
                    warn!(player = %self.id, %error, "image timer pause rejected");
                }
            }
        }
        debug!(player = %self.id, "paused");
        self.events.broadcast(PlayerEvent::ItemPause);
    }

    /// Resume the current item only.
    pub fn resume(&self) {
        let mut inner = self.lock();
        if inner.state != PlayerState::Paused {
            return;
        }
        inner.state = PlayerState::Playing;

        if let Some(id) = inner.current_id() {
            let mut start_pending = false;
            if let Some(item) = inner.items.get_mut(&id) {
                item.resume();
                // A readiness signal may have arrived while paused; the
                // queued start is consumed now.
                start_pending = item.state() == ItemState::PlayQueued && !item.loading();
            }
            if let Some(timer) = &inner.active_timer {
                if let Err(error) = timer.resume() {
                    warn!(player = %self.id, %error, "image timer resume rejected");
                }
            }
            if start_pending {
                self.start_ready_item_locked(&mut inner, &id);
            }
        }
        debug!(player = %self.id, "resumed");
        self.events.broadcast(PlayerEvent::ItemResume);
    }

    /// Close first, then drop the instance from the registry. Idempotent;
    /// every further operation on the handle is a guarded no-op.
    pub fn destroy(&self) {
        let mut inner = self.lock();
        if inner.state == PlayerState::Destroyed {
            return;
        }
        self.close_locked(&mut inner);
        inner.state = PlayerState::Destroyed;
        inner.active_timer = None;
        drop(inner);

        registry::remove(&self.id);
        debug!(player = %self.id, "player destroyed");
    }

    // ---- navigation ------------------------------------------------------

    /// Start and reveal the current item. Needed explicitly only when
    /// autostart is disabled.
    pub fn play_current_item(&self) {
        let mut inner = self.lock();
        if inner.state != PlayerState::Playing {
            return;
        }
        self.play_current_locked(&mut inner);
    }

    /// Reveal the current item without starting it.
    pub fn show_current_item(&self) {
        let inner = self.lock();
        if let Some(id) = inner.current_id() {
            if let Some(item) = inner.items.get(&id) {
                item.surface().show();
                if item.has_overlay() {
                    item.surface().show_overlay();
                }
            }
        }
    }

    /// Close the current item without moving the cursor, recording its
    /// high-water mark.
    pub fn close_current_item(&self) {
        let mut inner = self.lock();
        if !matches!(inner.state, PlayerState::Playing | PlayerState::Paused) {
            return;
        }
        self.close_current_item_locked(&mut inner);
    }

    /// Close the current item and play the next one in order, or close the
    /// whole playlist when the end is reached.
    pub fn play_next_item(&self) {
        let mut inner = self.lock();
        if inner.state != PlayerState::Playing {
            return;
        }
        self.play_next_locked(&mut inner);
    }

    /// Close the current item and play the previous one. At the first item
    /// this is a complete no-op.
    pub fn play_previous_item(&self) {
        let mut inner = self.lock();
        if inner.state != PlayerState::Playing {
            return;
        }
        match inner.current_index {
            Some(index) if index > 0 => {
                self.close_current_item_locked(&mut inner);
                inner.current_index = Some(index - 1);
                self.play_current_locked(&mut inner);
            }
            _ => {}
        }
    }

    // ---- settings --------------------------------------------------------

    /// Replace the play sequence. Only valid while closed; ids unknown to
    /// the playlist are tolerated and skipped during playback.
    pub fn set_order(&self, order: Vec<String>) -> Result<()> {
        let mut inner = self.lock();
        if inner.state != PlayerState::Closed {
            return Err(PlayerError::OrderLocked(inner.state));
        }
        inner.order = order;
        Ok(())
    }

    /// Always permitted; applies immediately to an actively playing video.
    pub fn set_muted(&self, muted: bool) {
        let mut inner = self.lock();
        inner.muted = muted;
        if inner.state == PlayerState::Playing {
            if let Some(id) = inner.current_id() {
                if let Some(PlaybackItem::Video(video)) = inner.items.get_mut(&id) {
                    video.set_muted(muted);
                }
            }
        }
        self.events.broadcast(if muted {
            PlayerEvent::Mute
        } else {
            PlayerEvent::Unmute
        });
    }

    // ---- media signals from the host ------------------------------------

    /// The media resource behind an item became ready. Consumes a queued
    /// start if that item is the active one.
    pub fn media_ready(&self, id: &str) {
        let mut inner = self.lock();
        let was_queued = match inner.items.get_mut(id) {
            Some(item) => item.set_ready(),
            None => return,
        };
        if !was_queued || inner.state != PlayerState::Playing {
            return;
        }
        if inner.current_id().as_deref() != Some(id) {
            return;
        }
        self.start_ready_item_locked(&mut inner, id);
    }

    /// Media-clock report for a video item.
    pub fn media_position(&self, id: &str, position: Duration, duration: Duration) {
        let mut inner = self.lock();
        if let Some(PlaybackItem::Video(video)) = inner.items.get_mut(id) {
            video.on_position(position, duration);
        }
    }

    /// Natural end of a video item: play-complete.
    pub fn media_ended(&self, id: &str) {
        let mut inner = self.lock();
        if inner.state != PlayerState::Playing {
            return;
        }
        if inner.current_id().as_deref() != Some(id) {
            return;
        }
        match inner.items.get(id) {
            Some(item) if item.kind() == MediaKind::Video && item.state() == ItemState::Playing => {}
            _ => return,
        }
        debug!(item = id, "video play complete");
        self.handle_play_complete_locked(&mut inner, id);
    }

    // ---- pointer input ---------------------------------------------------

    /// Raw press on an item surface. Arms the long-press watchdog.
    pub fn pointer_pressed(&self, surface_id: &str) {
        if !self.default_navigation {
            return;
        }
        let token = {
            let mut inner = self.lock();
            inner.gestures.press(surface_id, Instant::now())
        };

        let weak = self.downgrade();
        tokio::spawn(async move {
            tokio::time::sleep(LONG_PRESS_THRESHOLD).await;
            if let Some(player) = weak.upgrade() {
                let gesture = {
                    let mut inner = player.lock();
                    inner.gestures.long_press_check(token, Instant::now())
                };
                if let Some(gesture) = gesture {
                    player.handle_gesture(gesture);
                }
            }
        });
    }

    /// Raw release at horizontal position `x` on a surface of `width`.
    pub fn pointer_released(&self, surface_id: &str, x: f64, width: f64) {
        if !self.default_navigation {
            return;
        }
        let gesture = {
            let mut inner = self.lock();
            inner.gestures.release(surface_id, x, width, Instant::now())
        };
        if let Some(gesture) = gesture {
            self.handle_gesture(gesture);
        }
    }

    /// Pointer left a surface while pressed.
    pub fn pointer_left(&self, surface_id: &str) {
        if !self.default_navigation {
            return;
        }
        let gesture = {
            let mut inner = self.lock();
            inner.gestures.cancel(surface_id, Instant::now())
        };
        if let Some(gesture) = gesture {
            self.handle_gesture(gesture);
        }
    }

    fn handle_gesture(&self, gesture: Gesture) {
        debug!(player = %self.id, ?gesture, "gesture");
        match gesture {
            Gesture::TapRight => self.play_next_item(),
            Gesture::TapLeft => self.play_previous_item(),
            Gesture::LongPressStart => self.pause(),
            Gesture::LongPressEnd => self.resume(),
        }
    }

    // ---- internals -------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, PlayerInner> {
        self.inner.lock().unwrap()
    }

    fn downgrade(&self) -> WeakPlayer {
        WeakPlayer {
            inner: Arc::downgrade(&self.inner),
            events: self.events.clone(),
            host: Arc::clone(&self.host),
            id: Arc::clone(&self.id),
            default_navigation: self.default_navigation,
        }
    }

    fn play_current_locked(&self, inner: &mut PlayerInner) {
        let Some(id) = inner.current_id() else {
            return;
        };
        let muted = inner.muted;

        let (snapshot, image_duration) = {
            let Some(item) = inner.items.get_mut(&id) else {
                warn!(player = %self.id, item = %id, "order references an unknown item, skipping");
                return self.play_next_locked(inner);
            };
            if let PlaybackItem::Video(video) = item {
                video.set_muted(muted);
            }
            let disposition = item.start();
            let image_duration = match (&*item, disposition) {
                (PlaybackItem::Image(image), StartDisposition::Started) => {
                    Some(image.duration_secs())
                }
                _ => None,
            };
            item.surface().show();
            if item.has_overlay() {
                item.surface().show_overlay();
            }
            (item.snapshot(), image_duration)
        };

        if let Some(duration) = image_duration {
            self.spawn_image_timer(inner, &id, duration);
        }
        debug!(player = %self.id, item = %id, state = %snapshot.state, "item start");
        self.events.broadcast(PlayerEvent::ItemStart { item: snapshot });
    }

    /// Start an item whose queued start was just unblocked by readiness.
    /// No item-start notification here: it was emitted when the start was
    /// queued.
    fn start_ready_item_locked(&self, inner: &mut PlayerInner, id: &str) {
        let image_duration = {
            let Some(item) = inner.items.get_mut(id) else {
                return;
            };
            match (item.start(), &*item) {
                (StartDisposition::Started, PlaybackItem::Image(image)) => {
                    Some(image.duration_secs())
                }
                _ => None,
            }
        };
        if let Some(duration) = image_duration {
            self.spawn_image_timer(inner, id, duration);
        }
    }

    fn spawn_image_timer(&self, inner: &mut PlayerInner, id: &str, duration_secs: f64) {
        let duration = Duration::from_secs_f64(duration_secs);
        let weak = self.downgrade();
        let item_id = id.to_string();
        let timer = PausableTimer::spawn(duration, IMAGE_TICK_INTERVAL, move |elapsed| {
            if let Some(player) = weak.upgrade() {
                player.on_image_tick(&item_id, elapsed, duration);
            }
        });
        // Replacing the previous timer destroys it.
        inner.active_timer = Some(timer);
    }

    fn on_image_tick(&self, id: &str, elapsed: Duration, duration: Duration) {
        let mut inner = self.lock();
        // Stale ticks may race a navigation that already closed the item.
        if inner.state != PlayerState::Playing {
            return;
        }
        if inner.current_id().as_deref() != Some(id) {
            return;
        }

        let completed = {
            let Some(item) = inner.items.get_mut(id) else {
                return;
            };
            if item.state() != ItemState::Playing {
                return;
            }
            if elapsed >= duration {
                item.progress_mut().complete();
                true
            } else {
                let percentage = elapsed.as_secs_f64() * 100.0 / duration.as_secs_f64();
                item.progress_mut().set_value(percentage);
                false
            }
        };

        if completed {
            debug!(item = id, "image play complete");
            self.handle_play_complete_locked(&mut inner, id);
        }
    }

    fn handle_play_complete_locked(&self, inner: &mut PlayerInner, id: &str) {
        if self.default_navigation {
            self.play_next_locked(inner);
        } else {
            self.events.broadcast(PlayerEvent::ItemPlayComplete {
                id: id.to_string(),
            });
        }
    }

    fn play_next_locked(&self, inner: &mut PlayerInner) {
        match inner.current_index {
            Some(index) if index + 1 < inner.order.len() => {
                self.close_current_item_locked(inner);
                inner.current_index = Some(index + 1);
                self.play_current_locked(inner);
            }
            // End of the playlist.
            _ => self.close_locked(inner),
        }
    }

    /// Record the high-water mark, force the progress bar to completion,
    /// hide and close the current item.
    fn close_current_item_locked(&self, inner: &mut PlayerInner) {
        let Some(id) = inner.current_id() else {
            return;
        };
        let (reached, snapshot) = {
            let Some(item) = inner.items.get_mut(&id) else {
                return;
            };
            let reached = item.progress().percentage();
            item.progress_mut().complete();
            item.close();
            item.surface().hide();
            if item.has_overlay() {
                item.surface().hide_overlay();
            }
            (reached, item.snapshot())
        };

        let mark = inner.max_progress.entry(id.clone()).or_insert(0.0);
        if reached > *mark {
            *mark = reached;
        }
        inner.active_timer = None;

        debug!(player = %self.id, item = %id, "item closed");
        self.events.broadcast(PlayerEvent::ItemClose { item: snapshot });
    }

    fn close_locked(&self, inner: &mut PlayerInner) {
        if !matches!(inner.state, PlayerState::Playing | PlayerState::Paused) {
            return;
        }
        self.host.leave_fullscreen(inner.native_fullscreen);
        inner.state = PlayerState::Closed;
        self.close_current_item_locked(inner);
        self.host.hide_stage();

        for item in inner.items.values_mut() {
            item.progress_mut().reset();
        }
        inner.current_index = None;

        let max_progress = inner.max_progress_map();
        debug!(player = %self.id, "player closed");
        self.events.broadcast(PlayerEvent::Close { max_progress });
    }
}
