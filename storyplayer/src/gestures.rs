use tokio::time::{Duration, Instant};

/// A press held at least this long is a long press, not a tap.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(300);

/// Horizontal tap boundary as a fraction of the surface width. A release
/// at or left of it is tap-left (the boundary itself is inclusive).
pub const LEFT_TAP_BOUNDARY: f64 = 0.30;

/// Discrete navigation intents derived from raw pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    TapLeft,
    TapRight,
    LongPressStart,
    LongPressEnd,
}

#[derive(Debug)]
struct Press {
    surface: String,
    at: Instant,
    token: u64,
    long_press_started: bool,
}

/// Classifies presses into taps and long presses. Pure and clock-injected:
/// every method takes the current instant, so classification is fully
/// deterministic under a test clock.
///
/// Only one pressed surface is tracked at a time; a release or leave on a
/// surface other than the pressed one is ignored.
#[derive(Debug, Default)]
pub struct GestureClassifier {
    pressed: Option<Press>,
    next_token: u64,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new press, replacing any previously tracked one. The
    /// returned token ties a deferred long-press check to this press.
    pub fn press(&mut self, surface: &str, at: Instant) -> u64 {
        self.next_token += 1;
        self.pressed = Some(Press {
            surface: surface.to_string(),
            at,
            token: self.next_token,
            long_press_started: false,
        });
        self.next_token
    }

    /// Deferred check scheduled at press time: emits `LongPressStart` once
    /// if the same press is still held past the threshold.
    pub fn long_press_check(&mut self, token: u64, now: Instant) -> Option<Gesture> {
        let press = self.pressed.as_mut()?;
        if press.token != token || press.long_press_started {
            return None;
        }
        if now.duration_since(press.at) >= LONG_PRESS_THRESHOLD {
            press.long_press_started = true;
            Some(Gesture::LongPressStart)
        } else {
            None
        }
    }

    /// Classify a release at horizontal position `x` on a surface of the
    /// given width.
    pub fn release(&mut self, surface: &str, x: f64, width: f64, now: Instant) -> Option<Gesture> {
        match &self.pressed {
            Some(press) if press.surface == surface => {}
            _ => return None,
        }
        let press = self.pressed.take().expect("pressed checked above");

        if press.long_press_started || now.duration_since(press.at) >= LONG_PRESS_THRESHOLD {
            Some(Gesture::LongPressEnd)
        } else if width > 0.0 && x / width <= LEFT_TAP_BOUNDARY {
            Some(Gesture::TapLeft)
        } else {
            Some(Gesture::TapRight)
        }
    }

    /// Pointer left the surface: ends an active long press, otherwise the
    /// press is simply dropped without producing a tap.
    pub fn cancel(&mut self, surface: &str, _now: Instant) -> Option<Gesture> {
        match &self.pressed {
            Some(press) if press.surface == surface => {}
            _ => return None,
        }
        let press = self.pressed.take().expect("pressed checked above");
        press.long_press_started.then_some(Gesture::LongPressEnd)
    }
}
