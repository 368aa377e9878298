//! # storyutils - Leaf utilities for the story playback engine
//!
//! This crate provides the two timing primitives the player is built on:
//!
//! - **PausableTimer** : a cancellable countdown ticking at a fixed cadence,
//!   with drift-free pause/resume accounting
//! - **Progress** : a raw-value to percentage tracker, clamped at 100
//!
//! Both are host-agnostic; the timer runs on a tokio task so the paused
//! test clock can drive it deterministically.

mod progress;
mod timer;

pub use progress::Progress;
pub use timer::{PausableTimer, TimerError, TimerState};
