//! Story playback engine: a playlist of image and video items sequenced
//! through a guarded state machine.
//!
//! The crate is host-agnostic. A rendering host implements the
//! [`capabilities`] traits (surfaces, video transport, stage and
//! fullscreen) and feeds media readiness, position and end signals back
//! through the [`Player`] intake methods; the engine owns every state
//! transition, the single active image timer, the per-item progress
//! trackers and the high-water progress report.
//!
//! ```no_run
//! use std::sync::Arc;
//! use storyplayer::{Player, PlayerConfig};
//! use storyplayer::model::ItemDescriptor;
//!
//! # async fn demo() -> storyplayer::Result<()> {
//! let descriptors = vec![ItemDescriptor::Image {
//!     id: "intro".into(),
//!     image_url: "intro.jpg".into(),
//!     duration: Some(3.0),
//!     overlay: None,
//! }];
//! let player = Player::headless(descriptors, PlayerConfig::default())?;
//! let _events = player.subscribe();
//! player.start().await;
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod errors;
pub mod events;
pub mod gestures;
pub mod items;
pub mod model;
pub mod registry;

mod player;
mod validator;

pub use errors::{PlayerError, Result};
pub use events::{PlayerEvent, PlayerEventBus};
pub use model::{
    ItemDescriptor, ItemSnapshot, ItemState, MaxProgress, MediaKind, PlayerConfig, PlayerState,
};
pub use player::Player;
