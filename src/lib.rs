#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! Behavior and animation engine for an autonomous desktop pet.
//!
//! The engine decides what the pet is doing ([`StateMachine`], [`BehaviorScheduler`]), moves it
//! around the usable screen area while it wanders ([`MotionController`]) and turns each state into
//! a time-coded frame sequence ([`AnimationCache`], [`FramePlayer`]). Window chrome and painting
//! stay outside; [`DesktopPet`] drives the engine against any [`PetWindow`].

pub mod assets;
pub mod behavior;
pub mod config;
pub mod foundation;
pub mod motion;
pub mod playback;
pub mod shell;

pub use assets::animation::AnimatedImage;
pub use assets::cache::AnimationCache;
pub use assets::catalog::{AssetCatalog, AssetKey, AssetRef, find_asset_root};
pub use assets::codec::{AnimationCodec, CodecRegistry, GifCodec, StillCodec, WebpCodec};
pub use behavior::machine::StateMachine;
pub use behavior::scheduler::BehaviorScheduler;
pub use behavior::state::PetState;
pub use config::PetConfig;
pub use foundation::core::{FrameSize, Point, Rect, Vec2};
pub use foundation::error::{PetError, PetResult};
pub use foundation::rng::PetRng;
pub use foundation::ticker::Ticker;
pub use motion::controller::{MotionController, StepOutcome};
pub use playback::player::FramePlayer;
pub use shell::pet::{DesktopPet, PumpReport};
pub use shell::window::{HeadlessWindow, PetWindow};
