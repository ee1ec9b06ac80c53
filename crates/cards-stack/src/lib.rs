#![forbid(unsafe_code)]

//! Card stack controller.
//!
//! Presents a stack of cards on a host view system: pushes slide in from
//! below on a spring, pops spring down and out, deeper cards recede, and the
//! top card can be dragged down to dismiss it.
//!
//! # Key Components
//!
//! - [`CardStackController`] - the stack state machine
//! - [`AnimationDriver`] - keyed spring/tween animations with queued completions
//! - [`TransitionCoordinator`] - begin/end brackets for observers
//! - [`PopAnimation`] - drop-and-fade discard of a single card
//! - [`CardHost`] - capabilities the platform provides
//! - [`CardStackConfig`] - every tunable, with environment overrides

pub mod card;
pub mod config;
pub mod controller;
pub mod driver;
pub mod host;
pub mod pop_animation;
pub mod transition;

pub use card::{Card, Channels};
pub use config::{CardStackConfig, DismissIcon, TopInset};
pub use controller::{CardStackController, OperationId, PanResponse, StackEvent, StackState};
pub use driver::{
    AnimationDriver, AnimationKey, AnimationToken, DriverEvent, DriverMode, PropertySink,
};
pub use host::{CardHost, ContainerViews, SizeClass};
pub use pop_animation::{PopAnimation, PopStatus};
pub use transition::{TransitionCoordinator, TransitionEvent, TransitionId, TransitionKind};
