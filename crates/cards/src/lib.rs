#![forbid(unsafe_code)]

//! Card stack public facade crate.
//!
//! Re-exports the stable surface of the workspace crates and offers a
//! prelude for day-to-day usage.
//!
//! No operation here is fallible: misuse that can be detected is either a
//! silent no-op (popping a root-only stack, dragging a non-dismissable card)
//! or an assertion (contract violations), so the facade has no error type.

// --- Core re-exports -------------------------------------------------------

pub use cards_core::animation::{Curve, SpringParams};
pub use cards_core::appearance::{Appearance, AppearanceConfig};
pub use cards_core::gesture::{DismissThreshold, PanEvent, PanOutcome, PanPhase, rubber_band};
pub use cards_core::view::{Property, Size, ViewId};

// --- Stack re-exports ------------------------------------------------------

pub use cards_stack::{
    AnimationDriver, Card, CardHost, CardStackConfig, CardStackController, ContainerViews,
    DismissIcon, DriverMode, OperationId, PanResponse, PopAnimation, PopStatus, PropertySink,
    SizeClass, StackEvent, StackState, TopInset, TransitionCoordinator, TransitionEvent,
    TransitionId, TransitionKind,
};

// --- Harness re-exports ----------------------------------------------------

#[cfg(feature = "harness")]
pub use cards_harness::{RecordingHost, StackSimulator, init_test_logging};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CardHost, CardStackConfig, CardStackController, DismissIcon, OperationId, PanEvent,
        PanPhase, PanResponse, PropertySink, Size, SizeClass, StackEvent, StackState, ViewId,
    };

    pub use crate::{core, stack};
}

pub use cards_core as core;
pub use cards_stack as stack;
#[cfg(feature = "harness")]
pub use cards_harness as harness;
