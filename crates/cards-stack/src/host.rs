#![forbid(unsafe_code)]

//! Host capabilities the controller relies on.
//!
//! The controller never builds views itself. It asks the host to create a
//! container for each card, to attach and detach containers from the stack
//! view, and to write property values sampled by the animation driver. The
//! host owns constraint solving and rendering.

use cards_core::view::{Size, ViewId};

use crate::config::DismissIcon;
use crate::driver::PropertySink;

/// Horizontal/vertical size class reported by the host's trait environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeClass {
    /// Constrained space (phone portrait).
    #[default]
    Compact,
    /// Ample space (tablet, phone landscape with large display).
    Regular,
}

/// Views the host created to present one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerViews {
    /// Container hosting the content and the affordance.
    pub container: ViewId,
    /// Dismiss affordance (button) inside the container.
    pub dismiss: ViewId,
}

/// View-system capabilities of the platform hosting a card stack.
pub trait CardHost: PropertySink {
    /// Size of the stack's own view.
    fn bounds(&self) -> Size;

    /// Current size class.
    fn size_class(&self) -> SizeClass;

    /// Create (but do not attach) a container wrapping `content`, with a
    /// dismiss affordance showing `icon`.
    fn make_container(&mut self, content: ViewId, icon: &DismissIcon) -> ContainerViews;

    /// Insert `container` into the stack view, anchored `top_inset` points
    /// below the stack's top edge.
    fn attach(&mut self, container: ViewId, top_inset: f64);

    /// Remove `container` from the stack view.
    fn detach(&mut self, container: ViewId);

    /// Move the anchor of an attached container.
    fn set_top_inset(&mut self, container: ViewId, top_inset: f64);

    /// Enable or disable user interaction on a view.
    fn set_interactive(&mut self, view: ViewId, interactive: bool);

    /// Extend the content's height beyond its container by `extension` points.
    fn set_content_extension(&mut self, content: ViewId, extension: f64);

    /// Laid-out height of a container.
    fn container_height(&self, container: ViewId) -> f64;

    /// Flush pending layout.
    fn layout_if_needed(&mut self);
}
