#![forbid(unsafe_code)]

//! View identifiers, animatable properties, and sizes.

use std::fmt;

/// Opaque handle for a host view (content, container, or dismiss affordance).
///
/// Handles are minted by whoever owns the view: content views come from the
/// application, containers and affordances from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u64);

impl ViewId {
    /// Create a view handle.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw handle value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// A one-dimensional view channel that can be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    /// Vertical translation of the view's transform, in points.
    TranslationY,
    /// Uniform scale of the view's transform.
    Scale,
    /// View opacity in `[0, 1]`.
    Opacity,
    /// Alpha of a dismiss affordance in `[0, 1]`.
    AffordanceAlpha,
}

impl Property {
    /// All properties, in a stable order.
    pub const ALL: [Property; 4] = [
        Property::TranslationY,
        Property::Scale,
        Property::Opacity,
        Property::AffordanceAlpha,
    ];

    /// Value the property has on a freshly created view.
    #[must_use]
    pub const fn identity(self) -> f64 {
        match self {
            Self::TranslationY => 0.0,
            Self::Scale | Self::Opacity | Self::AffordanceAlpha => 1.0,
        }
    }

    /// Distance from the target under which a spring is considered at rest.
    ///
    /// Translation is measured in points; the other channels are unit
    /// fractions and need a much tighter bound to avoid a visible snap.
    #[must_use]
    pub const fn rest_threshold(self) -> f64 {
        match self {
            Self::TranslationY => 0.01,
            Self::Scale => 0.0005,
            Self::Opacity | Self::AffordanceAlpha => 0.001,
        }
    }

    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TranslationY => "translation_y",
            Self::Scale => "scale",
            Self::Opacity => "opacity",
            Self::AffordanceAlpha => "affordance_alpha",
        }
    }
}

/// A size in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if the size has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
