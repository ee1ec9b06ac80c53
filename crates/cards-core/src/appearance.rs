#![forbid(unsafe_code)]

//! Receding-stack appearance.
//!
//! Maps a card's depth in the stack (0 = top, frontmost) to the vertical
//! offset, scale and opacity it rests at. Deeper cards recede geometrically:
//! each level further back moves up by a growing step, shrinks and fades.
//!
//! ```text
//! value(0) = identity
//! value(i) = base * fraction^(i - 1)      for i >= 1
//! ```
//!
//! # Invariants
//!
//! 1. Depth 0 is always the identity appearance (offset 0, scale 1, opacity 1).
//! 2. Values depend on depth only, never on which card sits there.
//! 3. All functions are pure and deterministic.

/// Resting appearance of a card at some depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// Vertical offset from the card's anchored position, in points.
    pub offset: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Appearance {
    /// Appearance of the top card.
    pub const FRONT: Self = Self {
        offset: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };
}

impl Default for Appearance {
    fn default() -> Self {
        Self::FRONT
    }
}

/// Constants of the receding-stack curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppearanceConfig {
    /// Offset of the card directly behind the top one.
    /// Default: -60.0 (points, upward)
    pub base_offset: f64,
    /// Growth factor of the offset per extra level.
    /// Default: 1.75
    pub offset_fraction: f64,
    /// Scale of the card directly behind the top one.
    /// Default: 0.9
    pub base_scale: f64,
    /// Shrink factor per extra level.
    /// Default: 0.9
    pub scale_fraction: f64,
    /// Opacity of the card directly behind the top one.
    /// Default: 0.5
    pub base_opacity: f64,
    /// Fade factor per extra level.
    /// Default: 0.6
    pub opacity_fraction: f64,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            base_offset: -60.0,
            offset_fraction: 1.75,
            base_scale: 0.9,
            scale_fraction: 0.9,
            base_opacity: 0.5,
            opacity_fraction: 0.6,
        }
    }
}

impl AppearanceConfig {
    /// Vertical offset at `depth`.
    #[must_use]
    pub fn offset_at(&self, depth: usize) -> f64 {
        recede(depth, 0.0, self.base_offset, self.offset_fraction)
    }

    /// Scale at `depth`.
    #[must_use]
    pub fn scale_at(&self, depth: usize) -> f64 {
        recede(depth, 1.0, self.base_scale, self.scale_fraction)
    }

    /// Opacity at `depth`.
    #[must_use]
    pub fn opacity_at(&self, depth: usize) -> f64 {
        recede(depth, 1.0, self.base_opacity, self.opacity_fraction)
    }

    /// All three channels at `depth`.
    #[must_use]
    pub fn appearance_at(&self, depth: usize) -> Appearance {
        Appearance {
            offset: self.offset_at(depth),
            scale: self.scale_at(depth),
            opacity: self.opacity_at(depth),
        }
    }
}

fn recede(depth: usize, front: f64, base: f64, fraction: f64) -> f64 {
    if depth == 0 {
        return front;
    }
    let exponent = i32::try_from(depth - 1).unwrap_or(i32::MAX);
    base * fraction.powi(exponent)
}
