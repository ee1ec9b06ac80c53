#![forbid(unsafe_code)]

//! Card stack configuration.
//!
//! Every tunable lives in [`CardStackConfig`]. `Default` reproduces the
//! stock look and feel; builder methods override single values, and
//! [`CardStackConfig::from_env`] applies environment overrides on top.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `CARDS_REDUCED_MOTION` | `1`/`true` applies every change instantly |
//! | `CARDS_DISMISS_DISTANCE` | minimum drag distance (points) that dismisses |

use std::time::Duration;

use cards_core::animation::{Curve, SpringParams, ease_in_out};
use cards_core::appearance::AppearanceConfig;
use cards_core::gesture::DismissThreshold;
use tracing::warn;

use crate::host::SizeClass;

/// Handle of the image shown in each card's dismiss affordance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DismissIcon(pub String);

impl DismissIcon {
    /// Create an icon handle.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for DismissIcon {
    fn default() -> Self {
        Self::new("card-dismiss")
    }
}

/// Distance from the stack's top edge to each container, per size class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopInset {
    /// Inset in compact environments.
    /// Default: 20.0
    pub compact: f64,
    /// Inset in regular environments.
    /// Default: 40.0
    pub regular: f64,
}

impl Default for TopInset {
    fn default() -> Self {
        Self {
            compact: 20.0,
            regular: 40.0,
        }
    }
}

impl TopInset {
    /// Same inset for every size class.
    #[must_use]
    pub const fn uniform(inset: f64) -> Self {
        Self {
            compact: inset,
            regular: inset,
        }
    }

    /// Inset for `class`.
    #[must_use]
    pub const fn for_class(&self, class: SizeClass) -> f64 {
        match class {
            SizeClass::Compact => self.compact,
            SizeClass::Regular => self.regular,
        }
    }
}

/// Configuration for a card stack controller.
#[derive(Debug, Clone)]
pub struct CardStackConfig {
    /// Receding-stack curve.
    pub appearance: AppearanceConfig,
    /// Spring for pushing a card and moving the rest back.
    /// Default: speed 12, bounciness 2
    pub push_spring: SpringParams,
    /// Spring for popping a card and moving the rest forward.
    /// Default: speed 12, bounciness 0
    pub pop_spring: SpringParams,
    /// Spring returning a dragged card to rest.
    /// Default: speed 12, bounciness 1
    pub restore_spring: SpringParams,
    /// Duration of the dismiss affordance fade.
    /// Default: 200ms
    pub affordance_fade: Duration,
    /// When a released drag dismisses the top card.
    pub dismiss_threshold: DismissThreshold,
    /// Container anchor per size class.
    pub top_inset: TopInset,
    /// Image for dismiss affordances.
    pub dismiss_icon: DismissIcon,
    /// Distance a discarded card drops while fading.
    /// Default: 50.0
    pub discard_distance: f64,
    /// Duration of the discard animation.
    /// Default: 300ms
    pub discard_duration: Duration,
    /// Apply every change instantly.
    /// Default: false
    pub reduced_motion: bool,
}

impl Default for CardStackConfig {
    fn default() -> Self {
        Self {
            appearance: AppearanceConfig::default(),
            push_spring: SpringParams::new(12.0, 2.0),
            pop_spring: SpringParams::new(12.0, 0.0),
            restore_spring: SpringParams::new(12.0, 1.0),
            affordance_fade: Duration::from_millis(200),
            dismiss_threshold: DismissThreshold::default(),
            top_inset: TopInset::default(),
            dismiss_icon: DismissIcon::default(),
            discard_distance: 50.0,
            discard_duration: Duration::from_millis(300),
            reduced_motion: false,
        }
    }
}

impl CardStackConfig {
    /// Default configuration with environment overrides applied.
    ///
    /// Malformed values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up through `lookup`.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("CARDS_REDUCED_MOTION") {
            match parse_flag(&raw) {
                Some(flag) => self.reduced_motion = flag,
                None => warn!(value = %raw, "ignoring malformed CARDS_REDUCED_MOTION"),
            }
        }
        if let Some(raw) = lookup("CARDS_DISMISS_DISTANCE") {
            match raw.trim().parse::<f64>() {
                Ok(distance) if distance.is_finite() && distance >= 0.0 => {
                    self.dismiss_threshold.min_distance = distance;
                }
                _ => warn!(value = %raw, "ignoring malformed CARDS_DISMISS_DISTANCE"),
            }
        }
        self
    }

    /// Override the appearance curve.
    #[must_use]
    pub fn appearance(mut self, appearance: AppearanceConfig) -> Self {
        self.appearance = appearance;
        self
    }

    /// Override the push spring.
    #[must_use]
    pub fn push_spring(mut self, spring: SpringParams) -> Self {
        self.push_spring = spring;
        self
    }

    /// Override the pop spring.
    #[must_use]
    pub fn pop_spring(mut self, spring: SpringParams) -> Self {
        self.pop_spring = spring;
        self
    }

    /// Override the restore spring.
    #[must_use]
    pub fn restore_spring(mut self, spring: SpringParams) -> Self {
        self.restore_spring = spring;
        self
    }

    /// Override the dismiss threshold.
    #[must_use]
    pub fn dismiss_threshold(mut self, threshold: DismissThreshold) -> Self {
        self.dismiss_threshold = threshold;
        self
    }

    /// Override the container anchor.
    #[must_use]
    pub fn top_inset(mut self, inset: TopInset) -> Self {
        self.top_inset = inset;
        self
    }

    /// Override the dismiss icon.
    #[must_use]
    pub fn dismiss_icon(mut self, icon: DismissIcon) -> Self {
        self.dismiss_icon = icon;
        self
    }

    /// Enable or disable reduced motion.
    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Curve for affordance fades.
    #[must_use]
    pub fn affordance_curve(&self) -> Curve {
        Curve::timed(self.affordance_fade, ease_in_out)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_match_stock_feel() {
        let cfg = CardStackConfig::default();
        assert_eq!(cfg.push_spring, SpringParams::new(12.0, 2.0));
        assert_eq!(cfg.pop_spring, SpringParams::new(12.0, 0.0));
        assert_eq!(cfg.restore_spring, SpringParams::new(12.0, 1.0));
        assert_eq!(cfg.dismiss_threshold.min_distance, 25.0);
        assert!(!cfg.reduced_motion);
        assert_eq!(cfg.dismiss_icon.name(), "card-dismiss");
    }

    #[test]
    fn top_inset_per_class() {
        let inset = TopInset::default();
        assert_eq!(inset.for_class(SizeClass::Compact), 20.0);
        assert_eq!(inset.for_class(SizeClass::Regular), 40.0);
        assert_eq!(TopInset::uniform(8.0).for_class(SizeClass::Regular), 8.0);
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = CardStackConfig::default().with_env_overrides(env(&[
            ("CARDS_REDUCED_MOTION", "true"),
            ("CARDS_DISMISS_DISTANCE", " 40 "),
        ]));
        assert!(cfg.reduced_motion);
        assert_eq!(cfg.dismiss_threshold.min_distance, 40.0);
    }

    #[test]
    fn malformed_env_is_ignored() {
        let cfg = CardStackConfig::default().with_env_overrides(env(&[
            ("CARDS_REDUCED_MOTION", "maybe"),
            ("CARDS_DISMISS_DISTANCE", "-3"),
        ]));
        assert!(!cfg.reduced_motion);
        assert_eq!(cfg.dismiss_threshold.min_distance, 25.0);
    }

    #[test]
    fn builders_override() {
        let cfg = CardStackConfig::default()
            .reduced_motion(true)
            .top_inset(TopInset::uniform(0.0))
            .dismiss_icon(DismissIcon::new("close"));
        assert!(cfg.reduced_motion);
        assert_eq!(cfg.top_inset.compact, 0.0);
        assert_eq!(cfg.dismiss_icon, DismissIcon::new("close"));
    }
}
