#![forbid(unsafe_code)]

//! One presented card.

use bitflags::bitflags;
use cards_core::view::{Property, ViewId};

use crate::driver::AnimationKey;
use crate::host::ContainerViews;

bitflags! {
    /// Card channels touched by a layout pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Channels: u8 {
        /// Container vertical translation.
        const TRANSLATION = 0b0001;
        /// Container scale.
        const SCALE       = 0b0010;
        /// Container opacity.
        const OPACITY     = 0b0100;
        /// Dismiss affordance alpha and interactivity.
        const AFFORDANCE  = 0b1000;
        /// The receding-stack appearance.
        const APPEARANCE  = Self::TRANSLATION.bits() | Self::SCALE.bits() | Self::OPACITY.bits();
    }
}

/// A content view presented in the stack, with the views hosting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    content: ViewId,
    container: ViewId,
    dismiss: ViewId,
    top_inset: f64,
    dismissable: bool,
    content_extension: f64,
}

impl Card {
    pub(crate) fn new(content: ViewId, views: ContainerViews, top_inset: f64) -> Self {
        Self {
            content,
            container: views.container,
            dismiss: views.dismiss,
            top_inset,
            dismissable: true,
            content_extension: 0.0,
        }
    }

    /// Content view supplied by the application. Identifies the card.
    #[must_use]
    pub fn content(&self) -> ViewId {
        self.content
    }

    /// Container created by the host.
    #[must_use]
    pub fn container(&self) -> ViewId {
        self.container
    }

    /// Dismiss affordance created by the host.
    #[must_use]
    pub fn dismiss(&self) -> ViewId {
        self.dismiss
    }

    /// Anchor of the container below the stack's top edge.
    #[must_use]
    pub fn top_inset(&self) -> f64 {
        self.top_inset
    }

    /// Whether the user may dismiss this card when it is on top.
    #[must_use]
    pub fn is_dismissable(&self) -> bool {
        self.dismissable
    }

    /// Height currently added below the content.
    #[must_use]
    pub fn content_extension(&self) -> f64 {
        self.content_extension
    }

    /// Whether the affordance is interactive for a card at this position.
    #[must_use]
    pub fn affordance_enabled(&self, is_top: bool) -> bool {
        is_top && self.dismissable
    }

    pub(crate) fn set_dismissable(&mut self, dismissable: bool) {
        self.dismissable = dismissable;
    }

    pub(crate) fn set_top_inset(&mut self, top_inset: f64) {
        self.top_inset = top_inset;
    }

    pub(crate) fn set_content_extension(&mut self, extension: f64) {
        self.content_extension = extension;
    }

    /// Driver key for one of this card's channels.
    #[must_use]
    pub fn key(&self, property: Property) -> AnimationKey {
        match property {
            Property::AffordanceAlpha => AnimationKey::new(self.dismiss, property),
            _ => AnimationKey::new(self.container, property),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card::new(
            ViewId(1),
            ContainerViews {
                container: ViewId(2),
                dismiss: ViewId(3),
            },
            20.0,
        )
    }

    #[test]
    fn keys_target_the_right_views() {
        let c = card();
        assert_eq!(c.key(Property::TranslationY).view, ViewId(2));
        assert_eq!(c.key(Property::Scale).view, ViewId(2));
        assert_eq!(c.key(Property::Opacity).view, ViewId(2));
        assert_eq!(c.key(Property::AffordanceAlpha).view, ViewId(3));
    }

    #[test]
    fn affordance_requires_top_and_dismissable() {
        let mut c = card();
        assert!(c.affordance_enabled(true));
        assert!(!c.affordance_enabled(false));
        c.set_dismissable(false);
        assert!(!c.affordance_enabled(true));
    }

    #[test]
    fn appearance_channels() {
        assert!(Channels::APPEARANCE.contains(Channels::TRANSLATION | Channels::SCALE));
        assert!(!Channels::APPEARANCE.contains(Channels::AFFORDANCE));
        assert_eq!(Channels::all(), Channels::APPEARANCE | Channels::AFFORDANCE);
    }
}
