#![forbid(unsafe_code)]

//! In-memory [`CardHost`] that records everything the controller asks for.
//!
//! `RecordingHost` keeps the attached containers in attach order (back to
//! front), the last value written to every view property, interactivity,
//! content extensions and top insets. Structural calls are also appended to
//! a call log so tests can assert on ordering.

use std::collections::BTreeMap;

use cards_core::view::{Property, Size, ViewId};
use cards_stack::config::DismissIcon;
use cards_stack::driver::PropertySink;
use cards_stack::host::{CardHost, ContainerViews, SizeClass};
use serde_json::{Value, json};

/// First id handed out for host-created views. Content ids used by tests
/// stay below it.
pub const HOST_VIEW_BASE: u64 = 1 << 32;

/// One structural call made on the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// A container was created for `content`.
    MakeContainer {
        /// Wrapped content.
        content: ViewId,
        /// Created views.
        views: ContainerViews,
    },
    /// A container was attached.
    Attach {
        /// Container.
        container: ViewId,
        /// Anchor below the stack's top edge.
        top_inset: f64,
    },
    /// A container was detached.
    Detach {
        /// Container.
        container: ViewId,
    },
    /// A container was re-anchored.
    SetTopInset {
        /// Container.
        container: ViewId,
        /// New anchor.
        top_inset: f64,
    },
    /// A pending layout pass was flushed.
    LayoutIfNeeded,
}

#[derive(Debug, Clone)]
struct ContainerRecord {
    content: ViewId,
    dismiss: ViewId,
    icon: DismissIcon,
}

/// Deterministic host for tests and simulations.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    bounds: Size,
    size_class: SizeClass,
    container_height: f64,
    next_view: u64,
    containers: BTreeMap<ViewId, ContainerRecord>,
    attached: Vec<ViewId>,
    insets: BTreeMap<ViewId, f64>,
    properties: BTreeMap<(ViewId, Property), f64>,
    interactive: BTreeMap<ViewId, bool>,
    extensions: BTreeMap<ViewId, f64>,
    calls: Vec<HostCall>,
    property_writes: usize,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new(Size::new(375.0, 667.0))
    }
}

impl RecordingHost {
    /// Host whose stack view has `bounds`. Containers are as tall as the
    /// stack.
    #[must_use]
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds,
            size_class: SizeClass::Compact,
            container_height: bounds.height,
            next_view: HOST_VIEW_BASE,
            containers: BTreeMap::new(),
            attached: Vec::new(),
            insets: BTreeMap::new(),
            properties: BTreeMap::new(),
            interactive: BTreeMap::new(),
            extensions: BTreeMap::new(),
            calls: Vec::new(),
            property_writes: 0,
        }
    }

    /// Set the reported size class (builder).
    #[must_use]
    pub fn with_size_class(mut self, class: SizeClass) -> Self {
        self.size_class = class;
        self
    }

    /// Set the laid-out container height (builder).
    #[must_use]
    pub fn with_container_height(mut self, height: f64) -> Self {
        self.container_height = height;
        self
    }

    /// Change the reported size class.
    pub fn set_size_class(&mut self, class: SizeClass) {
        self.size_class = class;
    }

    /// Attached containers, back to front.
    #[must_use]
    pub fn attached(&self) -> &[ViewId] {
        &self.attached
    }

    /// Whether `container` is attached.
    #[must_use]
    pub fn is_attached(&self, container: ViewId) -> bool {
        self.attached.contains(&container)
    }

    /// Content wrapped by `container`.
    #[must_use]
    pub fn content_of(&self, container: ViewId) -> Option<ViewId> {
        self.containers.get(&container).map(|r| r.content)
    }

    /// Icon the affordance of `container` was created with.
    #[must_use]
    pub fn icon_of(&self, container: ViewId) -> Option<&DismissIcon> {
        self.containers.get(&container).map(|r| &r.icon)
    }

    /// Contents of the attached containers, back to front.
    #[must_use]
    pub fn attached_contents(&self) -> Vec<ViewId> {
        self.attached
            .iter()
            .filter_map(|c| self.content_of(*c))
            .collect()
    }

    /// Last value written to `property` of `view`.
    #[must_use]
    pub fn property(&self, view: ViewId, property: Property) -> Option<f64> {
        self.properties.get(&(view, property)).copied()
    }

    /// Last written value, or the property's identity when never written.
    #[must_use]
    pub fn property_or_identity(&self, view: ViewId, property: Property) -> f64 {
        self.property(view, property)
            .unwrap_or_else(|| property.identity())
    }

    /// Whether `view` accepts interaction. Views default to interactive.
    #[must_use]
    pub fn is_interactive(&self, view: ViewId) -> bool {
        self.interactive.get(&view).copied().unwrap_or(true)
    }

    /// Height extension of `content`.
    #[must_use]
    pub fn content_extension(&self, content: ViewId) -> f64 {
        self.extensions.get(&content).copied().unwrap_or(0.0)
    }

    /// Anchor of `container`.
    #[must_use]
    pub fn top_inset_of(&self, container: ViewId) -> Option<f64> {
        self.insets.get(&container).copied()
    }

    /// Structural calls in order.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Number of property writes received.
    #[must_use]
    pub fn property_writes(&self) -> usize {
        self.property_writes
    }

    /// JSON view of every attached container, back to front.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let containers: Vec<Value> = self
            .attached
            .iter()
            .map(|container| {
                let record = self.containers.get(container);
                let content = record.map(|r| r.content.get());
                let dismiss = record.map(|r| r.dismiss);
                json!({
                    "content": content,
                    "top_inset": self.top_inset_of(*container),
                    "translation_y": self.property_or_identity(*container, Property::TranslationY),
                    "scale": self.property_or_identity(*container, Property::Scale),
                    "opacity": self.property_or_identity(*container, Property::Opacity),
                    "interactive": self.is_interactive(*container),
                    "affordance_alpha": dismiss
                        .map(|d| self.property_or_identity(d, Property::AffordanceAlpha)),
                    "affordance_interactive": dismiss.map(|d| self.is_interactive(d)),
                    "extension": record.map(|r| self.content_extension(r.content)),
                })
            })
            .collect();
        json!({
            "bounds": [self.bounds.width, self.bounds.height],
            "containers": containers,
        })
    }

    fn mint(&mut self) -> ViewId {
        let id = ViewId(self.next_view);
        self.next_view += 1;
        id
    }
}

impl PropertySink for RecordingHost {
    fn set_property(&mut self, view: ViewId, property: Property, value: f64) {
        self.property_writes += 1;
        self.properties.insert((view, property), value);
    }
}

impl CardHost for RecordingHost {
    fn bounds(&self) -> Size {
        self.bounds
    }

    fn size_class(&self) -> SizeClass {
        self.size_class
    }

    fn make_container(&mut self, content: ViewId, icon: &DismissIcon) -> ContainerViews {
        let views = ContainerViews {
            container: self.mint(),
            dismiss: self.mint(),
        };
        self.containers.insert(
            views.container,
            ContainerRecord {
                content,
                dismiss: views.dismiss,
                icon: icon.clone(),
            },
        );
        self.calls.push(HostCall::MakeContainer { content, views });
        views
    }

    fn attach(&mut self, container: ViewId, top_inset: f64) {
        self.attached.retain(|c| *c != container);
        self.attached.push(container);
        self.insets.insert(container, top_inset);
        self.calls.push(HostCall::Attach {
            container,
            top_inset,
        });
    }

    fn detach(&mut self, container: ViewId) {
        self.attached.retain(|c| *c != container);
        self.calls.push(HostCall::Detach { container });
    }

    fn set_top_inset(&mut self, container: ViewId, top_inset: f64) {
        self.insets.insert(container, top_inset);
        self.calls.push(HostCall::SetTopInset {
            container,
            top_inset,
        });
    }

    fn set_interactive(&mut self, view: ViewId, interactive: bool) {
        self.interactive.insert(view, interactive);
    }

    fn set_content_extension(&mut self, content: ViewId, extension: f64) {
        self.extensions.insert(content, extension);
    }

    fn container_height(&self, _container: ViewId) -> f64 {
        self.container_height
    }

    fn layout_if_needed(&mut self) {
        self.calls.push(HostCall::LayoutIfNeeded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_get_fresh_ids_above_base() {
        let mut host = RecordingHost::default();
        let a = host.make_container(ViewId(1), &DismissIcon::default());
        let b = host.make_container(ViewId(2), &DismissIcon::new("x"));
        assert!(a.container.get() >= HOST_VIEW_BASE);
        assert_ne!(a.container, b.container);
        assert_ne!(a.container, a.dismiss);
        assert_eq!(host.content_of(b.container), Some(ViewId(2)));
        assert_eq!(host.icon_of(b.container), Some(&DismissIcon::new("x")));
    }

    #[test]
    fn attach_detach_tracks_order() {
        let mut host = RecordingHost::default();
        let a = host.make_container(ViewId(1), &DismissIcon::default());
        let b = host.make_container(ViewId(2), &DismissIcon::default());
        host.attach(a.container, 20.0);
        host.attach(b.container, 20.0);
        assert_eq!(host.attached_contents(), vec![ViewId(1), ViewId(2)]);
        host.detach(a.container);
        assert!(!host.is_attached(a.container));
        assert_eq!(host.attached(), &[b.container]);
    }

    #[test]
    fn snapshot_lists_attached_only() {
        let mut host = RecordingHost::default();
        let a = host.make_container(ViewId(7), &DismissIcon::default());
        host.attach(a.container, 20.0);
        host.set_property(a.container, Property::Scale, 0.9);
        let snap = host.snapshot();
        let containers = snap["containers"].as_array().cloned().unwrap_or_default();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0]["content"], 7);
        assert_eq!(containers[0]["scale"], 0.9);
        assert_eq!(containers[0]["opacity"], 1.0);
    }

    #[test]
    fn defaults() {
        let host = RecordingHost::default();
        assert!(host.is_interactive(ViewId(1)));
        assert_eq!(host.content_extension(ViewId(1)), 0.0);
        assert_eq!(host.property(ViewId(1), Property::Opacity), None);
        assert_eq!(host.container_height(ViewId(1)), 667.0);
    }
}
