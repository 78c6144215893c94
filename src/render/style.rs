use std::collections::HashMap;

use compact_str::CompactString;

use crate::items::ItemId;
use crate::layout::{Container, Layout, LayoutObserver, Placement};

/// How an element sits on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Positioning {
    /// In normal flow, no placement applied
    #[default]
    Relative,
    /// Absolutely positioned relative to the container's outer box
    Absolute {
        left: i64,
        top: i64,
        width: u32,
        height: u32,
    },
}

/// Style state of one element on the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementStyle {
    pub positioning: Positioning,
    pub classes: Vec<CompactString>,
}

/// Notifications the surface emits, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Positioned(ItemId),
    ContainerResized { width: u32, height: u32 },
    ItemsPositioned,
    Cleared(ItemId),
    AllCleared,
}

/// In-memory visual surface: element styles keyed by item, the container's
/// outer size, and an event log.
#[derive(Debug, Default)]
pub struct StyleSurface {
    styles: HashMap<ItemId, ElementStyle>,
    /// Size-class tag each item currently carries from a placement
    applied_tags: HashMap<ItemId, CompactString>,
    container_size: Option<(u32, u32)>,
    events: Vec<SurfaceEvent>,
}

impl StyleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self, item: ItemId) -> Option<&ElementStyle> {
        self.styles.get(&item)
    }

    /// Outer container size as last applied.
    pub fn container_size(&self) -> Option<(u32, u32)> {
        self.container_size
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}

impl LayoutObserver for StyleSurface {
    fn item_positioned(&mut self, placement: &Placement, container: &Container) {
        let [pad_top, _, _, pad_left] = container.padding();
        let style = self.styles.entry(placement.item).or_default();
        style.positioning = Positioning::Absolute {
            left: placement.left + pad_left as i64,
            top: placement.top + pad_top as i64,
            width: placement.width,
            height: placement.height,
        };
        if let Some(old) = self.applied_tags.remove(&placement.item) {
            style.classes.retain(|c| *c != old);
        }
        if let Some(tag) = &placement.style_tag {
            if !style.classes.contains(tag) {
                style.classes.push(tag.clone());
            }
            self.applied_tags.insert(placement.item, tag.clone());
        }
        self.events.push(SurfaceEvent::Positioned(placement.item));
    }

    fn layout_complete(&mut self, layout: &Layout, container: &Container) {
        let size = (container.outer_width(), container.outer_height());
        if self.container_size != Some(size) {
            self.container_size = Some(size);
            self.events.push(SurfaceEvent::ContainerResized {
                width: size.0,
                height: size.1,
            });
        }
        tracing::debug!("Surface applied {} placements", layout.len());
        self.events.push(SurfaceEvent::ItemsPositioned);
    }

    fn placement_cleared(&mut self, item: ItemId) {
        if let Some(style) = self.styles.get_mut(&item) {
            style.positioning = Positioning::Relative;
        }
        self.events.push(SurfaceEvent::Cleared(item));
    }

    fn all_placements_cleared(&mut self) {
        for style in self.styles.values_mut() {
            style.positioning = Positioning::Relative;
        }
        self.events.push(SurfaceEvent::AllCleared);
    }
}
