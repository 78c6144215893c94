pub mod engine;
pub mod observer;
pub mod positioner;

use std::collections::HashMap;

use compact_str::CompactString;
use serde::Deserialize;

use crate::error::{LayoutError, Result};
use crate::geometry::{CollisionTest, Rect};
use crate::items::ItemId;

pub use engine::compute_layout;
pub use observer::{LayoutObserver, NoopObserver};
pub use positioner::Positioner;

/// Which container extent grows when an item cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthAxis {
    #[default]
    Width,
    Height,
}

/// Configuration for randomized placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Target widths to choose from, one drawn per item
    pub size_candidates: Vec<u32>,
    /// Style tags parallel to `size_candidates` (missing entries = no tag)
    pub style_tags: Vec<CompactString>,
    /// Container padding in CSS order: top, right, bottom, left
    pub container_padding: [u32; 4],
    pub growth_axis: GrowthAxis,
    /// Pixels added to the container per growth
    pub growth_increment: u32,
    /// Margin added to each item's footprint
    pub margin: u32,
    /// Retries for one item before the container grows
    pub retry_threshold: u32,
    /// Growths within one pass before the pass restarts
    pub growth_threshold: u32,
    /// Hard ceiling on full restarts
    pub max_restarts: u32,
    /// Hard ceiling on coordinate draws across all passes
    pub max_attempts: u64,
    pub collision_test: CollisionTest,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            size_candidates: Vec::new(),
            style_tags: Vec::new(),
            container_padding: [0; 4],
            growth_axis: GrowthAxis::Width,
            growth_increment: 200,
            margin: 0,
            retry_threshold: 100,
            growth_threshold: 3,
            max_restarts: 64,
            max_attempts: 1_000_000,
            collision_test: CollisionTest::CornerContainment,
        }
    }
}

impl LayoutConfig {
    /// Config with the given candidate widths and defaults elsewhere.
    pub fn with_candidates(size_candidates: impl Into<Vec<u32>>) -> Self {
        Self {
            size_candidates: size_candidates.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size_candidates.is_empty() {
            return Err(LayoutError::InvalidConfig(
                "size_candidates must not be empty".into(),
            ));
        }
        if self.size_candidates.contains(&0) {
            return Err(LayoutError::InvalidConfig(
                "size_candidates must be positive".into(),
            ));
        }
        if self.style_tags.len() > self.size_candidates.len() {
            return Err(LayoutError::InvalidConfig(format!(
                "{} style_tags for {} size_candidates",
                self.style_tags.len(),
                self.size_candidates.len()
            )));
        }
        if self.growth_increment == 0 {
            return Err(LayoutError::InvalidConfig(
                "growth_increment must be positive".into(),
            ));
        }
        Ok(())
    }

    /// [`LayoutConfig::validate`] plus agreement with the container the
    /// config will drive. Padding lives on the container; the config copy
    /// must match it.
    pub fn validate_for(&self, container: &Container) -> Result<()> {
        self.validate()?;
        if self.container_padding != container.padding() {
            return Err(LayoutError::InvalidConfig(format!(
                "container_padding {:?} does not match container padding {:?}",
                self.container_padding,
                container.padding()
            )));
        }
        Ok(())
    }

    /// Style tag for a size candidate index, if one was configured.
    pub fn style_tag(&self, size_class: usize) -> Option<&CompactString> {
        self.style_tags.get(size_class)
    }
}

/// The bounded area items are placed into. Extents are the usable area
/// (outer size minus padding); only [`Container::grow`] changes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    width: u32,
    height: u32,
    padding: [u32; 4],
}

impl Container {
    /// Container with no padding.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_padding(width, height, [0; 4])
    }

    /// Container from its outer size; padding is in CSS order.
    pub fn with_padding(outer_width: u32, outer_height: u32, padding: [u32; 4]) -> Self {
        let [top, right, bottom, left] = padding;
        Self {
            width: outer_width.saturating_sub(right.saturating_add(left)),
            height: outer_height.saturating_sub(top.saturating_add(bottom)),
            padding,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padding(&self) -> [u32; 4] {
        self.padding
    }

    pub fn outer_width(&self) -> u32 {
        self.width
            .saturating_add(self.padding[1])
            .saturating_add(self.padding[3])
    }

    pub fn outer_height(&self) -> u32 {
        self.height
            .saturating_add(self.padding[0])
            .saturating_add(self.padding[2])
    }

    pub fn extent(&self, axis: GrowthAxis) -> u32 {
        match axis {
            GrowthAxis::Width => self.width,
            GrowthAxis::Height => self.height,
        }
    }

    /// Grow one extent by `by` pixels. Returns the new extent.
    pub fn grow(&mut self, axis: GrowthAxis, by: u32) -> u32 {
        let extent = match axis {
            GrowthAxis::Width => &mut self.width,
            GrowthAxis::Height => &mut self.height,
        };
        *extent = extent.saturating_add(by);
        *extent
    }
}

/// Final size and position of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub item: ItemId,
    /// Offset from the usable area's left edge
    pub left: i64,
    /// Offset from the usable area's top edge
    pub top: i64,
    pub width: u32,
    pub height: u32,
    /// Index into `size_candidates` this item was assigned
    pub size_class: usize,
    pub style_tag: Option<CompactString>,
    /// Outer box (size plus margin) used for collision tests
    pub rect: Rect,
}

/// Why the container grew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthCause {
    /// The per-item retry counter passed the threshold
    RetriesExhausted { retries: u32 },
    /// The item did not fit the container at all
    NoUsableSpace,
}

/// One escalation step, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Grow {
        pass: u32,
        item: ItemId,
        axis: GrowthAxis,
        extent: u32,
        cause: GrowthCause,
    },
    Restart {
        pass: u32,
        item: ItemId,
        /// Placements thrown away by the restart
        discarded: usize,
    },
}

/// Counters gathered across every pass of one layout run.
#[derive(Debug, Clone, Default)]
pub struct LayoutStats {
    /// Passes started (1 + restarts)
    pub passes: u32,
    pub restarts: u32,
    pub growths: u32,
    /// Coordinate draws across all passes
    pub attempts: u64,
    /// Draws that collided
    pub retries: u64,
    /// Sum of item footprints in the final pass (diagnostic only)
    pub required_area: u64,
    pub escalations: Vec<Escalation>,
}

/// The layout result: placements in placement order plus O(1) lookup.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub placements: Vec<Placement>,
    /// item → index into `placements`
    pub item_to_placement: HashMap<ItemId, usize>,
    pub stats: LayoutStats,
}

impl Layout {
    pub(crate) fn from_placements(placements: Vec<Placement>, stats: LayoutStats) -> Self {
        let item_to_placement = placements
            .iter()
            .enumerate()
            .map(|(i, p)| (p.item, i))
            .collect();
        Self {
            placements,
            item_to_placement,
            stats,
        }
    }

    pub fn get(&self, item: ItemId) -> Option<&Placement> {
        self.item_to_placement
            .get(&item)
            .map(|&i| &self.placements[i])
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Drop one item's placement, keeping the rest in order.
    pub fn remove(&mut self, item: ItemId) -> Option<Placement> {
        let idx = self.item_to_placement.remove(&item)?;
        let removed = self.placements.remove(idx);
        for slot in self.item_to_placement.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.placements.clear();
        self.item_to_placement.clear();
    }

    /// Pairs of items whose rectangles overlap under `test`.
    pub fn collisions(&self, test: CollisionTest) -> Vec<(ItemId, ItemId)> {
        let mut hits = Vec::new();
        for (i, a) in self.placements.iter().enumerate() {
            for b in &self.placements[i + 1..] {
                if test.overlaps(&a.rect, &b.rect) {
                    hits.push((a.item, b.item));
                }
            }
        }
        hits
    }
}
