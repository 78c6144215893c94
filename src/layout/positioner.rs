use rand::Rng;

use super::{compute_layout, Container, Layout, LayoutConfig, LayoutObserver, NoopObserver};
use crate::error::{LayoutError, Result};
use crate::items::{ItemId, ItemSet};

/// Owns one container and its items, runs layout passes against them and
/// forwards results to a [`LayoutObserver`].
pub struct Positioner<O: LayoutObserver = NoopObserver> {
    items: ItemSet,
    container: Container,
    config: LayoutConfig,
    layout: Option<Layout>,
    observer: O,
}

impl Positioner<NoopObserver> {
    pub fn new(items: ItemSet, container: Container, config: LayoutConfig) -> Result<Self> {
        Self::with_observer(items, container, config, NoopObserver)
    }
}

impl<O: LayoutObserver> Positioner<O> {
    pub fn with_observer(
        items: ItemSet,
        container: Container,
        config: LayoutConfig,
        observer: O,
    ) -> Result<Self> {
        config.validate_for(&container)?;
        Ok(Self {
            items,
            container,
            config,
            layout: None,
            observer,
        })
    }

    /// Lay out every item and notify the observer.
    ///
    /// On failure the previous layout is kept, but the container may have
    /// grown during the failed run.
    pub fn position_all<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Layout> {
        let layout = compute_layout(&self.items, &mut self.container, &self.config, rng)?;

        for placement in &layout.placements {
            self.observer.item_positioned(placement, &self.container);
        }
        self.observer.layout_complete(&layout, &self.container);

        Ok(self.layout.insert(layout))
    }

    /// Revert one item to unpositioned. Returns whether it had a placement.
    pub fn clear_item(&mut self, item: ItemId) -> Result<bool> {
        if !self.items.contains(item) {
            return Err(LayoutError::UnknownItem(item));
        }
        let removed = self
            .layout
            .as_mut()
            .and_then(|layout| layout.remove(item))
            .is_some();
        self.observer.placement_cleared(item);
        Ok(removed)
    }

    /// Revert every item to unpositioned.
    pub fn clear_all(&mut self) {
        if let Some(layout) = self.layout.as_mut() {
            layout.clear();
        }
        self.observer.all_placements_cleared();
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration used by later passes.
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<()> {
        config.validate_for(&self.container)?;
        self.config = config;
        Ok(())
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}
