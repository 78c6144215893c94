use super::{Container, Layout, Placement};
use crate::items::ItemId;

/// Hooks a rendering layer implements to mirror layout state onto a surface.
///
/// Called synchronously by [`super::Positioner`]: `item_positioned` once per
/// placement in placement order, then `layout_complete` once. The two clear
/// hooks fire when placements are dropped on request.
pub trait LayoutObserver {
    /// Apply one item's final geometry to the surface.
    fn item_positioned(&mut self, _placement: &Placement, _container: &Container) {}

    /// Every item of the pass has been positioned.
    fn layout_complete(&mut self, _layout: &Layout, _container: &Container) {}

    /// One item was reverted to its unpositioned state.
    fn placement_cleared(&mut self, _item: ItemId) {}

    /// Every item was reverted to its unpositioned state.
    fn all_placements_cleared(&mut self) {}
}

/// Observer that ignores every hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LayoutObserver for NoopObserver {}

impl<O: LayoutObserver + ?Sized> LayoutObserver for &mut O {
    fn item_positioned(&mut self, placement: &Placement, container: &Container) {
        (**self).item_positioned(placement, container);
    }

    fn layout_complete(&mut self, layout: &Layout, container: &Container) {
        (**self).layout_complete(layout, container);
    }

    fn placement_cleared(&mut self, item: ItemId) {
        (**self).placement_cleared(item);
    }

    fn all_placements_cleared(&mut self) {
        (**self).all_placements_cleared();
    }
}
