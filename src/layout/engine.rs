use rand::Rng;

use super::{
    Container, Escalation, GrowthCause, Layout, LayoutConfig, LayoutStats, Placement,
};
use crate::error::{LayoutError, Result};
use crate::geometry::{self, Rect, ResizeError, ResizeTarget};
use crate::items::{Item, ItemId, ItemSet};

/// An item with its size chosen for the current pass.
#[derive(Debug, Clone, Copy)]
struct SizedItem {
    id: ItemId,
    width: u32,
    height: u32,
    size_class: usize,
}

/// Result of searching for one item's position.
enum Search {
    Placed { left: i64, top: i64, rect: Rect },
    Restart,
}

/// State of one pass. Rebuilt from scratch on every restart.
struct Pass {
    number: u32,
    placed: Vec<Rect>,
    placements: Vec<Placement>,
    growths: u32,
    required_area: u64,
}

impl Pass {
    fn new(number: u32, capacity: usize) -> Self {
        Self {
            number,
            placed: Vec::with_capacity(capacity),
            placements: Vec::with_capacity(capacity),
            growths: 0,
            required_area: 0,
        }
    }
}

/// Place every item in `items` inside `container` without overlaps.
///
/// Items are placed greedily in priority order at random coordinates. An item
/// that keeps colliding grows the container; too many growths in one pass
/// restart the pass from the first item with fresh sizes. Growth is never
/// undone. The run fails with [`LayoutError::Infeasible`] once
/// `max_restarts` or `max_attempts` is exceeded.
pub fn compute_layout<R: Rng + ?Sized>(
    items: &ItemSet,
    container: &mut Container,
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<Layout> {
    config.validate_for(container)?;

    let mut stats = LayoutStats::default();

    'pass: loop {
        stats.passes += 1;
        let mut pass = Pass::new(stats.passes, items.len());

        for (id, item) in items.iter() {
            let sized = assign_size(id, item, config, rng)?;
            let margin = config.margin as u64;
            let footprint =
                (sized.width as u64 + margin).saturating_mul(sized.height as u64 + margin);
            pass.required_area = pass.required_area.saturating_add(footprint);

            match search(&sized, container, config, &mut pass, &mut stats, rng)? {
                Search::Placed { left, top, rect } => {
                    pass.placed.push(rect);
                    pass.placements.push(Placement {
                        item: id,
                        left,
                        top,
                        width: sized.width,
                        height: sized.height,
                        size_class: sized.size_class,
                        style_tag: config.style_tag(sized.size_class).cloned(),
                        rect,
                    });
                }
                Search::Restart => {
                    stats.escalations.push(Escalation::Restart {
                        pass: pass.number,
                        item: id,
                        discarded: pass.placements.len(),
                    });
                    stats.restarts += 1;
                    if stats.restarts > config.max_restarts {
                        tracing::warn!(
                            "Giving up after {} restarts ({} growths, {} attempts)",
                            stats.restarts,
                            stats.growths,
                            stats.attempts
                        );
                        return Err(infeasible(&stats));
                    }
                    tracing::debug!(
                        "Restarting pass {} at item {} ({} placements discarded)",
                        pass.number,
                        id,
                        pass.placements.len()
                    );
                    continue 'pass;
                }
            }
        }

        stats.required_area = pass.required_area;
        tracing::info!(
            "Placed {} items in {}x{} after {} passes ({} growths, {} attempts)",
            pass.placements.len(),
            container.width(),
            container.height(),
            stats.passes,
            stats.growths,
            stats.attempts
        );
        return Ok(Layout::from_placements(pass.placements, stats));
    }
}

/// Draw a size class and scale the item's natural box to that width.
fn assign_size<R: Rng + ?Sized>(
    id: ItemId,
    item: &Item,
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<SizedItem> {
    let size_class = rng.random_range(0..config.size_candidates.len());
    let target = config.size_candidates[size_class];
    let dims = geometry::resize_keeping_aspect_ratio(
        item.height,
        item.width,
        ResizeTarget::Width(target),
    )
    .map_err(|e| match e {
        ResizeError::ZeroDimension => LayoutError::InvalidDimensions {
            item: id,
            name: item.name.clone(),
        },
        ResizeError::Overflow => LayoutError::OversizedItem {
            item: id,
            name: item.name.clone(),
        },
    })?;

    Ok(SizedItem {
        id,
        width: dims.width,
        height: dims.height,
        size_class,
    })
}

/// Exclusive upper bound for an origin along one axis. Negative = no room.
fn origin_range(extent: u32, size: u32, margin: u32) -> i64 {
    extent as i64 - size as i64 - margin as i64
}

/// Randomized search for a collision-free origin, escalating per config.
fn search<R: Rng + ?Sized>(
    item: &SizedItem,
    container: &mut Container,
    config: &LayoutConfig,
    pass: &mut Pass,
    stats: &mut LayoutStats,
    rng: &mut R,
) -> Result<Search> {
    let outer_w = item.width as i64 + config.margin as i64;
    let outer_h = item.height as i64 + config.margin as i64;
    let mut retries = 0u32;

    loop {
        let x_max = origin_range(container.width(), item.width, config.margin);
        let y_max = origin_range(container.height(), item.height, config.margin);

        if x_max < 0 || y_max < 0 {
            if grow(item, container, config, pass, stats, GrowthCause::NoUsableSpace) {
                return Ok(Search::Restart);
            }
            retries = 0;
            continue;
        }

        if stats.attempts >= config.max_attempts {
            tracing::warn!(
                "Attempt ceiling {} reached while placing item {}",
                config.max_attempts,
                item.id
            );
            return Err(infeasible(stats));
        }
        stats.attempts += 1;

        let left = geometry::random_int(rng, x_max);
        let top = geometry::random_int(rng, y_max);
        let rect = Rect::from_origin(left, top, outer_w, outer_h);

        if !geometry::rectangles_collide(&rect, &pass.placed, config.collision_test) {
            return Ok(Search::Placed { left, top, rect });
        }

        retries += 1;
        stats.retries += 1;
        if retries > config.retry_threshold {
            let cause = GrowthCause::RetriesExhausted { retries };
            if grow(item, container, config, pass, stats, cause) {
                return Ok(Search::Restart);
            }
            retries = 0;
        }
    }
}

/// Grow the container once. Returns true when the pass has now grown
/// more often than `growth_threshold` and must restart.
fn grow(
    item: &SizedItem,
    container: &mut Container,
    config: &LayoutConfig,
    pass: &mut Pass,
    stats: &mut LayoutStats,
    cause: GrowthCause,
) -> bool {
    let extent = container.grow(config.growth_axis, config.growth_increment);
    pass.growths += 1;
    stats.growths += 1;
    stats.escalations.push(Escalation::Grow {
        pass: pass.number,
        item: item.id,
        axis: config.growth_axis,
        extent,
        cause,
    });
    tracing::debug!(
        "Grew container {:?} to {} for item {} ({:?})",
        config.growth_axis,
        extent,
        item.id,
        cause
    );
    pass.growths > config.growth_threshold
}

fn infeasible(stats: &LayoutStats) -> LayoutError {
    LayoutError::Infeasible {
        restarts: stats.restarts,
        growths: stats.growths,
        attempts: stats.attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CollisionTest;
    use crate::layout::GrowthAxis;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn squares(n: usize, side: u32) -> ItemSet {
        (0..n).map(|i| Item::new(&format!("sq{i}"), side, side)).collect()
    }

    #[test]
    fn single_item_lands_in_origin_range_without_retries() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let items = squares(1, 100);
            let mut container = Container::new(500, 500);
            let config = LayoutConfig::with_candidates([100]);

            let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
            let p = layout.get(ItemId(0)).unwrap();
            assert_eq!((p.width, p.height), (100, 100));
            assert!((0..400).contains(&p.left));
            assert!((0..400).contains(&p.top));
            assert_eq!(layout.stats.attempts, 1);
            assert_eq!(layout.stats.retries, 0);
            assert_eq!(layout.stats.passes, 1);
            assert_eq!(container, Container::new(500, 500));
        }
    }

    #[test]
    fn aspect_ratio_is_preserved_for_assigned_sizes() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: ItemSet = [(640, 480), (300, 1000), (17, 9)]
            .iter()
            .map(|&(w, h)| Item::new("photo", w, h))
            .collect();
        let mut container = Container::new(4000, 4000);
        let config = LayoutConfig::with_candidates([120, 250]);

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        for (id, item) in items.iter() {
            let p = layout.get(id).unwrap();
            assert_eq!(p.width, config.size_candidates[p.size_class]);
            let expected = (p.width as u64 * item.height as u64).div_ceil(item.width as u64);
            assert_eq!(p.height as u64, expected);
        }
    }

    #[test]
    fn crowded_items_force_retries_and_growth_but_never_overlap() {
        let mut rng = StdRng::seed_from_u64(11);
        let items = squares(2, 100);
        let mut container = Container::new(200, 200);
        let config = LayoutConfig::with_candidates([150]);

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        assert_eq!(layout.len(), 2);
        assert!(layout.stats.retries >= 1);
        assert!(layout.stats.growths >= 1);
        assert!(layout.collisions(CollisionTest::CornerContainment).is_empty());

        let first = layout.get(ItemId(0)).unwrap();
        assert_eq!(
            first.rect,
            Rect::from_origin(first.left, first.top, 150, 150)
        );
    }

    #[test]
    fn growth_adds_exact_increment_and_resets_retry_counter() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = squares(2, 100);
        let mut container = Container::new(200, 200);
        let mut config = LayoutConfig::with_candidates([150]);
        config.growth_increment = 40;
        config.max_restarts = 1_000;

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        let mut expected = 200;
        for e in &layout.stats.escalations {
            if let Escalation::Grow { axis, extent, cause, .. } = *e {
                expected += 40;
                assert_eq!(axis, GrowthAxis::Width);
                assert_eq!(extent, expected);
                // Every growth sees a counter that started from zero.
                assert_eq!(cause, GrowthCause::RetriesExhausted { retries: 101 });
            }
        }
        assert!(layout.stats.growths >= 1);
        assert_eq!(container.width(), 200 + 40 * layout.stats.growths);
        assert_eq!(container.height(), 200);
    }

    #[test]
    fn restart_replaces_every_item_in_order() {
        let mut rng = StdRng::seed_from_u64(21);
        let items = squares(6, 100);
        let mut container = Container::new(220, 220);
        let mut config = LayoutConfig::with_candidates([100]);
        config.growth_increment = 10;
        config.retry_threshold = 5;
        config.growth_threshold = 1;
        config.max_restarts = 10_000;

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        assert!(layout.stats.restarts >= 1);
        assert_eq!(layout.stats.passes, layout.stats.restarts + 1);
        assert!(layout
            .stats
            .escalations
            .iter()
            .any(|e| matches!(e, Escalation::Restart { .. })));

        let order: Vec<_> = layout.placements.iter().map(|p| p.item).collect();
        assert_eq!(order, items.ids().collect::<Vec<_>>());
        assert!(layout.collisions(CollisionTest::CornerContainment).is_empty());
    }

    #[test]
    fn oversized_item_grows_container_before_drawing() {
        let mut rng = StdRng::seed_from_u64(2);
        let items = squares(1, 10);
        let mut container = Container::new(100, 1000);
        let config = LayoutConfig::with_candidates([250]);

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        assert!(container.width() >= 250);
        assert!(matches!(
            layout.stats.escalations[0],
            Escalation::Grow { cause: GrowthCause::NoUsableSpace, .. }
        ));
        assert_eq!(layout.stats.attempts, 1);
    }

    #[test]
    fn wrong_growth_axis_is_reported_infeasible() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = squares(1, 10);
        let mut container = Container::new(100, 100);
        let mut config = LayoutConfig::with_candidates([250]);
        config.growth_axis = GrowthAxis::Height;
        config.max_restarts = 2;

        let err = compute_layout(&items, &mut container, &config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Infeasible { restarts: 3, attempts: 0, .. }
        ));
    }

    #[test]
    fn attempt_ceiling_stops_the_search() {
        let mut rng = StdRng::seed_from_u64(9);
        let items = squares(2, 100);
        let mut container = Container::new(200, 200);
        let mut config = LayoutConfig::with_candidates([150]);
        config.max_attempts = 50;

        let err = compute_layout(&items, &mut container, &config, &mut rng).unwrap_err();
        assert!(matches!(err, LayoutError::Infeasible { attempts: 50, .. }));
    }

    #[test]
    fn zero_sized_item_aborts_the_pass() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut items = squares(1, 50);
        let bad = items.push(Item::new("broken", 0, 40));
        let mut container = Container::new(500, 500);
        let config = LayoutConfig::with_candidates([100]);

        let err = compute_layout(&items, &mut container, &config, &mut rng).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDimensions { item, .. } if item == bad));
    }

    #[test]
    fn huge_container_places_without_wrapping() {
        let mut rng = StdRng::seed_from_u64(12);
        let items: ItemSet = [Item::new("dot", 1, 1)].into_iter().collect();
        let mut container = Container::new(4_000_000_000, 4_000_000_000);
        let config = LayoutConfig::with_candidates([2_000_000_000]);

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        let p = &layout.placements[0];
        assert_eq!(p.rect.width(), 2_000_000_000);
        assert_eq!(p.rect.height(), 2_000_000_000);
        assert!((0..2_000_000_000).contains(&p.left));
        assert!(p.rect.se().x <= 4_000_000_000);
        assert_eq!(container.width(), 4_000_000_000);
    }

    #[test]
    fn unrepresentable_resize_is_reported_as_oversized() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut items = ItemSet::new();
        let tall = items.push(Item::new("tall", 1, 4));
        let mut container = Container::new(4_000_000_000, 4_000_000_000);
        let config = LayoutConfig::with_candidates([2_000_000_000]);

        let err = compute_layout(&items, &mut container, &config, &mut rng).unwrap_err();
        assert!(matches!(err, LayoutError::OversizedItem { item, .. } if item == tall));
    }

    #[test]
    fn margin_and_tags_flow_into_placements() {
        let mut rng = StdRng::seed_from_u64(8);
        let items = squares(4, 40);
        let mut container = Container::new(1000, 1000);
        let mut config = LayoutConfig::with_candidates([50, 80]);
        config.style_tags = vec!["small".into(), "large".into()];
        config.margin = 10;

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        let mut area = 0;
        for p in &layout.placements {
            assert_eq!(p.rect.width(), p.width as i64 + 10);
            assert_eq!(p.rect.height(), p.height as i64 + 10);
            let tag = if p.size_class == 0 { "small" } else { "large" };
            assert_eq!(p.style_tag.as_deref(), Some(tag));
            area += (p.width as u64 + 10) * (p.height as u64 + 10);
        }
        assert_eq!(layout.stats.required_area, area);
    }

    #[test]
    fn empty_item_set_yields_empty_layout() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut container = Container::new(10, 10);
        let config = LayoutConfig::with_candidates([5]);
        let layout = compute_layout(&ItemSet::new(), &mut container, &config, &mut rng).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.stats.passes, 1);
    }

    #[test]
    fn interval_test_keeps_cross_shapes_apart() {
        let mut rng = StdRng::seed_from_u64(13);
        let items: ItemSet = (0..8)
            .map(|i| {
                if i % 2 == 0 {
                    Item::new("wide", 100, 10)
                } else {
                    Item::new("tall", 10, 30)
                }
            })
            .collect();
        let mut container = Container::new(600, 600);
        let mut config = LayoutConfig::with_candidates([60]);
        config.collision_test = CollisionTest::Interval;
        config.max_restarts = 10_000;

        let layout = compute_layout(&items, &mut container, &config, &mut rng).unwrap();
        assert!(layout.collisions(CollisionTest::Interval).is_empty());
    }
}
