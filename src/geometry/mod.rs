use rand::Rng;
use serde::Deserialize;

/// A 2-D point in container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle stored as its four corners `[nw, ne, se, sw]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub corners: [Point; 4],
}

impl Rect {
    /// Build the outer box of an item placed at `(left, top)` with the given
    /// footprint (assigned size plus margin).
    pub fn from_origin(left: i64, top: i64, outer_width: i64, outer_height: i64) -> Self {
        let right = left + outer_width;
        let bottom = top + outer_height;
        Self {
            corners: [
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ],
        }
    }

    pub fn nw(&self) -> Point {
        self.corners[0]
    }

    pub fn ne(&self) -> Point {
        self.corners[1]
    }

    pub fn se(&self) -> Point {
        self.corners[2]
    }

    pub fn sw(&self) -> Point {
        self.corners[3]
    }

    pub fn width(&self) -> i64 {
        self.ne().x - self.nw().x
    }

    pub fn height(&self) -> i64 {
        self.sw().y - self.nw().y
    }

    /// Inclusive containment. The x range is `[nw.x, ne.x]`, the y range `[nw.y, sw.y]`.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.nw().x && p.x <= self.ne().x && p.y >= self.nw().y && p.y <= self.sw().y
    }

    /// True if any corner of either rectangle lies inside the other.
    ///
    /// Misses the "cross" case where two rectangles straddle each other with
    /// no corner contained; see [`Rect::intervals_overlap`] for the exact test.
    pub fn corners_overlap(&self, other: &Rect) -> bool {
        self.corners.iter().any(|&c| other.contains(c))
            || other.corners.iter().any(|&c| self.contains(c))
    }

    /// Separating-axis test on the two projected intervals (inclusive bounds).
    pub fn intervals_overlap(&self, other: &Rect) -> bool {
        self.nw().x <= other.ne().x
            && other.nw().x <= self.ne().x
            && self.nw().y <= other.sw().y
            && other.nw().y <= self.sw().y
    }
}

/// Which overlap definition the engine uses when testing candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionTest {
    /// Corner-containment, matching the classic plugin behavior.
    #[default]
    CornerContainment,
    /// Full interval overlap on both axes.
    Interval,
}

impl CollisionTest {
    pub fn overlaps(self, a: &Rect, b: &Rect) -> bool {
        match self {
            CollisionTest::CornerContainment => a.corners_overlap(b),
            CollisionTest::Interval => a.intervals_overlap(b),
        }
    }
}

/// Uniform integer in `[0, max)`. Degenerates to 0 when `max <= 0`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, max: i64) -> i64 {
    if max <= 0 {
        return 0;
    }
    rng.random_range(0..max)
}

/// The one dimension a resize is driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    Width(u32),
    Height(u32),
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Why a resize could not produce dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    /// An original side is zero, so there is no ratio
    ZeroDimension,
    /// The derived side does not fit in a `u32`
    Overflow,
}

/// Scale `(orig_height, orig_width)` so one side hits `target`, rounding the
/// derived side up.
pub fn resize_keeping_aspect_ratio(
    orig_height: u32,
    orig_width: u32,
    target: ResizeTarget,
) -> Result<Dimensions, ResizeError> {
    if orig_height == 0 || orig_width == 0 {
        return Err(ResizeError::ZeroDimension);
    }
    let dims = match target {
        ResizeTarget::Width(width) => Dimensions {
            width,
            height: ceil_scale(width, orig_height, orig_width)?,
        },
        ResizeTarget::Height(height) => Dimensions {
            width: ceil_scale(height, orig_width, orig_height)?,
            height,
        },
    };
    Ok(dims)
}

/// `ceil(value * num / den)` in integer arithmetic, so ratios never pick up
/// float error before rounding.
fn ceil_scale(value: u32, num: u32, den: u32) -> Result<u32, ResizeError> {
    let scaled = (value as u64 * num as u64).div_ceil(den as u64);
    u32::try_from(scaled).map_err(|_| ResizeError::Overflow)
}

/// True if `candidate` overlaps any rectangle already placed.
/// An empty `placed` set never collides.
pub fn rectangles_collide(candidate: &Rect, placed: &[Rect], test: CollisionTest) -> bool {
    placed.iter().any(|tester| test.overlaps(candidate, tester))
}
