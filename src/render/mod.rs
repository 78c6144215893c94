pub mod ascii;
pub mod style;

pub use ascii::render_ascii;
pub use style::{ElementStyle, Positioning, StyleSurface, SurfaceEvent};
