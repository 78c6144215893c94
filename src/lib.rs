// Public library interface for positioner-rs
// The binaries in src/bin use the same modules

pub mod error;
pub mod geometry;
pub mod items;
pub mod layout;
pub mod render;
pub mod scene;

pub use error::LayoutError;
pub use items::{Item, ItemId, ItemSet};
pub use layout::{compute_layout, Container, Layout, LayoutConfig, LayoutObserver, Positioner};
