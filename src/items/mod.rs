pub mod arena;

pub use arena::{Item, ItemId, ItemSet};
