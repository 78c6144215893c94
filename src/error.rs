use compact_str::CompactString;
use thiserror::Error;

use crate::items::ItemId;

/// Failures surfaced by a layout pass.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The item's natural box has a zero side, so no aspect ratio exists.
    #[error("item {item} ('{name}') has no usable natural dimensions")]
    InvalidDimensions { item: ItemId, name: CompactString },

    /// The resized item does not fit the pixel range.
    #[error("item {item} ('{name}') is too large once resized")]
    OversizedItem { item: ItemId, name: CompactString },

    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),

    /// The escalation ceilings were reached without placing every item.
    #[error(
        "layout infeasible after {restarts} restarts, {growths} container growths and {attempts} placement attempts"
    )]
    Infeasible {
        restarts: u32,
        growths: u32,
        attempts: u64,
    },

    #[error("unknown item {0}")]
    UnknownItem(ItemId),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
