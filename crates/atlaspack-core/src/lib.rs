//! MaxRects bin-packing engine for texture atlases.
//!
//! - Engine: `MaxRectsBin` (free-rect split/prune, heuristics BSSF/BLSF/BAF/BL/CP)
//! - Greedy loop: `GreedyFiller` places the globally best pending item on each step
//! - Pipeline: `pack` fills fixed-size pages until every item is placed
//! - Only sizes are handled; decoding and blitting pixels is left to the caller.
//!
//! Quick example:
//! ```
//! use atlaspack_core::prelude::*;
//! # fn main() -> Result<(), atlaspack_core::AtlasError> {
//! let cfg = BinPackConfig::builder().with_bin_size(256, 256).build();
//! let atlas = pack_layout(vec![("a", 64, 32), ("b", 32, 32)], cfg)?;
//! assert_eq!(atlas.pages.len(), 1);
//! for p in atlas.placements() {
//!     println!("{} -> page {} at {:?} rotated={}", p.id, p.page, p.rect, p.rotated);
//! }
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `atlaspack_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{BinPackConfig, BinPackConfigBuilder, Heuristic};
    pub use crate::error::{AtlasError, UnplaceableItem};
    pub use crate::model::{Atlas, Item, Meta, PackStats, Page, Placement, Rect};
    pub use crate::packer::{GreedyFiller, MaxRectsBin, Score};
    pub use crate::{pack, pack_layout, partition_placeable};
}
