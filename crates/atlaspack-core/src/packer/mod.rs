use crate::model::{Item, Rect};

pub mod greedy;
pub mod maxrects;

pub use greedy::GreedyFiller;
pub use maxrects::{MaxRectsBin, Score};

/// Whether `rect` holds `item` in the 90° swapped orientation.
///
/// Square items are never reported as rotated.
pub fn resolve_rotation(item: &Item, rect: &Rect) -> bool {
    item.width != item.height && rect.w == item.height && rect.h == item.width
}
