use super::maxrects::{MaxRectsBin, Score};
use crate::config::Heuristic;
use crate::model::{Item, Rect};

/// Picks, among all pending items, the single placement that scores best on
/// the bin's current free space.
///
/// One-ply greedy: every call rescores every pending item against the state
/// left by the previous commit. No lookahead, no backtracking.
#[derive(Debug, Clone, Copy)]
pub struct GreedyFiller {
    heuristic: Heuristic,
}

impl GreedyFiller {
    pub fn new(heuristic: Heuristic) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Returns the index into `pending` and the rect of the globally best
    /// placement, or `None` when no pending item fits anywhere on the page.
    ///
    /// Ties on the full score pair go to the earliest pending item.
    pub fn next_placement(&self, bin: &MaxRectsBin, pending: &[Item]) -> Option<(usize, Rect)> {
        let mut best: Option<(usize, Score)> = None;
        for (idx, item) in pending.iter().enumerate() {
            let score = bin.score(item.width, item.height, self.heuristic);
            if !score.fits() {
                continue;
            }
            if best.as_ref().is_none_or(|(_, b)| score.better_than(b)) {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, score)| (idx, score.rect))
    }
}
