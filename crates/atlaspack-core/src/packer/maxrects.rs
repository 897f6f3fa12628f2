use crate::config::Heuristic;
use crate::error::{AtlasError, Result};
use crate::model::Rect;

/// Best candidate position for one item, with its heuristic score pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub rect: Rect,
    pub score1: i128,
    pub score2: i128,
}

impl Score {
    /// Sentinel returned when the item fits no free rect in any orientation.
    pub const NO_FIT: Score = Score {
        rect: Rect {
            x: 0,
            y: 0,
            w: 0,
            h: 0,
        },
        score1: i128::MAX,
        score2: i128::MAX,
    };

    pub fn fits(&self) -> bool {
        !self.rect.is_empty()
    }

    /// Strict lexicographic `(score1, score2)` comparison; lower wins.
    pub fn better_than(&self, other: &Score) -> bool {
        (self.score1, self.score2) < (other.score1, other.score2)
    }
}

/// Free-space tracker for one page (MaxRects representation).
///
/// `free` holds the maximal empty rectangles (they may overlap each other,
/// never a used rect); `used` holds committed placements and is only read
/// for contact scoring.
#[derive(Debug, Clone)]
pub struct MaxRectsBin {
    width: u32,
    height: u32,
    allow_rotation: bool,
    free: Vec<Rect>,
    used: Vec<Rect>,
}

impl MaxRectsBin {
    pub fn new(width: u32, height: u32, allow_rotation: bool) -> Self {
        Self {
            width,
            height,
            allow_rotation,
            free: vec![Rect::new(0, 0, width, height)],
            used: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn allow_rotation(&self) -> bool {
        self.allow_rotation
    }

    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    pub fn used_rects(&self) -> &[Rect] {
        &self.used
    }

    /// True if a `w x h` item fits an empty bin of this size in a permitted orientation.
    pub fn fits_empty(&self, w: u32, h: u32) -> bool {
        fits_bin(self.width, self.height, self.allow_rotation, w, h)
    }

    /// Ratio of used area to bin area.
    pub fn occupancy(&self) -> f64 {
        let bin_area = self.width as u64 * self.height as u64;
        if bin_area == 0 {
            return 0.0;
        }
        let used: u64 = self.used.iter().map(Rect::area).sum();
        used as f64 / bin_area as f64
    }

    /// Finds the best position for a `w x h` item without changing any state.
    ///
    /// The rotated orientation is tried right after the upright one for each
    /// free rect and only replaces the running best when strictly better.
    pub fn score(&self, w: u32, h: u32, heuristic: Heuristic) -> Score {
        let mut best = Score::NO_FIT;
        if w == 0 || h == 0 {
            return best;
        }
        for fr in &self.free {
            if fr.w >= w && fr.h >= h {
                let cand = self.score_at(fr, w, h, heuristic);
                if cand.better_than(&best) {
                    best = cand;
                }
            }
            if self.allow_rotation && fr.w >= h && fr.h >= w {
                let cand = self.score_at(fr, h, w, heuristic);
                if cand.better_than(&best) {
                    best = cand;
                }
            }
        }
        best
    }

    /// Scores a `w x h` placement at the top-left corner of `fr`.
    fn score_at(&self, fr: &Rect, w: u32, h: u32, heuristic: Heuristic) -> Score {
        let leftover_h = (i128::from(fr.w) - i128::from(w)).abs();
        let leftover_v = (i128::from(fr.h) - i128::from(h)).abs();
        let short_fit = leftover_h.min(leftover_v);
        let long_fit = leftover_h.max(leftover_v);
        let (score1, score2) = match heuristic {
            Heuristic::BestShortSideFit => (short_fit, long_fit),
            Heuristic::BestLongSideFit => (long_fit, short_fit),
            // u32 x u32 areas reach ~1.8e19, past i64
            Heuristic::BestAreaFit => (
                i128::from(fr.area()) - i128::from(w) * i128::from(h),
                short_fit,
            ),
            Heuristic::BottomLeft => (i128::from(fr.y) + i128::from(h), i128::from(fr.x)),
            // contact is maximized; negate to share the lower-is-better ordering
            Heuristic::ContactPoint => {
                let contact = self.contact_point_score(fr.x, fr.y, w, h);
                (-i128::from(contact), 0)
            }
        };
        Score {
            rect: Rect::new(fr.x, fr.y, w, h),
            score1,
            score2,
        }
    }

    /// Total edge length a `w x h` rect at `(x, y)` shares with the bin border
    /// and with already placed rects.
    pub fn contact_point_score(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let mut score = 0u64;
        if x == 0 || x + w == self.width {
            score += h as u64;
        }
        if y == 0 || y + h == self.height {
            score += w as u64;
        }
        for u in &self.used {
            if u.x == x + w || u.x2() == x {
                score += overlap_1d(u.y, u.y2(), y, y + h) as u64;
            }
            if u.y == y + h || u.y2() == y {
                score += overlap_1d(u.x, u.x2(), x, x + w) as u64;
            }
        }
        score
    }

    /// Scores and commits in one step. Returns `None` if the item does not fit.
    pub fn insert(&mut self, w: u32, h: u32, heuristic: Heuristic) -> Result<Option<Rect>> {
        let best = self.score(w, h, heuristic);
        if !best.fits() {
            return Ok(None);
        }
        self.commit(best.rect)?;
        Ok(Some(best.rect))
    }

    /// Commits `node` as used space: splits every intersecting free rect,
    /// prunes contained free rects and records the placement.
    pub fn commit(&mut self, node: Rect) -> Result<()> {
        if node.is_empty() {
            return Err(AtlasError::InvariantViolation(format!(
                "cannot commit empty rect {node:?}"
            )));
        }
        let in_bounds = matches!(node.x.checked_add(node.w), Some(x2) if x2 <= self.width)
            && matches!(node.y.checked_add(node.h), Some(y2) if y2 <= self.height);
        if !in_bounds {
            return Err(AtlasError::InvariantViolation(format!(
                "rect {node:?} lies outside the {}x{} bin",
                self.width, self.height
            )));
        }
        if let Some(u) = self.used.iter().find(|u| u.intersects(&node)) {
            return Err(AtlasError::InvariantViolation(format!(
                "rect {node:?} overlaps placed rect {u:?}"
            )));
        }

        // survivors keep their order; new slices follow in generation order
        let mut next: Vec<Rect> = Vec::with_capacity(self.free.len() + 4);
        let mut slices: Vec<Rect> = Vec::new();
        for fr in &self.free {
            if fr.intersects(&node) {
                split_free_rect(fr, &node, &mut slices);
            } else {
                next.push(*fr);
            }
        }
        next.extend(slices);
        self.free = next;
        self.prune_free_list();
        self.used.push(node);
        Ok(())
    }

    /// Drops every free rect contained in another one.
    ///
    /// Pairwise forward sweep: for `i < j`, `i` is dropped (and its scan ends)
    /// when `i` lies inside `j`, otherwise `j` is dropped when it lies inside
    /// `i`. Identical rects keep the later copy.
    fn prune_free_list(&mut self) {
        let n = self.free.len();
        let mut removed = vec![false; n];
        for i in 0..n {
            if removed[i] {
                continue;
            }
            for j in (i + 1)..n {
                if removed[j] {
                    continue;
                }
                if self.free[j].contains(&self.free[i]) {
                    removed[i] = true;
                    break;
                }
                if self.free[i].contains(&self.free[j]) {
                    removed[j] = true;
                }
            }
        }
        let mut k = 0;
        self.free.retain(|_| {
            let keep = !removed[k];
            k += 1;
            keep
        });
    }

    /// Full self-check of the page invariants.
    pub fn validate(&self) -> Result<()> {
        let bin = Rect::new(0, 0, self.width, self.height);
        for (i, u) in self.used.iter().enumerate() {
            if u.is_empty() || !bin.contains(u) {
                return Err(AtlasError::InvariantViolation(format!(
                    "used rect {u:?} is empty or outside the bin"
                )));
            }
            if let Some(o) = self.used[i + 1..].iter().find(|o| o.intersects(u)) {
                return Err(AtlasError::InvariantViolation(format!(
                    "used rects {u:?} and {o:?} overlap"
                )));
            }
        }
        for (i, f) in self.free.iter().enumerate() {
            if f.is_empty() || !bin.contains(f) {
                return Err(AtlasError::InvariantViolation(format!(
                    "free rect {f:?} is empty or outside the bin"
                )));
            }
            if let Some(u) = self.used.iter().find(|u| u.intersects(f)) {
                return Err(AtlasError::InvariantViolation(format!(
                    "free rect {f:?} overlaps used rect {u:?}"
                )));
            }
            let contained = self
                .free
                .iter()
                .enumerate()
                .any(|(j, g)| j != i && g.contains(f));
            if contained {
                return Err(AtlasError::InvariantViolation(format!(
                    "free rect {f:?} is contained in another free rect"
                )));
            }
        }
        Ok(())
    }
}

/// True if a `w x h` item fits a `bin_w x bin_h` bin, upright or (when
/// allowed) rotated.
pub(crate) fn fits_bin(bin_w: u32, bin_h: u32, allow_rotation: bool, w: u32, h: u32) -> bool {
    (w <= bin_w && h <= bin_h) || (allow_rotation && h <= bin_w && w <= bin_h)
}

/// Appends the parts of `fr` left over around `node` (which must intersect it).
///
/// Top and bottom slices span the full width of `fr`, left and right slices
/// its full height, so every slice stays maximal.
fn split_free_rect(fr: &Rect, node: &Rect, out: &mut Vec<Rect>) {
    // top
    if node.y > fr.y && node.y < fr.y2() {
        out.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
    }
    // bottom
    if node.y2() < fr.y2() {
        out.push(Rect::new(fr.x, node.y2(), fr.w, fr.y2() - node.y2()));
    }
    // left
    if node.x > fr.x && node.x < fr.x2() {
        out.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
    }
    // right
    if node.x2() < fr.x2() {
        out.push(Rect::new(node.x2(), fr.y, fr.x2() - node.x2(), fr.h));
    }
}

/// Length of the overlap of `[a1, a2)` and `[b1, b2)`; 0 when disjoint or touching.
fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    let start = a1.max(b1);
    let end = a2.min(b2);
    end.saturating_sub(start)
}
