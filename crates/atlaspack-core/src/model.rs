use serde::{Deserialize, Serialize};

use crate::config::{BinPackConfig, Heuristic};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn x2(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn y2(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// True if the two rects share a positive-area region (separating-axis test).
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x >= self.x2()
            || other.x2() <= self.x
            || other.y >= self.y2()
            || other.y2() <= self.y)
    }
    /// Returns true if `r` lies fully inside `self` (edges may coincide).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.x2() <= self.x2() && r.y2() <= self.y2()
    }
}

/// An item to place: opaque id plus its upright size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Item {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// Where one item ended up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    /// Id of the placed item.
    pub id: String,
    /// Index of the page holding this placement.
    pub page: usize,
    /// Placed rectangle within the page (post-rotation width/height).
    pub rect: Rect,
    /// True if the item was laid out in the 90° swapped orientation.
    pub rotated: bool,
}

/// A closed atlas page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement>,
    /// Used area over bin area, in `[0, 1]`.
    pub occupancy: f64,
}

/// Run-level metadata carried alongside the pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub bin_size: (u32, u32),
    pub allow_rotation: bool,
    pub heuristic: Heuristic,
}

impl Meta {
    pub fn from_config(cfg: &BinPackConfig) -> Self {
        Self {
            app: "atlaspack".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            bin_size: (cfg.bin_width, cfg.bin_height),
            allow_rotation: cfg.allow_rotation,
            heuristic: cfg.heuristic,
        }
    }
}

/// Result of a packing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atlas {
    pub pages: Vec<Page>,
    pub meta: Meta,
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_pages: usize,
    pub num_placements: usize,
    /// Sum of bin areas over all pages.
    pub total_page_area: u64,
    /// Sum of placed rectangle areas.
    pub used_area: u64,
    /// used_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
    /// Lowest per-page occupancy (0.0 when there are no pages).
    pub min_page_occupancy: f64,
    pub num_rotated: usize,
}

impl Atlas {
    /// All placements in page order, then commit order within a page.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.pages.iter().flat_map(|p| p.placements.iter())
    }

    /// Looks up the placement of one item.
    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.placements().find(|p| p.id == id)
    }

    /// Per-page occupancy ratios, indexed by page id.
    pub fn occupancy(&self) -> Vec<f64> {
        self.pages.iter().map(|p| p.occupancy).collect()
    }

    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> PackStats {
        let mut num_placements = 0;
        let mut total_page_area = 0u64;
        let mut used_area = 0u64;
        let mut num_rotated = 0;
        for page in &self.pages {
            total_page_area += page.width as u64 * page.height as u64;
            for pl in &page.placements {
                num_placements += 1;
                used_area += pl.rect.area();
                if pl.rotated {
                    num_rotated += 1;
                }
            }
        }
        let occupancy = if total_page_area > 0 {
            used_area as f64 / total_page_area as f64
        } else {
            0.0
        };
        let min_page_occupancy = self
            .pages
            .iter()
            .map(|p| p.occupancy)
            .fold(None, |acc: Option<f64>, o| Some(acc.map_or(o, |a| a.min(o))))
            .unwrap_or(0.0);
        PackStats {
            num_pages: self.pages.len(),
            num_placements,
            total_page_area,
            used_area,
            occupancy,
            min_page_occupancy,
            num_rotated,
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Placements: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Rotated: {}",
            self.num_pages,
            self.num_placements,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_area,
            self.num_rotated,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_area)
    }
}
