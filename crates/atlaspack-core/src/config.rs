use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AtlasError;

/// MaxRects placement heuristics.
///
/// Every heuristic yields a `(score1, score2)` pair where lower is better;
/// candidates are compared lexicographically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// Minimize the shorter leftover side, then the longer one.
    #[default]
    BestShortSideFit,
    /// Minimize the longer leftover side, then the shorter one.
    BestLongSideFit,
    /// Minimize leftover area of the free rect, then the shorter leftover side.
    BestAreaFit,
    /// Tetris-style: minimize the resulting top edge, then x.
    BottomLeft,
    /// Maximize contact with bin edges and already placed rects.
    ContactPoint,
}

impl Heuristic {
    pub const ALL: [Heuristic; 5] = [
        Heuristic::BestShortSideFit,
        Heuristic::BestLongSideFit,
        Heuristic::BestAreaFit,
        Heuristic::BottomLeft,
        Heuristic::ContactPoint,
    ];

    /// Short name as accepted by `FromStr`.
    pub fn short_name(&self) -> &'static str {
        match self {
            Heuristic::BestShortSideFit => "bssf",
            Heuristic::BestLongSideFit => "blsf",
            Heuristic::BestAreaFit => "baf",
            Heuristic::BottomLeft => "bl",
            Heuristic::ContactPoint => "cp",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Heuristic {
    type Err = AtlasError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" => Ok(Self::ContactPoint),
            other => Err(AtlasError::InvalidConfig(format!(
                "unknown heuristic '{other}' (expected bssf|blsf|baf|bl|cp)"
            ))),
        }
    }
}

/// Bin and placement settings for one packing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BinPackConfig {
    /// Page width in pixels.
    pub bin_width: u32,
    /// Page height in pixels.
    pub bin_height: u32,
    /// Allow 90° rotations where they score better (or are the only fit).
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
    #[serde(default)]
    pub heuristic: Heuristic,

    /// Abort with `TimeBudgetExceeded` once a run takes longer than this.
    /// None or 0 disables.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    /// Abort with `PageLimitExceeded` instead of opening more pages than this.
    #[serde(default)]
    pub max_pages: Option<usize>,
}

impl Default for BinPackConfig {
    fn default() -> Self {
        Self {
            bin_width: 4096,
            bin_height: 4096,
            allow_rotation: default_allow_rotation(),
            heuristic: Heuristic::default(),
            time_budget_ms: None,
            max_pages: None,
        }
    }
}

fn default_allow_rotation() -> bool {
    true
}

impl BinPackConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if a bin dimension is zero or `max_pages` is `Some(0)`.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.bin_width == 0 || self.bin_height == 0 {
            return Err(AtlasError::InvalidDimensions {
                width: self.bin_width,
                height: self.bin_height,
            });
        }
        if self.max_pages == Some(0) {
            return Err(AtlasError::InvalidConfig(
                "max_pages must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Area of one page in square pixels.
    pub fn bin_area(&self) -> u64 {
        self.bin_width as u64 * self.bin_height as u64
    }

    /// Create a fluent builder for `BinPackConfig`.
    pub fn builder() -> BinPackConfigBuilder {
        BinPackConfigBuilder::new()
    }
}

/// Builder for `BinPackConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct BinPackConfigBuilder {
    cfg: BinPackConfig,
}

impl BinPackConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: BinPackConfig::default(),
        }
    }
    pub fn with_bin_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.bin_width = w;
        self.cfg.bin_height = h;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn heuristic(mut self, v: Heuristic) -> Self {
        self.cfg.heuristic = v;
        self
    }
    pub fn time_budget_ms(mut self, v: Option<u64>) -> Self {
        self.cfg.time_budget_ms = v;
        self
    }
    pub fn max_pages(mut self, v: Option<usize>) -> Self {
        self.cfg.max_pages = v;
        self
    }
    pub fn build(self) -> BinPackConfig {
        self.cfg
    }
}
