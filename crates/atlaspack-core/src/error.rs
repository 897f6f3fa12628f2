use thiserror::Error;

/// An item that fits the empty bin in no permitted orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnplaceableItem {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for UnplaceableItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x{})", self.id, self.width, self.height)
    }
}

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Invalid bin dimensions: {width}x{height} (both must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid item '{id}': {width}x{height} (both must be > 0)")]
    InvalidItem { id: String, width: u32, height: u32 },
    #[error("Duplicate item id: {0}")]
    DuplicateId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{} item(s) cannot fit a {bin_width}x{bin_height} bin: {}", items.len(), join_items(items))]
    Unplaceable {
        items: Vec<UnplaceableItem>,
        bin_width: u32,
        bin_height: u32,
    },
    #[error("Engine invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Time budget of {budget_ms}ms exceeded after placing {placed}/{total} items")]
    TimeBudgetExceeded {
        budget_ms: u64,
        placed: usize,
        total: usize,
    },
    #[error("Page limit of {max_pages} exceeded after placing {placed}/{total} items")]
    PageLimitExceeded {
        max_pages: usize,
        placed: usize,
        total: usize,
    },
}

fn join_items(items: &[UnplaceableItem]) -> String {
    items
        .iter()
        .map(|it| it.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, AtlasError>;
