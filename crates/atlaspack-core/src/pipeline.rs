use crate::config::BinPackConfig;
use crate::error::{AtlasError, Result, UnplaceableItem};
use crate::model::{Atlas, Item, Meta, Page, Placement};
use crate::packer::maxrects::fits_bin;
use crate::packer::{GreedyFiller, MaxRectsBin, resolve_rotation};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, instrument, trace};

#[instrument(skip_all, fields(items = items.len(), heuristic = %cfg.heuristic))]
/// Packs `items` into as few `bin_width x bin_height` pages as the greedy
/// global-best MaxRects loop achieves.
///
/// Notes:
/// - Items that cannot fit an empty page in any permitted orientation are
///   reported together as `Unplaceable` before any page is opened.
/// - A page is closed once no pending item fits on it; the items left over
///   stay pending for the next page.
/// - Input order only matters for tie-breaking, so results are deterministic.
pub fn pack(items: Vec<Item>, cfg: BinPackConfig) -> Result<Atlas> {
    cfg.validate()?;
    validate_items(&items)?;

    let unplaceable = find_unplaceable(&items, &cfg);
    if !unplaceable.is_empty() {
        return Err(AtlasError::Unplaceable {
            items: unplaceable,
            bin_width: cfg.bin_width,
            bin_height: cfg.bin_height,
        });
    }

    let total = items.len();
    let filler = GreedyFiller::new(cfg.heuristic);
    let budget_ms = cfg.time_budget_ms.filter(|&ms| ms > 0);
    let start = Instant::now();

    let mut pending = items;
    let mut pages: Vec<Page> = Vec::new();

    while !pending.is_empty() {
        let page_id = pages.len();
        if let Some(max_pages) = cfg.max_pages {
            if page_id >= max_pages {
                return Err(AtlasError::PageLimitExceeded {
                    max_pages,
                    placed: total - pending.len(),
                    total,
                });
            }
        }

        let mut bin = MaxRectsBin::new(cfg.bin_width, cfg.bin_height, cfg.allow_rotation);
        let mut placements: Vec<Placement> = Vec::new();
        debug!(page = page_id, pending = pending.len(), "opened page");

        loop {
            if let Some(budget_ms) = budget_ms {
                if start.elapsed().as_millis() as u64 > budget_ms {
                    return Err(AtlasError::TimeBudgetExceeded {
                        budget_ms,
                        placed: total - pending.len(),
                        total,
                    });
                }
            }
            let Some((idx, rect)) = filler.next_placement(&bin, &pending) else {
                break;
            };
            bin.commit(rect)?;
            let item = pending.remove(idx);
            let rotated = resolve_rotation(&item, &rect);
            trace!(id = %item.id, page = page_id, ?rect, rotated, "placed");
            placements.push(Placement {
                id: item.id,
                page: page_id,
                rect,
                rotated,
            });
        }

        if placements.is_empty() {
            // every pending item was checked against an empty page above
            return Err(AtlasError::InvariantViolation(format!(
                "fresh page {page_id} accepted none of {} pending items",
                pending.len()
            )));
        }

        let occupancy = bin.occupancy();
        debug!(
            page = page_id,
            placed = placements.len(),
            free_rects = bin.free_rects().len(),
            occupancy = format!("{:.2}%", occupancy * 100.0),
            "closed page"
        );
        pages.push(Page {
            id: page_id,
            width: cfg.bin_width,
            height: cfg.bin_height,
            placements,
            occupancy,
        });
    }

    Ok(Atlas {
        pages,
        meta: Meta::from_config(&cfg),
    })
}

/// Packs `(key, width, height)` tuples. See [`pack`].
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: BinPackConfig,
) -> Result<Atlas> {
    let items = inputs
        .into_iter()
        .map(|(k, w, h)| Item::new(k, w, h))
        .collect();
    pack(items, cfg)
}

/// True if `item` fits an empty bin in a permitted orientation.
pub fn is_placeable(item: &Item, cfg: &BinPackConfig) -> bool {
    fits_bin(
        cfg.bin_width,
        cfg.bin_height,
        cfg.allow_rotation,
        item.width,
        item.height,
    )
}

/// Lists every item that can never be placed with `cfg`.
pub fn find_unplaceable(items: &[Item], cfg: &BinPackConfig) -> Vec<UnplaceableItem> {
    items
        .iter()
        .filter(|it| !is_placeable(it, cfg))
        .map(|it| UnplaceableItem {
            id: it.id.clone(),
            width: it.width,
            height: it.height,
        })
        .collect()
}

/// Splits `items` into those that fit an empty bin and those that never will,
/// so a caller can skip oversize items instead of failing the run.
pub fn partition_placeable(
    items: Vec<Item>,
    cfg: &BinPackConfig,
) -> (Vec<Item>, Vec<UnplaceableItem>) {
    let mut keep = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for it in items {
        if is_placeable(&it, cfg) {
            keep.push(it);
        } else {
            rejected.push(UnplaceableItem {
                id: it.id,
                width: it.width,
                height: it.height,
            });
        }
    }
    (keep, rejected)
}

fn validate_items(items: &[Item]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    for it in items {
        if it.width == 0 || it.height == 0 {
            return Err(AtlasError::InvalidItem {
                id: it.id.clone(),
                width: it.width,
                height: it.height,
            });
        }
        if !seen.insert(it.id.as_str()) {
            return Err(AtlasError::DuplicateId(it.id.clone()));
        }
    }
    Ok(())
}
