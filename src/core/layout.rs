//! Board layout planning.
//!
//! Each family has its own way of turning a target rectangle into boards:
//!
//! - wood: best single fit, otherwise a 70/30 split with paired short pieces
//! - composite: best single fit, otherwise longest stock (70%) plus paired shortest (30%)
//! - bamboo planks: running metres over a fixed board length plus 3% waste
//! - bamboo herringbone: surface over piece area plus 3% or 5% waste
//! - bamboo tiles: packs of 0.54 m²
//!
//! An unusable catalog entry yields an empty result and the caller decides what
//! that means. Planners only fail when a count no longer fits a `u32`.

use crate::domain::catalog::ProductMapping;
use crate::domain::model::{BambooKind, BoardCount, LayoutResult, Material};
use crate::utils::error::Result;
use crate::utils::numeric::{add_counts, ceil_count, ceil_div, metres_to_mm, mul_counts};
use std::collections::BTreeMap;

pub const WOOD_SPACING_MM: u32 = 5;
pub const COMPOSITE_SPACING_MM: u32 = 5;
pub const BAMBOO_SPACING_MM: u32 = 6;

pub const BAMBOO_PLANK_WASTE: f64 = 1.03;
pub const DEFAULT_BAMBOO_BOARD_MM: u32 = 1860;

pub const DEFAULT_HERRINGBONE_PIECE_MM: u32 = 700;
pub const HERRINGBONE_SMALL_SURFACE_M2: f64 = 15.0;
pub const HERRINGBONE_SMALL_WASTE: f64 = 1.05;
pub const HERRINGBONE_LARGE_WASTE: f64 = 1.03;

pub const TILE_PACK_AREA_M2: f64 = 0.54;
pub const TILES_PER_PACK: u32 = 6;

const LONG_SHARE: f64 = 0.7;
const SHORT_SHARE: f64 = 0.3;

/// What to do when no stock length reaches the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Settle for the longest stock length.
    OrLongest,
    /// Report no fit, so the caller can try another cutting plan.
    Strict,
}

/// Smallest stock length (mm) that is at least `target_m` long.
///
/// `lengths_mm` must be sorted ascending. The target is rounded to whole
/// millimetres before comparing.
pub fn smallest_fitting(target_m: f64, lengths_mm: &[u32], fit: Fit) -> Option<u32> {
    let target_mm = metres_to_mm(target_m);
    lengths_mm
        .iter()
        .copied()
        .find(|len| *len >= target_mm)
        .or_else(|| match fit {
            Fit::OrLongest => lengths_mm.last().copied(),
            Fit::Strict => None,
        })
}

/// Number of board rows side by side across `width_m`.
pub fn row_count(width_m: f64, board_width_mm: u32, spacing_mm: u32) -> Result<u32> {
    let module_m = (board_width_mm as f64 + spacing_mm as f64) / 1000.0;
    ceil_count(width_m / module_m)
}

/// Per-call accumulator; lengths picked by several branches add up.
///
/// `total` tracks the grand total so that neither a single length nor the sum
/// of all lengths can overflow.
#[derive(Debug, Default)]
struct LengthTally {
    by_length: BTreeMap<u32, u32>,
    total: u32,
    notes: Vec<String>,
}

impl LengthTally {
    fn add(&mut self, length_mm: u32, qty: u32) -> Result<()> {
        if qty == 0 {
            return Ok(());
        }
        self.total = add_counts(self.total, qty)?;
        let entry = self.by_length.entry(length_mm).or_insert(0);
        *entry = add_counts(*entry, qty)?;
        Ok(())
    }

    fn note(&mut self, note: String) {
        self.notes.push(note);
    }

    fn finish(self, rows: u32) -> LayoutResult {
        LayoutResult {
            boards: BoardCount::ByLength(self.by_length),
            rows,
            explain: self.notes.join(" | "),
        }
    }
}

pub fn plan_wood(mapping: &ProductMapping, len_m: f64, wid_m: f64) -> Result<LayoutResult> {
    let lengths = mapping.lengths_mm();
    let Some(&longest_mm) = lengths.last() else {
        return Ok(LayoutResult::empty("Invalid board configuration."));
    };
    if mapping.width_mm == 0 {
        return Ok(LayoutResult::empty("Invalid board configuration."));
    }

    let longest_m = longest_mm as f64 / 1000.0;
    let rows = row_count(wid_m, mapping.width_mm, WOOD_SPACING_MM)?;
    let mut tally = LengthTally::default();

    if len_m <= longest_m {
        let best_fit = smallest_fitting(len_m, &lengths, Fit::OrLongest).unwrap_or(longest_mm);
        tally.add(best_fit, rows)?;
        tally.note(format!(
            "Short deck (≤ {:.2}m): all from one length ({}mm)",
            longest_m, best_fit
        ));
        return Ok(tally.finish(rows));
    }

    let mut remaining_m = len_m;
    if remaining_m > 2.0 * longest_m {
        // whole longest boards per row until two boards cover the rest
        let full = ceil_count((len_m - 2.0 * longest_m) / longest_m)?;
        tally.add(longest_mm, mul_counts(rows, full)?)?;
        remaining_m = len_m - full as f64 * longest_m;
        tally.note(format!(
            "Length > 2x max: {}x {}mm per row, remainder {:.2}m",
            full, longest_mm, remaining_m
        ));
    }

    split_long_short(&mut tally, &lengths, longest_mm, remaining_m, rows)?;
    Ok(tally.finish(rows))
}

/// The 70/30 rule for a run between one and two longest boards.
fn split_long_short(
    tally: &mut LengthTally,
    lengths: &[u32],
    longest_mm: u32,
    len_m: f64,
    rows: u32,
) -> Result<()> {
    let target_mm = metres_to_mm(len_m);
    let ideal_long_mm = target_mm as f64 * LONG_SHARE;

    if ideal_long_mm > longest_mm as f64 {
        // 70% does not fit in one board: take the longest and cover the rest.
        tally.add(longest_mm, rows)?;
        let remainder_mm = target_mm.saturating_sub(longest_mm);
        if remainder_mm == 0 {
            return Ok(());
        }

        let pair_target_m = remainder_mm as f64 * 2.0 / 1000.0;
        match smallest_fitting(pair_target_m, lengths, Fit::Strict) {
            Some(pair_mm) => {
                tally.add(pair_mm, ceil_div(rows, 2))?;
                tally.note(format!(
                    "Max strategy: 1x {}mm + remainder (pairs in {}mm)",
                    longest_mm, pair_mm
                ));
            }
            None => {
                let single_mm =
                    smallest_fitting(remainder_mm as f64 / 1000.0, lengths, Fit::OrLongest)
                        .unwrap_or(longest_mm);
                tally.add(single_mm, rows)?;
                tally.note(format!(
                    "Max strategy: 1x {}mm + remainder (single {}mm)",
                    longest_mm, single_mm
                ));
            }
        }
        return Ok(());
    }

    let long_m = len_m * LONG_SHARE;
    let short_m = len_m * SHORT_SHARE;

    let long_mm = smallest_fitting(long_m, lengths, Fit::OrLongest).unwrap_or(longest_mm);
    tally.add(long_mm, rows)?;

    match smallest_fitting(2.0 * short_m, lengths, Fit::Strict) {
        Some(pair_mm) => {
            tally.add(pair_mm, ceil_div(rows, 2))?;
            tally.note(format!(
                "70/30: 70%({}mm) + 2x30% (pairs {}mm)",
                long_mm, pair_mm
            ));
        }
        None => {
            let short_mm =
                smallest_fitting(short_m, lengths, Fit::OrLongest).unwrap_or(longest_mm);
            tally.add(short_mm, rows)?;
            tally.note(format!("70/30: 70%({}mm) + 30%({}mm)", long_mm, short_mm));
        }
    }
    Ok(())
}

/// Composite ships in a short and a long length; strict min/max are used.
pub fn plan_composite(mapping: &ProductMapping, len_m: f64, wid_m: f64) -> Result<LayoutResult> {
    let lengths = mapping.lengths_mm();
    let (Some(&shortest_mm), Some(&longest_mm)) = (lengths.first(), lengths.last()) else {
        return Ok(LayoutResult::empty("Invalid composite configuration."));
    };
    if mapping.width_mm == 0 {
        return Ok(LayoutResult::empty("Invalid composite configuration."));
    }

    let rows = row_count(wid_m, mapping.width_mm, COMPOSITE_SPACING_MM)?;
    let longest_m = longest_mm as f64 / 1000.0;
    let mut tally = LengthTally::default();

    if len_m <= longest_m {
        let best_fit = smallest_fitting(len_m, &lengths, Fit::OrLongest).unwrap_or(longest_mm);
        tally.add(best_fit, rows)?;
        tally.note(format!(
            "Length {:.2}m ≤ {:.2}m → only {}mm × {}",
            len_m, longest_m, best_fit, rows
        ));
        return Ok(tally.finish(rows));
    }

    let pairs = ceil_div(rows, 2);
    tally.add(longest_mm, rows)?;
    tally.note(format!(
        "70%: {:.2}m → {}mm × {}",
        len_m * LONG_SHARE,
        longest_mm,
        rows
    ));
    tally.add(shortest_mm, pairs)?;
    tally.note(format!(
        "30%: {:.2}m → {}mm × {} (pairs)",
        len_m * SHORT_SHARE,
        shortest_mm,
        pairs
    ));
    Ok(tally.finish(rows))
}

pub fn plan_bamboo_planks(
    mapping: &ProductMapping,
    len_m: f64,
    wid_m: f64,
) -> Result<LayoutResult> {
    if mapping.width_mm == 0 {
        return Ok(LayoutResult::empty("Invalid bamboo configuration."));
    }

    let rows = row_count(wid_m, mapping.width_mm, BAMBOO_SPACING_MM)?;
    let row_width_m = (mapping.width_mm as f64 + BAMBOO_SPACING_MM as f64) / 1000.0;
    let board_len_mm = mapping.product_length_mm.unwrap_or(DEFAULT_BAMBOO_BOARD_MM);
    let board_len_m = board_len_mm as f64 / 1000.0;

    // Waste is added after the raw division, not per row.
    let total_run_m = (len_m * wid_m) / row_width_m;
    let boards = total_run_m / board_len_m;
    let qty = ceil_count(boards * BAMBOO_PLANK_WASTE)?;

    Ok(LayoutResult {
        boards: BoardCount::Uniform {
            length_mm: board_len_mm,
            qty,
        },
        rows,
        explain: format!(
            "row width: {:.3}m, rows: {}, total running m: {:.2}m, board: {:.2}m, +3% saw waste",
            row_width_m, rows, total_run_m, board_len_m
        ),
    })
}

pub fn plan_herringbone(mapping: &ProductMapping, surface_m2: f64) -> Result<LayoutResult> {
    let piece_mm = mapping
        .product_length_mm
        .unwrap_or(DEFAULT_HERRINGBONE_PIECE_MM);
    if mapping.width_mm == 0 || piece_mm == 0 {
        return Ok(LayoutResult::empty("Invalid herringbone configuration."));
    }

    let board_area_m2 = (mapping.width_mm as f64 / 1000.0) * (piece_mm as f64 / 1000.0);
    let net_boards = surface_m2 / board_area_m2;
    let (waste, waste_pct) = if surface_m2 < HERRINGBONE_SMALL_SURFACE_M2 {
        (HERRINGBONE_SMALL_WASTE, 5)
    } else {
        (HERRINGBONE_LARGE_WASTE, 3)
    };
    let qty = ceil_count(net_boards * waste)?;

    Ok(LayoutResult {
        boards: BoardCount::Uniform {
            length_mm: piece_mm,
            qty,
        },
        rows: 0,
        explain: format!(
            "herringbone: {:.4} m² per board, {:.2} boards net, +{}% waste",
            board_area_m2, net_boards, waste_pct
        ),
    })
}

pub fn plan_tiles(surface_m2: f64) -> Result<LayoutResult> {
    let packs = ceil_count(surface_m2 / TILE_PACK_AREA_M2)?;
    let tiles = mul_counts(packs, TILES_PER_PACK)?;
    Ok(LayoutResult {
        boards: BoardCount::Packs {
            packs,
            tiles_per_pack: TILES_PER_PACK,
        },
        rows: 0,
        explain: format!(
            "{} packs × {:.2} m² ({} tiles)",
            packs, TILE_PACK_AREA_M2, tiles
        ),
    })
}

/// Dispatches to the planner for the mapping's material.
pub fn plan(
    mapping: &ProductMapping,
    len_m: f64,
    wid_m: f64,
    surface_m2: f64,
) -> Result<LayoutResult> {
    let layout = match mapping.material() {
        Material::Wood => plan_wood(mapping, len_m, wid_m)?,
        Material::Composite => plan_composite(mapping, len_m, wid_m)?,
        Material::Bamboo(BambooKind::Plank) => plan_bamboo_planks(mapping, len_m, wid_m)?,
        Material::Bamboo(BambooKind::Herringbone) => plan_herringbone(mapping, surface_m2)?,
        Material::Bamboo(BambooKind::Tile) => plan_tiles(surface_m2)?,
    };
    tracing::debug!(
        "Layout for '{}': {} boards over {} rows ({})",
        mapping.id,
        layout.total_qty(),
        layout.rows,
        layout.explain
    );
    Ok(layout)
}
