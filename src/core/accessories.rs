//! Accessory rules: beams, stakes, screws, carriage bolts, clips and oil.
//!
//! Every rule is a pure function of quantities the layout already produced.
//! A rule that cannot apply (zero input, no catalog entry, wrong family)
//! returns `None` or an empty list. Rules only fail when a count overflows.

use crate::domain::catalog::AccessoryTable;
use crate::domain::model::{Family, LineItem, Mounting, StakeSize};
use crate::utils::error::Result;
use crate::utils::numeric::{add_counts, ceil_count, ceil_div, mul_counts, round_up_to};

/// Beams are laid every half metre along the deck, plus one closing beam.
pub const BEAM_SPACING_M: f64 = 0.5;
/// Stakes are driven every metre across each beam, plus one at the end.
pub const STAKE_SPACING_M: f64 = 1.0;

pub const SCREWS_PER_CROSSING: u32 = 2;
pub const SCREWS_PER_JOINT: u32 = 2;
pub const SCREWS_PER_BOX: u32 = 200;

pub const ASSUMED_BEAM_THICKNESS_MM: u32 = 45;
pub const BOLT_CLEARANCE_MM: u32 = 15;
pub const BOLT_LENGTH_STEP_MM: u32 = 10;
pub const BOLTS_PER_BOX: u32 = 25;

pub const CLIPS_PER_BOX: u32 = 100;
pub const CLIPS_PER_HERRINGBONE_BOARD: u32 = 4;

pub const OIL_COVERAGE_M2: f64 = 15.0;
pub const SMALL_CONTAINERS_PER_LARGE: u32 = 3;

pub fn beam_count(len_m: f64) -> Result<u32> {
    if len_m <= 0.0 {
        return Ok(0);
    }
    add_counts(ceil_count(len_m / BEAM_SPACING_M)?, 1)
}

pub fn stake_count(beams: u32, wid_m: f64) -> Result<u32> {
    let per_beam = add_counts(ceil_count(wid_m / STAKE_SPACING_M)?, 1)?;
    mul_counts(beams, per_beam)
}

/// Screws needed for a wooden deck, before boxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrewTally {
    /// Two screws where each row crosses each beam.
    pub base: u32,
    /// Two extra screws per butt joint, i.e. per board beyond the first in a row.
    pub joint: u32,
}

impl ScrewTally {
    /// Fails when the screw total would not fit a `u32`.
    pub fn new(rows: u32, beams: u32, boards: u32) -> Result<Self> {
        let tally = Self {
            base: mul_counts(mul_counts(rows, beams)?, SCREWS_PER_CROSSING)?,
            joint: mul_counts(boards.saturating_sub(rows), SCREWS_PER_JOINT)?,
        };
        add_counts(tally.base, tally.joint)?;
        Ok(tally)
    }

    pub fn total(&self) -> u32 {
        self.base.saturating_add(self.joint)
    }

    pub fn boxes(&self) -> u32 {
        ceil_div(self.total(), SCREWS_PER_BOX)
    }
}

/// Stake + beam + clearance, rounded up to the next 10 mm.
pub fn bolt_length_mm(stake: StakeSize) -> u32 {
    round_up_to(
        stake.cross_section_mm() + ASSUMED_BEAM_THICKNESS_MM + BOLT_CLEARANCE_MM,
        BOLT_LENGTH_STEP_MM,
    )
}

/// `(large, small)` oil containers for the given surface.
pub fn oil_containers(surface_m2: f64) -> Result<(u32, u32)> {
    let small = ceil_count(surface_m2 / OIL_COVERAGE_M2)?;
    Ok((
        small / SMALL_CONTAINERS_PER_LARGE,
        small % SMALL_CONTAINERS_PER_LARGE,
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beams {
    pub count: u32,
    pub line: LineItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stakes {
    pub count: u32,
    pub line: LineItem,
}

pub fn beams(
    table: &AccessoryTable,
    len_m: f64,
    family: Family,
    subtype: &str,
    mounting: Mounting,
) -> Result<Option<Beams>> {
    let count = beam_count(len_m)?;
    if count == 0 {
        return Ok(None);
    }
    let Some(config) = table.beams.as_ref() else {
        tracing::warn!("No beam products in the catalog, skipping beams");
        return Ok(None);
    };
    let Some(rule) = config.select(mounting, family, subtype) else {
        tracing::warn!(
            "No beam rule matches {}/{}/{}, skipping beams",
            mounting,
            family,
            subtype
        );
        return Ok(None);
    };
    if rule.product_id == 0 {
        return Ok(None);
    }

    Ok(Some(Beams {
        count,
        line: LineItem::simple(
            rule.product_id,
            count,
            format!("{}: {} pcs — {}", config.label, count, rule.context),
        ),
    }))
}

pub fn stakes(
    table: &AccessoryTable,
    family: Family,
    beam_count: u32,
    wid_m: f64,
    size: StakeSize,
) -> Result<Option<Stakes>> {
    if beam_count == 0 || wid_m <= 0.0 {
        return Ok(None);
    }
    let Some(config) = table.stakes.as_ref() else {
        return Ok(None);
    };
    let Some(product_id) = config.product_for(family, size) else {
        tracing::warn!("No {} stake product in the catalog, skipping stakes", size);
        return Ok(None);
    };

    let count = stake_count(beam_count, wid_m)?;
    Ok(Some(Stakes {
        count,
        line: LineItem::simple(
            product_id,
            count,
            format!("{}: {} pcs — {} mm", config.label, count, size),
        ),
    }))
}

pub fn screws(
    table: &AccessoryTable,
    family: Family,
    thickness_mm: u32,
    boards: u32,
    beams: u32,
    rows: u32,
) -> Result<Option<LineItem>> {
    if boards == 0 || beams == 0 {
        return Ok(None);
    }
    let Some(config) = table.screws.as_ref().filter(|s| s.applies_to(family)) else {
        return Ok(None);
    };
    let Some(gauge) = config.gauge_for(thickness_mm).filter(|g| g.variant_id > 0) else {
        return Ok(None);
    };

    let tally = ScrewTally::new(rows, beams, boards)?;
    let boxes = tally.boxes();
    Ok(Some(LineItem::variant(
        config.product_id,
        gauge.variant_id,
        boxes,
        format!(
            "{} — {} box(es) ({}, total {} screws: {} base + {} joint)",
            config.label,
            boxes,
            gauge.gauge,
            tally.total(),
            tally.base,
            tally.joint
        ),
    )))
}

/// `bolt_size` is the stake as measured for the bolt, which can differ from
/// the stake product that was ordered.
pub fn carriage_bolts(
    table: &AccessoryTable,
    family: Family,
    stakes: &Stakes,
    bolt_size: StakeSize,
) -> Option<LineItem> {
    if stakes.count == 0 {
        return None;
    }
    let config = table.bolts.as_ref().filter(|b| b.applies_to(family))?;

    let length_mm = bolt_length_mm(bolt_size);
    let boxes = ceil_div(stakes.count, BOLTS_PER_BOX);
    Some(LineItem::simple(
        config.product_id,
        boxes,
        format!(
            "{} — {} box(es) ({}mm [stake {}+beam {}+{}], {} stakes)",
            config.label,
            boxes,
            length_mm,
            bolt_size.cross_section_mm(),
            ASSUMED_BEAM_THICKNESS_MM,
            BOLT_CLEARANCE_MM,
            stakes.count
        ),
    ))
}

/// Mounting clips plus, for straight boards, one start clip per beam.
pub fn clips(
    table: &AccessoryTable,
    family: Family,
    herringbone: bool,
    boards: u32,
    beams: u32,
    rows: u32,
) -> Result<Vec<LineItem>> {
    let mut lines = Vec::new();
    if boards == 0 || beams == 0 {
        return Ok(lines);
    }

    if let Some(config) = table.clips.as_ref().filter(|c| c.applies_to(family)) {
        let (total, detail) = if herringbone {
            let total = mul_counts(boards, CLIPS_PER_HERRINGBONE_BOARD)?;
            (
                total,
                format!(
                    "herringbone clips: {} boards x {} = {} pcs",
                    boards, CLIPS_PER_HERRINGBONE_BOARD, total
                ),
            )
        } else {
            let total = mul_counts(rows, beams)?;
            (
                total,
                format!("clips: {} rows x {} beams = {} pcs", rows, beams, total),
            )
        };
        let boxes = ceil_div(total, CLIPS_PER_BOX);
        if boxes > 0 {
            lines.push(LineItem::simple(
                config.product_id,
                boxes,
                format!("{} — {} box(es) ({})", config.label, boxes, detail),
            ));
        }
    }

    if !herringbone {
        if let Some(config) = table.start_clips.as_ref().filter(|c| c.applies_to(family)) {
            lines.push(LineItem::simple(
                config.product_id,
                beams,
                format!("{} — {} pcs (1 per beam)", config.label, beams),
            ));
        }
    }

    Ok(lines)
}

/// Large containers first, then the small ones left over.
pub fn finishing_oil(
    table: &AccessoryTable,
    family: Family,
    surface_m2: f64,
) -> Result<Vec<LineItem>> {
    let Some(config) = table.oil.as_ref().filter(|o| o.applies_to(family)) else {
        return Ok(Vec::new());
    };

    let (large, small) = oil_containers(surface_m2)?;
    let lines = [(large, &config.large), (small, &config.small)]
        .into_iter()
        .filter(|(qty, container)| *qty > 0 && container.product_id > 0)
        .map(|(qty, container)| {
            LineItem::simple(
                container.product_id,
                qty,
                format!("{} — {}× {}", config.label, qty, container.size),
            )
        })
        .collect();
    Ok(lines)
}
