use crate::core::accessories;
use crate::core::layout;
use crate::core::resolver;
use crate::core::CatalogLookup;
use crate::domain::catalog::ProductMapping;
use crate::domain::model::{
    canonical_subtype, BambooKind, BoardCount, Estimate, Family, LayoutResult, LineItem, Material,
    Mounting, QuoteRequest, StakeSize,
};
use crate::utils::error::{CalcError, Result};
use crate::utils::numeric::round2;
use crate::utils::validation::validate_positive_f64;
use std::fmt;

/// Pipeline stages of a single estimate, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Resolving,
    Planning,
    Accessorizing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Resolving => "resolving",
            Stage::Planning => "planning",
            Stage::Accessorizing => "accessorizing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
struct ValidRequest {
    family: Family,
    subtype: String,
    thickness_mm: u32,
    length_m: f64,
    width_m: f64,
    color: String,
    mounting: Mounting,
    stake_size: StakeSize,
    bolt_stake: StakeSize,
}

impl TryFrom<&QuoteRequest> for ValidRequest {
    type Error = CalcError;

    fn try_from(request: &QuoteRequest) -> Result<Self> {
        validate_positive_f64("length_m", request.length_m)?;
        validate_positive_f64("width_m", request.width_m)?;
        if request.family.trim().is_empty() {
            return Err(CalcError::InvalidInput {
                message: "no material family chosen".to_string(),
            });
        }
        let family = request
            .family
            .parse::<Family>()
            .map_err(|message| CalcError::InvalidInput { message })?;

        Ok(Self {
            family,
            subtype: canonical_subtype(&request.subtype),
            thickness_mm: request.thickness_mm,
            length_m: request.length_m,
            width_m: request.width_m,
            color: request.color.trim().to_ascii_lowercase(),
            mounting: request.mounting,
            stake_size: StakeSize::from_tag(&request.stake_size),
            bolt_stake: StakeSize::from_tag_for_bolts(&request.stake_size),
        })
    }
}

/// Turns quote requests into shopping lists against one immutable catalog.
///
/// Holds no state besides the catalog, so a shared `Estimator` can serve any
/// number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Estimator<C: CatalogLookup> {
    catalog: C,
}

impl<C: CatalogLookup> Estimator<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn estimate(&self, request: &QuoteRequest) -> Result<Estimate> {
        tracing::trace!("stage: {}", Stage::Validating);
        let request = ValidRequest::try_from(request)?;
        let surface_m2 = round2(request.length_m * request.width_m);

        tracing::trace!("stage: {}", Stage::Resolving);
        let mapping = resolver::resolve(
            &self.catalog,
            request.family,
            request.thickness_mm,
            &request.color,
            &request.subtype,
        )
        .ok_or_else(|| CalcError::UnlinkedCombination {
            family: request.family.to_string(),
            subtype: request.subtype.clone(),
            thickness_mm: request.thickness_mm,
            color: request.color.clone(),
        })?;
        if !mapping.is_panel() && (mapping.width_mm == 0 || mapping.thickness_mm == 0) {
            return Err(CalcError::UnsupportedShape {
                mapping_id: mapping.id.clone(),
            });
        }

        tracing::trace!("stage: {}", Stage::Planning);
        let layout = layout::plan(mapping, request.length_m, request.width_m, surface_m2)?;
        let planning_failed = || CalcError::PlanningFailed {
            family: request.family.to_string(),
        };
        if layout.is_empty() {
            return Err(planning_failed());
        }
        let mut lines = board_lines(mapping, &layout);
        if lines.is_empty() {
            return Err(planning_failed());
        }

        tracing::trace!("stage: {}", Stage::Accessorizing);
        let material = mapping.material();
        if material != Material::Bamboo(BambooKind::Tile) {
            lines.extend(self.accessory_lines(&request, mapping, &layout, surface_m2)?);
        }

        tracing::trace!("stage: {}", Stage::Done);
        tracing::info!(
            "Estimated {} m² of '{}': {} line(s)",
            surface_m2,
            mapping.id,
            lines.len()
        );
        Ok(Estimate { surface_m2, lines })
    }

    /// Accessories in display order: beams, stakes, screws, bolts, clips, oil.
    fn accessory_lines(
        &self,
        request: &ValidRequest,
        mapping: &ProductMapping,
        layout: &LayoutResult,
        surface_m2: f64,
    ) -> Result<Vec<LineItem>> {
        let table = self.catalog.accessories();
        let family = request.family;
        let boards = layout.total_qty();
        let subtype = mapping
            .subtype
            .as_deref()
            .unwrap_or(request.subtype.as_str());
        let mut lines = Vec::new();

        let beams =
            accessories::beams(table, request.length_m, family, subtype, request.mounting)?;
        let beam_count = beams.as_ref().map_or(0, |b| b.count);
        if let Some(beams) = &beams {
            lines.push(beams.line.clone());
        }

        let stakes = match request.mounting {
            Mounting::Staked => accessories::stakes(
                table,
                family,
                beam_count,
                request.width_m,
                request.stake_size,
            )?,
            Mounting::FreeStanding => None,
        };
        if let Some(stakes) = &stakes {
            lines.push(stakes.line.clone());
        }

        if family == Family::Wood {
            lines.extend(accessories::screws(
                table,
                family,
                request.thickness_mm,
                boards,
                beam_count,
                layout.rows,
            )?);
        }

        if let Some(stakes) = &stakes {
            lines.extend(accessories::carriage_bolts(
                table,
                family,
                stakes,
                request.bolt_stake,
            ));
        }

        if matches!(family, Family::Bamboo | Family::Composite) {
            let herringbone = mapping.material() == Material::Bamboo(BambooKind::Herringbone);
            lines.extend(accessories::clips(
                table,
                family,
                herringbone,
                boards,
                beam_count,
                layout.rows,
            )?);
        }

        if family == Family::Bamboo {
            lines.extend(accessories::finishing_oil(table, family, surface_m2)?);
        }

        Ok(lines)
    }
}

/// One line per stock length (variable products) or a single line (simple products).
fn board_lines(mapping: &ProductMapping, layout: &LayoutResult) -> Vec<LineItem> {
    match &layout.boards {
        BoardCount::ByLength(by_length) => by_length
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .filter_map(|(length_mm, qty)| {
                let Some(variant_id) = mapping.variant_for(*length_mm) else {
                    tracing::warn!(
                        "'{}' has no orderable variant for {}mm, line skipped",
                        mapping.id,
                        length_mm
                    );
                    return None;
                };
                let summary = match mapping.family {
                    Family::Wood => format!(
                        "{} — {}× {} mm (rows: {}, plan: {})",
                        mapping.label, qty, length_mm, layout.rows, layout.explain
                    ),
                    _ => format!(
                        "{} — {}× {} mm (rows: {}, {})",
                        mapping.label, qty, length_mm, layout.rows, layout.explain
                    ),
                };
                Some(LineItem::variant(
                    mapping.product_id,
                    variant_id,
                    *qty,
                    summary,
                ))
            })
            .collect(),
        BoardCount::Uniform { length_mm, qty } => {
            let summary = match mapping.material() {
                Material::Bamboo(BambooKind::Herringbone) => format!(
                    "{} — {}× {} mm ({})",
                    mapping.label, qty, length_mm, layout.explain
                ),
                _ => format!(
                    "{} — {}× {} mm (rows: {}, {})",
                    mapping.label, qty, length_mm, layout.rows, layout.explain
                ),
            };
            vec![LineItem::simple(mapping.product_id, *qty, summary)]
        }
        BoardCount::Packs {
            packs,
            tiles_per_pack,
        } => vec![LineItem::simple(
            mapping.product_id,
            *packs,
            format!(
                "{} — {} pack(s) ({} tiles, {:.2} m² per pack)",
                mapping.label,
                packs,
                packs.saturating_mul(*tiles_per_pack),
                layout::TILE_PACK_AREA_M2
            ),
        )],
    }
}
