use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Top-level material category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    #[serde(alias = "hout")]
    Wood,
    #[serde(alias = "bamboe")]
    Bamboo,
    #[serde(alias = "composiet")]
    Composite,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Wood => "wood",
            Family::Bamboo => "bamboo",
            Family::Composite => "composite",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wood" | "hout" => Ok(Family::Wood),
            "bamboo" | "bamboe" => Ok(Family::Bamboo),
            "composite" | "composiet" => Ok(Family::Composite),
            other => Err(format!("unknown material family '{}'", other)),
        }
    }
}

/// Bamboo products are laid out in three unrelated ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BambooKind {
    Plank,
    Tile,
    Herringbone,
}

impl BambooKind {
    pub fn from_subtype(subtype: Option<&str>) -> Self {
        match subtype {
            Some(TILE_SUBTYPE) => BambooKind::Tile,
            Some(HERRINGBONE_SUBTYPE) => BambooKind::Herringbone,
            _ => BambooKind::Plank,
        }
    }
}

/// Planner dispatch key, derived from the resolved catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Wood,
    Composite,
    Bamboo(BambooKind),
}

pub const TILE_SUBTYPE: &str = "tile";
pub const HERRINGBONE_SUBTYPE: &str = "herringbone";

/// Lower-cases a sub-type tag and folds the shop's Dutch tags onto the English ones.
/// An empty tag stays empty.
pub fn canonical_subtype(raw: &str) -> String {
    let tag = raw.trim().to_ascii_lowercase();
    match tag.as_str() {
        "tegel" | "tiles" => TILE_SUBTYPE.to_string(),
        "visgraat" => HERRINGBONE_SUBTYPE.to_string(),
        "plank" | "vlonderplank" => "plank".to_string(),
        _ => tag,
    }
}

pub fn canonical_tag(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mounting {
    /// Beams rest on an existing floor, e.g. a balcony.
    #[default]
    FreeStanding,
    /// Beams are bolted to ground stakes.
    Staked,
}

// Parsed through `FromStr` so an empty CSV cell means free-standing.
impl<'de> Deserialize<'de> for Mounting {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Mounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mounting::FreeStanding => f.write_str("free-standing"),
            Mounting::Staked => f.write_str("staked"),
        }
    }
}

impl FromStr for Mounting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "free-standing" | "free_standing" | "none" => Ok(Mounting::FreeStanding),
            "staked" | "with" => Ok(Mounting::Staked),
            other => Err(format!("unknown mounting mode '{}'", other)),
        }
    }
}

/// Ground stake cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StakeSize {
    /// 40x40 mm
    #[default]
    #[serde(rename = "40x40")]
    S40,
    /// 50x50 mm
    #[serde(rename = "50x50")]
    S50,
}

impl StakeSize {
    /// Stake product selection: only a `50x50` tag picks the large stake.
    pub fn from_tag(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '×' { 'x' } else { c.to_ascii_lowercase() })
            .collect();
        if normalized == "50x50" {
            StakeSize::S50
        } else {
            StakeSize::S40
        }
    }

    /// Bolt sizing is looser: any tag mentioning 50 is measured as a 50 mm stake.
    pub fn from_tag_for_bolts(tag: &str) -> Self {
        if tag.contains("50") {
            StakeSize::S50
        } else {
            StakeSize::S40
        }
    }

    pub fn cross_section_mm(&self) -> u32 {
        match self {
            StakeSize::S40 => 40,
            StakeSize::S50 => 50,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            StakeSize::S40 => "40x40",
            StakeSize::S50 => "50x50",
        }
    }
}

impl fmt::Display for StakeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A raw quote request as it arrives from a form, a CSV row or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub thickness_mm: u32,
    pub length_m: f64,
    pub width_m: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub mounting: Mounting,
    #[serde(default)]
    pub stake_size: String,
}

impl QuoteRequest {
    pub fn new(family: impl Into<String>, length_m: f64, width_m: f64) -> Self {
        Self {
            family: family.into(),
            subtype: String::new(),
            thickness_mm: 0,
            length_m,
            width_m,
            color: String::new(),
            mounting: Mounting::FreeStanding,
            stake_size: String::new(),
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = subtype.into();
        self
    }

    pub fn with_thickness(mut self, thickness_mm: u32) -> Self {
        self.thickness_mm = thickness_mm;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn staked(mut self, stake_size: impl Into<String>) -> Self {
        self.mounting = Mounting::Staked;
        self.stake_size = stake_size.into();
        self
    }
}

/// Board counts produced by a layout planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCount {
    /// Variable products: stock length (mm) to number of boards, ascending by length.
    ByLength(BTreeMap<u32, u32>),
    /// Simple products sold in a single length.
    Uniform { length_mm: u32, qty: u32 },
    /// Panels sold per pack.
    Packs { packs: u32, tiles_per_pack: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutResult {
    pub boards: BoardCount,
    pub rows: u32,
    pub explain: String,
}

impl LayoutResult {
    pub fn empty(explain: impl Into<String>) -> Self {
        Self {
            boards: BoardCount::ByLength(BTreeMap::new()),
            rows: 0,
            explain: explain.into(),
        }
    }

    /// Boards (or packs) across every stock length.
    pub fn total_qty(&self) -> u32 {
        match &self.boards {
            // the planners reject tallies that overflow, so this never saturates
            BoardCount::ByLength(by_length) => {
                by_length.values().fold(0, |sum, qty| sum.saturating_add(*qty))
            }
            BoardCount::Uniform { qty, .. } => *qty,
            BoardCount::Packs { packs, .. } => *packs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_qty() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Simple,
    Variant,
}

/// One shopping-list line, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: LineKind,
    pub product_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<u64>,
    pub qty: u32,
    pub summary: String,
}

impl LineItem {
    pub fn simple(product_id: u64, qty: u32, summary: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Simple,
            product_id,
            variant_id: None,
            qty,
            summary: summary.into(),
        }
    }

    pub fn variant(product_id: u64, variant_id: u64, qty: u32, summary: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Variant,
            product_id,
            variant_id: Some(variant_id),
            qty,
            summary: summary.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub surface_m2: f64,
    pub lines: Vec<LineItem>,
}

/// What the transport layer sends back: either the estimate or `{ "error": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EstimateOutcome {
    Estimate(Estimate),
    Error { error: String },
}

impl EstimateOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, EstimateOutcome::Error { .. })
    }
}

impl From<crate::utils::error::Result<Estimate>> for EstimateOutcome {
    fn from(result: crate::utils::error::Result<Estimate>) -> Self {
        match result {
            Ok(estimate) => EstimateOutcome::Estimate(estimate),
            Err(e) => EstimateOutcome::Error {
                error: e.user_friendly_message(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRow {
    /// 1-based position of the request in the input file.
    pub row: usize,
    pub request: QuoteRequest,
    pub outcome: EstimateOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<BatchRow>,
}

impl BatchResult {
    pub fn error_count(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_error()).count()
    }
}
