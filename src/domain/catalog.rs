use crate::domain::model::{
    canonical_subtype, BambooKind, Family, Material, Mounting, StakeSize, TILE_SUBTYPE,
};
use crate::domain::ports::CatalogLookup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A deck-board product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMapping {
    pub id: String,
    pub family: Family,
    /// Canonical sub-type tag (species for wood, plank/tile/herringbone for bamboo).
    pub subtype: Option<String>,
    pub color: Option<String>,
    pub label: String,
    pub width_mm: u32,
    /// 0 for panel products.
    pub thickness_mm: u32,
    pub product_id: u64,
    /// Stock length (mm) to order-line variant id. Empty for simple products.
    pub stock_lengths: BTreeMap<u32, u64>,
    /// Fixed length of simple products (bamboo boards, herringbone pieces).
    pub product_length_mm: Option<u32>,
}

impl ProductMapping {
    pub fn is_panel(&self) -> bool {
        self.subtype.as_deref() == Some(TILE_SUBTYPE)
    }

    pub fn material(&self) -> Material {
        match self.family {
            Family::Wood => Material::Wood,
            Family::Composite => Material::Composite,
            Family::Bamboo => Material::Bamboo(BambooKind::from_subtype(self.subtype.as_deref())),
        }
    }

    /// Stock lengths in ascending order.
    pub fn lengths_mm(&self) -> Vec<u32> {
        self.stock_lengths.keys().copied().collect()
    }

    pub fn variant_for(&self, length_mm: u32) -> Option<u64> {
        self.stock_lengths
            .get(&length_mm)
            .copied()
            .filter(|id| *id > 0)
    }
}

fn applies(applicable: &[Family], family: Family) -> bool {
    applicable.is_empty() || applicable.contains(&family)
}

/// An accessory sold as a single simple product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAccessory {
    pub label: String,
    pub product_id: u64,
    #[serde(default)]
    pub applicable: Vec<Family>,
}

impl SimpleAccessory {
    pub fn applies_to(&self, family: Family) -> bool {
        self.product_id > 0 && applies(&self.applicable, family)
    }
}

/// One row of the beam selection table. Empty matchers match anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamRule {
    #[serde(default)]
    pub mounting: Option<Mounting>,
    #[serde(default)]
    pub family: Option<Family>,
    #[serde(default)]
    pub subtype: Option<String>,
    pub product_id: u64,
    pub context: String,
}

impl BeamRule {
    pub fn matches(&self, mounting: Mounting, family: Family, subtype: &str) -> bool {
        self.mounting.is_none_or(|m| m == mounting)
            && self.family.is_none_or(|f| f == family)
            && self
                .subtype
                .as_deref()
                .is_none_or(|s| canonical_subtype(s) == subtype)
    }

    pub fn is_default(&self) -> bool {
        self.mounting.is_none() && self.family.is_none() && self.subtype.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamAccessory {
    pub label: String,
    #[serde(default)]
    pub applicable: Vec<Family>,
    /// Evaluated top to bottom, first match wins.
    pub rules: Vec<BeamRule>,
}

impl BeamAccessory {
    pub fn select(&self, mounting: Mounting, family: Family, subtype: &str) -> Option<&BeamRule> {
        if !applies(&self.applicable, family) {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(mounting, family, subtype))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeProduct {
    pub size: StakeSize,
    pub product_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeAccessory {
    pub label: String,
    #[serde(default)]
    pub applicable: Vec<Family>,
    pub products: Vec<StakeProduct>,
}

impl StakeAccessory {
    pub fn product_for(&self, family: Family, size: StakeSize) -> Option<u64> {
        if !applies(&self.applicable, family) {
            return None;
        }
        self.products
            .iter()
            .find(|p| p.size == size)
            .map(|p| p.product_id)
            .filter(|id| *id > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrewGauge {
    /// Board thickness this gauge is meant for; `None` marks the default gauge.
    #[serde(default)]
    pub thickness_mm: Option<u32>,
    pub gauge: String,
    pub variant_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrewAccessory {
    pub label: String,
    pub product_id: u64,
    #[serde(default)]
    pub applicable: Vec<Family>,
    pub gauges: Vec<ScrewGauge>,
}

impl ScrewAccessory {
    pub fn applies_to(&self, family: Family) -> bool {
        self.product_id > 0 && applies(&self.applicable, family)
    }

    /// Exact thickness match first, then the default gauge.
    pub fn gauge_for(&self, thickness_mm: u32) -> Option<&ScrewGauge> {
        self.gauges
            .iter()
            .find(|g| g.thickness_mm == Some(thickness_mm))
            .or_else(|| self.gauges.iter().find(|g| g.thickness_mm.is_none()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OilContainer {
    pub product_id: u64,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OilAccessory {
    pub label: String,
    #[serde(default)]
    pub applicable: Vec<Family>,
    pub large: OilContainer,
    pub small: OilContainer,
}

impl OilAccessory {
    pub fn applies_to(&self, family: Family) -> bool {
        applies(&self.applicable, family)
    }
}

/// Accessory products keyed by role. A missing entry silently drops that line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryTable {
    #[serde(default)]
    pub beams: Option<BeamAccessory>,
    #[serde(default)]
    pub stakes: Option<StakeAccessory>,
    #[serde(default)]
    pub screws: Option<ScrewAccessory>,
    #[serde(default)]
    pub bolts: Option<SimpleAccessory>,
    #[serde(default)]
    pub clips: Option<SimpleAccessory>,
    #[serde(default)]
    pub start_clips: Option<SimpleAccessory>,
    #[serde(default)]
    pub oil: Option<OilAccessory>,
}

/// The immutable product catalog. Mappings keep their authored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    mappings: Vec<ProductMapping>,
    accessories: AccessoryTable,
}

impl Catalog {
    pub fn new(mappings: Vec<ProductMapping>, accessories: AccessoryTable) -> Self {
        Self {
            mappings,
            accessories,
        }
    }
}

impl CatalogLookup for Catalog {
    fn mappings(&self) -> &[ProductMapping] {
        &self.mappings
    }

    fn accessories(&self) -> &AccessoryTable {
        &self.accessories
    }
}
