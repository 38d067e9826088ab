use crate::domain::catalog::{AccessoryTable, Catalog, ProductMapping};
use crate::domain::model::{canonical_subtype, canonical_tag, Family};
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_product_id, validate_unique, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Catalog shipped with the binary.
pub const DEFAULT_CATALOG: &str = include_str!("default_catalog.toml");

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
    #[serde(default)]
    pub accessories: AccessoryTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub id: String,
    pub family: Family,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub label: String,
    pub width_mm: u32,
    #[serde(default)]
    pub thickness_mm: u32,
    pub product_id: u64,
    #[serde(default)]
    pub stock_lengths: Vec<StockLengthConfig>,
    #[serde(default)]
    pub product_length_mm: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLengthConfig {
    pub length_mm: u32,
    /// 0 keeps the length in the layout but leaves it off the order.
    pub variant_id: u64,
}

fn non_empty(value: Option<String>, canonical: fn(&str) -> String) -> Option<String> {
    value.map(|v| canonical(&v)).filter(|v| !v.is_empty())
}

impl CatalogConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CatalogConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.mappings.is_empty() {
            return Err(CalcError::MissingConfigError {
                field: "mappings".to_string(),
            });
        }

        validate_unique("mappings.id", self.mappings.iter().map(|m| &m.id))?;

        for mapping in &self.mappings {
            let field = |name: &str| format!("mappings.{}.{}", mapping.id, name);

            validate_non_empty_string("mappings.id", &mapping.id)?;
            validate_non_empty_string(&field("label"), &mapping.label)?;
            validate_product_id(&field("product_id"), mapping.product_id)?;
            validate_unique(
                &field("stock_lengths"),
                mapping.stock_lengths.iter().map(|s| &s.length_mm),
            )?;

            if let Some(stock) = mapping.stock_lengths.iter().find(|s| s.length_mm == 0) {
                return Err(CalcError::InvalidConfigValueError {
                    field: field("stock_lengths"),
                    value: stock.length_mm.to_string(),
                    reason: "Stock length must be longer than 0 mm".to_string(),
                });
            }
            if mapping.product_length_mm == Some(0) {
                return Err(CalcError::InvalidConfigValueError {
                    field: field("product_length_mm"),
                    value: "0".to_string(),
                    reason: "Product length must be longer than 0 mm".to_string(),
                });
            }
        }

        if let Some(beams) = &self.accessories.beams {
            if !beams.rules.iter().any(|rule| rule.is_default()) {
                return Err(CalcError::MissingConfigError {
                    field: "accessories.beams.rules (a rule without matchers)".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl From<MappingConfig> for ProductMapping {
    fn from(config: MappingConfig) -> Self {
        ProductMapping {
            id: config.id,
            family: config.family,
            subtype: non_empty(config.subtype, canonical_subtype),
            color: non_empty(config.color, canonical_tag),
            label: config.label,
            width_mm: config.width_mm,
            thickness_mm: config.thickness_mm,
            product_id: config.product_id,
            stock_lengths: config
                .stock_lengths
                .into_iter()
                .map(|s| (s.length_mm, s.variant_id))
                .collect::<BTreeMap<_, _>>(),
            product_length_mm: config.product_length_mm,
        }
    }
}

impl TryFrom<CatalogConfig> for Catalog {
    type Error = CalcError;

    fn try_from(config: CatalogConfig) -> Result<Self> {
        config.validate()?;
        let mappings = config.mappings.into_iter().map(ProductMapping::from).collect();
        Ok(Catalog::new(mappings, config.accessories))
    }
}

impl Catalog {
    /// The catalog compiled into the crate.
    pub fn builtin() -> Result<Self> {
        CatalogConfig::from_toml_str(DEFAULT_CATALOG)?.try_into()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading catalog from: {}", path.display());
        CatalogConfig::from_file(path)?.try_into()
    }
}
