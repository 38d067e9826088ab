pub mod catalog_config;
#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli_config::{CliConfig, OutputFormat};

#[cfg(feature = "cli")]
mod cli_config {
    use crate::domain::model::{Family, Mounting, QuoteRequest};
    use crate::utils::error::{CalcError, Result};
    use crate::utils::validation::{validate_positive_f64, Validate};
    use clap::{Parser, ValueEnum};
    use serde::{Deserialize, Serialize};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
    #[serde(rename_all = "lowercase")]
    pub enum OutputFormat {
        Json,
        Text,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "decking-calc")]
    #[command(about = "Estimates deck boards and accessories for a rectangular deck")]
    pub struct CliConfig {
        /// Material family: wood, bamboo or composite (Dutch names accepted)
        #[arg(long)]
        pub family: String,

        /// Wood species or bamboo product type (plank, tile, herringbone)
        #[arg(long, default_value = "")]
        pub subtype: String,

        /// Board thickness in mm
        #[arg(long, default_value = "0")]
        pub thickness: u32,

        /// Deck length in metres (board direction)
        #[arg(long)]
        pub length: f64,

        /// Deck width in metres
        #[arg(long)]
        pub width: f64,

        #[arg(long, default_value = "")]
        pub color: String,

        /// free-standing (balcony) or staked (garden)
        #[arg(long, default_value = "free-standing")]
        pub mounting: String,

        /// Ground stake size, 40x40 or 50x50
        #[arg(long, default_value = "40x40")]
        pub stake_size: String,

        /// TOML catalog replacing the built-in one
        #[arg(long)]
        pub catalog: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        pub format: OutputFormat,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn mounting(&self) -> Result<Mounting> {
            self.mounting
                .parse()
                .map_err(|reason| CalcError::InvalidConfigValueError {
                    field: "mounting".to_string(),
                    value: self.mounting.clone(),
                    reason,
                })
        }

        pub fn to_request(&self) -> Result<QuoteRequest> {
            Ok(QuoteRequest {
                family: self.family.clone(),
                subtype: self.subtype.clone(),
                thickness_mm: self.thickness,
                length_m: self.length,
                width_m: self.width,
                color: self.color.clone(),
                mounting: self.mounting()?,
                stake_size: self.stake_size.clone(),
            })
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            self.family
                .parse::<Family>()
                .map_err(|reason| CalcError::InvalidConfigValueError {
                    field: "family".to_string(),
                    value: self.family.clone(),
                    reason,
                })?;
            self.mounting()?;
            validate_positive_f64("length", self.length)?;
            validate_positive_f64("width", self.width)?;

            if let Some(path) = &self.catalog {
                if !path.is_file() {
                    return Err(CalcError::InvalidConfigValueError {
                        field: "catalog".to_string(),
                        value: path.display().to_string(),
                        reason: "Catalog file does not exist".to_string(),
                    });
                }
            }
            Ok(())
        }
    }

}
