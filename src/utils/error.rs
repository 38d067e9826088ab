use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Invalid input. Please enter a length and width ({message}).")]
    InvalidInput { message: String },

    #[error("This combination is not linked to a product yet. Please contact us.")]
    UnlinkedCombination {
        family: String,
        subtype: String,
        thickness_mm: u32,
        color: String,
    },

    #[error("This product type (panel) is not supported by the calculator yet.")]
    UnsupportedShape { mapping_id: String },

    #[error("Could not compute the number of boards for {family}.")]
    PlanningFailed { family: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Estimation task failed: {message}")]
    TaskError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Catalog,
    Configuration,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalcError {
    /// Business errors are answered to the shopper; everything else is an operator problem.
    pub fn is_business_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::UnlinkedCombination { .. }
                | CalcError::UnsupportedShape { .. }
                | CalcError::PlanningFailed { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::InvalidInput { .. } => ErrorCategory::Input,
            CalcError::UnlinkedCombination { .. }
            | CalcError::UnsupportedShape { .. }
            | CalcError::PlanningFailed { .. } => ErrorCategory::Catalog,
            CalcError::TomlError(_)
            | CalcError::ConfigError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CalcError::IoError(_) | CalcError::CsvError(_) | CalcError::SerializationError(_) => {
                ErrorCategory::Io
            }
            CalcError::TaskError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Catalog => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::InvalidInput { .. } => {
                "Invalid input. Please enter a length and width.".to_string()
            }
            CalcError::UnlinkedCombination { .. }
            | CalcError::UnsupportedShape { .. }
            | CalcError::PlanningFailed { .. } => self.to_string(),
            CalcError::IoError(e) => format!("Could not read or write a file: {}", e),
            CalcError::CsvError(e) => format!("The request file could not be parsed: {}", e),
            CalcError::TomlError(_)
            | CalcError::ConfigError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => {
                format!("The product catalog is not valid: {}", self)
            }
            CalcError::SerializationError(e) => format!("Could not encode the result: {}", e),
            CalcError::TaskError { .. } => "An internal error occurred while estimating.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => {
                "Length and width must be positive numbers and a material must be chosen"
            }
            CalcError::UnlinkedCombination { .. } => {
                "Check material, subtype, thickness and color against the catalog"
            }
            CalcError::UnsupportedShape { .. } => {
                "Give the catalog entry a board width and thickness, or mark it as a tile"
            }
            CalcError::PlanningFailed { .. } => {
                "Add stock lengths (with variant ids) to the catalog entry"
            }
            CalcError::IoError(_) => "Check that the path exists and is readable/writable",
            CalcError::CsvError(_) => {
                "Expected columns: family,subtype,thickness_mm,length_m,width_m,color,mounting,stake_size"
            }
            CalcError::SerializationError(_) => "Report this as a bug",
            CalcError::TomlError(_)
            | CalcError::ConfigError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => {
                "Fix the catalog TOML file or run without --catalog to use the built-in catalog"
            }
            CalcError::TaskError { .. } => "Retry the batch; report it if it keeps failing",
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
