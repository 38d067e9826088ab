pub mod error;
pub mod logger;
pub mod numeric;
pub mod validation;
