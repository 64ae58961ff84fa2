//! # Part Tree Errors
//!
//! Error types for method-name parsing.

use thiserror::Error;

/// Result type for parsing operations
pub type PartTreeResult<T> = Result<T, PartTreeError>;

/// Method-name parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartTreeError {
    /// Method name has no recognised subject prefix
    #[error("Invalid method name '{0}': expected a prefix such as findBy, countBy or deleteBy")]
    InvalidMethodName(String),

    /// A part has no property reference left once its keyword is removed
    #[error("Part '{part}' of method '{method}' has no property reference")]
    EmptyProperty { method: String, part: String },

    /// OrderBy block without property
    #[error("Invalid order syntax for part '{0}'")]
    InvalidOrderBy(String),

    /// OrderBy used more than once
    #[error("OrderBy must not be used more than once in method '{0}'")]
    DuplicateOrderBy(String),

    /// First/Top count does not fit
    #[error("Invalid result limit '{limit}' in method '{method}'")]
    InvalidLimit { method: String, limit: String },
}

impl PartTreeError {
    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PartTreeError::InvalidMethodName(_) => "MLQ_PARSE_INVALID_METHOD_NAME",
            PartTreeError::EmptyProperty { .. } => "MLQ_PARSE_EMPTY_PROPERTY",
            PartTreeError::InvalidOrderBy(_) => "MLQ_PARSE_INVALID_ORDER_BY",
            PartTreeError::DuplicateOrderBy(_) => "MLQ_PARSE_DUPLICATE_ORDER_BY",
            PartTreeError::InvalidLimit { .. } => "MLQ_PARSE_INVALID_LIMIT",
        }
    }
}
