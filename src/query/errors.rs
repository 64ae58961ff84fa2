//! Query derivation error types
//!
//! Error codes:
//! - MLQ_QUERY_INVALID_METHOD (REJECT)
//! - MLQ_QUERY_MAPPING_FAILED (REJECT)
//! - MLQ_QUERY_UNSUPPORTED_KEYWORD (REJECT)
//! - MLQ_QUERY_MISSING_PARAMETER (REJECT)
//! - MLQ_QUERY_INVALID_PARAMETER (REJECT)
//! - MLQ_QUERY_INVALID_CRITERIA (REJECT)
//!
//! All of them describe a bad repository method or call site. None is
//! transient, so none is retried.

use std::fmt;

use crate::mapping::MappingError;
use crate::parser::{PartTreeError, PartType};

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Derivation rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Query-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Method name could not be parsed
    MlqQueryInvalidMethod,
    /// Property path has no persistent property
    MlqQueryMappingFailed,
    /// Part keyword has no translation
    MlqQueryUnsupportedKeyword,
    /// Parameters exhausted before the last value-consuming part
    MlqQueryMissingParameter,
    /// Parameter value cannot be translated
    MlqQueryInvalidParameter,
    /// Combinator arity or append precondition violated
    MlqQueryInvalidCriteria,
}

impl QueryErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::MlqQueryInvalidMethod => "MLQ_QUERY_INVALID_METHOD",
            QueryErrorCode::MlqQueryMappingFailed => "MLQ_QUERY_MAPPING_FAILED",
            QueryErrorCode::MlqQueryUnsupportedKeyword => "MLQ_QUERY_UNSUPPORTED_KEYWORD",
            QueryErrorCode::MlqQueryMissingParameter => "MLQ_QUERY_MISSING_PARAMETER",
            QueryErrorCode::MlqQueryInvalidParameter => "MLQ_QUERY_INVALID_PARAMETER",
            QueryErrorCode::MlqQueryInvalidCriteria => "MLQ_QUERY_INVALID_CRITERIA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone)]
enum Cause {
    Mapping(MappingError),
    Parse(PartTreeError),
}

/// Query error type with full context
#[derive(Debug, Clone)]
pub struct QueryError {
    /// Error code
    code: QueryErrorCode,
    /// Human-readable message
    message: String,
    /// Offending property path if applicable
    path: Option<String>,
    /// Offending keyword if applicable
    keyword: Option<String>,
    cause: Option<Cause>,
}

impl QueryError {
    fn new(code: QueryErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            path: None,
            keyword: None,
            cause: None,
        }
    }

    /// Create an invalid method error
    pub fn invalid_method(source: PartTreeError) -> Self {
        let mut err = Self::new(QueryErrorCode::MlqQueryInvalidMethod, source.to_string());
        err.cause = Some(Cause::Parse(source));
        err
    }

    /// Create a mapping failed error from a resolver failure
    pub fn mapping_failed(path: impl Into<String>, source: MappingError) -> Self {
        let path = path.into();
        let mut err = Self::new(
            QueryErrorCode::MlqQueryMappingFailed,
            format!(
                "No persistent entity information found for the path '{}': {}",
                path,
                source.message()
            ),
        );
        err.path = Some(path);
        err.cause = Some(Cause::Mapping(source));
        err
    }

    /// Create a mapping failed error for a path without leaf property
    pub fn no_leaf_property(path: impl Into<String>) -> Self {
        let path = path.into();
        let mut err = Self::new(
            QueryErrorCode::MlqQueryMappingFailed,
            format!("No persistent entity information found for the path '{}'", path),
        );
        err.path = Some(path);
        err
    }

    /// Create an unsupported keyword error
    pub fn unsupported_keyword(part_type: PartType, path: impl Into<String>) -> Self {
        let path = path.into();
        let mut err = Self::new(
            QueryErrorCode::MlqQueryUnsupportedKeyword,
            format!("Unsupported keyword {} on path '{}'", part_type, path),
        );
        err.path = Some(path);
        err.keyword = Some(part_type.name().to_string());
        err
    }

    /// Create a missing parameter error
    pub fn missing_parameter(path: impl Into<String>, position: usize) -> Self {
        let path = path.into();
        let mut err = Self::new(
            QueryErrorCode::MlqQueryMissingParameter,
            format!("No parameter at position {} for the path '{}'", position, path),
        );
        err.path = Some(path);
        err
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let path = path.into();
        let mut err = Self::new(
            QueryErrorCode::MlqQueryInvalidParameter,
            format!("Invalid parameter for the path '{}': {}", path, reason.into()),
        );
        err.path = Some(path);
        err
    }

    /// Create an invalid criteria error
    pub fn invalid_criteria(reason: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::MlqQueryInvalidCriteria, reason.into())
    }

    /// Returns the error code
    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the property path if applicable
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the unsupported keyword if applicable
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Returns the underlying mapping error if any
    pub fn mapping_error(&self) -> Option<&MappingError> {
        match &self.cause {
            Some(Cause::Mapping(e)) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Some(Cause::Mapping(e)) => Some(e),
            Some(Cause::Parse(e)) => Some(e),
            None => None,
        }
    }
}

impl From<PartTreeError> for QueryError {
    fn from(err: PartTreeError) -> Self {
        QueryError::invalid_method(err)
    }
}

/// Result type for query derivation
pub type QueryResult<T> = Result<T, QueryError>;
