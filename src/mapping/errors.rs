//! Mapping error types
//!
//! Error codes:
//! - MLQ_MAPPING_UNKNOWN_ENTITY (REJECT)
//! - MLQ_MAPPING_UNKNOWN_PROPERTY (REJECT)
//! - MLQ_MAPPING_NOT_TRAVERSABLE (REJECT)
//! - MLQ_MAPPING_DUPLICATE_ENTITY (REJECT)
//! - MLQ_MAPPING_MALFORMED_DEFINITION (FATAL)

use std::fmt;

/// Severity levels for mapping errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller supplied a bad entity or property reference
    Reject,
    /// Entity metadata could not be loaded at startup
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Mapping-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorCode {
    /// Entity type not registered
    MlqMappingUnknownEntity,
    /// No persistent property matches the path
    MlqMappingUnknownProperty,
    /// Path continues past a property that does not reference an entity
    MlqMappingNotTraversable,
    /// Entity registered twice
    MlqMappingDuplicateEntity,
    /// Entity definition could not be read or is structurally invalid
    MlqMappingMalformedDefinition,
}

impl MappingErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            MappingErrorCode::MlqMappingUnknownEntity => "MLQ_MAPPING_UNKNOWN_ENTITY",
            MappingErrorCode::MlqMappingUnknownProperty => "MLQ_MAPPING_UNKNOWN_PROPERTY",
            MappingErrorCode::MlqMappingNotTraversable => "MLQ_MAPPING_NOT_TRAVERSABLE",
            MappingErrorCode::MlqMappingDuplicateEntity => "MLQ_MAPPING_DUPLICATE_ENTITY",
            MappingErrorCode::MlqMappingMalformedDefinition => "MLQ_MAPPING_MALFORMED_DEFINITION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            MappingErrorCode::MlqMappingMalformedDefinition => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for MappingErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Mapping error type with full context
#[derive(Debug, Clone)]
pub struct MappingError {
    /// Error code
    code: MappingErrorCode,
    /// Human-readable message
    message: String,
    /// Entity name if applicable
    entity: Option<String>,
    /// Property path if applicable
    path: Option<String>,
}

impl MappingError {
    /// Create an unknown entity error
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self {
            code: MappingErrorCode::MlqMappingUnknownEntity,
            message: format!("No persistent entity information found for type '{}'", entity),
            entity: Some(entity),
            path: None,
        }
    }

    /// Create an unknown property error
    pub fn unknown_property(
        entity: impl Into<String>,
        path: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        let entity = entity.into();
        let path = path.into();
        Self {
            code: MappingErrorCode::MlqMappingUnknownProperty,
            message: format!(
                "No property '{}' found on type '{}' for the path '{}'",
                property.into(),
                entity,
                path
            ),
            entity: Some(entity),
            path: Some(path),
        }
    }

    /// Create a not traversable error
    pub fn not_traversable(
        entity: impl Into<String>,
        path: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        let entity = entity.into();
        let path = path.into();
        Self {
            code: MappingErrorCode::MlqMappingNotTraversable,
            message: format!(
                "Property '{}' of type '{}' does not reference an entity and cannot be traversed by the path '{}'",
                property.into(),
                entity,
                path
            ),
            entity: Some(entity),
            path: Some(path),
        }
    }

    /// Create a duplicate entity error
    pub fn duplicate_entity(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self {
            code: MappingErrorCode::MlqMappingDuplicateEntity,
            message: format!("Entity '{}' is already registered", entity),
            entity: Some(entity),
            path: None,
        }
    }

    /// Create an error for a malformed entity definition
    pub fn malformed_definition(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: MappingErrorCode::MlqMappingMalformedDefinition,
            message: format!(
                "Malformed entity definition '{}': {}",
                source.into(),
                reason.into()
            ),
            entity: None,
            path: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> MappingErrorCode {
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

    /// Returns the entity name if applicable
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Returns the property path if applicable
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for MappingError {}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MappingErrorCode::MlqMappingUnknownEntity.code(),
            "MLQ_MAPPING_UNKNOWN_ENTITY"
        );
        assert_eq!(
            MappingErrorCode::MlqMappingUnknownProperty.code(),
            "MLQ_MAPPING_UNKNOWN_PROPERTY"
        );
        assert_eq!(
            MappingErrorCode::MlqMappingMalformedDefinition.code(),
            "MLQ_MAPPING_MALFORMED_DEFINITION"
        );
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(MappingErrorCode::MlqMappingUnknownProperty.severity(), Severity::Reject);
        assert_eq!(
            MappingErrorCode::MlqMappingMalformedDefinition.severity(),
            Severity::Fatal
        );
    }

    #[test]
    fn test_unknown_property_names_path() {
        let err = MappingError::unknown_property("Person", "AddressCuntry", "cuntry");
        let display = format!("{}", err);
        assert!(display.contains("MLQ_MAPPING_UNKNOWN_PROPERTY"));
        assert!(display.contains("AddressCuntry"));
        assert_eq!(err.path(), Some("AddressCuntry"));
        assert_eq!(err.entity(), Some("Person"));
        assert!(!err.is_fatal());
    }
}
