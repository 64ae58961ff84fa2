//! Persistent entity metadata for mlquery
//!
//! Supplies the property path resolver consumed by query derivation.
//!
//! # Design Principles
//!
//! - Metadata is loaded once and read concurrently afterwards
//! - Every property resolves to a namespace-qualified name
//! - Unknown paths are rejected, never guessed

mod context;
mod errors;
mod loader;
mod types;

pub use context::{MappingContext, PathSegment, PropertyPath, PropertyPathResolver};
pub use errors::{MappingError, MappingErrorCode, MappingResult, Severity};
pub use loader::EntityLoader;
pub use types::{PersistentEntity, PersistentProperty, PropertyKind, QName};
