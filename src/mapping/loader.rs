//! Entity definition loader
//!
//! - One JSON file per entity: `<entity_dir>/entity_<name>.json`
//! - Files are read in sorted path order so registration is deterministic
//! - A missing directory or malformed file is FATAL at startup
//! - Every entity reference must name a loaded entity

use std::fs;
use std::path::{Path, PathBuf};

use super::context::MappingContext;
use super::errors::{MappingError, MappingResult};
use super::types::PersistentEntity;

/// Reads entity definitions from disk into a [`MappingContext`].
pub struct EntityLoader {
    /// Directory containing entity definition files
    entity_dir: PathBuf,
    /// Namespace applied to entities that declare none
    default_namespace: Option<String>,
}

impl EntityLoader {
    pub fn new(entity_dir: impl Into<PathBuf>) -> Self {
        Self {
            entity_dir: entity_dir.into(),
            default_namespace: None,
        }
    }

    /// Sets the namespace given to entities without one.
    ///
    /// An empty string leaves such entities unqualified.
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.default_namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    /// Loads every `*.json` file into a fresh context
    pub fn load(&self) -> MappingResult<MappingContext> {
        let mut context = MappingContext::new();
        self.load_into(&mut context)?;
        Ok(context)
    }

    /// Loads every `*.json` file into `context`, returning how many were registered
    pub fn load_into(&self, context: &mut MappingContext) -> MappingResult<usize> {
        let dir = self.entity_dir.display().to_string();

        if !self.entity_dir.is_dir() {
            return Err(MappingError::malformed_definition(
                dir,
                "Entity directory does not exist",
            ));
        }

        let entries = fs::read_dir(&self.entity_dir).map_err(|e| {
            MappingError::malformed_definition(&dir, format!("Failed to read directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                MappingError::malformed_definition(
                    &dir,
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let entity = self.read_entity_file(path)?;
            context.register(entity)?;
        }
        context.check_references()?;

        Ok(paths.len())
    }

    fn read_entity_file(&self, path: &Path) -> MappingResult<PersistentEntity> {
        let content = fs::read_to_string(path).map_err(|e| {
            MappingError::malformed_definition(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let mut entity: PersistentEntity = serde_json::from_str(&content).map_err(|e| {
            MappingError::malformed_definition(
                path.display().to_string(),
                format!("Invalid JSON: {}", e),
            )
        })?;

        if entity.namespace.is_none() {
            entity.namespace = self.default_namespace.clone();
        }

        entity
            .validate_structure()
            .map_err(|e| MappingError::malformed_definition(path.display().to_string(), e))?;

        Ok(entity)
    }

    /// Writes an entity definition to the standard location
    pub fn save_entity(&self, entity: &PersistentEntity) -> MappingResult<PathBuf> {
        let path = self.entity_dir.join(format!("entity_{}.json", entity.name));

        if path.exists() {
            return Err(MappingError::duplicate_entity(&entity.name));
        }

        fs::create_dir_all(&self.entity_dir).map_err(|e| {
            MappingError::malformed_definition(
                self.entity_dir.display().to_string(),
                format!("Failed to create entity directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(entity).map_err(|e| {
            MappingError::malformed_definition(
                path.display().to_string(),
                format!("Failed to serialize entity: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            MappingError::malformed_definition(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}
