//! Property path resolution
//!
//! A property reference taken from a method name (`AddressCountry`) is resolved
//! against registered entity metadata into a chain of persistent properties.
//!
//! Resolution order:
//! 1. Explicit `_` or `.` separators split the reference first
//!    (`Address_Country`, `address.country`)
//! 2. The whole segment is tried as a single property
//! 3. Camel-case splits are tried from the right, longest head first; the
//!    head must reference an entity and the tail is resolved on it
//!
//! A failed tail backtracks to the next shorter head.

use std::collections::HashMap;
use std::fmt;

use super::errors::{MappingError, MappingResult};
use super::types::{PersistentEntity, PersistentProperty, QName};

/// Read-only source of property paths.
///
/// Implementations are consulted once per method-name part and must not
/// mutate shared state.
pub trait PropertyPathResolver {
    /// Resolves `path` against the entity type named `entity`
    fn resolve(&self, entity: &str, path: &str) -> MappingResult<PropertyPath>;
}

/// One resolved property in a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Entity declaring the property
    pub entity: String,
    /// Property name
    pub property: String,
    /// Qualified stored name
    pub qname: QName,
}

impl PathSegment {
    fn new(owner: &PersistentEntity, property: &PersistentProperty) -> Self {
        Self {
            entity: owner.name.clone(),
            property: property.name.clone(),
            qname: owner.qname_of(property),
        }
    }
}

/// Resolved chain of persistent properties, root first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    source: String,
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn new(source: impl Into<String>, segments: Vec<PathSegment>) -> Self {
        Self {
            source: source.into(),
            segments,
        }
    }

    /// The reference as written in the method name
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The property the path ends on
    pub fn leaf(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Dotted property names, e.g. `address.country`
    pub fn dot_path(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.property.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dot_path())
    }
}

/// In-memory registry of persistent entities.
///
/// Populated once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MappingContext {
    entities: HashMap<String, PersistentEntity>,
}

impl MappingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity definition.
    ///
    /// Entity names are unique; registering a name twice is rejected.
    pub fn register(&mut self, entity: PersistentEntity) -> MappingResult<()> {
        entity
            .validate_structure()
            .map_err(|e| MappingError::malformed_definition(&entity.name, e))?;

        if self.entities.contains_key(&entity.name) {
            return Err(MappingError::duplicate_entity(&entity.name));
        }

        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_entity(mut self, entity: PersistentEntity) -> MappingResult<Self> {
        self.register(entity)?;
        Ok(self)
    }

    pub fn entity(&self, name: &str) -> Option<&PersistentEntity> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns entity names in sorted order
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fails on the first property, in entity name order, that references
    /// an unregistered entity
    pub fn check_references(&self) -> MappingResult<()> {
        for name in self.entity_names() {
            let Some(entity) = self.entity(name) else {
                continue;
            };
            for property in &entity.properties {
                if let Some(target) = property.kind.target_entity() {
                    if !self.contains(target) {
                        return Err(MappingError::malformed_definition(
                            name,
                            format!(
                                "Property '{}' references unknown entity '{}'",
                                property.name, target
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn require_entity(&self, name: &str) -> MappingResult<&PersistentEntity> {
        self.entity(name)
            .ok_or_else(|| MappingError::unknown_entity(name))
    }

    fn resolve_segments(
        &self,
        owner: &PersistentEntity,
        source: &str,
        path: &str,
    ) -> MappingResult<Vec<PathSegment>> {
        if let Some((head, tail)) = source.split_once(|c: char| c == '_' || c == '.') {
            let mut segments = self.resolve_segments(owner, head, path)?;
            let next = self.traverse(owner, &segments, path)?;
            segments.extend(self.resolve_segments(next, tail, path)?);
            return Ok(segments);
        }

        let name = uncapitalize(source);
        if let Some(property) = owner.property(&name) {
            return Ok(vec![PathSegment::new(owner, property)]);
        }

        let mut deepest: Option<MappingError> = None;

        for split in camel_boundaries(source).into_iter().rev() {
            let (head, tail) = source.split_at(split);
            let Some(property) = owner.property(&uncapitalize(head)) else {
                continue;
            };

            let Some(target) = property.kind.target_entity() else {
                deepest.get_or_insert_with(|| {
                    MappingError::not_traversable(&owner.name, path, &property.name)
                });
                continue;
            };

            let next = match self.require_entity(target) {
                Ok(next) => next,
                Err(e) => {
                    deepest.get_or_insert(e);
                    continue;
                }
            };
            match self.resolve_segments(next, tail, path) {
                Ok(rest) => {
                    let mut segments = Vec::with_capacity(rest.len() + 1);
                    segments.push(PathSegment::new(owner, property));
                    segments.extend(rest);
                    return Ok(segments);
                }
                Err(e) => {
                    deepest.get_or_insert(e);
                }
            }
        }

        Err(deepest.unwrap_or_else(|| MappingError::unknown_property(&owner.name, path, name)))
    }

    /// Returns the entity referenced by the last resolved segment
    fn traverse<'a>(
        &'a self,
        owner: &'a PersistentEntity,
        segments: &[PathSegment],
        path: &str,
    ) -> MappingResult<&'a PersistentEntity> {
        let Some(last) = segments.last() else {
            return Ok(owner);
        };

        let declaring = self.require_entity(&last.entity)?;
        let target = declaring
            .property(&last.property)
            .and_then(|p| p.kind.target_entity())
            .ok_or_else(|| MappingError::not_traversable(&last.entity, path, &last.property))?;

        self.require_entity(target)
    }
}

impl PropertyPathResolver for MappingContext {
    fn resolve(&self, entity: &str, path: &str) -> MappingResult<PropertyPath> {
        let root = self.require_entity(entity)?;
        let segments = self.resolve_segments(root, path, path)?;
        Ok(PropertyPath::new(path, segments))
    }
}

fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Byte offsets of every uppercase character except the first
fn camel_boundaries(s: &str) -> Vec<usize> {
    s.char_indices()
        .skip(1)
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .collect()
}
