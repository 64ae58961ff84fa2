//! Persistent entity metadata
//!
//! Every stored property is addressed by a namespace-qualified name. A property
//! without its own namespace inherits the namespace of the entity declaring it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace-qualified field identifier.
///
/// An empty namespace means the field lives in no namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    /// Namespace URI
    #[serde(default)]
    pub namespace: String,
    /// Local part of the name
    pub local_name: String,
}

impl QName {
    /// Creates a qualified name
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// Creates a name without namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self::new(String::new(), local_name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn is_namespaced(&self) -> bool {
        !self.namespace.is_empty()
    }
}

/// Clark notation: `{namespace}local`, or `local` when there is no namespace.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_namespaced() {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        } else {
            write!(f, "{}", self.local_name)
        }
    }
}

/// What a persistent property holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyKind {
    /// Scalar value (string, number, boolean, date...)
    Simple,
    /// Embedded entity, traversable by property paths
    Entity {
        /// Name of the referenced entity type
        entity: String,
    },
    /// Repeated values of the element kind
    Collection {
        /// Element kind (boxed to allow nesting)
        element: Box<PropertyKind>,
    },
}

impl PropertyKind {
    /// Returns the entity a path may continue into, looking through collections
    pub fn target_entity(&self) -> Option<&str> {
        match self {
            PropertyKind::Simple => None,
            PropertyKind::Entity { entity } => Some(entity),
            PropertyKind::Collection { element } => element.target_entity(),
        }
    }
}

/// A single persistent property of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentProperty {
    /// Property name as referenced from method names (camelCase)
    pub name: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
    /// Stored local name, when it differs from the property name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    /// Namespace override for this property
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl PersistentProperty {
    fn with_kind(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            local_name: None,
            namespace: None,
        }
    }

    /// Create a scalar property
    pub fn simple(name: impl Into<String>) -> Self {
        Self::with_kind(name, PropertyKind::Simple)
    }

    /// Create a property referencing an embedded entity
    pub fn entity(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            PropertyKind::Entity {
                entity: entity.into(),
            },
        )
    }

    /// Create a repeated property
    pub fn collection(name: impl Into<String>, element: PropertyKind) -> Self {
        Self::with_kind(
            name,
            PropertyKind::Collection {
                element: Box::new(element),
            },
        )
    }

    /// Overrides the stored local name
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = Some(local_name.into());
        self
    }

    /// Overrides the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Entity type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentEntity {
    /// Unique entity type name
    pub name: String,
    /// Default namespace for the entity's properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Declared properties, in declaration order
    pub properties: Vec<PersistentProperty>,
}

impl PersistentEntity {
    /// Create an entity without namespace
    pub fn new(name: impl Into<String>, properties: Vec<PersistentProperty>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            properties,
        }
    }

    /// Sets the default namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Looks up a property by name
    pub fn property(&self, name: &str) -> Option<&PersistentProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Computes the qualified name under which `property` is stored
    pub fn qname_of(&self, property: &PersistentProperty) -> QName {
        let namespace = property
            .namespace
            .as_deref()
            .or(self.namespace.as_deref())
            .unwrap_or_default();
        let local_name = property.local_name.as_deref().unwrap_or(&property.name);
        QName::new(namespace, local_name)
    }

    /// Validates the definition itself
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Entity name must not be empty".into());
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.name.is_empty() {
                return Err(format!("Entity '{}' declares a property without name", self.name));
            }
            if property.name.contains(|c: char| c == '_' || c == '.') {
                return Err(format!(
                    "Property '{}' of entity '{}' must not contain '_' or '.'",
                    property.name, self.name
                ));
            }
            if !seen.insert(property.name.as_str()) {
                return Err(format!(
                    "Property '{}' is declared twice on entity '{}'",
                    property.name, self.name
                ));
            }
        }

        Ok(())
    }
}
