//! Entity Mapping Tests
//!
//! Entity metadata and property path resolution:
//! - Definitions load from JSON files, default namespace applied
//! - Camel-case and explicit separators resolve through nested entities
//! - Unknown, duplicate and malformed definitions are rejected

use std::fs;

use mlquery::mapping::{
    EntityLoader, MappingContext, MappingErrorCode, PersistentEntity, PersistentProperty,
    PropertyKind, PropertyPathResolver, QName,
};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_entity(dir: &TempDir, file: &str, definition: serde_json::Value) {
    fs::write(dir.path().join(file), definition.to_string()).unwrap();
}

fn setup_entity_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();

    write_entity(
        &tmp,
        "person.json",
        json!({
            "name": "Person",
            "properties": [
                {"name": "lastname", "type": "simple"},
                {"name": "address", "type": "entity", "entity": "Address"},
                {"name": "contacts", "type": "collection", "element": {"type": "entity", "entity": "Contact"}},
                {"name": "birthDate", "type": "simple", "local_name": "birth-date"}
            ]
        }),
    );
    write_entity(
        &tmp,
        "address.json",
        json!({
            "name": "Address",
            "namespace": "urn:address",
            "properties": [
                {"name": "country", "type": "simple"},
                {"name": "countryCode", "type": "simple", "namespace": "urn:iso"}
            ]
        }),
    );
    write_entity(
        &tmp,
        "contact.json",
        json!({
            "name": "Contact",
            "properties": [{"name": "email", "type": "simple"}]
        }),
    );
    // not a definition
    fs::write(tmp.path().join("README.txt"), "ignored").unwrap();

    tmp
}

fn load(tmp: &TempDir) -> MappingContext {
    EntityLoader::new(tmp.path())
        .with_default_namespace("urn:default")
        .load()
        .unwrap()
}

// =============================================================================
// Loader Tests
// =============================================================================

#[test]
fn test_loads_json_definitions_only() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    assert_eq!(context.entity_count(), 3);
    assert_eq!(context.entity_names(), vec!["Address", "Contact", "Person"]);
}

#[test]
fn test_default_namespace_only_fills_gaps() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    assert_eq!(context.entity("Person").unwrap().namespace.as_deref(), Some("urn:default"));
    assert_eq!(context.entity("Address").unwrap().namespace.as_deref(), Some("urn:address"));
}

#[test]
fn test_missing_directory_is_fatal() {
    let err = EntityLoader::new("/nonexistent/entities").load().unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingMalformedDefinition);
    assert!(err.is_fatal());
}

#[test]
fn test_malformed_json_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.json"), "{\"name\": ").unwrap();

    let err = EntityLoader::new(tmp.path()).load().unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingMalformedDefinition);
}

#[test]
fn test_invalid_property_name_rejected() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        &tmp,
        "person.json",
        json!({"name": "Person", "properties": [{"name": "last_name", "type": "simple"}]}),
    );

    let err = EntityLoader::new(tmp.path()).load().unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingMalformedDefinition);
}

#[test]
fn test_reference_to_undefined_entity_rejected() {
    let tmp = TempDir::new().unwrap();
    write_entity(
        &tmp,
        "person.json",
        json!({"name": "Person", "properties": [{"name": "address", "type": "entity", "entity": "Address"}]}),
    );

    let err = EntityLoader::new(tmp.path()).load().unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingMalformedDefinition);
    assert!(err.is_fatal());
}

#[test]
fn test_duplicate_entity_across_files_rejected() {
    let tmp = TempDir::new().unwrap();
    let definition = json!({"name": "Person", "properties": [{"name": "lastname", "type": "simple"}]});
    write_entity(&tmp, "a.json", definition.clone());
    write_entity(&tmp, "b.json", definition);

    let err = EntityLoader::new(tmp.path()).load().unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingDuplicateEntity);
}

// =============================================================================
// Resolution Tests
// =============================================================================

#[test]
fn test_resolve_through_loaded_entities() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    let path = context.resolve("Person", "AddressCountry").unwrap();
    assert_eq!(path.dot_path(), "address.country");
    assert_eq!(path.leaf().unwrap().qname, QName::new("urn:address", "country"));
}

#[test]
fn test_longest_property_wins() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    let path = context.resolve("Person", "AddressCountryCode").unwrap();
    assert_eq!(path.dot_path(), "address.countryCode");
    assert_eq!(path.leaf().unwrap().qname, QName::new("urn:iso", "countryCode"));
}

#[test]
fn test_resolve_through_collection_of_entities() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    let path = context.resolve("Person", "ContactsEmail").unwrap();
    assert_eq!(path.dot_path(), "contacts.email");
    assert_eq!(path.leaf().unwrap().qname, QName::new("urn:default", "email"));
}

#[test]
fn test_local_name_override() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    let path = context.resolve("Person", "BirthDate").unwrap();
    assert_eq!(path.leaf().unwrap().qname, QName::new("urn:default", "birth-date"));
}

#[test]
fn test_separators_equivalent() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    let camel = context.resolve("Person", "AddressCountry").unwrap();
    let underscore = context.resolve("Person", "Address_Country").unwrap();
    let dotted = context.resolve("Person", "address.country").unwrap();

    assert_eq!(camel.segments(), underscore.segments());
    assert_eq!(camel.segments(), dotted.segments());
}

#[test]
fn test_unregistered_target_falls_back_to_shorter_property() {
    let mut context = MappingContext::new();
    context
        .register(PersistentEntity::new(
            "Order",
            vec![
                PersistentProperty::entity("shipTo", "Warehouse"),
                PersistentProperty::entity("ship", "Vessel"),
            ],
        ))
        .unwrap();
    context
        .register(PersistentEntity::new(
            "Vessel",
            vec![PersistentProperty::simple("toName")],
        ))
        .unwrap();

    let path = context.resolve("Order", "ShipToName").unwrap();
    assert_eq!(path.dot_path(), "ship.toName");
}

#[test]
fn test_traversal_through_simple_property_rejected() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    let err = context.resolve("Person", "Lastname_Length").unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingNotTraversable);
}

#[test]
fn test_unknown_property_rejected() {
    let tmp = setup_entity_dir();
    let context = load(&tmp);

    let err = context.resolve("Person", "Nickname").unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingUnknownProperty);
    assert_eq!(err.path(), Some("Nickname"));
}

#[test]
fn test_in_memory_registration() {
    let mut context = MappingContext::new();
    context
        .register(PersistentEntity::new(
            "Tag",
            vec![PersistentProperty::collection("labels", PropertyKind::Simple)],
        ))
        .unwrap();

    let path = context.resolve("Tag", "Labels").unwrap();
    assert_eq!(path.leaf().unwrap().qname, QName::local("labels"));

    let err = context
        .register(PersistentEntity::new("Tag", vec![]))
        .unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MlqMappingDuplicateEntity);
}
