//! mlquery - derived queries for a namespace-qualified document store
//!
//! Repository method names such as `findByLastnameAndAddressCountry` are
//! parsed into a part tree, resolved against persistent-entity metadata and
//! folded into a criteria tree over qualified field names.
//!
//! - [`parser`]: method name to [`parser::PartTree`]
//! - [`mapping`]: entity metadata and property path resolution
//! - [`query`]: criteria, sort and the query creator
//! - [`observability`]: structured JSON logging
//! - [`cli`]: the `mlquery` command

pub mod cli;
pub mod mapping;
pub mod observability;
pub mod parser;
pub mod query;
