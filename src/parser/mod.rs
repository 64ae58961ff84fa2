//! Method-name parser for mlquery
//!
//! Turns a declarative repository method name into a [`PartTree`]:
//! a subject, `Or`-separated clauses of `And`-joined parts, and an optional
//! `OrderBy` sort. Parsing is purely textual; property references are
//! resolved later against entity metadata.

mod errors;
mod part;
mod tree;

pub use errors::{PartTreeError, PartTreeResult};
pub use part::{IgnoreCaseType, Part, PartType};
pub use tree::{OrPart, PartTree, Subject, SubjectKind};
