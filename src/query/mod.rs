//! Query derivation for mlquery
//!
//! Translates a parsed method name plus invocation parameters into a
//! [`Query`]: a criteria tree over namespace-qualified fields, a resolved
//! sort, and the limit / distinct flags of the method subject.
//!
//! # Usage
//!
//! ```ignore
//! use mlquery::query::{derive_query_for_method, ParameterAccessor};
//!
//! let params = ParameterAccessor::new(vec![json!("Doe"), json!("FR")]);
//! let query = derive_query_for_method(
//!     "findByLastnameAndAddressCountry",
//!     &params,
//!     &context,
//!     "Person",
//! )?;
//! ```

mod creator;
mod criteria;
mod errors;
mod explain;
mod params;
#[allow(clippy::module_inception)]
mod query;
mod sort;

pub use creator::{derive_query, derive_query_for_method, QueryCreator};
pub use criteria::{Criteria, CriteriaValue, Operator};
pub use errors::{QueryError, QueryErrorCode, QueryResult, Severity};
pub use explain::QueryExplain;
pub use params::{ParameterAccessor, ParameterCursor};
pub use query::Query;
pub use sort::{Direction, Order, Sort, SortSpec};
