//! Method invocation parameters

use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::sort::Sort;
use crate::parser::Part;

/// Positional parameter values plus the dynamic sort of one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterAccessor {
    values: Vec<Value>,
    sort: Sort,
}

impl ParameterAccessor {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            sort: Sort::unsorted(),
        }
    }

    /// Sort passed at call time, applied after the `OrderBy` sort
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cursor positioned at the first value
    pub fn cursor(&self) -> ParameterCursor<'_> {
        ParameterCursor {
            values: &self.values,
            position: 0,
        }
    }
}

impl From<Vec<Value>> for ParameterAccessor {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Forward-only reader over parameter values.
///
/// Each value is handed out once.
#[derive(Debug)]
pub struct ParameterCursor<'a> {
    values: &'a [Value],
    position: usize,
}

impl<'a> ParameterCursor<'a> {
    /// Takes the next value on behalf of `part`
    pub fn next_for(&mut self, part: &Part) -> QueryResult<&'a Value> {
        let value = self
            .values
            .get(self.position)
            .ok_or_else(|| QueryError::missing_parameter(part.property(), self.position))?;
        self.position += 1;
        Ok(value)
    }
}
