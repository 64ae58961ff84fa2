//! Part tree to query translation
//!
//! The creator folds a [`PartTree`] into one criteria:
//! - parts inside a clause are merged with `AND`
//! - clauses are merged with `OR`
//!
//! Merging appends to the base when it already carries the operator and
//! otherwise wraps base and new criteria in a fresh two-child node. The
//! result is packaged with the resolved sort, limit and distinct flag.
//!
//! Derivation is deterministic and side-effect free: the same tree,
//! parameters and metadata always yield the same query.

use serde_json::Value;

use super::criteria::{Criteria, Operator};
use super::errors::{QueryError, QueryResult};
use super::params::{ParameterAccessor, ParameterCursor};
use super::query::Query;
use super::sort::SortSpec;
use crate::mapping::{PropertyPath, PropertyPathResolver, QName};
use crate::parser::{Part, PartTree, PartType};

/// Derives one query for one method invocation
pub struct QueryCreator<'a, R: PropertyPathResolver + ?Sized> {
    tree: &'a PartTree,
    parameters: &'a ParameterAccessor,
    resolver: &'a R,
    entity: &'a str,
}

impl<'a, R: PropertyPathResolver + ?Sized> QueryCreator<'a, R> {
    pub fn new(
        tree: &'a PartTree,
        parameters: &'a ParameterAccessor,
        resolver: &'a R,
        entity: &'a str,
    ) -> Self {
        Self {
            tree,
            parameters,
            resolver,
            entity,
        }
    }

    /// Runs the derivation.
    ///
    /// Any failure aborts the whole derivation; no partial query is returned.
    pub fn create_query(&self) -> QueryResult<Query> {
        let mut cursor = self.parameters.cursor();
        let mut base: Option<Criteria> = None;

        for clause in self.tree.clauses() {
            let mut parts = clause.iter();
            let Some(first) = parts.next() else {
                continue;
            };

            let mut criteria = self.create(first, &mut cursor)?;
            for part in parts {
                criteria = self.and(part, criteria, &mut cursor)?;
            }

            base = Some(match base {
                None => criteria,
                Some(base) => self.or(base, criteria)?,
            });
        }

        self.complete(base)
    }

    /// Translates one part into a criteria
    fn create(&self, part: &Part, cursor: &mut ParameterCursor<'_>) -> QueryResult<Criteria> {
        let path = self.resolve(part.property())?;
        let field = leaf_field(&path)?;
        from_part(part, field, cursor)
    }

    fn and(
        &self,
        part: &Part,
        base: Criteria,
        cursor: &mut ParameterCursor<'_>,
    ) -> QueryResult<Criteria> {
        let criteria = self.create(part, cursor)?;
        merge(Operator::And, base, criteria)
    }

    fn or(&self, base: Criteria, criteria: Criteria) -> QueryResult<Criteria> {
        merge(Operator::Or, base, criteria)
    }

    fn complete(&self, criteria: Option<Criteria>) -> QueryResult<Query> {
        let subject = self.tree.subject();
        Ok(Query::new(criteria)
            .with_sort(self.resolve_sort()?)
            .with_limit(subject.max_results)
            .with_distinct(subject.distinct))
    }

    /// `OrderBy` sort first, then the dynamic sort
    fn resolve_sort(&self) -> QueryResult<Vec<SortSpec>> {
        let sort = self.tree.sort().clone().and(self.parameters.sort());
        sort.iter()
            .map(|order| {
                let path = self.resolve(&order.property)?;
                Ok(SortSpec {
                    field: leaf_field(&path)?,
                    property: path.dot_path(),
                    direction: order.direction,
                })
            })
            .collect()
    }

    fn resolve(&self, property: &str) -> QueryResult<PropertyPath> {
        self.resolver
            .resolve(self.entity, property)
            .map_err(|e| QueryError::mapping_failed(property, e))
    }
}

/// Derives the query for an already parsed method name
pub fn derive_query<R: PropertyPathResolver + ?Sized>(
    tree: &PartTree,
    parameters: &ParameterAccessor,
    resolver: &R,
    entity: &str,
) -> QueryResult<Query> {
    QueryCreator::new(tree, parameters, resolver, entity).create_query()
}

/// Parses `method` and derives its query
pub fn derive_query_for_method<R: PropertyPathResolver + ?Sized>(
    method: &str,
    parameters: &ParameterAccessor,
    resolver: &R,
    entity: &str,
) -> QueryResult<Query> {
    let tree = PartTree::parse(method)?;
    derive_query(&tree, parameters, resolver, entity)
}

fn leaf_field(path: &PropertyPath) -> QueryResult<QName> {
    path.leaf()
        .map(|segment| segment.qname.clone())
        .ok_or_else(|| QueryError::no_leaf_property(path.source()))
}

/// Appends to `base` when it already is an `operator` node, wraps otherwise
fn merge(operator: Operator, mut base: Criteria, criteria: Criteria) -> QueryResult<Criteria> {
    if base.operator() == Some(operator) {
        base.append(operator, criteria)?;
        Ok(base)
    } else {
        Criteria::combine(operator, vec![base, criteria])
    }
}

fn from_part(
    part: &Part,
    field: QName,
    cursor: &mut ParameterCursor<'_>,
) -> QueryResult<Criteria> {
    match part.part_type() {
        PartType::SimpleProperty => expand(part, field, cursor.next_for(part)?, Operator::And),
        PartType::In | PartType::Containing => {
            expand(part, field, cursor.next_for(part)?, Operator::Or)
        }
        PartType::True => Ok(Criteria::leaf(field, true)),
        PartType::False => Ok(Criteria::leaf(field, false)),
        PartType::NegatingSimpleProperty => Ok(Criteria::not(expand(
            part,
            field,
            cursor.next_for(part)?,
            Operator::And,
        )?)),
        PartType::NotIn | PartType::NotContaining => Ok(Criteria::not(expand(
            part,
            field,
            cursor.next_for(part)?,
            Operator::Or,
        )?)),
        PartType::Exists => Ok(Criteria::exists(Criteria::leaf(field, Value::Null))),
        PartType::IsEmpty => Ok(Criteria::empty(Criteria::leaf(field, Value::Null))),
        other => Err(QueryError::unsupported_keyword(other, part.property())),
    }
}

/// One leaf per array element joined by `operator`; a scalar is one leaf.
///
/// Equality on several values means all of them (`AND`), containment means
/// any of them (`OR`).
fn expand(part: &Part, field: QName, value: &Value, operator: Operator) -> QueryResult<Criteria> {
    let Value::Array(items) = value else {
        return Ok(Criteria::leaf(field, value.clone()));
    };

    match items.as_slice() {
        [] => Err(QueryError::invalid_parameter(
            part.property(),
            "an empty array matches nothing",
        )),
        [single] => Ok(Criteria::leaf(field, single.clone())),
        many => Criteria::combine(
            operator,
            many.iter()
                .map(|item| Criteria::leaf(field.clone(), item.clone()))
                .collect(),
        ),
    }
}
