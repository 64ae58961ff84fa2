//! Criteria tree
//!
//! A criteria is either a leaf (qualified field + scalar value) or a
//! combinator over child criteria:
//! - `AND` / `OR` hold two or more children, in order
//! - `NOT` / `EXISTS` / `EMPTY` hold exactly one child
//!
//! The node representation is private so these arities hold for every
//! value of the type. `AND` / `OR` nodes may grow in place through
//! [`Criteria::append`]; nothing else changes after construction.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use crate::mapping::QName;

/// Combinator operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
    Not,
    Exists,
    Empty,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Exists => "exists",
            Operator::Empty => "empty",
        }
    }

    /// True for operators over a sequence of children
    pub fn is_group(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Borrowed view of what a criteria holds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CriteriaValue<'a> {
    /// Comparison operand of a leaf
    Scalar(&'a Value),
    /// Wrapped child of `NOT` / `EXISTS` / `EMPTY`
    Single(&'a Criteria),
    /// Children of `AND` / `OR`
    Many(&'a [Criteria]),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf { field: QName, value: Value },
    Group { operator: Operator, children: Vec<Criteria> },
    Wrap { operator: Operator, child: Box<Criteria> },
}

/// Predicate tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    node: Node,
}

impl Criteria {
    /// Equality / containment leaf
    pub fn leaf(field: QName, value: impl Into<Value>) -> Self {
        Self {
            node: Node::Leaf {
                field,
                value: value.into(),
            },
        }
    }

    /// Builds a combinator, checking its arity
    pub fn combine(operator: Operator, mut children: Vec<Criteria>) -> QueryResult<Self> {
        if operator.is_group() {
            if children.len() < 2 {
                return Err(QueryError::invalid_criteria(format!(
                    "{} requires at least two children, got {}",
                    operator,
                    children.len()
                )));
            }
            return Ok(Self {
                node: Node::Group { operator, children },
            });
        }

        match children.pop() {
            Some(child) if children.is_empty() => Ok(Self::wrap(operator, child)),
            _ => Err(QueryError::invalid_criteria(format!(
                "{} requires exactly one child",
                operator
            ))),
        }
    }

    fn wrap(operator: Operator, child: Criteria) -> Self {
        Self {
            node: Node::Wrap {
                operator,
                child: Box::new(child),
            },
        }
    }

    pub fn not(child: Criteria) -> Self {
        Self::wrap(Operator::Not, child)
    }

    pub fn exists(child: Criteria) -> Self {
        Self::wrap(Operator::Exists, child)
    }

    pub fn empty(child: Criteria) -> Self {
        Self::wrap(Operator::Empty, child)
    }

    /// Adds `child` to this `AND` / `OR` node in place.
    ///
    /// Only legal when this node's operator is `operator`.
    pub fn append(&mut self, operator: Operator, child: Criteria) -> QueryResult<()> {
        match &mut self.node {
            Node::Group {
                operator: current,
                children,
            } if *current == operator => {
                children.push(child);
                Ok(())
            }
            _ => Err(QueryError::invalid_criteria(format!(
                "cannot append to a {} criteria as {}",
                self.describe(),
                operator
            ))),
        }
    }

    /// Operator of a combinator; `None` for a leaf
    pub fn operator(&self) -> Option<Operator> {
        match &self.node {
            Node::Leaf { .. } => None,
            Node::Group { operator, .. } | Node::Wrap { operator, .. } => Some(*operator),
        }
    }

    /// Field of a leaf; `None` for a combinator
    pub fn field(&self) -> Option<&QName> {
        match &self.node {
            Node::Leaf { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn value(&self) -> CriteriaValue<'_> {
        match &self.node {
            Node::Leaf { value, .. } => CriteriaValue::Scalar(value),
            Node::Group { children, .. } => CriteriaValue::Many(children),
            Node::Wrap { child, .. } => CriteriaValue::Single(child),
        }
    }

    /// Direct children; empty for a leaf
    pub fn children(&self) -> &[Criteria] {
        match &self.node {
            Node::Leaf { .. } => &[],
            Node::Group { children, .. } => children,
            Node::Wrap { child, .. } => std::slice::from_ref(child.as_ref()),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node, Node::Leaf { .. })
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children().iter().map(Criteria::leaf_count).sum()
        }
    }

    fn describe(&self) -> String {
        match self.operator() {
            Some(operator) => operator.to_string(),
            None => "leaf".to_string(),
        }
    }
}

/// Single-line rendering, e.g. `({urn:p}lastname = "a" AND NOT({urn:p}age = 3))`
impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { field, value } => write!(f, "{} = {}", field, value),
            Node::Group { operator, children } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", operator)?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            Node::Wrap { operator, child } => write!(f, "{}({})", operator, child),
        }
    }
}

/// Leaves serialize as `{"field": .., "value": ..}`, combinators as
/// `{"operator": .., "value": ..}`.
impl Serialize for Criteria {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match &self.node {
            Node::Leaf { field, value } => {
                map.serialize_entry("field", field)?;
                map.serialize_entry("value", value)?;
            }
            Node::Group { operator, children } => {
                map.serialize_entry("operator", operator)?;
                map.serialize_entry("value", children)?;
            }
            Node::Wrap { operator, child } => {
                map.serialize_entry("operator", operator)?;
                map.serialize_entry("value", child)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::errors::QueryErrorCode;
    use serde_json::json;

    fn leaf(name: &str, value: Value) -> Criteria {
        Criteria::leaf(QName::new("urn:test", name), value)
    }

    #[test]
    fn test_leaf_accessors() {
        let c = leaf("lastname", json!("name"));
        assert!(c.is_leaf());
        assert_eq!(c.operator(), None);
        assert_eq!(c.field().unwrap().local_name(), "lastname");
        assert_eq!(c.value(), CriteriaValue::Scalar(&json!("name")));
        assert!(c.children().is_empty());
    }

    #[test]
    fn test_group_requires_two_children() {
        let err = Criteria::combine(Operator::And, vec![leaf("a", json!(1))]).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::MlqQueryInvalidCriteria);

        let err = Criteria::combine(Operator::Or, vec![]).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::MlqQueryInvalidCriteria);

        let ok = Criteria::combine(Operator::Or, vec![leaf("a", json!(1)), leaf("b", json!(2))]);
        assert_eq!(ok.unwrap().operator(), Some(Operator::Or));
    }

    #[test]
    fn test_wrap_requires_one_child() {
        assert!(Criteria::combine(Operator::Not, vec![]).is_err());
        assert!(Criteria::combine(
            Operator::Exists,
            vec![leaf("a", json!(1)), leaf("b", json!(2))]
        )
        .is_err());

        let not = Criteria::combine(Operator::Not, vec![leaf("a", json!(1))]).unwrap();
        assert_eq!(not.operator(), Some(Operator::Not));
        match not.value() {
            CriteriaValue::Single(inner) => assert_eq!(inner.field().unwrap().local_name(), "a"),
            other => panic!("expected single child, got {:?}", other),
        }
    }

    #[test]
    fn test_append_same_operator() {
        let mut and =
            Criteria::combine(Operator::And, vec![leaf("a", json!(1)), leaf("b", json!(2))]).unwrap();
        and.append(Operator::And, leaf("c", json!(3))).unwrap();

        assert_eq!(and.children().len(), 3);
        assert_eq!(and.children()[2].field().unwrap().local_name(), "c");
    }

    #[test]
    fn test_append_other_operator_rejected() {
        let mut or =
            Criteria::combine(Operator::Or, vec![leaf("a", json!(1)), leaf("b", json!(2))]).unwrap();
        assert!(or.append(Operator::And, leaf("c", json!(3))).is_err());

        let mut single = leaf("a", json!(1));
        assert!(single.append(Operator::And, leaf("b", json!(2))).is_err());

        let mut not = Criteria::not(leaf("a", json!(1)));
        assert!(not.append(Operator::Not, leaf("b", json!(2))).is_err());
    }

    #[test]
    fn test_leaf_count() {
        let tree = Criteria::combine(
            Operator::Or,
            vec![
                Criteria::combine(Operator::And, vec![leaf("a", json!(1)), leaf("b", json!(2))])
                    .unwrap(),
                Criteria::not(leaf("c", json!(3))),
            ],
        )
        .unwrap();
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_display() {
        let tree = Criteria::combine(
            Operator::And,
            vec![
                Criteria::leaf(QName::local("a"), json!("x")),
                Criteria::not(Criteria::leaf(QName::local("b"), json!(2))),
            ],
        )
        .unwrap();
        assert_eq!(tree.to_string(), r#"(a = "x" AND NOT(b = 2))"#);
    }

    #[test]
    fn test_serialize_shape() {
        let tree = Criteria::exists(Criteria::leaf(QName::new("urn:p", "address"), Value::Null));
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            json!({
                "operator": "exists",
                "value": {
                    "field": {"namespace": "urn:p", "local_name": "address"},
                    "value": null
                }
            })
        );
    }
}
