//! Sort requests and resolved sort specifications

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mapping::QName;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Requested ordering on an unresolved property reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Property reference (`Lastname`, `AddressCountry`, `address.country`)
    pub property: String,
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Asc)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Desc)
    }
}

/// Ordered list of sort requests
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Appends the orders of `other` after this sort's own
    pub fn and(mut self, other: &Sort) -> Self {
        self.orders.extend(other.orders.iter().cloned());
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Sort entry resolved against entity metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    /// Qualified stored name
    pub field: QName,
    /// Dotted property path, e.g. `address.country`
    pub property: String,
    pub direction: Direction,
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_and_keeps_order() {
        let sort = Sort::by(vec![Order::desc("Age")]).and(&Sort::by(vec![Order::asc("Lastname")]));
        assert_eq!(sort.orders(), &[Order::desc("Age"), Order::asc("Lastname")]);
    }

    #[test]
    fn test_sort_json_shape() {
        let sort: Sort = serde_json::from_str(r#"[{"property": "age", "direction": "desc"}, {"property": "lastname"}]"#).unwrap();
        assert_eq!(sort.orders(), &[Order::desc("age"), Order::asc("lastname")]);
    }

    #[test]
    fn test_unsorted_is_empty() {
        assert!(Sort::unsorted().is_empty());
        assert_eq!(Direction::default(), Direction::Asc);
    }
}
