//! Derived query

use serde::Serialize;

use super::criteria::Criteria;
use super::sort::SortSpec;

/// Result of one derivation, handed to the store driver as-is
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Query {
    /// Root criteria; `None` matches every document
    #[serde(skip_serializing_if = "Option::is_none")]
    criteria: Option<Criteria>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sort: Vec<SortSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    distinct: bool,
}

impl Query {
    pub fn new(criteria: Option<Criteria>) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    /// Query without criteria
    pub fn unconditional() -> Self {
        Self::default()
    }

    pub fn with_sort(mut self, sort: Vec<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn criteria(&self) -> Option<&Criteria> {
        self.criteria.as_ref()
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_unconditional(&self) -> bool {
        self.criteria.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::QName;
    use crate::query::Direction;
    use serde_json::json;

    #[test]
    fn test_unconditional_serializes_empty() {
        let query = Query::unconditional();
        assert!(query.is_unconditional());
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({}));
    }

    #[test]
    fn test_full_query_json() {
        let query = Query::new(Some(Criteria::leaf(QName::local("lastname"), "x")))
            .with_sort(vec![SortSpec {
                field: QName::local("age"),
                property: "age".to_string(),
                direction: Direction::Desc,
            }])
            .with_limit(Some(3))
            .with_distinct(true);

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "criteria": {
                    "field": {"namespace": "", "local_name": "lastname"},
                    "value": "x"
                },
                "sort": [{
                    "field": {"namespace": "", "local_name": "age"},
                    "property": "age",
                    "direction": "desc"
                }],
                "limit": 3,
                "distinct": true
            })
        );
    }
}
