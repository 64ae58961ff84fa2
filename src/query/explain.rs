//! Explain output for derived queries
//!
//! Deterministic, human-readable rendering of a derivation outcome.

use std::fmt;

use super::criteria::{Criteria, CriteriaValue};
use super::errors::QueryError;
use super::query::Query;

/// Explain output
#[derive(Debug, Clone)]
pub struct QueryExplain {
    /// Whether derivation succeeded
    pub accepted: bool,
    /// Method name the query was derived from
    pub method: String,
    /// Criteria tree, one line per node, already indented
    pub criteria: Vec<String>,
    /// Number of field conditions in the tree
    pub conditions: usize,
    /// Sort entries, e.g. `{urn:person}age desc`
    pub sort: Vec<String>,
    pub limit: Option<usize>,
    pub distinct: bool,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl QueryExplain {
    /// Creates an explain from a derived query
    pub fn from_query(method: impl Into<String>, query: &Query) -> Self {
        let mut criteria = Vec::new();
        let mut conditions = 0;
        if let Some(root) = query.criteria() {
            render(root, 0, &mut criteria);
            conditions = root.leaf_count();
        }

        Self {
            accepted: true,
            method: method.into(),
            criteria,
            conditions,
            sort: query.sort().iter().map(ToString::to_string).collect(),
            limit: query.limit(),
            distinct: query.is_distinct(),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain from a derivation error
    pub fn from_error(method: impl Into<String>, err: &QueryError) -> Self {
        Self {
            accepted: false,
            method: method.into(),
            criteria: Vec::new(),
            conditions: 0,
            sort: Vec::new(),
            limit: None,
            distinct: false,
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }
}

fn render(criteria: &Criteria, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match (criteria.operator(), criteria.value()) {
        (Some(operator), CriteriaValue::Single(child)) => {
            lines.push(format!("{}{}", indent, operator));
            render(child, depth + 1, lines);
        }
        (Some(operator), CriteriaValue::Many(children)) => {
            lines.push(format!("{}{}", indent, operator));
            for child in children {
                render(child, depth + 1, lines);
            }
        }
        _ => lines.push(format!("{}{}", indent, criteria)),
    }
}

impl fmt::Display for QueryExplain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN QUERY ===")?;
        writeln!(f, "Method: {}", self.method)?;

        if !self.accepted {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            return Ok(());
        }

        writeln!(f, "Status: ACCEPTED")?;
        if self.criteria.is_empty() {
            writeln!(f, "Criteria: none (all documents)")?;
        } else {
            writeln!(f, "Criteria ({} conditions):", self.conditions)?;
            for line in &self.criteria {
                writeln!(f, "  {}", line)?;
            }
        }
        if !self.sort.is_empty() {
            writeln!(f, "Sort: {}", self.sort.join(", "))?;
        }
        if let Some(limit) = self.limit {
            writeln!(f, "Limit: {}", limit)?;
        }
        if self.distinct {
            writeln!(f, "Distinct: yes")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::QName;
    use crate::query::criteria::Operator;
    use serde_json::json;

    fn sample() -> Query {
        let tree = Criteria::combine(
            Operator::Or,
            vec![
                Criteria::combine(
                    Operator::And,
                    vec![
                        Criteria::leaf(QName::local("lastname"), json!("Doe")),
                        Criteria::not(Criteria::leaf(QName::local("age"), json!(3))),
                    ],
                )
                .unwrap(),
                Criteria::leaf(QName::local("firstname"), json!("John")),
            ],
        )
        .unwrap();
        Query::new(Some(tree)).with_limit(Some(1))
    }

    #[test]
    fn test_explain_tree_lines() {
        let explain = QueryExplain::from_query("findByLastnameAndAgeNotOrFirstname", &sample());

        assert!(explain.accepted);
        assert_eq!(explain.conditions, 3);
        assert_eq!(
            explain.criteria,
            vec![
                "OR",
                "  AND",
                "    lastname = \"Doe\"",
                "    NOT",
                "      age = 3",
                "  firstname = \"John\"",
            ]
        );

        let output = explain.to_string();
        assert!(output.contains("ACCEPTED"));
        assert!(output.contains("Criteria (3 conditions):"));
        assert!(output.contains("Limit: 1"));
    }

    #[test]
    fn test_explain_unconditional() {
        let output = QueryExplain::from_query("findAllBy", &Query::unconditional()).to_string();
        assert!(output.contains("all documents"));
    }

    #[test]
    fn test_explain_rejected() {
        let err = QueryError::missing_parameter("Age", 1);
        let explain = QueryExplain::from_error("findByLastnameAndAge", &err);

        assert!(!explain.accepted);
        let output = explain.to_string();
        assert!(output.contains("REJECTED"));
        assert!(output.contains("MLQ_QUERY_MISSING_PARAMETER"));
    }

    #[test]
    fn test_explain_deterministic() {
        let first = QueryExplain::from_query("m", &sample()).to_string();
        let second = QueryExplain::from_query("m", &sample()).to_string();
        assert_eq!(first, second);
    }
}
