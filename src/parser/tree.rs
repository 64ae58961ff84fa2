//! Part tree: the parsed form of a derived query method name
//!
//! `findDistinctFirst3ByLastnameAndAddressCountryOrActiveIsTrueOrderByAgeDesc`
//! parses into:
//! - subject: find, distinct, max 3 results
//! - clauses: `[Lastname, AddressCountry]` OR `[ActiveIsTrue]`
//! - sort: `Age` descending
//!
//! `Or`, `And` and `OrderBy` only separate fragments when followed by an
//! upper-case (or non-ASCII) character, so `Organization` or `Android` stay
//! intact.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::errors::{PartTreeError, PartTreeResult};
use super::part::Part;
use crate::query::{Direction, Order, Sort};

const ORDER_BY: &str = "OrderBy";

/// What the derived query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Find,
    Count,
    Exists,
    Delete,
}

/// Everything in front of `By`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub kind: SubjectKind,
    pub distinct: bool,
    /// `First<N>` / `Top<N>`; no number means one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

/// `And`-joined parts of one `Or` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrPart {
    parts: Vec<Part>,
}

impl OrPart {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }
}

/// Parsed method name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartTree {
    source: String,
    subject: Subject,
    clauses: Vec<OrPart>,
    sort: Sort,
    all_ignore_case: bool,
}

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(find|read|get|query|search|stream|count|exists|delete|remove)(\p{Lu}.*?)??By")
            .expect("static pattern")
    })
}

fn limiting_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:find|read|get|query|search|stream)(?:Distinct)?(?:First|Top)(\d*)(?:\p{Lu}.*?)??By")
            .expect("static pattern")
    })
}

fn all_ignore_case_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("AllIgnor(ing|e)Case").expect("static pattern"))
}

impl PartTree {
    /// Parses a method name
    pub fn parse(method: &str) -> PartTreeResult<Self> {
        let captures = prefix_pattern()
            .captures(method)
            .ok_or_else(|| PartTreeError::InvalidMethodName(method.to_string()))?;

        let subject_text = &captures[0];
        let subject = parse_subject(method, &captures[1], subject_text)?;

        let mut predicate = method[subject_text.len()..].to_string();
        let all_ignore_case = match all_ignore_case_pattern().find(&predicate).map(|m| m.range()) {
            Some(range) => {
                predicate.replace_range(range, "");
                true
            }
            None => false,
        };

        let blocks = split_keyword(&predicate, ORDER_BY);
        if blocks.len() > 2 {
            return Err(PartTreeError::DuplicateOrderBy(method.to_string()));
        }

        let mut clauses = Vec::new();
        for clause in split_keyword(blocks[0], "Or") {
            if clause.is_empty() {
                continue;
            }

            let parts = split_keyword(clause, "And")
                .into_iter()
                .filter(|part| !part.is_empty())
                .map(|part| Part::parse(method, part, all_ignore_case))
                .collect::<PartTreeResult<Vec<_>>>()?;

            if !parts.is_empty() {
                clauses.push(OrPart { parts });
            }
        }

        let sort = match blocks.get(1) {
            Some(order_by) => parse_order_by(order_by)?,
            None => Sort::unsorted(),
        };

        Ok(Self {
            source: method.to_string(),
            subject,
            clauses,
            sort,
            all_ignore_case,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// `Or`-separated clauses in declaration order
    pub fn clauses(&self) -> &[OrPart] {
        &self.clauses
    }

    /// All parts in declaration order
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.clauses.iter().flat_map(OrPart::iter)
    }

    /// Static sort from the `OrderBy` clause
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// True when the method has no condition (`findAllBy`, `findByOrderByAge`)
    pub fn is_unconditional(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn is_all_ignore_case(&self) -> bool {
        self.all_ignore_case
    }

    /// Number of method parameters the predicate consumes
    pub fn parameter_count(&self) -> usize {
        self.parts().map(Part::num_args).sum()
    }
}

fn parse_subject(method: &str, verb: &str, subject_text: &str) -> PartTreeResult<Subject> {
    let kind = match verb {
        "count" => SubjectKind::Count,
        "exists" => SubjectKind::Exists,
        "delete" | "remove" => SubjectKind::Delete,
        _ => SubjectKind::Find,
    };

    let max_results = match limiting_pattern().captures(subject_text) {
        Some(limit) => match &limit[1] {
            "" => Some(1),
            digits => Some(digits.parse().map_err(|_| PartTreeError::InvalidLimit {
                method: method.to_string(),
                limit: digits.to_string(),
            })?),
        },
        None => None,
    };

    Ok(Subject {
        kind,
        distinct: subject_text.contains("Distinct"),
        max_results,
    })
}

/// Splits `text` at every `keyword` followed by an upper-case or non-ASCII character
fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(offset) = text[search..].find(keyword) {
        let at = search + offset;
        let end = at + keyword.len();
        let boundary = text[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase() || !c.is_ascii());

        if boundary {
            segments.push(&text[start..at]);
            start = end;
            search = end;
        } else {
            search = at + 1;
        }
    }

    segments.push(&text[start..]);
    segments
}

/// `LastnameAscAgeDesc` -> `[Lastname asc, Age desc]`
fn parse_order_by(clause: &str) -> PartTreeResult<Sort> {
    let mut blocks = Vec::new();
    let mut start = 0;
    for (i, c) in clause.char_indices() {
        if i > start && c.is_uppercase() {
            let head = &clause[start..i];
            if head.ends_with("Asc") || head.ends_with("Desc") {
                blocks.push(head);
                start = i;
            }
        }
    }
    blocks.push(&clause[start..]);

    let mut orders = Vec::with_capacity(blocks.len());
    for block in blocks {
        let (property, direction) = if let Some(property) = block.strip_suffix("Desc") {
            (property, Direction::Desc)
        } else if let Some(property) = block.strip_suffix("Asc") {
            (property, Direction::Asc)
        } else {
            (block, Direction::Asc)
        };

        if property.is_empty() {
            return Err(PartTreeError::InvalidOrderBy(block.to_string()));
        }

        orders.push(Order::new(property, direction));
    }

    Ok(Sort::by(orders))
}
