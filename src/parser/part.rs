//! Method-name parts
//!
//! A part is one `And`-separated fragment of a method name: a property
//! reference followed by an optional keyword (`LastnameIsNot`,
//! `SkillsContaining`, `ActiveIsTrue`).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{PartTreeError, PartTreeResult};

/// Keyword-detected operation of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartType {
    Between,
    IsNotNull,
    IsNull,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Before,
    After,
    NotLike,
    Like,
    StartingWith,
    EndingWith,
    IsNotEmpty,
    IsEmpty,
    NotContaining,
    Containing,
    NotIn,
    In,
    Near,
    Within,
    Regex,
    Exists,
    True,
    False,
    NegatingSimpleProperty,
    SimpleProperty,
}

impl PartType {
    /// Detection order. Longer keywords sharing a suffix come first.
    pub const ALL: [PartType; 27] = [
        PartType::IsNotNull,
        PartType::IsNull,
        PartType::Between,
        PartType::LessThan,
        PartType::LessThanEqual,
        PartType::GreaterThan,
        PartType::GreaterThanEqual,
        PartType::Before,
        PartType::After,
        PartType::NotLike,
        PartType::Like,
        PartType::StartingWith,
        PartType::EndingWith,
        PartType::IsNotEmpty,
        PartType::IsEmpty,
        PartType::NotContaining,
        PartType::Containing,
        PartType::NotIn,
        PartType::In,
        PartType::Near,
        PartType::Within,
        PartType::Regex,
        PartType::Exists,
        PartType::True,
        PartType::False,
        PartType::NegatingSimpleProperty,
        PartType::SimpleProperty,
    ];

    /// Method-name keywords selecting this type
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            PartType::Between => &["IsBetween", "Between"],
            PartType::IsNotNull => &["IsNotNull", "NotNull"],
            PartType::IsNull => &["IsNull", "Null"],
            PartType::LessThan => &["IsLessThan", "LessThan"],
            PartType::LessThanEqual => &["IsLessThanEqual", "LessThanEqual"],
            PartType::GreaterThan => &["IsGreaterThan", "GreaterThan"],
            PartType::GreaterThanEqual => &["IsGreaterThanEqual", "GreaterThanEqual"],
            PartType::Before => &["IsBefore", "Before"],
            PartType::After => &["IsAfter", "After"],
            PartType::NotLike => &["IsNotLike", "NotLike"],
            PartType::Like => &["IsLike", "Like"],
            PartType::StartingWith => &["IsStartingWith", "StartingWith", "StartsWith"],
            PartType::EndingWith => &["IsEndingWith", "EndingWith", "EndsWith"],
            PartType::IsNotEmpty => &["IsNotEmpty", "NotEmpty"],
            PartType::IsEmpty => &["IsEmpty", "Empty"],
            PartType::NotContaining => &["IsNotContaining", "NotContaining", "NotContains"],
            PartType::Containing => &["IsContaining", "Containing", "Contains"],
            PartType::NotIn => &["IsNotIn", "NotIn"],
            PartType::In => &["IsIn", "In"],
            PartType::Near => &["IsNear", "Near"],
            PartType::Within => &["IsWithin", "Within"],
            PartType::Regex => &["MatchesRegex", "Matches", "Regex"],
            PartType::Exists => &["Exists"],
            PartType::True => &["IsTrue", "True"],
            PartType::False => &["IsFalse", "False"],
            PartType::NegatingSimpleProperty => &["IsNot", "Not"],
            PartType::SimpleProperty => &["Is", "Equals"],
        }
    }

    /// Number of method parameters a part of this type consumes
    pub fn num_args(&self) -> usize {
        match self {
            PartType::Between => 2,
            PartType::IsNotNull
            | PartType::IsNull
            | PartType::IsNotEmpty
            | PartType::IsEmpty
            | PartType::Exists
            | PartType::True
            | PartType::False => 0,
            _ => 1,
        }
    }

    /// Upper-case name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            PartType::Between => "BETWEEN",
            PartType::IsNotNull => "IS_NOT_NULL",
            PartType::IsNull => "IS_NULL",
            PartType::LessThan => "LESS_THAN",
            PartType::LessThanEqual => "LESS_THAN_EQUAL",
            PartType::GreaterThan => "GREATER_THAN",
            PartType::GreaterThanEqual => "GREATER_THAN_EQUAL",
            PartType::Before => "BEFORE",
            PartType::After => "AFTER",
            PartType::NotLike => "NOT_LIKE",
            PartType::Like => "LIKE",
            PartType::StartingWith => "STARTING_WITH",
            PartType::EndingWith => "ENDING_WITH",
            PartType::IsNotEmpty => "IS_NOT_EMPTY",
            PartType::IsEmpty => "IS_EMPTY",
            PartType::NotContaining => "NOT_CONTAINING",
            PartType::Containing => "CONTAINING",
            PartType::NotIn => "NOT_IN",
            PartType::In => "IN",
            PartType::Near => "NEAR",
            PartType::Within => "WITHIN",
            PartType::Regex => "REGEX",
            PartType::Exists => "EXISTS",
            PartType::True => "TRUE",
            PartType::False => "FALSE",
            PartType::NegatingSimpleProperty => "NEGATING_SIMPLE_PROPERTY",
            PartType::SimpleProperty => "SIMPLE_PROPERTY",
        }
    }

    /// Detects the type from the keyword suffix of `source`.
    ///
    /// Returns the type and the remaining property reference. A keyword only
    /// matches when something is left in front of it; no match means
    /// [`PartType::SimpleProperty`] on the whole source.
    pub fn from_source(source: &str) -> (PartType, &str) {
        for part_type in PartType::ALL {
            for keyword in part_type.keywords() {
                if source.len() > keyword.len() && source.ends_with(keyword) {
                    return (part_type, &source[..source.len() - keyword.len()]);
                }
            }
        }
        (PartType::SimpleProperty, source)
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Case sensitivity requested for a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IgnoreCaseType {
    /// Case-sensitive comparison
    #[default]
    Never,
    /// `IgnoreCase` on the part itself
    Always,
    /// `AllIgnoreCase` on the method; applies where the property allows it
    WhenPossible,
}

/// A single property condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Fragment as it appeared in the method name
    source: String,
    /// Property reference with keyword and `IgnoreCase` removed
    property: String,
    part_type: PartType,
    ignore_case: IgnoreCaseType,
}

fn ignore_case_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("Ignor(ing|e)Case").expect("static pattern"))
}

impl Part {
    /// Parses one fragment.
    ///
    /// `always_ignore_case` is set when the method carries `AllIgnoreCase`.
    pub fn parse(method: &str, source: &str, always_ignore_case: bool) -> PartTreeResult<Self> {
        let (stripped, ignore_case) = match ignore_case_pattern().find(source) {
            Some(m) => (
                format!("{}{}", &source[..m.start()], &source[m.end()..]),
                IgnoreCaseType::Always,
            ),
            None if always_ignore_case => (source.to_string(), IgnoreCaseType::WhenPossible),
            None => (source.to_string(), IgnoreCaseType::Never),
        };

        let (part_type, property) = PartType::from_source(&stripped);
        if property.is_empty() {
            return Err(PartTreeError::EmptyProperty {
                method: method.to_string(),
                part: source.to_string(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            property: property.to_string(),
            part_type,
            ignore_case,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Property reference, e.g. `AddressCountry`
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn part_type(&self) -> PartType {
        self.part_type
    }

    pub fn ignore_case(&self) -> IgnoreCaseType {
        self.ignore_case
    }

    pub fn num_args(&self) -> usize {
        self.part_type.num_args()
    }
}
