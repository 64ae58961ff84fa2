//! Observable events
//!
//! Events are explicit and typed; each carries a fixed severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in mlquery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file read and validated
    ConfigLoaded,
    /// Entity definitions registered
    EntitiesLoaded,
    /// Query derived from a method name
    QueryDerived,
    /// Derivation rejected
    QueryRejected,
    /// A CLI command failed before or after derivation
    CommandFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::EntitiesLoaded => "ENTITIES_LOADED",
            Event::QueryDerived => "QUERY_DERIVED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// One line per derivation is only worth it when tracing
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::EntitiesLoaded => Severity::Info,
            Event::QueryDerived => Severity::Trace,
            Event::QueryRejected => Severity::Warn,
            Event::CommandFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
