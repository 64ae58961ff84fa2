//! CLI command implementations
//!
//! Every command follows the same sequence:
//! 1. Load and validate configuration
//! 2. Apply the configured log level
//! 3. Load entity definitions
//! 4. Read parameters from stdin, derive, write one response
//!
//! `parse` skips steps 1-3; it needs no metadata.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::mapping::{EntityLoader, MappingContext};
use crate::observability::{log_event, Event, Logger, Severity};
use crate::parser::{IgnoreCaseType, Part, PartTree};
use crate::query::{
    derive_query_for_method, ParameterAccessor, Query, QueryExplain, QueryResult, Sort,
};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{
    error_response, ok_response, read_request, write_error, write_json, write_response, write_text,
};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of entity definition files (required).
    /// Relative paths are taken from the config file's directory.
    pub entity_dir: String,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Namespace for entities that declare none (optional, default none)
    #[serde(default)]
    pub default_namespace: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.entity_dir.trim().is_empty() {
            return Err(CliError::Config("entity_dir must not be empty".into()));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::Config(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// Entity directory resolved against the config file location
    pub fn entity_path(&self, config_path: &Path) -> PathBuf {
        let dir = Path::new(&self.entity_dir);
        match config_path.parent() {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir.to_path_buf(),
        }
    }
}

/// Parameters as sent on stdin: a bare array or `{parameters, sort}`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeriveRequest {
    #[serde(default)]
    parameters: Vec<Value>,
    #[serde(default)]
    sort: Sort,
}

/// Run the CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match &cmd {
        Command::Derive {
            config,
            entity,
            method,
        } => derive(config, entity, method),
        Command::Explain {
            config,
            entity,
            method,
        } => explain(config, entity, method),
        Command::Parse { method } => parse(method),
    };

    if let Err(e) = &result {
        let message = e.to_string();
        log_event(
            Event::CommandFailed,
            &[("code", e.code()), ("message", message.as_str())],
        );
    }
    result
}

/// Derive a query and write it as a JSON response
pub fn derive(config_path: &Path, entity: &str, method: &str) -> CliResult<()> {
    let context = load_context(config_path)?;
    let parameters = to_parameters(read_request()?)?;
    write_json(&derive_response(&context, entity, method, &parameters)?)
}

/// Derive a query and print the explain text
pub fn explain(config_path: &Path, entity: &str, method: &str) -> CliResult<()> {
    let context = load_context(config_path)?;
    let parameters = to_parameters(read_request()?)?;
    write_text(&explain_text(&context, entity, method, &parameters))
}

/// Parse a method name and write the part tree
pub fn parse(method: &str) -> CliResult<()> {
    match PartTree::parse(method) {
        Ok(tree) => write_response(tree_json(&tree)),
        Err(e) => write_error(e.code(), &e.to_string()),
    }
}

/// Loads config, applies the log level and reads entity definitions
pub fn load_context(config_path: &Path) -> CliResult<MappingContext> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity());

    let entity_dir = config.entity_path(config_path);
    let entity_dir_str = entity_dir.display().to_string();
    log_event(
        Event::ConfigLoaded,
        &[
            ("entity_dir", entity_dir_str.as_str()),
            ("log_level", config.log_level.as_str()),
        ],
    );

    let context = EntityLoader::new(&entity_dir)
        .with_default_namespace(config.default_namespace.as_str())
        .load()?;

    let count = context.entity_count().to_string();
    let names = context.entity_names().join(",");
    log_event(
        Event::EntitiesLoaded,
        &[("count", count.as_str()), ("entities", names.as_str())],
    );

    Ok(context)
}

pub(crate) fn to_parameters(request: Option<Value>) -> CliResult<ParameterAccessor> {
    match request {
        None => Ok(ParameterAccessor::default()),
        Some(Value::Array(values)) => Ok(ParameterAccessor::new(values)),
        Some(object @ Value::Object(_)) => {
            let request: DeriveRequest = serde_json::from_value(object)
                .map_err(|e| CliError::InvalidRequest(e.to_string()))?;
            Ok(ParameterAccessor::new(request.parameters).with_sort(request.sort))
        }
        Some(other) => Err(CliError::InvalidRequest(format!(
            "expected a parameter array or object, got {}",
            other
        ))),
    }
}

/// Response body for `derive`; rejections become error responses
pub(crate) fn derive_response(
    context: &MappingContext,
    entity: &str,
    method: &str,
    parameters: &ParameterAccessor,
) -> CliResult<Value> {
    match derive_logged(context, entity, method, parameters) {
        Ok(query) => Ok(ok_response(serde_json::to_value(&query)?)),
        Err(e) => Ok(error_response(e.code().code(), e.message())),
    }
}

pub(crate) fn explain_text(
    context: &MappingContext,
    entity: &str,
    method: &str,
    parameters: &ParameterAccessor,
) -> String {
    let explain = match derive_logged(context, entity, method, parameters) {
        Ok(query) => QueryExplain::from_query(method, &query),
        Err(e) => QueryExplain::from_error(method, &e),
    };
    explain.to_string()
}

/// Derives a query and logs `QUERY_DERIVED` or `QUERY_REJECTED`
fn derive_logged(
    context: &MappingContext,
    entity: &str,
    method: &str,
    parameters: &ParameterAccessor,
) -> QueryResult<Query> {
    let result = derive_query_for_method(method, parameters, context, entity);
    match &result {
        Ok(query) => {
            let criteria = query
                .criteria()
                .map(ToString::to_string)
                .unwrap_or_else(|| "*".to_string());
            let sort = query
                .sort()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            log_event(
                Event::QueryDerived,
                &[
                    ("method", method),
                    ("entity", entity),
                    ("criteria", criteria.as_str()),
                    ("sort", sort.as_str()),
                ],
            );
        }
        Err(e) => log_event(
            Event::QueryRejected,
            &[
                ("method", method),
                ("entity", entity),
                ("code", e.code().code()),
                ("message", e.message()),
            ],
        ),
    }
    result
}

fn tree_json(tree: &PartTree) -> Value {
    let clauses: Vec<Vec<Value>> = tree
        .clauses()
        .iter()
        .map(|clause| clause.iter().map(part_json).collect())
        .collect();

    json!({
        "method": tree.source(),
        "subject": tree.subject(),
        "clauses": clauses,
        "sort": tree.sort(),
        "all_ignore_case": tree.is_all_ignore_case(),
        "parameter_count": tree.parameter_count(),
    })
}

fn part_json(part: &Part) -> Value {
    let ignore_case = match part.ignore_case() {
        IgnoreCaseType::Never => "never",
        IgnoreCaseType::Always => "always",
        IgnoreCaseType::WhenPossible => "when_possible",
    };

    json!({
        "source": part.source(),
        "property": part.property(),
        "type": part.part_type().name(),
        "ignore_case": ignore_case,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::capture_events;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir, extra: Value) -> PathBuf {
        let entities = temp_dir.path().join("entities");
        fs::create_dir_all(&entities).unwrap();

        fs::write(
            entities.join("entity_Person.json"),
            json!({
                "name": "Person",
                "properties": [
                    {"name": "lastname", "type": "simple"},
                    {"name": "skills", "type": "collection", "element": {"type": "simple"}},
                    {"name": "address", "type": "entity", "entity": "Address"}
                ]
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            entities.join("entity_Address.json"),
            json!({
                "name": "Address",
                "namespace": "urn:address",
                "properties": [{"name": "country", "type": "simple"}]
            })
            .to_string(),
        )
        .unwrap();

        let mut config = json!({"entity_dir": "entities", "default_namespace": "urn:person"});
        if let (Some(obj), Value::Object(extra)) = (config.as_object_mut(), extra) {
            obj.extend(extra);
        }

        let config_path = temp_dir.path().join("mlquery.json");
        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_config(&temp_dir, json!({}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_severity(), Severity::Info);
        assert_eq!(config.entity_path(&path), temp_dir.path().join("entities"));
    }

    #[test]
    fn test_config_rejects_bad_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_config(&temp_dir, json!({"log_level": "loud"}));

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), "MLQ_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::load(Path::new("/nonexistent/mlquery.json")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_derive_response_ok() {
        let temp_dir = TempDir::new().unwrap();
        let context = load_context(&create_config(&temp_dir, json!({}))).unwrap();
        let params = to_parameters(Some(json!(["Doe", "FR"]))).unwrap();

        let response =
            derive_response(&context, "Person", "findByLastnameAndAddressCountry", &params)
                .unwrap();

        assert_eq!(response["status"], "ok");
        let children = &response["data"]["criteria"]["value"];
        assert_eq!(response["data"]["criteria"]["operator"], "and");
        assert_eq!(children[0]["field"]["namespace"], "urn:person");
        assert_eq!(children[1]["field"]["namespace"], "urn:address");
        assert_eq!(children[1]["value"], "FR");
    }

    #[test]
    fn test_derive_response_rejection() {
        let temp_dir = TempDir::new().unwrap();
        let context = load_context(&create_config(&temp_dir, json!({}))).unwrap();
        let params = to_parameters(Some(json!([3]))).unwrap();

        let response =
            derive_response(&context, "Person", "findByLastnameGreaterThan", &params).unwrap();

        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "MLQ_QUERY_UNSUPPORTED_KEYWORD");
    }

    #[test]
    fn test_derivation_outcomes_logged() {
        let temp_dir = TempDir::new().unwrap();
        let context = load_context(&create_config(&temp_dir, json!({}))).unwrap();
        let params = to_parameters(Some(json!(["Doe"]))).unwrap();

        let (_, lines) = capture_events(|| {
            derive_response(&context, "Person", "findByLastname", &params).unwrap();
            explain_text(&context, "Person", "findByNickname", &params);
        });

        let parsed: Vec<Value> = lines
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["event"], "QUERY_DERIVED");
        assert_eq!(parsed[0]["method"], "findByLastname");
        assert_eq!(parsed[1]["event"], "QUERY_REJECTED");
        assert_eq!(parsed[1]["severity"], "WARN");
        assert_eq!(parsed[1]["code"], "MLQ_QUERY_MAPPING_FAILED");
    }

    #[test]
    fn test_request_object_with_sort() {
        let params = to_parameters(Some(json!({
            "parameters": ["Doe"],
            "sort": [{"property": "lastname", "direction": "desc"}]
        })))
        .unwrap();

        assert_eq!(params.len(), 1);
        assert_eq!(params.sort().orders().len(), 1);
    }

    #[test]
    fn test_request_rejects_scalar_and_unknown_keys() {
        assert!(matches!(
            to_parameters(Some(json!("Doe"))),
            Err(CliError::InvalidRequest(_))
        ));
        assert!(matches!(
            to_parameters(Some(json!({"params": []}))),
            Err(CliError::InvalidRequest(_))
        ));
        assert!(to_parameters(None).unwrap().is_empty());
    }

    #[test]
    fn test_explain_text() {
        let temp_dir = TempDir::new().unwrap();
        let context = load_context(&create_config(&temp_dir, json!({}))).unwrap();
        let params = to_parameters(Some(json!([["rust", "go"]]))).unwrap();

        let text = explain_text(&context, "Person", "findBySkillsContaining", &params);
        assert!(text.contains("Status: ACCEPTED"));
        assert!(text.contains("OR"));
    }

    #[test]
    fn test_tree_json() {
        let tree = PartTree::parse("findTop3ByLastnameIgnoreCaseOrderByLastnameDesc").unwrap();
        let value = tree_json(&tree);

        assert_eq!(value["subject"]["max_results"], 3);
        assert_eq!(value["clauses"][0][0]["type"], "SIMPLE_PROPERTY");
        assert_eq!(value["clauses"][0][0]["ignore_case"], "always");
        assert_eq!(value["sort"][0]["direction"], "desc");
    }
}
