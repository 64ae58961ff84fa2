//! JSON I/O handling for CLI
//!
//! - Input: at most one JSON document via stdin
//! - Output: one JSON object (or explain text) via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::CliResult;

/// Reads the whole of stdin; blank input means no request
pub fn read_request() -> CliResult<Option<Value>> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

pub(crate) fn parse_request(input: &str) -> CliResult<Option<Value>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(input)?))
}

pub(crate) fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

pub(crate) fn error_response(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json(&ok_response(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&error_response(code, message))
}

pub(crate) fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_no_request() {
        assert_eq!(parse_request("").unwrap(), None);
        assert_eq!(parse_request("  \n").unwrap(), None);
    }

    #[test]
    fn test_request_parsed() {
        assert_eq!(parse_request("[\"Doe\", 3]").unwrap(), Some(json!(["Doe", 3])));
        assert!(parse_request("[\"Doe\"").is_err());
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(ok_response(json!(1))["status"], "ok");
        let err = error_response("MLQ_QUERY_MAPPING_FAILED", "no path");
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "MLQ_QUERY_MAPPING_FAILED");
    }
}
