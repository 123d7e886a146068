//! JSON I/O handling for CLI
//!
//! - Input: one JSON document via stdin
//! - Output: one JSON object per command via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::schema::{SchemaError, Violation};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    read_request_from(io::stdin().lock())
}

/// Read a JSON request from any reader; the document may span lines
pub fn read_request_from<R: Read>(mut reader: R) -> CliResult<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::input_error("Empty input"));
    }

    let value: Value = serde_json::from_str(&input)?;
    Ok(value)
}

/// Success response, with `data` omitted when null
pub fn ok_response(data: Value) -> Value {
    if data.is_null() {
        json!({"status": "ok"})
    } else {
        json!({"status": "ok", "data": data})
    }
}

/// Error response for a schema error, carrying its violation if any
pub fn error_response(err: &SchemaError) -> Value {
    let mut response = json!({
        "status": "error",
        "code": err.code().code(),
        "message": err.message()
    });
    if let Some(violation) = err.violation() {
        response["violation"] = json!(violation);
    }
    response
}

/// Error response listing every violation of a record
pub fn violations_response(record: &str, violations: &[Violation]) -> Value {
    json!({
        "status": "error",
        "code": "VALDAC_TYPE_MISMATCH",
        "message": format!("Record '{}' has {} violation(s)", record, violations.len()),
        "violations": violations
    })
}

/// Write a response to stdout
pub fn write_response(response: &Value) -> CliResult<()> {
    write_response_to(&mut io::stdout(), response)
}

/// Write a response as one line to any writer
pub fn write_response_to<W: Write>(writer: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_multiline_request() {
        let input = "{\n  \"name\": \"Al\"\n}\n";
        let value = read_request_from(input.as_bytes()).unwrap();
        assert_eq!(value, json!({"name": "Al"}));
    }

    #[test]
    fn test_empty_request_rejected() {
        let err = read_request_from("  \n".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Input(_)));
    }

    #[test]
    fn test_invalid_request_rejected() {
        let err = read_request_from("{ nope".as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn test_ok_response_shapes() {
        assert_eq!(ok_response(Value::Null), json!({"status": "ok"}));
        assert_eq!(
            ok_response(json!(["User"])),
            json!({"status": "ok", "data": ["User"]})
        );
    }

    #[test]
    fn test_error_response_carries_violation() {
        let err = SchemaError::type_mismatch("User", Violation::new("name", "string", "42"));
        let response = error_response(&err);
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "VALDAC_TYPE_MISMATCH");
        assert_eq!(
            response["violation"],
            json!({"field": "name", "expected": "string", "actual": "42"})
        );
    }

    #[test]
    fn test_error_response_without_violation() {
        let response = error_response(&SchemaError::unknown_record("Ghost"));
        assert_eq!(response["code"], "VALDAC_UNKNOWN_RECORD");
        assert!(response.get("violation").is_none());
    }

    #[test]
    fn test_write_response_is_one_line() {
        let mut buffer = Vec::new();
        write_response_to(&mut buffer, &json!({"status": "ok"})).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\"status\":\"ok\"}\n");
    }
}
