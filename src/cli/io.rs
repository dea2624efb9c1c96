//! JSON-lines output for the CLI
//!
//! Every line written is one complete JSON object, UTF-8 encoded.

use std::io::Write;

use serde::Serialize;
use serde_json::{json, Value};

use super::errors::CliResult;

/// Write any serializable value as one line
pub fn write_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    write_line(
        out,
        &json!({
            "status": "ok",
            "data": data
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(buf: &[u8]) -> Vec<Value> {
        String::from_utf8(buf.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_response_envelope() {
        let mut buf = Vec::new();
        write_response(&mut buf, json!({"tables": ["users"]})).unwrap();
        write_line(&mut buf, &json!({"id": 1})).unwrap();

        let lines = lines(&buf);
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[0]["data"]["tables"][0], "users");
        assert_eq!(lines[1], json!({"id": 1}));
    }
}
