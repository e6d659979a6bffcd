//! Result rendering: one compact JSON document on stdout, or one
//! `{"error": ...}` document on stderr.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ErrorDocument<'a> {
    pub error: &'a str,
}

/// Writes the outcome of one invocation and returns the process exit code.
pub fn emit(
    result: Result<Value, CliError>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8 {
    let error = match result.and_then(|value| write_document(stdout, &value)) {
        Ok(()) => return 0,
        Err(error) => error,
    };

    debug!(%error, "invocation failed");
    let message = error.to_string();
    // nothing left to report to if stderr itself is gone
    let _ = write_document(stderr, &ErrorDocument { error: &message });
    error.exit_code()
}

fn write_document<T>(writer: &mut impl Write, document: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_writer(&mut *writer, document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_is_compact_json_on_stdout() {
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let code = emit(
            Ok(json!({ "coinId": "bitcoin", "days": 1, "data": [] })),
            &mut stdout,
            &mut stderr,
        );

        assert_eq!(code, 0);
        assert_eq!(
            String::from_utf8(stdout).expect("utf8"),
            "{\"coinId\":\"bitcoin\",\"days\":1,\"data\":[]}\n"
        );
        assert!(stderr.is_empty());
    }

    #[test]
    fn failure_is_error_document_on_stderr() {
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let code = emit(
            Err(CliError::UnknownCommand(String::from("price"))),
            &mut stdout,
            &mut stderr,
        );

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert_eq!(
            String::from_utf8(stderr).expect("utf8"),
            "{\"error\":\"Unknown command: price\"}\n"
        );
    }
}
