//! Parser for `chpl` error output
//!
//! Each diagnostic line has the shape `<file>:<line>:<kind>:<message>`.
//! The message is everything after the third colon and may itself contain
//! colons (e.g., type signatures).

use crate::compiler::error::LineError;
use crate::compiler::types::Diagnostic;

/// Parses one line of compiler stderr into a diagnostic
pub fn parse_line(line: &str) -> Result<Diagnostic, LineError> {
    let mut fields = line.splitn(4, ':');

    let (Some(file), Some(line_no), Some(kind)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(LineError::TooFewFields);
    };
    let message = fields.next().unwrap_or_default();

    let line_no = line_no.trim();
    let line_no = line_no
        .parse::<u32>()
        .map_err(|_| LineError::InvalidLineNumber(line_no.to_string()))?;

    Ok(Diagnostic::new(
        kind.trim(),
        file.trim(),
        line_no,
        message.trim(),
    ))
}
