use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Color;

use crate::BoolfuckReaderError;

/// Pretty-print a BoolfuckReaderError with caret positioning.
/// If `program` is `Some("boof")`, messages are prefixed with "boof: ...".
pub fn print_reader_error(program: Option<&str>, code: &[u8], err: &BoolfuckReaderError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    let msg = match err {
        BoolfuckReaderError::Alloc { source, .. } => {
            prefix_program(&format!("Fatal error: {source}"))
        }
        BoolfuckReaderError::Io { source, .. } => prefix_program(&format!("I/O error: {source}")),
        BoolfuckReaderError::UnmatchedOpen { line, column, .. } => prefix_program(&format!(
            "Runtime error: unmatched '[' at line {line}, column {column}"
        )),
    };
    print_error_with_context(&msg, code, err.ip());
}

/// Print a concise error with instruction index and a caret context window.
pub fn print_error_with_context(prefix: &str, code: &[u8], pos: usize) {
    let mut stderr = io::stderr().lock();
    let colored = stderr.is_terminal();
    let _ = write!(stderr, "{}", render_context(prefix, code, pos, colored));
    let _ = stderr.flush();
}

/// Build the message plus the line of source around `pos` with a caret
/// under it.
fn render_context(prefix: &str, code: &[u8], pos: usize, colored: bool) -> String {
    // Show a short window around the position for context
    const WINDOW: usize = 32;

    let pos = pos.min(code.len().saturating_sub(1));
    let line_start = code[..pos]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let line_end = code[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(code.len(), |i| pos + i);

    let start = pos.saturating_sub(WINDOW).max(line_start);
    let end = (pos + WINDOW + 1).min(line_end);

    let snippet: String = code
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect();

    let mut caret = " ".repeat(pos.saturating_sub(start));
    caret.push('^');
    let caret = if colored {
        Color::Red.bold().paint(caret).to_string()
    } else {
        caret
    };

    format!("{prefix} at instruction {pos}\n  {snippet}\n  {caret}\n")
}
