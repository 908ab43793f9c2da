//! Operator-facing report formatting.

use std::io::{self, Write};

use super::OutputSanitizer;
use crate::dispatch::{CommandResult, HostFailure, Outcome, Teardown};

/// Header printed before each round's per-host blocks.
pub const ROUND_HEADER: &str = "=== Responses from all hosts ===";

/// Shown for a host with nothing buffered at collect time.
pub const NO_RESPONSE: &str = "(no response)";

const RULE_WIDTH: usize = 50;

/// How host output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStyle {
    /// Pass output through [`OutputSanitizer`] before printing.
    pub strip_ansi: bool,
}

impl ReportStyle {
    fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Output(text) if self.strip_ansi => OutputSanitizer::clean(text),
            Outcome::Output(text) => text.clone(),
            Outcome::NoOutputYet => NO_RESPONSE.to_string(),
            Outcome::Error(msg) => format!("(error reading output: {})", msg),
        }
    }
}

/// Write one round's results, grouped by host in store order.
pub fn write_round<W: Write>(
    out: &mut W,
    result: &CommandResult,
    style: ReportStyle,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", ROUND_HEADER)?;
    for (host, outcome) in result.iter() {
        writeln!(out)?;
        writeln!(out, "--- {} ---", host)?;
        writeln!(out, "{}", style.render(outcome))?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    }
    Ok(())
}

/// Write one `[host] reason` line per failure.
pub fn write_failures<W: Write>(out: &mut W, failures: &[HostFailure]) -> io::Result<()> {
    for failure in failures {
        writeln!(out, "[{}] {}", failure.host, failure.error)?;
    }
    Ok(())
}

/// Summarize a teardown.
pub fn write_teardown<W: Write>(out: &mut W, teardown: &Teardown) -> io::Result<()> {
    for host in &teardown.closed {
        writeln!(out, "Closed connection to {}", host)?;
    }
    write_failures(out, &teardown.failures)?;
    writeln!(
        out,
        "Closed {} session(s), {} close error(s)",
        teardown.closed.len(),
        teardown.failures.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;

    fn render(result: &CommandResult, style: ReportStyle) -> String {
        let mut out = Vec::new();
        write_round(&mut out, result, style).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> CommandResult {
        let mut result = CommandResult::default();
        result.push("a", Outcome::Output("\x1b[32mhi\x1b[0m\r\n".into()));
        result.push("b", Outcome::NoOutputYet);
        result.push("c", Outcome::Error("connection reset".into()));
        result
    }

    #[test]
    fn test_round_layout() {
        let text = render(&sample(), ReportStyle::default());

        assert!(text.contains(ROUND_HEADER));
        let a = text.find("--- a ---").unwrap();
        let b = text.find("--- b ---").unwrap();
        let c = text.find("--- c ---").unwrap();
        assert!(a < b && b < c);
        assert!(text.contains(NO_RESPONSE));
        assert!(text.contains("(error reading output: connection reset)"));
        assert_eq!(text.matches(&"-".repeat(RULE_WIDTH)).count(), 3);
    }

    #[test]
    fn test_output_verbatim_by_default() {
        let text = render(&sample(), ReportStyle::default());
        assert!(text.contains("\x1b[32mhi\x1b[0m\r\n"));
    }

    #[test]
    fn test_strip_ansi_style() {
        let text = render(&sample(), ReportStyle { strip_ansi: true });
        assert!(text.contains("--- a ---\nhi\n\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_empty_round() {
        let text = render(&CommandResult::default(), ReportStyle::default());
        assert_eq!(text, format!("\n{}\n", ROUND_HEADER));
    }

    #[test]
    fn test_failures_and_teardown() {
        let teardown = Teardown {
            closed: vec!["a".into()],
            failures: vec![HostFailure::new("b", SessionError::Close("eof".into()))],
        };
        let mut out = Vec::new();
        write_teardown(&mut out, &teardown).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Closed connection to a"));
        assert!(text.contains("[b] failed to close connection: eof"));
        assert!(text.contains("Closed 1 session(s), 1 close error(s)"));
    }
}
