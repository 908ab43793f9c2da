//! Terminal output cleanup.
//!
//! Remote shells run under a PTY, so their output carries prompts, colors
//! and cursor movement. This strips those for display.

use vte::{Params, Parser, Perform};

/// Output sanitizer using VTE parser.
pub struct OutputSanitizer;

impl OutputSanitizer {
    /// Strip ANSI escape codes from raw bytes.
    ///
    /// Keeps printable text, newlines and tabs. Carriage returns from PTY
    /// line endings (`\r\n`) are folded into a plain `\n`.
    pub fn strip_ansi(input: &[u8]) -> String {
        let mut extractor = PlainText::default();
        let mut parser = Parser::new();

        parser.advance(&mut extractor, input);

        extractor.finish()
    }

    /// Strip ANSI codes from already-decoded text.
    pub fn clean(input: &str) -> String {
        Self::strip_ansi(input.as_bytes())
    }
}

#[derive(Default)]
struct PlainText {
    output: String,
    pending_cr: bool,
}

impl PlainText {
    fn flush_cr(&mut self) {
        if std::mem::take(&mut self.pending_cr) {
            self.output.push('\r');
        }
    }

    fn finish(mut self) -> String {
        self.flush_cr();
        self.output
    }
}

impl Perform for PlainText {
    fn print(&mut self, c: char) {
        self.flush_cr();
        self.output.push(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\r' => {
                self.flush_cr();
                self.pending_cr = true;
            }
            b'\n' => {
                self.pending_cr = false;
                self.output.push('\n');
            }
            b'\t' => {
                self.flush_cr();
                self.output.push('\t');
            }
            // Bell, backspace and the rest are dropped.
            _ => {}
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(
        &mut self,
        _params: &Params,
        _intermediates: &[u8],
        _ignore: bool,
        _action: char,
    ) {
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}
