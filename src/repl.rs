//! Interactive read-dispatch-print loop.

use std::future::Future;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::dispatch::Dispatcher;
use crate::output::{self, ReportStyle};
use crate::Result;

/// Prompt printed before each input line.
pub const PROMPT: &str = "command> ";

/// Word that ends the session (case-insensitive).
pub const QUIT: &str = "quit";

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Leave the loop.
    Quit,
    /// Blank line; prompt again.
    Empty,
    /// Broadcast this command.
    Command(String),
}

/// Classify a raw input line.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Empty
    } else if trimmed.eq_ignore_ascii_case(QUIT) {
        Input::Quit
    } else {
        Input::Command(trimmed.to_string())
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Operator typed `quit`.
    Quit,
    /// Cancel signal arrived while waiting for input.
    Interrupted,
    /// Input stream closed.
    EndOfInput,
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for a command line.
    Running,
    /// Done; sessions are being (or have been) closed.
    Terminated(LoopExit),
}

/// Run the loop until quit, cancel or end of input, then close every session.
///
/// `cancel` is only observed while waiting for input. A round already in
/// progress always finishes first. The sessions are closed exactly once,
/// including when reading input or writing output fails.
pub async fn run<R, W, C>(
    dispatcher: &mut Dispatcher,
    input: R,
    out: &mut W,
    cancel: C,
    style: ReportStyle,
) -> Result<LoopExit>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    C: Future<Output = ()>,
{
    let outcome = drive(dispatcher, input, out, cancel, style).await;

    if let Ok(LoopExit::Interrupted) = outcome {
        // Leave the prompt line before printing teardown.
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "Closing all connections...");
    let teardown = dispatcher.shutdown().await;
    output::write_teardown(out, &teardown)?;
    out.flush()?;

    outcome
}

async fn drive<R, W, C>(
    dispatcher: &mut Dispatcher,
    input: R,
    out: &mut W,
    cancel: C,
    style: ReportStyle,
) -> Result<LoopExit>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    C: Future<Output = ()>,
{
    let mut input = input;
    let mut buf = Vec::new();
    tokio::pin!(cancel);
    let mut state = LoopState::Running;

    let exit = loop {
        if let LoopState::Terminated(exit) = state {
            break exit;
        }

        write!(out, "\n{}", PROMPT)?;
        out.flush()?;

        buf.clear();
        let read = tokio::select! {
            biased;
            _ = &mut cancel => {
                state = LoopState::Terminated(LoopExit::Interrupted);
                continue;
            }
            read = input.read_until(b'\n', &mut buf) => read?,
        };

        if read == 0 {
            state = LoopState::Terminated(LoopExit::EndOfInput);
            continue;
        }

        // Stray non-UTF-8 bytes are replaced rather than ending the run.
        let line = String::from_utf8_lossy(&buf);
        match parse_input(&line) {
            Input::Quit => state = LoopState::Terminated(LoopExit::Quit),
            Input::Empty => {}
            Input::Command(command) => round(dispatcher, &command, out, style).await?,
        }
    };

    info!(?exit, "interactive loop finished");
    Ok(exit)
}

async fn round<W: Write>(
    dispatcher: &mut Dispatcher,
    command: &str,
    out: &mut W,
    style: ReportStyle,
) -> Result<()> {
    debug!(command, "dispatching");
    writeln!(
        out,
        "\nDispatching command to {} host(s)...",
        dispatcher.sessions().len()
    )?;
    out.flush()?;

    let round = dispatcher.round(command).await?;
    output::write_failures(out, &round.write_failures)?;
    output::write_round(out, &round.result, style)?;
    out.flush()?;
    Ok(())
}
