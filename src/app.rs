//! Top-level run: connect, hand over to the interactive loop, tear down.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;

use crate::cli::Args;
use crate::config::{Config, ConfigError};
use crate::dispatch::{Dispatcher, HostFailure};
use crate::output::{self, ReportStyle};
use crate::repl::{self, LoopExit};
use crate::session::{Connector, SshConnector};
use crate::Result;

/// What the binary does after handling arguments.
#[derive(Debug)]
pub enum Startup {
    /// Configuration loaded; connect and run.
    Run(Config),
    /// Stop before connecting, with this status.
    Exit(ExitCode),
}

/// Resolve `--init` and configuration loading.
///
/// A missing configuration file is replaced by a template and the process is
/// told to exit with a failure status, so nothing connects until the operator
/// has edited it. Messages go to `out`, errors to `err`.
pub fn bootstrap<W: Write, E: Write>(args: &Args, out: &mut W, err: &mut E) -> Startup {
    let path = args.config_path();
    if args.init {
        return match Config::write_template(&path) {
            Ok(()) => {
                let _ = writeln!(out, "Wrote template configuration to {}", path.display());
                Startup::Exit(ExitCode::SUCCESS)
            }
            Err(e) => {
                let _ = writeln!(err, "error: cannot write {}: {}", path.display(), e);
                Startup::Exit(ExitCode::FAILURE)
            }
        };
    }

    match Config::load(args) {
        Ok(config) => Startup::Run(config),
        Err(ConfigError::Missing(path)) => {
            if let Err(e) = Config::write_template(&path) {
                let _ = writeln!(err, "error: cannot write {}: {}", path.display(), e);
                return Startup::Exit(ExitCode::FAILURE);
            }
            let _ = writeln!(
                out,
                "Configuration file {} did not exist; a default one has been created. \
                 Edit it and run batch-ssh again.",
                path.display()
            );
            Startup::Exit(ExitCode::FAILURE)
        }
        Err(e) => {
            let _ = writeln!(err, "error: {}: {}", path.display(), e);
            Startup::Exit(ExitCode::FAILURE)
        }
    }
}

/// Run one interactive session against every configured host over SSH.
pub async fn run(config: Config) -> Result<LoopExit> {
    let connector = Arc::new(SshConnector::new(config.connect_timeout()));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let cancel = async {
        // If the handler cannot be installed, Ctrl-C keeps its default behavior.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    run_with(connector, &config, stdin, &mut std::io::stdout(), cancel).await
}

/// Same as [`run`], with the transport, input, output and cancel signal supplied.
pub async fn run_with<R, W, C>(
    connector: Arc<dyn Connector>,
    config: &Config,
    input: R,
    out: &mut W,
    cancel: C,
) -> Result<LoopExit>
where
    R: tokio::io::AsyncBufRead + Unpin,
    W: Write,
    C: std::future::Future<Output = ()>,
{
    info!(
        user = %config.user,
        hosts = config.servers.len(),
        method = config.credential().method(),
        "starting"
    );

    writeln!(out, "Connecting to {} server(s)...", config.servers.len())?;
    out.flush()?;

    let (mut dispatcher, failures) = Dispatcher::connect(
        connector,
        &config.servers,
        &config.user,
        &config.credential(),
        config.dispatch_settings(),
    )
    .await;

    if let Err(e) = write_banner(out, &dispatcher, &failures, config.servers.len()) {
        dispatcher.shutdown().await;
        return Err(e.into());
    }

    let style = ReportStyle {
        strip_ansi: config.strip_ansi,
    };
    repl::run(&mut dispatcher, input, out, cancel, style).await
}

fn write_banner<W: Write>(
    out: &mut W,
    dispatcher: &Dispatcher,
    failures: &[HostFailure],
    requested: usize,
) -> std::io::Result<()> {
    for host in dispatcher.sessions().hosts() {
        writeln!(out, "Connected to {}", host)?;
    }
    output::write_failures(out, failures)?;
    writeln!(
        out,
        "Connected to {} of {} server(s)",
        dispatcher.sessions().len(),
        requested
    )?;
    writeln!(out, "Commands you enter are sent to every connected server.")?;
    writeln!(out, "Type '{}' to exit.", repl::QUIT)?;
    out.flush()
}
