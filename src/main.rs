//! batch-ssh binary entry point.

use std::process::ExitCode;

use batch_ssh::{app, cli, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run 'batch-ssh --help' for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match app::bootstrap(&args, &mut std::io::stdout(), &mut std::io::stderr()) {
        app::Startup::Run(config) => config,
        app::Startup::Exit(code) => return code,
    };

    logging::init_with_filter(config.log_filter());
    info!("batch-ssh v{}", env!("CARGO_PKG_VERSION"));

    match app::run(config).await {
        Ok(exit) => {
            info!(?exit, "exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "fatal error");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
