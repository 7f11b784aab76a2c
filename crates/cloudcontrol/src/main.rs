mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloudcontrol_core::Session;

use crate::cli::{Cli, Command};
use crate::commands::Ctx;
use crate::config::WaitDefaults;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// `RUST_LOG` wins; otherwise `-v` count picks the level.
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let format = config::output_format(&cli.global, &cfg.defaults);

    match cli.command {
        // Neither of these talks to the API
        Command::Regions => commands::regions::handle(format, cli.global.quiet),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "cloudcontrol", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let session_config = config::resolve_session_config(&cli.global, &cfg)?;
            let session = Session::connect(session_config).await?;
            let ctx = Ctx {
                output: format,
                quiet: cli.global.quiet,
                yes: cli.global.yes,
                waits: WaitDefaults::from_config(&cfg.defaults),
            };

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &session, &ctx).await
        }
    }
}
