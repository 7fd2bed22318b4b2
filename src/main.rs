// Branch Fixtures: deterministic control-flow targets
//
// Runs fixtures by name and sweeps them over concrete input domains.

use anyhow::Result;
use clap::Parser;

use branch_fixtures::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    // Run the appropriate command
    run_command(cli)?;

    Ok(())
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command.clone() {
        Commands::List(args) => cli::cmds::list(args, &cli)?,
        Commands::Run(args) => cli::cmds::run(args, &cli)?,
        Commands::Sweep(args) => cli::cmds::sweep(args, &cli)?,
    }
    Ok(())
}
