//! Stompbox CLI - Guitar Pedal Chain
//!
//! Command-line interface for the Stompbox pedal chain.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stompbox::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Stompbox v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Stompbox v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Process {
            input,
            demo: _,
            output,
            board,
            chain,
        } => commands::process(
            input.as_deref(),
            &output,
            board.as_deref(),
            chain.as_deref(),
        ),
        Commands::Effects => commands::list_effects(),
        Commands::Tune { input, demo: _ } => commands::tune(input.as_deref()),
        Commands::Demo { output } => commands::demo(&output),
    }
}
