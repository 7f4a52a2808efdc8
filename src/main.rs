//! IPShield - IP address allow-list authorization.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ipshield::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { force } => ipshield::commands::init::run(force, &cli.config),
        Commands::Check { ip, strict } => ipshield::commands::check::run(&ip, strict, &cli.config),
        Commands::Validate => ipshield::commands::validate::run(&cli.config),
        Commands::Allowlist { action } => ipshield::commands::allowlist::run(action, &cli.config),
        Commands::Version => {
            println!("ipshield {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
