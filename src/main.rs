//! issuesync CLI entry point.

use clap::Parser;

use issuesync::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => issuesync::cli::run(args).await,
        Commands::Admit(args) => issuesync::cli::admit(args).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
