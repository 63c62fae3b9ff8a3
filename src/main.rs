// Inserter - document store insertion utility
// Copyright (c) 2025 Inserter Contributors
// Licensed under the MIT License

use clap::Parser;
use inserter::cli::{usage_guidance, Cli, Commands};
use inserter::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = cli.logging_settings();
    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Inserter starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    process::exit(exit_code);
}

async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        None => {
            println!("{}", usage_guidance());
            Ok(0)
        }
        Some(Commands::ValidateConfig(args)) => args.execute(&cli.config).await,
        Some(Commands::Check(args)) => args.execute(&cli.config).await,
        Some(Commands::Init(args)) => args.execute().await,
    }
}
