//! # Loteria360 CLI
//!
//! Terminal front-end over `loteria-core` and `loteria-client`.
//!
//! ```text
//! loteria count 200=1 50=2 0.25=4            # totals
//! loteria count 200=1 --caixa <id> --json    # submission payload
//! loteria can VENDEDOR sales create          # access check
//! loteria menu AUDITOR                       # visible drawer entries
//! loteria caixas --email ana@loteria.com     # password from LOTERIA_PASSWORD
//! ```
//!
//! Exit codes: 0 success, 1 failure, 2 invalid input.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use loteria_client::ClientConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::load(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };
    init_tracing(&config);
    debug!(environment = ?config.environment, base_url = %config.api_base_url, "Configuration loaded");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            if commands::is_input_error(&e) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(command: Commands, config: &ClientConfig) -> anyhow::Result<()> {
    match command {
        Commands::Count {
            pairs,
            json,
            caixa,
            date,
            submit,
            credentials,
        } => {
            let set = commands::parse_pairs(&pairs)?;
            if json || submit {
                let request = commands::count_request(&set, caixa.as_deref(), date)?;
                if submit {
                    let api = commands::http_api(config)?;
                    return commands::submit_count(api, config, &credentials, &request).await;
                }
                println!("{}", serde_json::to_string_pretty(&request)?);
            } else {
                print!("{}", commands::render_summary(&set));
            }
        }
        Commands::Can {
            role,
            resource,
            action,
        } => {
            let (_, line) = commands::check_access(&role, &resource, &action)?;
            println!("{}", line);
        }
        Commands::Menu { role } => {
            for line in commands::menu_lines(&role)? {
                println!("{}", line);
            }
        }
        Commands::Whoami { credentials } => {
            commands::whoami(commands::http_api(config)?, config, &credentials).await?
        }
        Commands::Caixas { credentials } => {
            commands::list_active_boxes(commands::http_api(config)?, config, &credentials).await?
        }
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level applies. Logs go to stderr.
fn init_tracing(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.effective_log_level().as_filter();
        EnvFilter::new(format!("warn,loteria_client={},loteria_cli={}", level, level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
