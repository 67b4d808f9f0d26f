//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "loteria", version, about = "Loteria360 point-of-sale tools")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "LOTERIA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Totals a cash count from `label=quantity` pairs (e.g. `200=1 0.50=2`)
    Count {
        #[arg(value_name = "LABEL=QTY")]
        pairs: Vec<String>,

        /// Print the submission payload instead of the summary
        #[arg(long)]
        json: bool,

        /// Cash box the count belongs to
        #[arg(long)]
        caixa: Option<String>,

        /// Count date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Send the count to the back-end (logs in with the credentials)
        #[arg(long)]
        submit: bool,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Checks whether a role may perform an action on a resource
    Can {
        role: String,
        resource: String,
        action: String,
    },

    /// Lists the drawer menu entries visible to a role
    Menu { role: String },

    /// Logs in and shows the user and what the role may open
    Whoami {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Lists the active cash boxes
    Caixas {
        #[command(flatten)]
        credentials: Credentials,
    },
}

/// Back-end login. Each invocation logs in and out again; nothing is kept on disk.
#[derive(Args, Debug, Clone, Default)]
pub struct Credentials {
    #[arg(long, env = "LOTERIA_EMAIL")]
    pub email: Option<String>,

    #[arg(long, env = "LOTERIA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}
