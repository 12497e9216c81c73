//! CLI module for Warden
//!
//! Provides command-line interface parsing for the warden-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Warden - credential and session service
#[derive(Parser, Debug)]
#[command(
    name = "warden-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Warden - user registration, cookie sessions and user administration",
    long_about = "An HTTP service for user registration, login and cookie-backed JWT sessions,\n\
                  with role-based user administration over SQLite or Turso.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  warden-server init                      # Scaffold warden.toml and .env.example\n    \
                  warden-server create-admin --email a@b.c --password ...\n    \
                  warden-server                           # Start the server (requires warden.toml)\n    \
                  warden-server --config my.toml          # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "warden.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (the default)
    Serve,

    /// Scaffold warden.toml, .env.example and the data/ directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file, including referenced env vars
        #[arg(long)]
        validate: bool,
    },

    /// Create an administrator account directly in the database
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long, env = "WARDEN_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
