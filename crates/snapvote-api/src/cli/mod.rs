//! CLI command definitions for the `snapvote` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod seed;
pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Share images, vote on them, and moderate the gallery.
#[derive(Parser)]
#[command(name = "snapvote", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000", env = "SNAPVOTE_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "SNAPVOTE_HOST")]
        host: String,
    },

    /// Manage user accounts.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Create the demo accounts (admin and artist1..artist5) if missing.
    #[command(name = "seed-demo")]
    SeedDemo,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a verified account. The password is prompted for.
    Create {
        username: String,
        email: String,

        /// Grant moderation rights.
        #[arg(long)]
        superuser: bool,

        /// Password (prompted when omitted).
        #[arg(long, env = "SNAPVOTE_USER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// List all accounts.
    #[command(alias = "ls")]
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::parse_from([
            "snapvote", "user", "create", "mod1", "mod1@example.com", "--superuser", "--json",
        ]);
        assert!(cli.json);
        match cli.command {
            Commands::User {
                action: UserCommand::Create { username, superuser, .. },
            } => {
                assert_eq!(username, "mod1");
                assert!(superuser);
            }
            _ => panic!("expected user create"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["snapvote", "serve"]);
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(host, "127.0.0.1");
                assert!(port > 0);
            }
            _ => panic!("expected serve"),
        }
    }
}
