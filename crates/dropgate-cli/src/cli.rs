use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dropgate", version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log in to a dropgate server and upload a file")]
pub struct Cli {
    /// Server base URL.
    ///
    /// Takes precedence over `DROPGATE_BASE_URL` and the config file.
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Also print logs to stderr.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Exchange username and password for a session token
    Login {
        /// Username (defaults to `DROPGATE_USERNAME` or the last one used)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Upload this file right after a successful login
        #[arg(long, value_name = "FILE")]
        upload: Option<PathBuf>,
    },

    /// Upload one file with the stored session token
    Upload {
        /// File to send
        file: PathBuf,
    },

    /// Forget the stored session token
    Logout,

    /// Show the configured server and whether a token is stored
    Status,

    /// Check that the server answers
    Probe,
}
