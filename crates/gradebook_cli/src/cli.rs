//! Command-line arguments.
//!
//! Every global option can also come from a `GRADEBOOK_*` environment variable.

use clap::{Parser, Subcommand};
use gradebook_server::config::{DEFAULT_ADDR, DEFAULT_DB_FILE_NAME};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Grade tracker with weighted stats and what-if projections.
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "GRADEBOOK_DB_PATH", default_value = DEFAULT_DB_FILE_NAME)]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults by build mode
    #[arg(long, global = true, env = "GRADEBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files; defaults to `./logs`
    #[arg(long, global = true, env = "GRADEBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP API until Ctrl-C
    Serve {
        /// Address to listen on
        #[arg(long, env = "GRADEBOOK_ADDR", default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
    /// Print all assessments ordered by due date
    List,
    /// Print the current weighted grade
    Current,
    /// Print the average needed on remaining work to reach a target
    WhatIf {
        /// Desired final grade, in percent
        #[arg(long, allow_negative_numbers = true)]
        target: f64,
    },
    /// Print the weight allocation check
    Validate,
}

/// Resolves the log directory to an absolute path under `cwd`.
pub fn resolve_log_dir(log_dir: Option<&Path>, cwd: &Path) -> PathBuf {
    match log_dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd.join("logs"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_if_with_target() {
        let cli = Cli::try_parse_from(["gradebook", "what-if", "--target", "72.5"]).unwrap();
        assert_eq!(cli.command, Commands::WhatIf { target: 72.5 });
    }

    #[test]
    fn serve_uses_default_address() {
        let cli = Cli::try_parse_from(["gradebook", "serve"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Serve {
                addr: DEFAULT_ADDR.parse().unwrap()
            }
        );
    }

    #[test]
    fn global_db_flag_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["gradebook", "current", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn what_if_requires_target() {
        assert!(Cli::try_parse_from(["gradebook", "what-if"]).is_err());
    }

    #[test]
    fn relative_log_dir_is_anchored_at_cwd() {
        let cwd = Path::new("/srv/grades");
        assert_eq!(resolve_log_dir(None, cwd), cwd.join("logs"));
        assert_eq!(
            resolve_log_dir(Some(Path::new("var/log")), cwd),
            cwd.join("var/log")
        );
        assert_eq!(
            resolve_log_dir(Some(Path::new("/var/log/gradebook")), cwd),
            PathBuf::from("/var/log/gradebook")
        );
    }
}
