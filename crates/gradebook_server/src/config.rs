//! Server runtime configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "grades.db";
/// Default bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Immutable settings shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite file holding all assessments.
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr_matches_documented_constant() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_path, PathBuf::from("grades.db"));
    }
}
