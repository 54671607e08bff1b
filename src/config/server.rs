//! Configuration for the supervised game-server child process.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::helpers::optional_env;
use crate::error::ConfigError;

/// Default game-server binary (the ncat chat server).
const DEFAULT_BINARY: &str = "/usr/bin/ncat";

/// Default arguments, before the listening port is appended.
const DEFAULT_ARGS: &[&str] = &["--chat", "--listen", "-vvv"];

/// Child-process configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the game-server binary.
    pub binary: PathBuf,
    /// Arguments passed to the binary, excluding the port flag.
    pub args: Vec<String>,
    /// Listening port, forwarded to the child as `-p <port>`.
    ///
    /// Kept as a string: the sidecar never interprets it, it only hands it
    /// through.
    pub port: String,
}

impl ServerConfig {
    pub(crate) fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let binary = cli
            .server_bin
            .clone()
            .or(optional_env("PITWALL_SERVER_BIN")?.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY));

        let args = match optional_env("PITWALL_SERVER_ARGS")? {
            Some(raw) => raw.split_whitespace().map(str::to_string).collect(),
            None => DEFAULT_ARGS.iter().map(|s| (*s).to_string()).collect(),
        };

        if cli.port.is_empty() {
            return Err(ConfigError::Missing {
                key: "--port".to_string(),
            });
        }

        Ok(Self {
            binary,
            args,
            port: cli.port.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_port(port: &str) -> Cli {
        Cli {
            port: port.to_string(),
            ..Cli::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve(&cli_with_port("7654")).unwrap();
        assert_eq!(config.binary, PathBuf::from(DEFAULT_BINARY));
        assert_eq!(config.args, vec!["--chat", "--listen", "-vvv"]);
        assert_eq!(config.port, "7654");
    }

    #[test]
    fn test_empty_port_is_rejected() {
        let err = ServerConfig::resolve(&cli_with_port("")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn test_cli_binary_override() {
        let cli = Cli {
            port: "7654".to_string(),
            server_bin: Some(PathBuf::from("/opt/game/server")),
            ..Cli::default()
        };
        let config = ServerConfig::resolve(&cli).unwrap();
        assert_eq!(config.binary, PathBuf::from("/opt/game/server"));
    }
}
