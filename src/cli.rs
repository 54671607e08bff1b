//! CLI argument handling.
//!
//! The sidecar takes a small flat set of flags; fine-grained settings are
//! resolved from `PITWALL_*` environment variables (see [`crate::config`]).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "pitwall")]
#[command(about = "Game-server sidecar that turns server log output into orchestration lifecycle signals")]
#[command(
    long_about = "Pitwall supervises a game-server process, tails its diagnostic output, \
and reports readiness, liveness, shutdown, and player accounting to the \
orchestration control plane.\nExample:\n  pitwall --port 7654 --player-tracking"
)]
#[command(version)]
pub struct Cli {
    /// Listening port forwarded to the game server
    #[arg(short, long, required = true)]
    pub port: String,

    /// Report individual player connects/disconnects to the control plane
    #[arg(long)]
    pub player_tracking: bool,

    /// Player capacity declared at startup (player tracking only)
    #[arg(long)]
    pub player_capacity: Option<u64>,

    /// Path to the game-server binary
    #[arg(long)]
    pub server_bin: Option<PathBuf>,

    /// Base URL of the SDK gateway
    #[arg(long)]
    pub sdk_url: Option<String>,

    /// Seconds between health reports
    #[arg(long)]
    pub heartbeat_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::parse_from(["pitwall", "--port", "7654"]);
        assert_eq!(cli.port, "7654");
        assert!(!cli.player_tracking);
    }

    #[test]
    fn test_parse_tracking_flags() {
        let cli = Cli::parse_from([
            "pitwall",
            "-p",
            "7654",
            "--player-tracking",
            "--player-capacity",
            "16",
        ]);
        assert!(cli.player_tracking);
        assert_eq!(cli.player_capacity, Some(16));
    }

    #[test]
    fn test_port_is_required() {
        assert!(Cli::try_parse_from(["pitwall"]).is_err());
    }
}
