//! Log-line classification for the supervised game server.
//!
//! The game server does not speak a structured protocol; lifecycle
//! transitions are inferred from its diagnostic output. This module owns
//! the prioritized pattern table that maps one line of text to exactly one
//! [`LifecycleEvent`]. Classification never fails: anything the table does
//! not recognize is [`LifecycleEvent::Unrecognized`] and is ignored
//! downstream.
//!
//! The table is evaluated in a fixed order and the first match wins. The
//! patterns are disjoint on real server output, so the order is chosen
//! most-specific-first: player join (carries a capture), player leave,
//! connection drain, startup banner.

use std::sync::LazyLock;

use regex::Regex;

/// A lifecycle transition inferred from one line of server output.
///
/// Produced once per input line and consumed exactly once by the
/// lifecycle controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The server printed its startup banner and is ready for traffic.
    ServerReady,
    /// A client connected. The identifier is the descriptor token captured
    /// from the line; `None` if the capture could not be extracted.
    PlayerJoined {
        /// Opaque player identifier, verbatim from the log line.
        player: Option<String>,
    },
    /// A client disconnected. The leave pattern carries no identifier.
    PlayerLeft,
    /// The server reported zero remaining connections.
    NoActivePlayers,
    /// Line matched no pattern; ignored by all consumers.
    Unrecognized,
}

/// Connection accepted, e.g. "Connection from 10.0.0.5 on file descriptor 7."
static PLAYER_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"on file descriptor \b(\w+)\.$").unwrap());

/// Connection torn down.
static PLAYER_LEAVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Closing connection").unwrap());

/// All connections closed.
static NO_ACTIVE_PLAYERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Broker connection count is 0").unwrap());

/// Startup banner, e.g. "Ncat: Version 7.93 ( https://nmap.org/ncat )".
static SERVER_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Version").unwrap());

/// Classify one line of server output.
///
/// Returns exactly one event; unmatched lines map to
/// [`LifecycleEvent::Unrecognized`], never an error.
pub fn classify(line: &str) -> LifecycleEvent {
    if PLAYER_JOIN.is_match(line) {
        let player = PLAYER_JOIN
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        return LifecycleEvent::PlayerJoined { player };
    }

    if PLAYER_LEAVE.is_match(line) {
        return LifecycleEvent::PlayerLeft;
    }

    if NO_ACTIVE_PLAYERS.is_match(line) {
        return LifecycleEvent::NoActivePlayers;
    }

    if SERVER_START.is_match(line) {
        return LifecycleEvent::ServerReady;
    }

    LifecycleEvent::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_banner_is_server_ready() {
        assert_eq!(classify("Ncat: Version 7.93"), LifecycleEvent::ServerReady);
        assert_eq!(classify("Version 1.2.3"), LifecycleEvent::ServerReady);
    }

    #[test]
    fn test_join_extracts_descriptor_verbatim() {
        let event = classify("Ncat: Connection from 10.0.0.5 on file descriptor 7.");
        assert_eq!(
            event,
            LifecycleEvent::PlayerJoined {
                player: Some("7".to_string())
            }
        );
    }

    #[test]
    fn test_join_requires_line_terminal_period() {
        // The descriptor token must end the line; a trailing fragment means
        // the pattern does not apply.
        let event = classify("Connection from 10.0.0.5 on file descriptor 7. extra");
        assert_eq!(event, LifecycleEvent::Unrecognized);
    }

    #[test]
    fn test_closing_connection_is_player_left() {
        assert_eq!(
            classify("Ncat: Closing connection."),
            LifecycleEvent::PlayerLeft
        );
    }

    #[test]
    fn test_zero_connections_is_no_active_players() {
        assert_eq!(
            classify("Ncat: Broker connection count is 0. Closing all sockets."),
            LifecycleEvent::NoActivePlayers
        );
    }

    #[test]
    fn test_arbitrary_lines_are_unrecognized() {
        assert_eq!(classify(""), LifecycleEvent::Unrecognized);
        assert_eq!(
            classify("Listening on 0.0.0.0:7777"),
            LifecycleEvent::Unrecognized
        );
        assert_eq!(
            classify("random chatter from a player"),
            LifecycleEvent::Unrecognized
        );
    }

    #[test]
    fn test_first_match_wins_over_banner() {
        // A pathological line matching both join and banner patterns
        // resolves to the join event because the table is ordered.
        let event = classify("Version check on file descriptor 12.");
        assert_eq!(
            event,
            LifecycleEvent::PlayerJoined {
                player: Some("12".to_string())
            }
        );
    }
}
