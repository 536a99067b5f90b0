//! Host-frame messages
//!
//! The game runs inside an iframe and talks to its host with postMessage.
//! Inbound messages are accepted on shape alone; anything that does not parse
//! is dropped.

use serde::{Deserialize, Serialize};

use crate::sim::{Direction, GameState};

/// Messages the host may send
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    DirectionChange { direction: Direction, timestamp: f64 },
    StartGame { timestamp: f64 },
    ResetGame { timestamp: f64 },
}

/// Messages the game sends to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMessage {
    #[serde(rename_all = "camelCase")]
    GameState {
        game_started: bool,
        game_over: bool,
        score: u32,
        timestamp: f64,
    },
    GameReady { timestamp: f64 },
}

impl GameMessage {
    pub fn snapshot(state: &GameState, timestamp: f64) -> Self {
        GameMessage::GameState {
            game_started: state.game_started,
            game_over: state.game_over,
            score: state.score,
            timestamp,
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Parse an inbound message, `None` if it has the wrong shape
pub fn parse_host_message(json: &str) -> Option<HostMessage> {
    match serde_json::from_str(json) {
        Ok(msg) => Some(msg),
        Err(e) => {
            log::debug!("Ignoring host message: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction_change() {
        let msg = parse_host_message(r#"{"type":"DIRECTION_CHANGE","direction":"UP","timestamp":12.0}"#);
        assert_eq!(
            msg,
            Some(HostMessage::DirectionChange {
                direction: Direction::Up,
                timestamp: 12.0
            })
        );
    }

    #[test]
    fn test_parse_start_and_reset() {
        assert_eq!(
            parse_host_message(r#"{"type":"START_GAME","timestamp":1}"#),
            Some(HostMessage::StartGame { timestamp: 1.0 })
        );
        assert_eq!(
            parse_host_message(r#"{"type":"RESET_GAME","timestamp":2,"extra":true}"#),
            Some(HostMessage::ResetGame { timestamp: 2.0 })
        );
    }

    #[test]
    fn test_malformed_ignored() {
        assert!(parse_host_message("not json").is_none());
        assert!(parse_host_message(r#"{"type":"DIRECTION_CHANGE","direction":"NORTH","timestamp":1}"#).is_none());
        assert!(parse_host_message(r#"{"type":"LAUNCH","timestamp":1}"#).is_none());
        assert!(parse_host_message(r#"{"direction":"UP"}"#).is_none());
    }

    #[test]
    fn test_outbound_shape() {
        let msg = GameMessage::GameState {
            game_started: true,
            game_over: false,
            score: 40,
            timestamp: 5.0,
        };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "GAME_STATE");
        assert_eq!(value["gameStarted"], true);
        assert_eq!(value["gameOver"], false);
        assert_eq!(value["score"], 40);

        let ready = GameMessage::GameReady { timestamp: 1.0 }.to_json().unwrap();
        assert!(ready.contains(r#""type":"GAME_READY""#));
    }
}
