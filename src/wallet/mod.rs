//! Wallet connection state, driven only by events the wallet adapter emits.
//!
//! The client feeds adapter callbacks (`connect`, `disconnect`,
//! `accountChanged`, errors) into [`ConnectionState::apply`] and renders from
//! the resulting state. Nothing here polls or reads browser storage.

use serde::{Deserialize, Serialize};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    #[serde(rename_all = "camelCase")]
    Connected { public_key: String },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum AdapterEvent {
    ConnectRequested,
    #[serde(rename_all = "camelCase")]
    Connected { public_key: String },
    #[serde(rename_all = "camelCase")]
    AccountChanged { public_key: String },
    Disconnected,
    Failed { message: String },
}

/// Base58 Solana address, 32 to 44 characters long.
pub fn is_valid_public_key(key: &str) -> bool {
    (32..=44).contains(&key.len()) && key.chars().all(|c| BASE58_ALPHABET.contains(c))
}

fn connected(public_key: String) -> ConnectionState {
    if is_valid_public_key(&public_key) {
        ConnectionState::Connected { public_key }
    } else {
        ConnectionState::Error {
            message: format!("Wallet reported an invalid public key: {public_key}"),
        }
    }
}

impl ConnectionState {
    /// Next state after `event`. Events that make no sense in the current
    /// state leave it unchanged.
    pub fn apply(self, event: AdapterEvent) -> Self {
        use AdapterEvent as E;
        use ConnectionState as S;

        match (self, event) {
            (_, E::Disconnected) => S::Disconnected,
            (S::Disconnected | S::Error { .. }, E::ConnectRequested) => S::Connecting,
            (S::Connecting, E::Connected { public_key }) => connected(public_key),
            (S::Connected { .. }, E::Connected { public_key })
            | (S::Connected { .. }, E::AccountChanged { public_key }) => connected(public_key),
            (S::Connecting | S::Connected { .. }, E::Failed { message }) => S::Error { message },
            (state, _) => state,
        }
    }

    pub fn public_key(&self) -> Option<&str> {
        match self {
            ConnectionState::Connected { public_key } => Some(public_key),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
    const OTHER_KEY: &str = "So11111111111111111111111111111111111111112";

    fn run(events: Vec<AdapterEvent>) -> ConnectionState {
        events
            .into_iter()
            .fold(ConnectionState::default(), ConnectionState::apply)
    }

    #[test]
    fn connects_through_connecting() {
        let state = run(vec![
            AdapterEvent::ConnectRequested,
            AdapterEvent::Connected {
                public_key: KEY.to_string(),
            },
        ]);
        assert!(state.is_connected());
        assert_eq!(state.public_key(), Some(KEY));
    }

    #[test]
    fn connected_event_without_request_is_ignored() {
        let state = run(vec![AdapterEvent::Connected {
            public_key: KEY.to_string(),
        }]);
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[test]
    fn account_change_swaps_key() {
        let state = run(vec![
            AdapterEvent::ConnectRequested,
            AdapterEvent::Connected {
                public_key: KEY.to_string(),
            },
            AdapterEvent::AccountChanged {
                public_key: OTHER_KEY.to_string(),
            },
        ]);
        assert_eq!(state.public_key(), Some(OTHER_KEY));
    }

    #[test]
    fn invalid_key_is_an_error() {
        let state = run(vec![
            AdapterEvent::ConnectRequested,
            AdapterEvent::Connected {
                public_key: "0OIl".to_string(),
            },
        ]);
        assert!(matches!(state, ConnectionState::Error { .. }));
    }

    #[test]
    fn failure_then_retry() {
        let state = run(vec![
            AdapterEvent::ConnectRequested,
            AdapterEvent::Failed {
                message: "User rejected the request".to_string(),
            },
        ]);
        assert_eq!(
            state,
            ConnectionState::Error {
                message: "User rejected the request".to_string()
            }
        );

        let state = state.apply(AdapterEvent::ConnectRequested);
        assert_eq!(state, ConnectionState::Connecting);
    }

    #[test]
    fn disconnect_always_wins() {
        let state = run(vec![
            AdapterEvent::ConnectRequested,
            AdapterEvent::Connected {
                public_key: KEY.to_string(),
            },
            AdapterEvent::Disconnected,
        ]);
        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(state.public_key(), None);
    }

    #[test]
    fn events_deserialize_from_adapter_payloads() {
        let event: AdapterEvent =
            serde_json::from_str(&format!(r#"{{"event":"accountChanged","publicKey":"{KEY}"}}"#))
                .unwrap();
        assert_eq!(
            event,
            AdapterEvent::AccountChanged {
                public_key: KEY.to_string()
            }
        );
    }
}
