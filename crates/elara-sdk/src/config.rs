//! # Client Configuration

use crate::domain::value_objects::Address;
use serde::{Deserialize, Serialize};

/// SDK client configuration.
///
/// Transport selection order: an injected wallet/provider when present,
/// else `fallback_endpoint`. Selection happens once, at construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Address of the deployed framework contract.
    pub framework_address: Address,

    /// Endpoint dialed when no provider is injected.
    pub fallback_endpoint: String,

    /// Buffered events per subscription before a lagging subscriber
    /// starts dropping.
    pub event_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            framework_address: Address::ZERO,
            fallback_endpoint: "wss://mainnet.example.org/v1".to_string(),
            event_channel_capacity: 1024,
        }
    }
}

impl ClientConfig {
    /// Config bound to a framework address, otherwise defaults.
    #[must_use]
    pub fn for_framework(framework_address: Address) -> Self {
        Self {
            framework_address,
            ..Self::default()
        }
    }

    /// Small-capacity config for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            framework_address: Address::new([0xEE; 20]),
            fallback_endpoint: "memory://devnode".to_string(),
            event_channel_capacity: 64,
        }
    }
}
