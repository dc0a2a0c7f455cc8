//! Network connectivity status.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Kind of active network link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Wifi,
    Cellular,
    #[default]
    None,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Wifi => "wifi",
            ConnectionType::Cellular => "cellular",
            ConnectionType::None => "none",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wifi" => Ok(ConnectionType::Wifi),
            "cellular" => Ok(ConnectionType::Cellular),
            "none" | "offline" => Ok(ConnectionType::None),
            other => Err(format!("unknown connection type '{}'", other)),
        }
    }
}

/// Snapshot of network reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    pub is_connected: bool,
    pub connection_type: ConnectionType,
    pub is_metered: bool,
}

impl ConnectivityStatus {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn wifi() -> Self {
        Self {
            is_connected: true,
            connection_type: ConnectionType::Wifi,
            is_metered: false,
        }
    }

    pub fn cellular() -> Self {
        Self {
            is_connected: true,
            connection_type: ConnectionType::Cellular,
            is_metered: true,
        }
    }

    /// Status for a link type; `None` is always disconnected.
    pub fn from_link(connection_type: ConnectionType, is_metered: bool) -> Self {
        match connection_type {
            ConnectionType::None => Self::offline(),
            _ => Self {
                is_connected: true,
                connection_type,
                is_metered,
            },
        }
    }
}

/// Source of the current connectivity status.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn current_status(&self) -> ConnectivityStatus;
}

/// Probe that always reports a fixed status.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticConnectivity(pub ConnectivityStatus);

#[async_trait]
impl ConnectivityProbe for StaticConnectivity {
    async fn current_status(&self) -> ConnectivityStatus {
        self.0
    }
}
