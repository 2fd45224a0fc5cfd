//! Script bridge configuration types.

use serde::{Deserialize, Serialize};

/// Limits for the JS <-> host call bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Maximum number of unresolved bound calls per instance
    /// (valid range: 1-1000000). Calls beyond this are rejected.
    pub max_pending_calls: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_pending_calls: 1024,
        }
    }
}
