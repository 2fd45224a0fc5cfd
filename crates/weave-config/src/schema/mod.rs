//! Configuration schema types for weave.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod navigation;
mod system;
mod window;

pub use bridge::*;
pub use navigation::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for weave.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    pub window: WindowConfig,
    pub navigation: NavigationConfig,
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}
