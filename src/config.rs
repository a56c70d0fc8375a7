use serde::{Deserialize, Serialize};

use crate::error::EmitterError;

pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Emitter settings.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Bucket size above which a leak warning is logged. 0 disables the warning.
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        EmitterConfig {
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl EmitterConfig {
    pub fn from_json(json: &str) -> Result<Self, EmitterError> {
        serde_json::from_str(json).map_err(|e| EmitterError::InvalidConfig(e.to_string()))
    }
}
