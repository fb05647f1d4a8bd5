use std::env;

use serde::{Deserialize, Serialize};

fn default_max_width() -> u32 {
    512
}

fn default_required_height() -> u32 {
    128
}

/// Dimension bounds for uploaded icons
#[derive(Serialize, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct IconConfig {
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    #[serde(default = "default_required_height")]
    pub required_height: u32,
}

impl IconConfig {
    pub fn new() -> Self {
        let max_width = env::var("ICON_MAX_WIDTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_width);

        let required_height = env::var("ICON_HEIGHT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_required_height);

        Self {
            max_width,
            required_height,
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            required_height: default_required_height(),
        }
    }
}
