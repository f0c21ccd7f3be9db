use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TapConfig {
    pub min_click_ms: u64,
    pub max_click_ms: u64,
    pub double_click_ms: u64,
    /// Manhattan radius around the press anchor that still counts as a click.
    pub click_distance_px: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrollConfig {
    pub min_scroll_delta_squared: f32,
    /// px²/s²
    pub min_flick_speed_squared: f32,
    pub rail_start_ratio: f32,
    pub rail_break_ratio: f32,
    /// px/s
    pub rail_break_min_velocity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinchConfig {
    pub min_update_distance_px: f32,
    pub min_scroll_distance_px: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GestureConfig {
    pub tap: TapConfig,
    pub scroll: ScrollConfig,
    pub pinch: PinchConfig,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            min_click_ms: 10,
            max_click_ms: 800,
            double_click_ms: 700,
            click_distance_px: 20.0,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            min_scroll_delta_squared: 5.0 * 5.0,
            min_flick_speed_squared: 550.0 * 550.0,
            rail_start_ratio: 2.0,
            rail_break_ratio: 15.0,
            rail_break_min_velocity: 200.0,
        }
    }
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            min_update_distance_px: 5.0,
            min_scroll_distance_px: 20.0,
        }
    }
}

pub fn load_config(path: &Path) -> Result<GestureConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_str(&raw)?;
    log::debug!("loaded gesture config from {}", path.display());
    Ok(config)
}

pub fn parse_config_str(raw: &str) -> Result<GestureConfig, ConfigError> {
    let config: GestureConfig =
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GestureConfig) -> Result<(), ConfigError> {
    let tap = &config.tap;
    if tap.min_click_ms >= tap.max_click_ms {
        return Err(validation("tap.min_click_ms must be < tap.max_click_ms"));
    }
    if tap.double_click_ms == 0 {
        return Err(validation("tap.double_click_ms must be > 0"));
    }
    if !(tap.click_distance_px.is_finite() && tap.click_distance_px > 0.0) {
        return Err(validation(
            "tap.click_distance_px must be a positive finite number",
        ));
    }

    let scroll = &config.scroll;
    if ![
        scroll.min_scroll_delta_squared,
        scroll.min_flick_speed_squared,
        scroll.rail_start_ratio,
        scroll.rail_break_ratio,
        scroll.rail_break_min_velocity,
    ]
    .into_iter()
    .all(non_negative_finite)
    {
        return Err(validation(
            "all scroll fields must be non-negative finite numbers",
        ));
    }
    // Below 1.0 a single delta could match both rails.
    if scroll.rail_start_ratio < 1.0 {
        return Err(validation("scroll.rail_start_ratio must be >= 1.0"));
    }

    let pinch = &config.pinch;
    if ![pinch.min_update_distance_px, pinch.min_scroll_distance_px]
        .into_iter()
        .all(non_negative_finite)
    {
        return Err(validation(
            "all pinch fields must be non-negative finite numbers",
        ));
    }

    Ok(())
}

fn non_negative_finite(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn validation(msg: &str) -> ConfigError {
    ConfigError::Validation(msg.to_string())
}
