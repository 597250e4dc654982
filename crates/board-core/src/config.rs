//! Editor configuration.
//!
//! Hosts pass a JSON object (usually from their settings layer); missing
//! keys fall back to the defaults in [`crate::consts`].

use crate::consts;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid editor config: {0}")]
    Invalid(String),
}

/// Tunables for the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    pub fit_padding_px: f64,
    pub history_capacity: usize,
    pub merge_window_ms: u64,
    pub click_threshold_px: f64,
    pub handle_radius_px: f64,
    pub cull_threshold: usize,
    pub cull_buffer_ratio: f64,
    pub duplicate_offset: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_min: consts::ZOOM_MIN,
            zoom_max: consts::ZOOM_MAX,
            zoom_step: consts::ZOOM_STEP,
            fit_padding_px: consts::FIT_PADDING_PX,
            history_capacity: consts::HISTORY_CAPACITY,
            merge_window_ms: consts::MERGE_WINDOW_MS,
            click_threshold_px: consts::CLICK_THRESHOLD_PX,
            handle_radius_px: consts::HANDLE_RADIUS_PX,
            cull_threshold: consts::CULL_THRESHOLD,
            cull_buffer_ratio: consts::CULL_BUFFER_RATIO,
            duplicate_offset: consts::DUPLICATE_OFFSET,
            nudge_step: consts::NUDGE_STEP,
            nudge_step_large: consts::NUDGE_STEP_LARGE,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_min > 0.0 && self.zoom_min.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom_min must be positive, got {}",
                self.zoom_min
            )));
        }
        if !(self.zoom_max >= self.zoom_min && self.zoom_max.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom_max ({}) must be >= zoom_min ({})",
                self.zoom_max, self.zoom_min
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be > 1, got {}",
                self.zoom_step
            )));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".into(),
            ));
        }
        if self.cull_buffer_ratio < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cull_buffer_ratio must not be negative, got {}",
                self.cull_buffer_ratio
            )));
        }
        Ok(())
    }

    pub fn merge_window(&self) -> Duration {
        Duration::from_millis(self.merge_window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let config =
            EditorConfig::from_json(r#"{ "history_capacity": 10, "merge_window_ms": 250 }"#)
                .unwrap();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.merge_window(), Duration::from_millis(250));
        assert_eq!(config.zoom_max, consts::ZOOM_MAX);
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let err = EditorConfig::from_json(r#"{ "zoom_min": 4.0, "zoom_max": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(EditorConfig::from_json(r#"{ "history_capacity": 0 }"#).is_err());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = EditorConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
