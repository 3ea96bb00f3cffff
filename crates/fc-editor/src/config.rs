//! Tunables for the interaction engine and the timeline scrubber.
//!
//! Both configs deserialize from camelCase JSON with every field optional,
//! so a host can override just the knobs it cares about.

use fc_core::{MAX_VIEWPORT_EXTENT, MIN_VIEWPORT_EXTENT, PayloadError};
use serde::{Deserialize, Serialize};

/// Held key that turns a primary-button press on an element into a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanModifier {
    #[default]
    Alt,
    Ctrl,
    Meta,
    Shift,
    /// Only the secondary button pans.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Arrow-key nudge step in scene units.
    pub grid_size: f64,
    /// Shift+arrow nudge step.
    pub fine_nudge: f64,
    /// Press/release distance (client px) below which a gesture is a click.
    pub click_threshold_px: f64,
    /// Max gap between two clicks on the same element for a double-click.
    pub double_click_ms: f64,
    /// Quiet period after the last wheel tick before the zoom is committed.
    pub zoom_debounce_ms: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub min_viewport_extent: f64,
    pub max_viewport_extent: f64,
    /// Smallest committed element width/height.
    pub min_element_size: f64,
    pub pan_modifier: PanModifier,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            fine_nudge: 1.0,
            click_threshold_px: 2.0,
            double_click_ms: 400.0,
            zoom_debounce_ms: 100.0,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            min_viewport_extent: MIN_VIEWPORT_EXTENT,
            max_viewport_extent: MAX_VIEWPORT_EXTENT,
            min_element_size: 20.0,
            pan_modifier: PanModifier::Alt,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON override; missing keys keep their defaults.
    ///
    /// # Errors
    /// Malformed JSON, or a range that cannot hold any viewport.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let config: Self = serde_json::from_str(json)?;
        if !(config.min_viewport_extent > 0.0
            && config.min_viewport_extent <= config.max_viewport_extent)
        {
            return Err(PayloadError::invalid(
                "viewport extent",
                format!(
                    "[{}, {}] is empty or non-positive",
                    config.min_viewport_extent, config.max_viewport_extent
                ),
            ));
        }
        if config.grid_size <= 0.0 {
            return Err(PayloadError::invalid("gridSize", "must be positive"));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Minimum gap between change notifications while dragging.
    pub throttle_ms: f64,
    /// Fraction of the range from the live edge that snaps to live.
    pub live_snap_ratio: f64,
    /// Arrow-key step as a fraction of the range.
    pub arrow_step: f64,
    /// Shift+arrow step as a fraction of the range.
    pub arrow_step_coarse: f64,
    /// Alpha of the densest density bucket.
    pub density_max_alpha: f64,
    pub density_color: [u8; 3],
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 60.0,
            live_snap_ratio: 0.02,
            arrow_step: 0.01,
            arrow_step_coarse: 0.10,
            density_max_alpha: 0.35,
            density_color: [74, 158, 255],
        }
    }
}

impl TimelineConfig {
    /// # Errors
    /// Malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = EditorConfig::from_json(r#"{"gridSize": 10, "panModifier": "meta"}"#).unwrap();
        assert_eq!(cfg.grid_size, 10.0);
        assert_eq!(cfg.pan_modifier, PanModifier::Meta);
        assert_eq!(cfg.double_click_ms, 400.0);
        assert_eq!(cfg.max_viewport_extent, 50_000.0);
    }

    #[test]
    fn rejects_empty_extent_range() {
        let err = EditorConfig::from_json(r#"{"minViewportExtent": 900, "maxViewportExtent": 100}"#)
            .unwrap_err();
        assert!(err.to_string().contains("viewport extent"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{grid"),
            Err(PayloadError::Json(_))
        ));
    }

    #[test]
    fn timeline_defaults() {
        let cfg = TimelineConfig::from_json("{}").unwrap();
        assert_eq!(cfg, TimelineConfig::default());
    }
}
