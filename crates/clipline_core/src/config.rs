use crate::error::{CoreError, Result};
use crate::types::TrackKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout and interaction constants for the timeline.
///
/// Pixel sizes are screen pixels. Durations derived from pixel widths
/// (minimum clip length, handle reach) are divided by the live scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub track_height: f64,
    pub track_spacing: f64,
    pub ruler_height: f64,
    /// Horizontal offset of time 0 on the ruler.
    pub ruler_left_inset: f64,
    pub handle_width: f64,
    /// Extra grab margin outside a clip's visual edge.
    pub handle_tolerance: f64,
    pub min_clip_width: f64,
    /// Smallest trimmed length in seconds, regardless of zoom.
    pub min_gap: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    pub scale_step: f64,
    pub default_scale: f64,
    pub wheel_zoom_factor: f64,
    pub viewport_width: f64,
    pub text_clip_duration: f64,
    pub text_clip_label: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            track_height: 60.0,
            track_spacing: 10.0,
            ruler_height: 50.0,
            ruler_left_inset: 0.0,
            handle_width: 10.0,
            handle_tolerance: 10.0,
            min_clip_width: 10.0,
            min_gap: 0.1,
            scale_min: 10.0,
            scale_max: 200.0,
            scale_step: 5.0,
            default_scale: 100.0,
            wheel_zoom_factor: 0.1,
            viewport_width: 800.0,
            text_clip_duration: 2.0,
            text_clip_label: "Text".to_string(),
        }
    }
}

impl EditorConfig {
    /// Thin rows for small screens.
    pub fn compact() -> Self {
        Self {
            track_height: 40.0,
            track_spacing: 4.0,
            ruler_height: 32.0,
            handle_width: 6.0,
            handle_tolerance: 6.0,
            ..Self::default()
        }
    }

    /// Tall rows with wide grab zones.
    pub fn comfortable() -> Self {
        Self {
            track_height: 80.0,
            track_spacing: 14.0,
            handle_width: 14.0,
            handle_tolerance: 12.0,
            ..Self::default()
        }
    }

    pub fn track_height_for(&self, _kind: TrackKind) -> f64 {
        self.track_height
    }

    /// Vertical distance between the tops of two consecutive rows.
    pub fn row_stride(&self) -> f64 {
        self.track_height + self.track_spacing
    }

    /// Top edge of a row, in the same coordinates as pointer events.
    pub fn row_top(&self, track_index: usize) -> f64 {
        self.ruler_height + track_index as f64 * self.row_stride()
    }

    /// Row under a pointer Y, clamped to existing rows. `None` when there are no rows.
    pub fn row_at(&self, y: f64, row_count: usize) -> Option<usize> {
        if row_count == 0 {
            return None;
        }
        let raw = ((y - self.ruler_height) / self.row_stride()).floor();
        let max = (row_count - 1) as f64;
        Some(raw.max(0.0).min(max) as usize)
    }

    /// Minimum clip length in seconds at the given zoom.
    pub fn min_clip_duration(&self, scale: f64) -> f64 {
        (self.min_clip_width / scale).max(self.min_gap)
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.scale_min).min(self.scale_max)
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("track_height", self.track_height),
            ("handle_width", self.handle_width),
            ("min_clip_width", self.min_clip_width),
            ("scale_min", self.scale_min),
            ("scale_step", self.scale_step),
            ("default_scale", self.default_scale),
            ("viewport_width", self.viewport_width),
            ("text_clip_duration", self.text_clip_duration),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.scale_min > self.scale_max {
            return Err(CoreError::InvalidConfig(format!(
                "scale_min {} exceeds scale_max {}",
                self.scale_min, self.scale_max
            )));
        }
        if self.default_scale < self.scale_min || self.default_scale > self.scale_max {
            return Err(CoreError::InvalidConfig(format!(
                "default_scale {} outside [{}, {}]",
                self.default_scale, self.scale_min, self.scale_max
            )));
        }
        if self.track_spacing < 0.0 || self.handle_tolerance < 0.0 || self.min_gap < 0.0 {
            return Err(CoreError::InvalidConfig(
                "spacing, tolerance and min_gap must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Save as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load and validate a JSON config. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: EditorConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }
}
