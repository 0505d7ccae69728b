use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::trackball::TrackballSettings;

/// Viewer tuning. Every field has a default, so a config file only needs the
/// keys it wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Duration of discrete camera moves (jump, zoom, roll), seconds.
    pub transition_s: f64,
    /// Smoothing applied while dragging, seconds.
    pub drag_s: f64,
    /// Focal length change per zoom step, millimetres.
    pub zoom_step: f64,
    pub zoom_floor: f64,
    pub roll_angle_deg: f64,
    /// Scale applied to view-relative jumps.
    pub local_jump_scale: f64,
    pub pick_radius_px: f64,
    /// Maximum angle between tessellated samples, radians.
    pub tessellation_resolution: f64,
    pub focal_length: f64,
    pub eye_distance: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            transition_s: 0.35,
            drag_s: 0.05,
            zoom_step: 10.0,
            zoom_floor: scene::camera::MIN_FOCAL_LENGTH,
            roll_angle_deg: 60.0,
            local_jump_scale: 0.1,
            pick_radius_px: scene::picking::DEFAULT_PICK_RADIUS_PX,
            tessellation_resolution: 0.02,
            focal_length: 35.0,
            eye_distance: 4.0,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&payload).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn trackball(&self) -> TrackballSettings {
        TrackballSettings {
            transition_s: self.transition_s.max(0.0),
            drag_s: self.drag_s.max(0.0),
            zoom_step: self.zoom_step,
            zoom_floor: self.zoom_floor.max(scene::camera::MIN_FOCAL_LENGTH),
            roll_angle: self.roll_angle_deg.to_radians(),
            local_jump_scale: self.local_jump_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewerConfig};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: ViewerConfig = serde_json::from_str(r#"{ "zoom_step": 5.0 }"#).expect("parse");
        assert_eq!(cfg.zoom_step, 5.0);
        assert_eq!(cfg.pick_radius_px, 7.0);
        assert_eq!(cfg.trackball().roll_angle, 60f64.to_radians());
    }

    #[test]
    fn zoom_floor_never_drops_below_minimum_focal_length() {
        let cfg = ViewerConfig {
            zoom_floor: 1.0,
            ..ViewerConfig::default()
        };
        assert_eq!(cfg.trackball().zoom_floor, 20.0);
    }

    #[test]
    fn load_reports_errors() {
        let dir = std::env::temp_dir().join(format!("isoview_config_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");

        assert!(matches!(
            ViewerConfig::load(dir.join("missing.json")),
            Err(ConfigError::Io { .. })
        ));

        let bad = dir.join("bad.json");
        fs::write(&bad, "{ \"zoom_step\": \"fast\" }").expect("write");
        assert!(matches!(ViewerConfig::load(&bad), Err(ConfigError::Parse { .. })));

        let good = dir.join("good.json");
        fs::write(&good, "{ \"focal_length\": 50.0 }").expect("write");
        assert_eq!(ViewerConfig::load(&good).expect("load").focal_length, 50.0);

        let _ = fs::remove_dir_all(&dir);
    }
}
