use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Anchor, Point, RawSettings, Result, Rgb};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    /// Where the trunk starts. Defaults to the bottom centre of the canvas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorConfig>,
    pub tree: RawSettings,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Anchor in canonical units.
    pub fn anchor(&self) -> Anchor {
        match &self.anchor {
            Some(anchor) => Anchor {
                origin: anchor.origin,
                starting_angle: anchor.starting_angle_deg.to_radians(),
            },
            None => Anchor::bottom_center(self.canvas.width, self.canvas.height),
        }
    }
}

/// Size and backdrop of the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            background: Rgb::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub origin: Point,
    #[serde(default = "default_starting_angle")]
    pub starting_angle_deg: f64,
}

fn default_starting_angle() -> f64 {
    90.0
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.anchor(), Anchor::default());
    }

    #[test]
    fn anchor_follows_canvas_size() {
        let config = AppConfig::from_json_str(r#"{ "canvas": { "width": 640, "height": 480 } }"#)
            .unwrap();
        let anchor = config.anchor();
        assert_eq!(anchor.origin, Point::new(320, 480));
        assert_eq!(anchor.starting_angle, FRAC_PI_2);
    }

    #[test]
    fn explicit_anchor_is_converted_to_radians() {
        let config = AppConfig::from_json_str(
            r#"{ "anchor": { "origin": { "x": 5, "y": 6 }, "starting_angle_deg": 180.0 } }"#,
        )
        .unwrap();
        let anchor = config.anchor();
        assert_eq!(anchor.origin, Point::new(5, 6));
        assert!((anchor.starting_angle - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn round_trips_through_pretty_json() {
        let mut config = AppConfig::default();
        config.tree.depth = 7;
        config.canvas.background = Rgb::WHITE;

        let json = config.to_json_pretty().unwrap();
        assert_eq!(AppConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AppConfig::from_json_str("{ tree: ").unwrap_err();
        assert!(matches!(err, crate::FractalError::Config(_)));
    }
}
