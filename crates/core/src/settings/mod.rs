use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::{FractalError, Point, Result, Rgb};

/// Deepest tree normalization accepts. Segment count doubles per level.
pub const MAX_DEPTH: u32 = 24;

const PERCENT: f64 = 0.01;

/// Parameters as a settings producer supplies them: ratio in percent and
/// angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub depth: i32,
    pub ratio_percent: i32,
    pub left_angle_deg: f64,
    pub right_angle_deg: f64,
    pub trunk_length: f64,
    pub trunk_width: i32,
    pub trunk_color: Rgb,
    pub leaf_color: Rgb,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            depth: 12,
            ratio_percent: 60,
            left_angle_deg: 45.0,
            right_angle_deg: 45.0,
            trunk_length: 250.0,
            trunk_width: 25,
            trunk_color: Rgb::BLUE,
            leaf_color: Rgb::GREEN,
        }
    }
}

impl RawSettings {
    /// Validates the raw values and converts them into canonical units.
    pub fn normalize(&self, anchor: &Anchor) -> Result<Settings> {
        if self.depth <= 0 {
            return Err(FractalError::invalid(format!(
                "depth must be positive, got {}",
                self.depth
            )));
        }
        if self.ratio_percent < 0 {
            return Err(FractalError::invalid(format!(
                "ratio must not be negative, got {}%",
                self.ratio_percent
            )));
        }
        if self.trunk_width < 0 {
            return Err(FractalError::invalid(format!(
                "trunk width must not be negative, got {}",
                self.trunk_width
            )));
        }
        let trunk_color = checked_color("trunk", self.trunk_color)?;
        let leaf_color = checked_color("leaf", self.leaf_color)?;

        let settings = Settings {
            depth: self.depth as u32,
            ratio: f64::from(self.ratio_percent) * PERCENT,
            left_angle: self.left_angle_deg.to_radians(),
            right_angle: self.right_angle_deg.to_radians(),
            trunk_length: self.trunk_length,
            trunk_width: self.trunk_width as u32,
            trunk_color,
            leaf_color,
            origin: anchor.origin,
            starting_angle: anchor.starting_angle,
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn checked_color(role: &str, color: Rgb) -> Result<Rgb> {
    color
        .checked()
        .map_err(|err| FractalError::invalid(format!("{role} color: {err}")))
}

/// Where the trunk is planted and which way it points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub origin: Point,
    /// Radians, counter-clockwise from the positive x axis.
    pub starting_angle: f64,
}

impl Anchor {
    /// Trunk rooted at the bottom centre of a `width` by `height` canvas,
    /// growing straight up.
    pub fn bottom_center(width: u32, height: u32) -> Self {
        Self {
            origin: Point::new((width / 2) as i32, height as i32),
            starting_angle: FRAC_PI_2,
        }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::bottom_center(1000, 800)
    }
}

/// Canonical generation parameters: fractional ratio and radian angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub depth: u32,
    pub ratio: f64,
    pub left_angle: f64,
    pub right_angle: f64,
    pub trunk_length: f64,
    pub trunk_width: u32,
    pub trunk_color: Rgb,
    pub leaf_color: Rgb,
    pub origin: Point,
    pub starting_angle: f64,
}

impl Settings {
    /// Rejects values the engine has no meaningful geometry for. Color range
    /// is left to the engine, which reports it per channel.
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(FractalError::invalid("depth must be positive, got 0"));
        }
        if self.depth > MAX_DEPTH {
            return Err(FractalError::invalid(format!(
                "depth {} exceeds the maximum of {MAX_DEPTH}",
                self.depth
            )));
        }
        if !self.ratio.is_finite() || self.ratio < 0.0 {
            return Err(FractalError::invalid(format!(
                "ratio must be finite and not negative, got {}",
                self.ratio
            )));
        }
        if !self.left_angle.is_finite() || !self.right_angle.is_finite() {
            return Err(FractalError::invalid("branch angles must be finite"));
        }
        if !self.starting_angle.is_finite() {
            return Err(FractalError::invalid("starting angle must be finite"));
        }
        if !self.trunk_length.is_finite() || self.trunk_length <= 0.0 {
            return Err(FractalError::invalid(format!(
                "trunk length must be positive, got {}",
                self.trunk_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use super::*;

    fn raw() -> RawSettings {
        RawSettings {
            depth: 2,
            ratio_percent: 50,
            left_angle_deg: 45.0,
            right_angle_deg: 90.0,
            trunk_length: 100.0,
            trunk_width: 10,
            trunk_color: Rgb::BLUE,
            leaf_color: Rgb::GREEN,
        }
    }

    #[test]
    fn converts_units() {
        let settings = raw().normalize(&Anchor::default()).unwrap();

        assert_eq!(settings.depth, 2);
        assert_eq!(settings.ratio, 0.5);
        assert!((settings.left_angle - FRAC_PI_4).abs() < 1e-12);
        assert!((settings.right_angle - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(settings.trunk_width, 10);
        assert_eq!(settings.origin, Point::new(500, 800));
        assert_eq!(settings.starting_angle, FRAC_PI_2);
    }

    #[test]
    fn anchor_is_carried_into_settings() {
        let anchor = Anchor {
            origin: Point::new(10, 20),
            starting_angle: 0.0,
        };
        let settings = raw().normalize(&anchor).unwrap();
        assert_eq!(settings.origin, Point::new(10, 20));
        assert_eq!(settings.starting_angle, 0.0);
    }

    #[test]
    fn rejects_non_positive_depth() {
        for depth in [0, -3] {
            let err = RawSettings { depth, ..raw() }
                .normalize(&Anchor::default())
                .unwrap_err();
            assert!(matches!(err, FractalError::InvalidSettings(_)));
        }
    }

    #[test]
    fn rejects_excessive_depth() {
        let err = RawSettings {
            depth: MAX_DEPTH as i32 + 1,
            ..raw()
        }
        .normalize(&Anchor::default())
        .unwrap_err();
        assert!(format!("{err}").contains("maximum"));
    }

    #[test]
    fn rejects_out_of_domain_values() {
        let anchor = Anchor::default();
        let cases = [
            RawSettings {
                trunk_length: -1.0,
                ..raw()
            },
            RawSettings {
                trunk_length: 0.0,
                ..raw()
            },
            RawSettings {
                trunk_width: -1,
                ..raw()
            },
            RawSettings {
                ratio_percent: -10,
                ..raw()
            },
            RawSettings {
                left_angle_deg: f64::NAN,
                ..raw()
            },
            RawSettings {
                leaf_color: Rgb::new(0, 0, 256),
                ..raw()
            },
        ];

        for case in cases {
            let err = case.normalize(&anchor).unwrap_err();
            assert!(
                matches!(err, FractalError::InvalidSettings(_)),
                "expected rejection for {case:?}"
            );
        }
    }

    #[test]
    fn validate_rejects_hand_built_out_of_domain_settings() {
        let valid = raw().normalize(&Anchor::default()).unwrap();
        assert!(valid.validate().is_ok());

        let cases = [
            Settings { depth: 0, ..valid },
            Settings {
                depth: MAX_DEPTH + 1,
                ..valid
            },
            Settings {
                ratio: f64::NAN,
                ..valid
            },
            Settings {
                ratio: -0.5,
                ..valid
            },
            Settings {
                right_angle: f64::INFINITY,
                ..valid
            },
            Settings {
                starting_angle: f64::NAN,
                ..valid
            },
            Settings {
                trunk_length: 0.0,
                ..valid
            },
        ];
        for case in cases {
            let err = case.validate().unwrap_err();
            assert!(
                matches!(err, FractalError::InvalidSettings(_)),
                "expected rejection for {case:?}"
            );
        }
    }

    #[test]
    fn validate_leaves_color_range_to_the_engine() {
        let settings = Settings {
            leaf_color: Rgb::new(0, 0, 300),
            ..raw().normalize(&Anchor::default()).unwrap()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let parsed: RawSettings = serde_json::from_str(r#"{ "depth": 3 }"#).unwrap();
        assert_eq!(parsed.depth, 3);
        assert_eq!(parsed.ratio_percent, 60);
        assert_eq!(parsed.trunk_color, Rgb::BLUE);
    }
}
