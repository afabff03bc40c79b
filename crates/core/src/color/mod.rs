use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{FractalError, Result};

const CHANNEL_MAX: i32 = 255;

/// Names a single channel of an [`Rgb`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// RGB color used for both settings and emitted segments.
///
/// Channels are stored wide so that interpolation can step past the valid
/// range and be reported instead of wrapping. Every color the engine emits
/// has passed [`Rgb::checked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);

    pub const fn new(red: i32, green: i32, blue: i32) -> Self {
        Self { red, green, blue }
    }

    pub fn channels(&self) -> [(Channel, i32); 3] {
        [
            (Channel::Red, self.red),
            (Channel::Green, self.green),
            (Channel::Blue, self.blue),
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.channels()
            .iter()
            .all(|(_, value)| (0..=CHANNEL_MAX).contains(value))
    }

    /// Returns the color unchanged when every channel is within `0..=255`,
    /// otherwise reports the first offending channel.
    pub fn checked(self) -> Result<Self> {
        for (channel, value) in self.channels() {
            if !(0..=CHANNEL_MAX).contains(&value) {
                return Err(FractalError::ColorComponentOutOfRange { channel, value });
            }
        }
        Ok(self)
    }

    /// Adds one gradient step to every channel. Out of range results fail;
    /// they are never clamped.
    pub fn advance(self, step: ColorStep) -> Result<Self> {
        Rgb::new(
            self.red + step.red,
            self.green + step.green,
            self.blue + step.blue,
        )
        .checked()
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
        }
    }
}

impl FromStr for Rgb {
    type Err = FractalError;

    /// Accepts `#rrggbb` or a comma separated `r,g,b` triple.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let color = if let Some(hex) = s.strip_prefix('#') {
            parse_hex(hex).ok_or_else(|| FractalError::invalid(format!("bad hex color `{s}`")))?
        } else {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            let [red, green, blue] = parts.as_slice() else {
                return Err(FractalError::invalid(format!(
                    "expected `#rrggbb` or `r,g,b`, got `{s}`"
                )));
            };
            let channel = |part: &str| {
                part.parse::<i32>()
                    .map_err(|_| FractalError::invalid(format!("bad color channel `{part}`")))
            };
            Rgb::new(channel(*red)?, channel(*green)?, channel(*blue)?)
        };

        color
            .checked()
            .map_err(|err| FractalError::invalid(format!("color `{s}`: {err}")))
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| i32::from_str_radix(&hex[range], 16).ok();
    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Per-channel increment applied once per recursion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorStep {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

/// Linear trunk-to-leaf interpolation with truncating integer steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorGradient {
    start: Rgb,
    step: ColorStep,
}

impl ColorGradient {
    /// Computes `(leaf - trunk) / levels` per channel. Division truncates
    /// toward zero, so the gradient can stop short of `leaf`.
    pub fn new(trunk: Rgb, leaf: Rgb, levels: u32) -> Self {
        let levels = levels.max(1) as i32;
        Self {
            start: trunk,
            step: ColorStep {
                red: (leaf.red - trunk.red) / levels,
                green: (leaf.green - trunk.green) / levels,
                blue: (leaf.blue - trunk.blue) / levels,
            },
        }
    }

    pub fn start(&self) -> Rgb {
        self.start
    }

    pub fn step(&self) -> ColorStep {
        self.step
    }

    /// Color reached after `levels` steps from the trunk, without range checks.
    pub fn after(&self, levels: u32) -> Rgb {
        let n = levels as i32;
        Rgb::new(
            self.start.red + self.step.red * n,
            self.start.green + self.step.green * n,
            self.start.blue + self.step.blue * n,
        )
    }
}
