//! Core library for the Fractal Tree generator.
//!
//! A [`FractalStore`] turns [`RawSettings`] into a binary tree of
//! [`LineSegment`]s through the recursion in [`engine`] and republishes the
//! result to registered [`FractalObserver`]s. Drawing is left to any
//! [`LineRenderer`]; [`SvgCanvas`] is the bundled one.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod render;
pub mod settings;
pub mod store;

pub use color::{Channel, ColorGradient, ColorStep, Rgb};
pub use config::{AnchorConfig, AppConfig, CanvasConfig};
pub use engine::{generate, segment_count};
pub use error::{FractalError, Result};
pub use geometry::{Bounds, LineSegment, Point};
pub use render::{render, LineRenderer, RenderObserver, SvgCanvas};
pub use settings::{Anchor, RawSettings, Settings, MAX_DEPTH};
pub use store::{FractalObserver, FractalStore, FractalSubject, GeneratedFractal, ObserverHandle};
