use serde::{Deserialize, Serialize};

use crate::{FractalError, Result, Rgb};

const PIXEL_RANGE: std::ops::RangeInclusive<f64> = (i32::MIN as f64)..=(i32::MAX as f64);

/// Integer pixel position. Larger `y` is further down the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves `length` pixels along `angle` (radians, counter-clockwise from
    /// the positive x axis). Each offset is truncated toward zero on its own
    /// before being applied. Fails when the end point leaves the `i32` grid.
    pub fn project(self, length: f64, angle: f64) -> Result<Self> {
        let x = f64::from(self.x) + (length * angle.cos()).trunc();
        let y = f64::from(self.y) - (length * angle.sin()).trunc();
        if !PIXEL_RANGE.contains(&x) || !PIXEL_RANGE.contains(&y) {
            return Err(FractalError::CoordinateOutOfRange { x, y });
        }
        Ok(Self {
            x: x as i32,
            y: y as i32,
        })
    }
}

/// One drawn branch of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub width: u32,
    pub color: Rgb,
}

impl LineSegment {
    pub fn new(start: Point, end: Point, width: u32, color: Rgb) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            width,
            color,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

/// Axis aligned box spanning a set of points, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Smallest box containing every endpoint, or `None` for no segments.
    pub fn of_segments<'a>(segments: impl IntoIterator<Item = &'a LineSegment>) -> Option<Self> {
        segments
            .into_iter()
            .flat_map(|segment| [segment.start(), segment.end()])
            .fold(None, |bounds: Option<Bounds>, point| {
                Some(match bounds {
                    None => Bounds {
                        min: point,
                        max: point,
                    },
                    Some(b) => Bounds {
                        min: Point::new(b.min.x.min(point.x), b.min.y.min(point.y)),
                        max: Point::new(b.max.x.max(point.x), b.max.y.max(point.y)),
                    },
                })
            })
    }

    pub fn width(&self) -> u32 {
        self.min.x.abs_diff(self.max.x)
    }

    pub fn height(&self) -> u32 {
        self.min.y.abs_diff(self.max.y)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn projecting_up_moves_toward_smaller_y() {
        let end = Point::new(500, 800).project(250.0, FRAC_PI_2).unwrap();
        assert_eq!(end, Point::new(500, 550));
    }

    #[test]
    fn projection_truncates_toward_zero() {
        // cos(pi) * 10.9 = -10.9 truncates to -10, not -11.
        let end = Point::new(0, 0).project(10.9, PI).unwrap();
        assert_eq!(end, Point::new(-10, 0));
    }

    #[test]
    fn projection_past_pixel_grid_fails() {
        let err = Point::new(500, 800).project(1e10, 0.0).unwrap_err();
        assert!(matches!(err, FractalError::CoordinateOutOfRange { .. }));

        // Offset fits on its own but the sum does not.
        let err = Point::new(i32::MAX - 5, 0).project(10.0, 0.0).unwrap_err();
        assert!(matches!(err, FractalError::CoordinateOutOfRange { .. }));

        let err = Point::new(0, i32::MIN).project(10.0, FRAC_PI_2).unwrap_err();
        assert!(matches!(err, FractalError::CoordinateOutOfRange { .. }));
    }

    #[test]
    fn projection_reaches_the_grid_edge() {
        let end = Point::new(i32::MAX - 10, 0).project(10.0, 0.0).unwrap();
        assert_eq!(end, Point::new(i32::MAX, 0));
    }

    #[test]
    fn bounds_cover_all_endpoints() {
        let segments = [
            LineSegment::new(Point::new(0, 10), Point::new(5, -3), 1, Rgb::BLACK),
            LineSegment::new(Point::new(-4, 2), Point::new(7, 8), 1, Rgb::BLACK),
        ];
        let bounds = Bounds::of_segments(&segments).unwrap();
        assert_eq!(bounds.min, Point::new(-4, -3));
        assert_eq!(bounds.max, Point::new(7, 10));
        assert_eq!(bounds.width(), 11);
        assert_eq!(bounds.height(), 13);
        assert!(Bounds::of_segments(&[] as &[LineSegment]).is_none());
    }
}
