use crate::{ColorGradient, ColorStep, LineSegment, Point, Result, Rgb, Settings};

/// Preallocation cap for the working buffer; deeper trees grow on demand.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Number of segments a tree of `depth` levels contains, `2^depth - 1`.
/// `None` when the count does not fit in `usize`.
pub fn segment_count(depth: u32) -> Option<usize> {
    1usize.checked_shl(depth).map(|n| n - 1)
}

/// Generates every branch of the tree in draw order.
///
/// Traversal is pre-order with the right branch visited before the left, so
/// a parent is always painted beneath its children. The result is built in a
/// private buffer; on error nothing partial escapes.
pub fn generate(settings: &Settings) -> Result<Vec<LineSegment>> {
    let capacity = segment_count(settings.depth).map_or(PREALLOC_LIMIT, |n| n.min(PREALLOC_LIMIT));
    let mut segments = Vec::with_capacity(capacity);
    if settings.depth == 0 {
        return Ok(segments);
    }

    let gradient = ColorGradient::new(settings.trunk_color, settings.leaf_color, settings.depth);
    let trunk = Branch {
        depth_count: settings.depth,
        width: f64::from(settings.trunk_width),
        length: settings.trunk_length,
        angle: settings.starting_angle,
        color: settings.trunk_color.checked()?,
        start: settings.origin,
        end: settings.origin.project(settings.trunk_length, settings.starting_angle)?,
    };

    let mut grower = Grower {
        settings,
        step: gradient.step(),
        segments: &mut segments,
    };
    grower.grow(trunk)?;

    Ok(segments)
}

#[derive(Debug, Clone, Copy)]
struct Branch {
    depth_count: u32,
    width: f64,
    length: f64,
    angle: f64,
    color: Rgb,
    start: Point,
    end: Point,
}

struct Grower<'a> {
    settings: &'a Settings,
    step: ColorStep,
    segments: &'a mut Vec<LineSegment>,
}

impl Grower<'_> {
    fn grow(&mut self, branch: Branch) -> Result<()> {
        if branch.depth_count == 0 {
            return Ok(());
        }

        self.segments.push(LineSegment::new(
            branch.start,
            branch.end,
            branch.width as u32,
            branch.color,
        ));

        let width = branch.width * self.settings.ratio;
        let length = branch.length * self.settings.ratio;
        let color = branch.color.advance(self.step)?;
        let depth_count = branch.depth_count - 1;

        // Right first: emission order is paint order.
        let angles = [
            branch.angle - self.settings.right_angle,
            branch.angle + self.settings.left_angle,
        ];
        for angle in angles {
            self.grow(Branch {
                depth_count,
                width,
                length,
                angle,
                color,
                start: branch.end,
                end: branch.end.project(length, angle)?,
            })?;
        }

        Ok(())
    }
}
