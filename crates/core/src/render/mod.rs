use std::cell::{Cell, Ref, RefCell};

use crate::{FractalObserver, FractalSubject, GeneratedFractal, LineSegment, Result, Rgb};

/// Drawing surface the fractal is painted onto, one segment at a time.
pub trait LineRenderer {
    /// Called before the first segment of a frame.
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Draws a straight line of the segment's width and color between its
    /// endpoints, with round caps.
    fn draw_line(&mut self, segment: &LineSegment) -> Result<()>;

    /// Called after the last segment of a frame.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Paints a whole fractal in draw order.
pub fn render<R: LineRenderer + ?Sized>(fractal: &GeneratedFractal, renderer: &mut R) -> Result<()> {
    renderer.begin()?;
    for segment in fractal.segments() {
        renderer.draw_line(segment)?;
    }
    renderer.finish()
}

/// In-memory SVG document.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: u32,
    height: u32,
    background: Rgb,
    body: String,
    lines: usize,
}

impl SvgCanvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            body: String::new(),
            lines: 0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Complete document for the lines drawn since the last `begin`.
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height,
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
            self.background
        ));
        svg.push_str("<g stroke-linecap=\"round\" stroke-linejoin=\"round\">\n");
        svg.push_str(&self.body);
        svg.push_str("</g>\n</svg>\n");
        svg
    }
}

impl LineRenderer for SvgCanvas {
    fn begin(&mut self) -> Result<()> {
        self.body.clear();
        self.lines = 0;
        Ok(())
    }

    fn draw_line(&mut self, segment: &LineSegment) -> Result<()> {
        self.body.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
            segment.x1, segment.y1, segment.x2, segment.y2, segment.color, segment.width
        ));
        self.lines += 1;
        Ok(())
    }
}

/// Observer that repaints its renderer from the latest snapshot on every
/// notification.
#[derive(Debug)]
pub struct RenderObserver<R> {
    renderer: RefCell<R>,
    frames: Cell<usize>,
    last_generation: Cell<Option<u64>>,
}

impl<R: LineRenderer> RenderObserver<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer: RefCell::new(renderer),
            frames: Cell::new(0),
            last_generation: Cell::new(None),
        }
    }

    pub fn renderer(&self) -> Ref<'_, R> {
        self.renderer.borrow()
    }

    /// Number of frames painted successfully.
    pub fn frames(&self) -> usize {
        self.frames.get()
    }

    pub fn last_generation(&self) -> Option<u64> {
        self.last_generation.get()
    }

    /// Paints `fractal` immediately, outside of a notification.
    pub fn redraw(&self, fractal: &GeneratedFractal) -> Result<()> {
        let mut renderer = self.renderer.borrow_mut();
        render(fractal, &mut *renderer)?;
        self.frames.set(self.frames.get() + 1);
        self.last_generation.set(Some(fractal.generation()));
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.renderer.into_inner()
    }
}

impl<R: LineRenderer> FractalObserver for RenderObserver<R> {
    fn update(&self, subject: &dyn FractalSubject) {
        let snapshot = subject.snapshot();
        if let Err(err) = self.redraw(&snapshot) {
            tracing::error!(%err, generation = snapshot.generation(), "redraw failed");
        }
    }
}
