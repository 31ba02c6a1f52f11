use crate::{
    core::{Point, Viewport},
    model::Domain,
};

// Asymmetric margins: depth-shifted content leans right and up, and labels
// hang off the right edge, so those sides reserve more room.
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_RIGHT: f64 = 144.0;
const MARGIN_TOP: f64 = 96.0;
const MARGIN_BOTTOM: f64 = 48.0;

/// Fixed range band every curve is normalized against.
pub const Y_MIN: f64 = -60.0;
pub const Y_MAX: f64 = 60.0;

// Per-depth-unit screen shift: right and up.
const SLANT_X: f64 = 30.0;
const SLANT_Y: f64 = -20.0;

// Floor for the usable rectangle when the viewport is degenerate (zero or
// smaller than the margins). Keeps every projected coordinate finite.
const MIN_USABLE: f64 = 1.0;

/// The affine mapping from `(x, y, z)` domain space onto the drawing surface,
/// derived from the current viewport.
///
/// Recomputed on resize, immutable for the frame otherwise. The transform is:
///
/// 1. normalize `x` over the domain and `y` over `[Y_MIN, Y_MAX]` into `[0, 1]`
/// 2. map onto the usable rectangle (viewport minus margins, y flipped so
///    larger values draw higher)
/// 3. shift by `z` per depth unit: right (`slant x > 0`) and up
///    (`slant y < 0`) for the oblique receding look
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectionParams {
    viewport: Viewport,
    x_min: f64,
    x_max: f64,
    x_span: f64,
    left: f64,
    top: f64,
    usable_w: f64,
    usable_h: f64,
}

impl ProjectionParams {
    pub fn new(viewport: Viewport, domain: &Domain) -> Self {
        let usable_w = (f64::from(viewport.width) - MARGIN_LEFT - MARGIN_RIGHT).max(MIN_USABLE);
        let usable_h = (f64::from(viewport.height) - MARGIN_TOP - MARGIN_BOTTOM).max(MIN_USABLE);
        Self {
            viewport,
            x_min: domain.x_min,
            x_max: domain.x_max,
            x_span: domain.x_max - domain.x_min,
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            usable_w,
            usable_h,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Map a domain-space point at depth `z` to surface coordinates.
    pub fn project(&self, x: f64, y: f64, z: f64) -> Point {
        let u = (x - self.x_min) / self.x_span;
        let v = (y - Y_MIN) / (Y_MAX - Y_MIN);
        Point::new(
            self.left + u * self.usable_w + z * SLANT_X,
            self.top + (1.0 - v) * self.usable_h + z * SLANT_Y,
        )
    }

    /// Flatten onto the depth-plane floor (`y = Y_MIN`) for shadows and grid.
    pub fn project_to_floor(&self, x: f64, z: f64) -> Point {
        self.project(x, Y_MIN, z)
    }

    /// Invert the `z = 0` mapping back to `(x, y)` domain coordinates.
    pub fn unproject(&self, p: Point) -> (f64, f64) {
        let u = (p.x - self.left) / self.usable_w;
        let v = 1.0 - (p.y - self.top) / self.usable_h;
        (self.x_min + u * self.x_span, Y_MIN + v * (Y_MAX - Y_MIN))
    }
}
