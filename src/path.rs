use std::f64::consts::PI;

use crate::{
    core::{BezPath, Point},
    project::ProjectionParams,
};

/// Grid rulings run every half depth unit; whole-unit steps draw thicker.
const DEPTH_STEP: f64 = 0.5;

/// Paths are emitted at a tenth of a surface unit; anything finer makes no
/// visible difference at stroke widths above a pixel.
fn snap(p: Point) -> Point {
    Point::new((p.x * 10.0).round() / 10.0, (p.y * 10.0).round() / 10.0)
}

/// One vertical reference line from the result curve down to the floor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GuideSegment {
    pub top: Point,
    pub foot: Point,
}

/// Floor rulings, split by stroke weight: `major` carries the whole-depth-step
/// lines, `minor` the half-step and x-axis rulings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FloorGrid {
    pub minor: BezPath,
    pub major: BezPath,
}

/// Project `(x, y)` samples at depth `z` and join them into one polyline in
/// domain order.
///
/// Non-finite samples break the line: the path lifts the pen and restarts at
/// the next finite point, so a NaN never reaches the drawable output.
pub fn curve_path(params: &ProjectionParams, xs: &[f64], ys: &[f64], z: f64) -> BezPath {
    debug_assert_eq!(xs.len(), ys.len());

    let mut path = BezPath::new();
    let mut pen_down = false;
    for (&x, &y) in xs.iter().zip(ys) {
        if !x.is_finite() || !y.is_finite() {
            pen_down = false;
            continue;
        }
        let p = snap(params.project(x, y, z));
        if pen_down {
            path.line_to(p);
        } else {
            path.move_to(p);
            pen_down = true;
        }
    }
    path
}

/// The same polyline flattened onto the floor plane, forming the layer's shadow.
pub fn shadow_path(params: &ProjectionParams, xs: &[f64], z: f64) -> BezPath {
    let mut path = BezPath::new();
    let mut pen_down = false;
    for &x in xs {
        if !x.is_finite() {
            pen_down = false;
            continue;
        }
        let p = snap(params.project_to_floor(x, z));
        if pen_down {
            path.line_to(p);
        } else {
            path.move_to(p);
            pen_down = true;
        }
    }
    path
}

/// Floor grid across the full depth range `[0, z_max]`:
///
/// - one ruling per half depth step spanning the x range, thicker at whole
///   steps
/// - one receding ruling per π-spaced x value spanning the depth range
pub fn floor_grid(params: &ProjectionParams, z_max: f64) -> FloorGrid {
    let mut grid = FloorGrid::default();

    let steps = (z_max / DEPTH_STEP).round().max(0.0) as usize;
    for i in 0..=steps {
        let z = i as f64 * DEPTH_STEP;
        let a = snap(params.project_to_floor(params.x_min(), z));
        let b = snap(params.project_to_floor(params.x_max(), z));
        let target = if i % 2 == 0 { &mut grid.major } else { &mut grid.minor };
        target.move_to(a);
        target.line_to(b);
    }

    let k_min = (params.x_min() / PI).ceil() as i64;
    let k_max = (params.x_max() / PI).floor() as i64;
    for k in k_min..=k_max {
        let x = k as f64 * PI;
        grid.minor.move_to(snap(params.project_to_floor(x, 0.0)));
        grid.minor.line_to(snap(params.project_to_floor(x, z_max)));
    }

    grid
}

/// Every `stride`-th result sample paired with its floor projection.
///
/// Non-finite samples are dropped, consistent with the curve builders.
pub fn guide_segments(
    params: &ProjectionParams,
    xs: &[f64],
    ys: &[f64],
    z: f64,
    stride: usize,
) -> Vec<GuideSegment> {
    debug_assert_eq!(xs.len(), ys.len());

    let stride = stride.max(1);
    xs.iter()
        .zip(ys)
        .step_by(stride)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| GuideSegment {
            top: snap(params.project(x, y, z)),
            foot: snap(params.project_to_floor(x, z)),
        })
        .collect()
}
