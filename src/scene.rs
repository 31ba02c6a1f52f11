use crate::{
    core::{BezPath, Point, Rgba8, Viewport},
    error::ObliqResult,
    eval::{self, DomainGrid},
    model::Plot,
    path::{self, FloorGrid, GuideSegment},
    project::ProjectionParams,
};

/// Every `GUIDE_STRIDE`-th result sample gets a vertical guide line.
const GUIDE_STRIDE: usize = 30;

const BASIS_STROKE_WIDTH: f64 = 1.5;
const RESULT_STROKE_WIDTH: f64 = 2.5;

/// Shadows reuse the layer color at a fraction of its opacity.
const SHADOW_OPACITY: f64 = 0.25;

/// Which curve a layer draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LayerSource {
    /// Index into [`Plot::basis`].
    Basis(usize),
    Result,
}

/// One drawable curve, plus its floor shadow, at a fixed depth.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub source: LayerSource,
    pub z: f64,
    pub curve: BezPath,
    pub shadow: BezPath,
    pub color: Rgba8,
    pub opacity: f64,
    pub shadow_opacity: f64,
    pub stroke_width: f64,
}

/// Text anchored at a projected surface position.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
    pub color: Rgba8,
}

/// The composed frame: everything a rendering surface needs to draw, already
/// in draw order.
///
/// `layers` is strictly back-to-front (descending depth); the result layer is
/// always last so it occludes every basis layer. The floor grid draws before
/// any layer, the guides between the grid and the layers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub floor: FloorGrid,
    pub guides: Vec<GuideSegment>,
    pub layers: Vec<Layer>,
    pub labels: Vec<Label>,
}

/// Owns what gets (re)computed when.
///
/// Basis layers, the floor grid, and the label anchors are pure functions of
/// the viewport (the plot and grid are static), so they recompute only on
/// resize. The result layer and its guides also depend on the coefficient
/// vector and recompute on every coefficient change; that is the per-frame
/// hot path, O(N) over the grid with reused sample buffers.
///
/// Until a first viewport is observed, [`SceneComposer::scene`] is `None`;
/// hosts defer drawing rather than render against a guessed size.
pub struct SceneComposer {
    plot: Plot,
    grid: DomainGrid,
    /// Per-basis y samples; domain-only, computed once at construction.
    basis_ys: Vec<Vec<f64>>,
    coeffs: Vec<f64>,
    /// Scratch for the result samples, reused across recomputes.
    result_ys: Vec<f64>,
    params: Option<ProjectionParams>,
    scene: Option<Scene>,
}

impl SceneComposer {
    /// Validates the plot and front-loads all domain-only sampling.
    pub fn new(plot: Plot) -> ObliqResult<Self> {
        plot.validate()?;
        let grid = DomainGrid::new(plot.domain)?;

        let mut basis_ys = Vec::with_capacity(plot.basis.len());
        for spec in &plot.basis {
            let mut ys = Vec::new();
            eval::sample_basis(&grid, spec, &mut ys);
            basis_ys.push(ys);
        }

        let coeffs = vec![crate::anim::NEUTRAL_COEFFICIENT; plot.basis.len()];
        Ok(Self {
            plot,
            grid,
            basis_ys,
            coeffs,
            result_ys: Vec::new(),
            params: None,
            scene: None,
        })
    }

    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// The composed frame, or `None` until a first viewport is observed.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Recompute the projection and every layer for a new viewport size.
    /// A repeat of the current size is a no-op.
    #[tracing::instrument(skip(self))]
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.params.map(|p| p.viewport()) == Some(viewport) {
            tracing::debug!("viewport unchanged, keeping cached layers");
            return;
        }
        let params = ProjectionParams::new(viewport, &self.plot.domain);
        let scene = self.compose_all(params);
        self.params = Some(params);
        self.scene = Some(scene);
    }

    /// Replace the coefficient vector and recompute the result layer.
    ///
    /// Fails fast when the length does not match the basis count.
    #[tracing::instrument(skip(self, coeffs))]
    pub fn set_coefficients(&mut self, coeffs: &[f64]) -> ObliqResult<()> {
        eval::check_coefficients(&self.plot.basis, coeffs)?;
        self.coeffs.clear();
        self.coeffs.extend_from_slice(coeffs);
        if let Some(params) = self.params {
            self.recompose_result(params);
        }
        Ok(())
    }

    /// Build the full scene: floor grid, basis layers back-to-front, result
    /// layer, guides, labels.
    fn compose_all(&mut self, params: ProjectionParams) -> Scene {
        let z_max = self.plot.basis.len() as f64;
        let floor = path::floor_grid(&params, z_max);

        let mut layers = Vec::with_capacity(self.plot.basis.len() + 1);
        for (i, spec) in self.plot.basis.iter().enumerate().rev() {
            let z = (i + 1) as f64;
            layers.push(Layer {
                source: LayerSource::Basis(i),
                z,
                curve: path::curve_path(&params, self.grid.xs(), &self.basis_ys[i], z),
                shadow: path::shadow_path(&params, self.grid.xs(), z),
                color: spec.color,
                opacity: spec.opacity,
                shadow_opacity: spec.opacity * SHADOW_OPACITY,
                stroke_width: BASIS_STROKE_WIDTH,
            });
        }

        let (result, guides) = self.result_parts(params);
        layers.push(result);

        Scene {
            viewport: params.viewport(),
            floor,
            guides,
            layers,
            labels: self.labels(params),
        }
    }

    /// Refresh only what the coefficient vector feeds: the result layer and
    /// its guides. Everything else in the scene stays cached.
    fn recompose_result(&mut self, params: ProjectionParams) {
        let (result, guides) = self.result_parts(params);
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if let Some(last) = scene.layers.last_mut() {
            *last = result;
        }
        scene.guides = guides;
    }

    fn result_parts(&mut self, params: ProjectionParams) -> (Layer, Vec<GuideSegment>) {
        // Length was checked at the setter boundary.
        eval::sample_result_unchecked(&self.grid, &self.plot.basis, &self.coeffs, &mut self.result_ys);

        let layer = Layer {
            source: LayerSource::Result,
            z: 0.0,
            curve: path::curve_path(&params, self.grid.xs(), &self.result_ys, 0.0),
            shadow: path::shadow_path(&params, self.grid.xs(), 0.0),
            color: self.plot.result_color,
            opacity: 1.0,
            shadow_opacity: SHADOW_OPACITY,
            stroke_width: RESULT_STROKE_WIDTH,
        };
        let guides =
            path::guide_segments(&params, self.grid.xs(), &self.result_ys, 0.0, GUIDE_STRIDE);
        (layer, guides)
    }

    /// Basis labels anchor at the projected rightmost curve sample (plus the
    /// spec's optional shift); the result label anchors at the curve's
    /// baseline position `(x_max, 0)` at depth zero.
    fn labels(&self, params: ProjectionParams) -> Vec<Label> {
        let mut labels = Vec::with_capacity(self.plot.basis.len() + 1);
        let x_max = params.x_max();

        for (i, spec) in self.plot.basis.iter().enumerate() {
            let Some(&y) = self.basis_ys[i].last() else {
                continue;
            };
            if !y.is_finite() {
                continue;
            }
            let mut anchor = params.project(x_max, y, (i + 1) as f64);
            if let Some(shift) = spec.label_shift {
                anchor += shift;
            }
            labels.push(Label {
                text: spec.label.clone(),
                anchor,
                color: spec.color,
            });
        }

        labels.push(Label {
            text: self.plot.result_label.clone(),
            anchor: params.project(x_max, 0.0, 0.0),
            color: self.plot.result_color,
        });
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Plot;

    fn composer() -> SceneComposer {
        SceneComposer::new(Plot::reference()).unwrap()
    }

    #[test]
    fn scene_is_deferred_until_a_viewport_is_observed() {
        let mut c = composer();
        assert!(c.scene().is_none());
        c.set_coefficients(&[0.2, 0.3, 0.4]).unwrap();
        assert!(c.scene().is_none());
        c.set_viewport(Viewport::new(800, 400));
        assert!(c.scene().is_some());
    }

    #[test]
    fn layers_draw_back_to_front_with_the_result_last() {
        let mut c = composer();
        c.set_viewport(Viewport::new(800, 400));
        let scene = c.scene().unwrap();

        assert_eq!(scene.layers.len(), 4);
        for w in scene.layers.windows(2) {
            assert!(w[0].z > w[1].z, "draw order must be descending depth");
        }
        let last = scene.layers.last().unwrap();
        assert_eq!(last.source, LayerSource::Result);
        assert_eq!(last.z, 0.0);
    }

    #[test]
    fn basis_depths_follow_configuration_order() {
        let mut c = composer();
        c.set_viewport(Viewport::new(800, 400));
        let scene = c.scene().unwrap();
        // Farthest first: basis 2 at z=3, basis 1 at z=2, basis 0 at z=1.
        assert_eq!(scene.layers[0].source, LayerSource::Basis(2));
        assert_eq!(scene.layers[0].z, 3.0);
        assert_eq!(scene.layers[2].source, LayerSource::Basis(0));
        assert_eq!(scene.layers[2].z, 1.0);
    }

    #[test]
    fn coefficients_touch_only_the_result_layer() {
        let mut c = composer();
        c.set_viewport(Viewport::new(800, 400));
        let before = c.scene().unwrap().clone();

        c.set_coefficients(&[0.8, 0.2, 0.8]).unwrap();
        let after = c.scene().unwrap();

        for (a, b) in before.layers.iter().zip(&after.layers) {
            match a.source {
                LayerSource::Result => assert_ne!(a.curve, b.curve),
                LayerSource::Basis(_) => assert_eq!(a.curve, b.curve),
            }
        }
        assert_eq!(before.floor, after.floor);
        assert_eq!(before.labels, after.labels);
        assert_ne!(before.guides, after.guides);
    }

    #[test]
    fn coefficient_length_mismatch_is_rejected() {
        let mut c = composer();
        assert!(c.set_coefficients(&[0.5]).is_err());
        assert!(c.set_coefficients(&[0.5; 4]).is_err());
        assert!(c.set_coefficients(&[0.5; 3]).is_ok());
    }

    #[test]
    fn resize_recomputes_every_layer_but_not_the_coefficients() {
        let mut c = composer();
        c.set_viewport(Viewport::new(800, 400));
        c.set_coefficients(&[0.7, 0.6, 0.5]).unwrap();
        let before = c.scene().unwrap().clone();

        c.set_viewport(Viewport::new(1000, 600));
        let after = c.scene().unwrap();

        assert_eq!(c.coefficients(), &[0.7, 0.6, 0.5]);
        assert_eq!(after.viewport, Viewport::new(1000, 600));
        for (a, b) in before.layers.iter().zip(&after.layers) {
            assert_eq!(a.source, b.source);
            assert_ne!(a.curve, b.curve, "{:?} survived the resize", a.source);
        }
        assert_ne!(before.floor, after.floor);
    }

    #[test]
    fn repeat_viewport_keeps_the_scene_stable() {
        let mut c = composer();
        c.set_viewport(Viewport::new(800, 400));
        let snapshot = c.scene().unwrap().clone();
        c.set_viewport(Viewport::new(800, 400));
        assert_eq!(c.scene().unwrap(), &snapshot);
    }

    #[test]
    fn labels_cover_each_basis_plus_the_result() {
        let mut c = composer();
        c.set_viewport(Viewport::new(800, 400));
        let scene = c.scene().unwrap();
        assert_eq!(scene.labels.len(), 4);
        assert_eq!(scene.labels[3].text, "result");

        // The shifted label (f2) sits exactly label_shift away from where the
        // unshifted anchor would land.
        let plot = Plot::reference();
        let shift = plot.basis[1].label_shift.unwrap();
        let params = ProjectionParams::new(Viewport::new(800, 400), &plot.domain);
        let y = crate::eval::evaluate(plot.domain.x_max, &plot.basis[1]);
        let unshifted = params.project(plot.domain.x_max, y, 2.0);
        assert_eq!(scene.labels[1].anchor, unshifted + shift);
    }

    #[test]
    fn guides_span_curve_to_floor() {
        let mut c = composer();
        c.set_viewport(Viewport::new(800, 400));
        let scene = c.scene().unwrap();
        assert_eq!(scene.guides.len(), 11); // 301 samples, stride 30
        for g in &scene.guides {
            // The curve sits above the floor band, so its screen y is smaller.
            assert!(g.top.y <= g.foot.y, "{g:?}");
            assert_eq!(g.top.x, g.foot.x);
        }
    }
}
