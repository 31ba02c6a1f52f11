//! obliq composes a stack of fixed "basis" curves into one time-varying
//! result curve and turns the whole arrangement into drawable path geometry
//! with a pseudo-3D layered look: each basis curve recedes at its own depth,
//! the result curve sits in front, and shadows, grid lines, and vertical
//! guides land on a depth-plane floor.
//!
//! # Pipeline overview
//!
//! 1. **Evaluate**: [`Plot`] + coefficients -> sampled curve values over one
//!    shared [`DomainGrid`]
//! 2. **Project**: `(x, y, z)` -> surface coordinates via
//!    [`ProjectionParams`] (oblique slant, asymmetric margins)
//! 3. **Compose**: [`SceneComposer`] -> a back-to-front [`Scene`] of
//!    [`kurbo::BezPath`] polylines, guides, and label anchors
//! 4. **Animate**: [`AnimationDriver`] derives the coefficient vector from
//!    elapsed time; [`PlotSession`] ties the loop together
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: composition is a pure function of plot,
//!   viewport, and coefficients; the only clock lives in the driver and is
//!   fed by the host.
//! - **Recompute only what changed**: basis layers are keyed by viewport,
//!   the result layer by coefficients (see [`SceneComposer`]).
//! - **No drawing here**: the output is path descriptions plus styling; a
//!   rendering surface (SVG writer, GUI canvas) does the actual strokes.
#![forbid(unsafe_code)]

pub mod anim;
pub mod core;
pub mod error;
pub mod eval;
pub mod fingerprint;
pub mod model;
pub mod path;
pub mod project;
pub mod scene;
pub mod session;

pub use crate::anim::{AnimationDriver, NEUTRAL_COEFFICIENT, Oscillator, PlayState};
pub use crate::core::{BezPath, Point, Rgba8, Vec2, Viewport};
pub use crate::error::{ObliqError, ObliqResult};
pub use crate::eval::{DomainGrid, evaluate, evaluate_result, sample_basis, sample_result};
pub use crate::fingerprint::{SceneFingerprint, fingerprint_scene};
pub use crate::model::{BasisSpec, Domain, Plot, PlotBuilder};
pub use crate::path::{
    FloorGrid, GuideSegment, curve_path, floor_grid, guide_segments, shadow_path,
};
pub use crate::project::{ProjectionParams, Y_MAX, Y_MIN};
pub use crate::scene::{Label, Layer, LayerSource, Scene, SceneComposer};
pub use crate::session::PlotSession;
