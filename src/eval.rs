use crate::{
    error::{ObliqError, ObliqResult},
    model::{BasisSpec, Domain},
};

/// The evenly spaced domain samples shared by every layer.
///
/// Computed once per plot; both endpoints are included, so a `Domain` with
/// `samples == N` yields `N + 1` grid values. Sharing one grid keeps
/// point-wise summation across layers well-defined index-by-index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DomainGrid {
    xs: Vec<f64>,
}

impl DomainGrid {
    pub fn new(domain: Domain) -> ObliqResult<Self> {
        domain.validate()?;

        let n = domain.samples;
        let step = (domain.x_max - domain.x_min) / n as f64;
        let xs = (0..=n)
            .map(|i| {
                // Pin the last sample to the exact bound; accumulated
                // rounding would otherwise leave it fractionally short.
                if i == n {
                    domain.x_max
                } else {
                    domain.x_min + step * i as f64
                }
            })
            .collect();
        Ok(Self { xs })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Evaluate one basis curve at `x`: `amplitude * sin(0.2 x) + x + offset`.
///
/// Total over real inputs; non-finite `x` propagates NaN instead of
/// panicking, and downstream path builders skip NaN points.
pub fn evaluate(x: f64, spec: &BasisSpec) -> f64 {
    spec.amplitude * (0.2 * x).sin() + x + spec.offset
}

/// Evaluate the composed result at `x`: the coefficient-weighted sum of each
/// basis curve's full output (not its amplitude alone).
pub fn evaluate_result(x: f64, specs: &[BasisSpec], coeffs: &[f64]) -> ObliqResult<f64> {
    check_coefficients(specs, coeffs)?;
    Ok(specs
        .iter()
        .zip(coeffs)
        .map(|(spec, c)| c * evaluate(x, spec))
        .sum())
}

/// A coefficient vector is only meaningful with exactly one entry per basis
/// curve; anything else is a caller bug and fails fast.
pub(crate) fn check_coefficients(specs: &[BasisSpec], coeffs: &[f64]) -> ObliqResult<()> {
    if specs.len() != coeffs.len() {
        return Err(ObliqError::validation(format!(
            "coefficient count {} does not match basis count {}",
            coeffs.len(),
            specs.len()
        )));
    }
    Ok(())
}

/// Sample one basis curve across the grid into `out` (cleared first).
pub fn sample_basis(grid: &DomainGrid, spec: &BasisSpec, out: &mut Vec<f64>) {
    out.clear();
    out.extend(grid.xs().iter().map(|&x| evaluate(x, spec)));
}

/// Sample the composed result across the grid into `out` (cleared first).
///
/// This is the per-frame hot path: O(N) evaluation with no allocation beyond
/// what `out` already holds.
pub fn sample_result(
    grid: &DomainGrid,
    specs: &[BasisSpec],
    coeffs: &[f64],
    out: &mut Vec<f64>,
) -> ObliqResult<()> {
    check_coefficients(specs, coeffs)?;
    sample_result_unchecked(grid, specs, coeffs, out);
    Ok(())
}

/// [`sample_result`] without the length check, for callers that uphold the
/// one-coefficient-per-basis invariant structurally.
pub(crate) fn sample_result_unchecked(
    grid: &DomainGrid,
    specs: &[BasisSpec],
    coeffs: &[f64],
    out: &mut Vec<f64>,
) {
    out.clear();
    out.extend(grid.xs().iter().map(|&x| {
        specs
            .iter()
            .zip(coeffs)
            .map(|(spec, c)| c * evaluate(x, spec))
            .sum::<f64>()
    }));
}
