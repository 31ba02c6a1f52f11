use std::f64::consts::PI;

use crate::{
    core::{Rgba8, Vec2},
    error::{ObliqError, ObliqResult},
};

/// One fixed curve in the stack.
///
/// Every basis curve shares the same signal shape, `amplitude * sin(0.2 x) +
/// x + offset`; a spec only picks the amplitude, the vertical offset, and how
/// the curve is styled and labelled.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BasisSpec {
    pub amplitude: f64,
    pub offset: f64,
    pub color: Rgba8,
    pub label: String,
    pub opacity: f64, // 0..1
    /// Nudge applied to the label anchor, in surface units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_shift: Option<Vec2>,
}

/// The sampled x interval shared by every layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Domain {
    pub x_min: f64,
    pub x_max: f64,
    /// Sample count N; the grid materializes N+1 values including both endpoints.
    pub samples: usize,
}

impl Domain {
    /// `[-4π, 4π]` at 300 steps.
    pub fn reference() -> Self {
        Self {
            x_min: -4.0 * PI,
            x_max: 4.0 * PI,
            samples: 300,
        }
    }

    pub fn validate(&self) -> ObliqResult<()> {
        if !self.x_min.is_finite() || !self.x_max.is_finite() {
            return Err(ObliqError::validation("domain bounds must be finite"));
        }
        if self.x_min >= self.x_max {
            return Err(ObliqError::validation("domain x_min must be < x_max"));
        }
        if self.samples == 0 {
            return Err(ObliqError::validation("domain samples must be > 0"));
        }
        Ok(())
    }
}

/// Static plot definition: the domain plus the basis curve stack.
///
/// A `Plot` is supplied once at startup and never mutated; the only dynamic
/// input to the pipeline is the coefficient vector weighting the basis
/// curves (see [`crate::AnimationDriver`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Plot {
    pub domain: Domain,
    pub basis: Vec<BasisSpec>,
    #[serde(default = "default_result_label")]
    pub result_label: String,
    #[serde(default = "default_result_color")]
    pub result_color: Rgba8,
}

fn default_result_label() -> String {
    "result".to_string()
}

fn default_result_color() -> Rgba8 {
    Rgba8::opaque(0x2b, 0x30, 0x3d)
}

impl Plot {
    /// The three-curve demo configuration the crate documentation uses.
    pub fn reference() -> Self {
        Self {
            domain: Domain::reference(),
            basis: vec![
                BasisSpec {
                    amplitude: 2.0,
                    offset: 2.5,
                    color: Rgba8::opaque(0x4c, 0xaf, 0x50),
                    label: "f1".to_string(),
                    opacity: 0.45,
                    label_shift: None,
                },
                BasisSpec {
                    amplitude: 10.0,
                    offset: -3.8,
                    color: Rgba8::opaque(0x21, 0x96, 0xf3),
                    label: "f2".to_string(),
                    opacity: 0.45,
                    label_shift: Some(Vec2::new(0.0, 14.0)),
                },
                BasisSpec {
                    amplitude: 15.0,
                    offset: 1.2,
                    color: Rgba8::opaque(0xff, 0x98, 0x00),
                    label: "f3".to_string(),
                    opacity: 0.45,
                    label_shift: None,
                },
            ],
            result_label: default_result_label(),
            result_color: default_result_color(),
        }
    }

    pub fn builder(domain: Domain) -> PlotBuilder {
        PlotBuilder::new(domain)
    }

    pub fn validate(&self) -> ObliqResult<()> {
        self.domain.validate()?;

        if self.basis.is_empty() {
            return Err(ObliqError::validation("plot must define at least one basis curve"));
        }
        for spec in &self.basis {
            if !spec.amplitude.is_finite() || !spec.offset.is_finite() {
                return Err(ObliqError::validation(format!(
                    "basis '{}' has non-finite amplitude or offset",
                    spec.label
                )));
            }
            if !(0.0..=1.0).contains(&spec.opacity) {
                return Err(ObliqError::validation(format!(
                    "basis '{}' opacity must be in [0, 1]",
                    spec.label
                )));
            }
            if spec.label.trim().is_empty() {
                return Err(ObliqError::validation("basis label must be non-empty"));
            }
        }
        if self.result_label.trim().is_empty() {
            return Err(ObliqError::validation("result label must be non-empty"));
        }

        Ok(())
    }
}

pub struct PlotBuilder {
    domain: Domain,
    basis: Vec<BasisSpec>,
    result_label: String,
    result_color: Rgba8,
}

impl PlotBuilder {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            basis: Vec::new(),
            result_label: default_result_label(),
            result_color: default_result_color(),
        }
    }

    pub fn basis(mut self, spec: BasisSpec) -> Self {
        self.basis.push(spec);
        self
    }

    pub fn result_label(mut self, label: impl Into<String>) -> Self {
        self.result_label = label.into();
        self
    }

    pub fn result_color(mut self, color: Rgba8) -> Self {
        self.result_color = color;
        self
    }

    pub fn build(self) -> ObliqResult<Plot> {
        let plot = Plot {
            domain: self.domain,
            basis: self.basis,
            result_label: self.result_label,
            result_color: self.result_color,
        };
        plot.validate()?;
        Ok(plot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let plot = Plot::reference();
        let s = serde_json::to_string_pretty(&plot).unwrap();
        let de: Plot = serde_json::from_str(&s).unwrap();
        assert_eq!(de, plot);
    }

    #[test]
    fn validate_rejects_empty_basis() {
        let mut plot = Plot::reference();
        plot.basis.clear();
        assert!(plot.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_opacity() {
        let mut plot = Plot::reference();
        plot.basis[0].opacity = 1.5;
        assert!(plot.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_domain() {
        let mut plot = Plot::reference();
        plot.domain.x_min = plot.domain.x_max;
        assert!(plot.validate().is_err());
    }

    #[test]
    fn builder_validates_at_build() {
        let err = Plot::builder(Domain::reference()).build();
        assert!(err.is_err());

        let plot = Plot::builder(Domain::reference())
            .basis(Plot::reference().basis[0].clone())
            .result_label("mix")
            .build()
            .unwrap();
        assert_eq!(plot.basis.len(), 1);
        assert_eq!(plot.result_label, "mix");
    }
}
