use kurbo::PathEl;

use crate::{
    core::{BezPath, Point, Rgba8},
    scene::{Label, Layer, LayerSource, Scene},
};

/// Stable identity of a composed frame.
///
/// Two scenes with equal geometry, styling, and order fingerprint equally, so
/// a host can skip redrawing when the fingerprint has not moved (a paused
/// session produces the same fingerprint every tick).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneFingerprint {
    pub hi: u64,
    pub lo: u64,
}

pub fn fingerprint_scene(scene: &Scene) -> SceneFingerprint {
    let mut mix = Mixer::new();

    mix.u64(u64::from(scene.viewport.width));
    mix.u64(u64::from(scene.viewport.height));

    mix_path(&mut mix, &scene.floor.minor);
    mix_path(&mut mix, &scene.floor.major);

    mix.u64(scene.guides.len() as u64);
    for g in &scene.guides {
        mix_point(&mut mix, g.top);
        mix_point(&mut mix, g.foot);
    }

    mix.u64(scene.layers.len() as u64);
    for layer in &scene.layers {
        mix_layer(&mut mix, layer);
    }

    mix.u64(scene.labels.len() as u64);
    for label in &scene.labels {
        mix_label(&mut mix, label);
    }

    mix.finish()
}

fn mix_layer(mix: &mut Mixer, layer: &Layer) {
    match layer.source {
        LayerSource::Basis(i) => {
            mix.u8(0);
            mix.u64(i as u64);
        }
        LayerSource::Result => mix.u8(1),
    }
    mix.f64(layer.z);
    mix_path(mix, &layer.curve);
    mix_path(mix, &layer.shadow);
    mix_color(mix, layer.color);
    mix.f64(layer.opacity);
    mix.f64(layer.shadow_opacity);
    mix.f64(layer.stroke_width);
}

fn mix_label(mix: &mut Mixer, label: &Label) {
    mix.str(&label.text);
    mix_point(mix, label.anchor);
    mix_color(mix, label.color);
}

fn mix_path(mix: &mut Mixer, path: &BezPath) {
    let els = path.elements();
    mix.u64(els.len() as u64);
    for el in els {
        match *el {
            PathEl::MoveTo(p) => {
                mix.u8(0);
                mix_point(mix, p);
            }
            PathEl::LineTo(p) => {
                mix.u8(1);
                mix_point(mix, p);
            }
            PathEl::QuadTo(a, b) => {
                mix.u8(2);
                mix_point(mix, a);
                mix_point(mix, b);
            }
            PathEl::CurveTo(a, b, c) => {
                mix.u8(3);
                mix_point(mix, a);
                mix_point(mix, b);
                mix_point(mix, c);
            }
            PathEl::ClosePath => mix.u8(4),
        }
    }
}

fn mix_point(mix: &mut Mixer, p: Point) {
    mix.f64(p.x);
    mix.f64(p.y);
}

fn mix_color(mix: &mut Mixer, c: Rgba8) {
    mix.u8(c.r);
    mix.u8(c.g);
    mix.u8(c.b);
    mix.u8(c.a);
}

/// Two independently seeded FNV-1a lanes; 128 bits keeps accidental
/// collisions out of reach for cache keys.
struct Mixer {
    hi: u64,
    lo: u64,
}

impl Mixer {
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    fn new() -> Self {
        Self {
            hi: 0xcbf2_9ce4_8422_2325,
            lo: 0x9ae1_6a3b_2f90_404f,
        }
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hi = (self.hi ^ u64::from(b)).wrapping_mul(Self::PRIME);
            self.lo = (self.lo ^ u64::from(b)).wrapping_mul(Self::PRIME);
        }
    }

    fn u8(&mut self, v: u8) {
        self.bytes(&[v]);
    }

    fn u64(&mut self, v: u64) {
        self.bytes(&v.to_le_bytes());
    }

    fn f64(&mut self, v: f64) {
        self.u64(v.to_bits());
    }

    fn str(&mut self, s: &str) {
        self.u64(s.len() as u64);
        self.bytes(s.as_bytes());
    }

    fn finish(self) -> SceneFingerprint {
        SceneFingerprint {
            hi: self.hi,
            lo: self.lo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::Viewport, model::Plot, scene::SceneComposer};

    fn composed(coeffs: &[f64]) -> Scene {
        let mut c = SceneComposer::new(Plot::reference()).unwrap();
        c.set_viewport(Viewport::new(800, 400));
        c.set_coefficients(coeffs).unwrap();
        c.scene().unwrap().clone()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let scene = composed(&[0.5, 0.5, 0.5]);
        assert_eq!(fingerprint_scene(&scene), fingerprint_scene(&scene));

        let again = composed(&[0.5, 0.5, 0.5]);
        assert_eq!(fingerprint_scene(&scene), fingerprint_scene(&again));
    }

    #[test]
    fn fingerprint_moves_with_the_coefficients() {
        let a = composed(&[0.5, 0.5, 0.5]);
        let b = composed(&[0.8, 0.5, 0.5]);
        assert_ne!(fingerprint_scene(&a), fingerprint_scene(&b));
    }

    #[test]
    fn fingerprint_moves_with_the_viewport() {
        let a = composed(&[0.5, 0.5, 0.5]);
        let mut c = SceneComposer::new(Plot::reference()).unwrap();
        c.set_viewport(Viewport::new(1000, 600));
        c.set_coefficients(&[0.5, 0.5, 0.5]).unwrap();
        let b = c.scene().unwrap();
        assert_ne!(fingerprint_scene(&a), fingerprint_scene(b));
    }
}
