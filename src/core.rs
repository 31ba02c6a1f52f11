pub use kurbo::{BezPath, Point, Vec2};

/// Drawing-surface size in surface units.
///
/// A `Viewport` of zero (or otherwise unusable) size is legal input: hosts
/// often report one before their first layout pass. Projection clamps the
/// usable rectangle instead of failing; see [`crate::ProjectionParams`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Straight-alpha RGBA8 stroke color.
///
/// obliq emits stroke styling for a vector surface, so colors stay straight
/// (not premultiplied) and opacity rides separately on each layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_json_roundtrip() {
        let v = Viewport::new(800, 400);
        let s = serde_json::to_string(&v).unwrap();
        let de: Viewport = serde_json::from_str(&s).unwrap();
        assert_eq!(de, v);
    }

    #[test]
    fn opaque_sets_full_alpha() {
        assert_eq!(Rgba8::opaque(1, 2, 3), Rgba8::new(1, 2, 3, 255));
    }
}
