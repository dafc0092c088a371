//! 2D affine transforms.

use crate::geometry::Vec2;

/// A 3×2 affine matrix `[a c e; b d f]` stored as `[a, b, c, d, e, f]`.
///
/// Composition post-multiplies: after `t.then(&u)`, points are mapped by `u`
/// first and then by `t`, matching the canvas convention where each
/// `translate`/`rotate` call acts in the current local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D(pub [f32; 6]);

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// A translation.
    #[must_use]
    pub const fn translation(offset: Vec2) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, offset.0[0], offset.0[1]])
    }

    /// A rotation by `angle` radians.
    #[must_use]
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self([c, s, -s, c, 0.0, 0.0])
    }

    /// Post-multiply by `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Self([
            a * a2 + c * b2,
            b * a2 + d * b2,
            a * c2 + c * d2,
            b * c2 + d * d2,
            a * e2 + c * f2 + e,
            b * e2 + d * f2 + f,
        ])
    }

    /// Map a point.
    #[must_use]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let [a, b, c, d, e, f] = self.0;
        Vec2::xy(a * p.x() + c * p.y() + e, b * p.x() + d * p.y() + f)
    }

    /// True for the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// SVG `transform` attribute value.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let [a, b, c, d, e, f] = self.0;
        format!("matrix({a},{b},{c},{d},{e},{f})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let p = Vec2::xy(3.0, 4.0);
        assert_eq!(Transform2D::IDENTITY.apply(p), p);
        assert!(Transform2D::default().is_identity());
    }

    #[test]
    fn test_translate_then_rotate() {
        let t = Transform2D::translation(Vec2::xy(10.0, 0.0))
            .then(&Transform2D::rotation(FRAC_PI_2));
        let p = t.apply(Vec2::xy(1.0, 0.0));
        assert_relative_eq!(p.x(), 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_to_svg() {
        let t = Transform2D::translation(Vec2::xy(5.0, 6.0));
        assert_eq!(t.to_svg(), "matrix(1,0,0,1,5,6)");
    }
}
