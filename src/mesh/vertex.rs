//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Point3, Vector2, Vector3};

/// A vertex of a polygon, holding position, normal and an optional texture coordinate.
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
    pub uv: Option<Vector2<Real>>,
}

impl Vertex {
    /// Create a new [`Vertex`] without a texture coordinate.
    ///
    /// * `pos`    – the position in model space
    /// * `normal` – (optionally non‑unit) normal; it will be **copied verbatim**, so make sure it is oriented the way you need it for lighting.
    ///
    /// Non-finite components are replaced by `0.0`.
    #[inline]
    pub fn new(mut pos: Point3<Real>, mut normal: Vector3<Real>) -> Self {
        // Sanitise position
        for c in pos.coords.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        // Sanitise normal
        for c in normal.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        Vertex {
            pos,
            normal,
            uv: None,
        }
    }

    /// Create a new [`Vertex`] carrying a texture coordinate.
    #[inline]
    pub fn with_uv(pos: Point3<Real>, normal: Vector3<Real>, uv: Vector2<Real>) -> Self {
        let uv = if uv.iter().all(|c| c.is_finite()) {
            uv
        } else {
            Vector2::zeros()
        };
        Vertex {
            uv: Some(uv),
            ..Vertex::new(pos, normal)
        }
    }

    /// Flip vertex normal in place.
    ///
    /// # Example
    /// ```rust
    /// # use nalgebra::{Point3, Vector3};
    /// # use csgcarve::mesh::vertex::Vertex;
    /// let mut v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::x());
    /// v.flip();
    /// assert_eq!(v.pos, Point3::new(1.0, 2.0, 3.0), "position remains the same");
    /// assert_eq!(v.normal, -Vector3::x(), "the normal is negated");
    /// ```
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Linearly interpolate between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Position and normal are blended component-wise; the normal is **not**
    /// renormalised. The texture coordinate is only blended when both vertices
    /// carry one, otherwise the result has none.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        // For positions (Point3): p(t) = p0 + t * (p1 - p0)
        let pos = self.pos + (other.pos - self.pos) * t;

        // For normals (Vector3): n(t) = n0 + t * (n1 - n0)
        let normal = self.normal + (other.normal - self.normal) * t;

        let uv = match (self.uv, other.uv) {
            (Some(a), Some(b)) => Some(a + (b - a) * t),
            _ => None,
        };

        Vertex { pos, normal, uv }
    }

    /// `true` if position, normal and uv hold only finite numbers.
    pub fn is_finite(&self) -> bool {
        self.pos.coords.iter().all(|c| c.is_finite())
            && self.normal.iter().all(|c| c.is_finite())
            && self.uv.is_none_or(|uv| uv.iter().all(|c| c.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_midpoint_keeps_unnormalised_normal() {
        let a = Vertex::new(Point3::origin(), Vector3::x());
        let b = Vertex::new(Point3::new(2.0, 0.0, 0.0), Vector3::y());
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.pos, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mid.normal, Vector3::new(0.5, 0.5, 0.0));
        assert!(mid.uv.is_none());
    }

    #[test]
    fn interpolate_uv_requires_both_sides() {
        let a = Vertex::with_uv(Point3::origin(), Vector3::z(), Vector2::new(0.0, 0.0));
        let b = Vertex::with_uv(Point3::new(1.0, 0.0, 0.0), Vector3::z(), Vector2::new(1.0, 0.5));
        let c = Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z());

        assert_eq!(a.interpolate(&b, 0.25).uv, Some(Vector2::new(0.25, 0.125)));
        assert_eq!(a.interpolate(&c, 0.25).uv, None);
    }

    #[test]
    fn new_sanitises_non_finite() {
        let v = Vertex::new(
            Point3::new(Real::NAN, 1.0, Real::INFINITY),
            Vector3::new(0.0, Real::NAN, 1.0),
        );
        assert_eq!(v.pos, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(v.normal, Vector3::new(0.0, 0.0, 1.0));
        assert!(v.is_finite());
    }
}
