//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Point3, Vector2, Vector3};

/// A vertex of a polygon, holding position, normal and an optional texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
    pub uv: Option<Vector2<Real>>,
}

impl Vertex {
    /// Create a new [`Vertex`] without texture coordinates.
    ///
    /// * `pos`    – the position in model space
    /// * `normal` – (optionally non‑unit) normal; it is **copied verbatim**
    ///   and only carried along, the engine classifies by polygon planes.
    #[inline]
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex {
            pos,
            normal,
            uv: None,
        }
    }

    /// Create a new [`Vertex`] carrying a texture coordinate.
    #[inline]
    pub const fn with_uv(pos: Point3<Real>, normal: Vector3<Real>, uv: Vector2<Real>) -> Self {
        Vertex {
            pos,
            normal,
            uv: Some(uv),
        }
    }

    /// `true` when every position component is finite.
    pub fn is_finite(&self) -> bool {
        self.pos.coords.iter().all(|c| c.is_finite())
    }

    /// Flip vertex normal in place.
    ///
    /// # Example
    /// ```rust
    /// # use nalgebra::{Point3, Vector3};
    /// # use csgbsp::mesh::vertex::Vertex;
    /// let mut v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::x());
    /// v.flip();
    /// assert_eq!(v.pos, Point3::new(1.0, 2.0, 3.0), "position remains the same");
    /// assert_eq!(v.normal, -Vector3::x(), "the normal is negated");
    /// ```
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Return the linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Position, normal and texture coordinate are all interpolated. The
    /// texture coordinate survives only when both ends carry one.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        // p(t) = p0 + t * (p1 - p0)
        let pos = self.pos + (other.pos - self.pos) * t;
        let normal = self.normal + (other.normal - self.normal) * t;
        let uv = self.uv.zip(other.uv).map(|(a, b)| a + (b - a) * t);
        Vertex { pos, normal, uv }
    }

    /// Euclidean distance between vertex positions.
    pub fn distance_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct VertexEpsilon {
    pub position: <Point3<Real> as approx::AbsDiffEq>::Epsilon,
    pub normal: <Vector3<Real> as approx::AbsDiffEq>::Epsilon,
}

impl approx::AbsDiffEq for Vertex {
    type Epsilon = VertexEpsilon;

    fn default_epsilon() -> Self::Epsilon {
        Self::Epsilon {
            position: Point3::<Real>::default_epsilon(),
            normal: Vector3::<Real>::default_epsilon(),
        }
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        approx::AbsDiffEq::abs_diff_eq(&self.pos, &other.pos, epsilon.position)
            && approx::AbsDiffEq::abs_diff_eq(&self.normal, &other.normal, epsilon.normal)
    }
}

impl approx::RelativeEq for Vertex {
    fn default_max_relative() -> Self::Epsilon {
        Self::Epsilon {
            position: Point3::<Real>::default_max_relative(),
            normal: Vector3::<Real>::default_max_relative(),
        }
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        approx::RelativeEq::relative_eq(
            &self.pos,
            &other.pos,
            epsilon.position,
            max_relative.position,
        ) && approx::RelativeEq::relative_eq(
            &self.normal,
            &other.normal,
            epsilon.normal,
            max_relative.normal,
        )
    }
}
