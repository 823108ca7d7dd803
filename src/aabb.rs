use crate::float_types::Real;
use nalgebra::Point3;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// The inverted box that any point expands; `is_empty()` until then.
    pub fn empty() -> Self {
        Self {
            mins: Point3::new(Real::MAX, Real::MAX, Real::MAX),
            maxs: Point3::new(-Real::MAX, -Real::MAX, -Real::MAX),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point3<Real>>) -> Self {
        points.into_iter().fold(Self::empty(), |mut bb, p| {
            bb.mins = bb.mins.inf(&p);
            bb.maxs = bb.maxs.sup(&p);
            bb
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x || self.mins.y > self.maxs.y || self.mins.z > self.maxs.z
    }

    pub fn merged(&self, other: &Self) -> Self {
        Self {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// Overlap test; boxes touching within `tolerance` count as intersecting.
    #[inline]
    pub fn intersects(&self, other: &Self, tolerance: Real) -> bool {
        self.maxs.x + tolerance >= other.mins.x
            && self.mins.x - tolerance <= other.maxs.x
            && self.maxs.y + tolerance >= other.mins.y
            && self.mins.y - tolerance <= other.maxs.y
            && self.maxs.z + tolerance >= other.mins.z
            && self.mins.z - tolerance <= other.maxs.z
    }

    #[inline]
    pub fn center(&self) -> Point3<Real> {
        nalgebra::center(&self.mins, &self.maxs)
    }
}
