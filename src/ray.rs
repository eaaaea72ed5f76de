use nalgebra::{Point3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Outcome of a single ray/object test that hit.
///
/// A miss is represented by `None` at the call site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersect {
    pub point: Point3<f32>,
    /// Unit length, pointing away from the surface.
    pub normal: Vector3<f32>,
    /// Parametric distance along the ray.
    pub distance: f32,
}
