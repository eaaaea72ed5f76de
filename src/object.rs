use nalgebra::{Point3, Vector3};

use crate::material::Material;
use crate::ray::{Intersect, Ray};

/// Axis-aligned box spanning `min..min + extents`.
#[derive(Clone, Debug)]
pub struct Cuboid {
    pub min: Point3<f32>,
    pub extents: Vector3<f32>,
    pub material: Material,
}

impl Cuboid {
    pub fn new(min: Point3<f32>, extents: Vector3<f32>, material: Material) -> Self {
        Cuboid { min, extents, material }
    }

    pub fn max(&self) -> Point3<f32> {
        self.min + self.extents
    }

    /// Slab test.
    ///
    /// Zero direction components produce infinite slab distances, which the min/max
    /// comparisons absorb. When the origin lies inside the box the exit face is reported.
    /// Face ties resolve in the order x, y, z and, within an axis, min plane before max plane.
    pub fn ray_intersect(&self, ray: &Ray) -> Option<Intersect> {
        let max = self.max();
        let mut to_min = [0.0f32; 3];
        let mut to_max = [0.0f32; 3];
        for axis in 0..3 {
            let inv = 1.0 / ray.direction[axis];
            to_min[axis] = (self.min[axis] - ray.origin[axis]) * inv;
            to_max[axis] = (max[axis] - ray.origin[axis]) * inv;
        }

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            t_near = t_near.max(to_min[axis].min(to_max[axis]));
            t_far = t_far.min(to_min[axis].max(to_max[axis]));
        }

        if t_near > t_far || t_far < 0.0 {
            return None;
        }

        let distance = if t_near >= 0.0 { t_near } else { t_far };
        let normal = face_normal(distance, &to_min, &to_max);

        Some(Intersect {
            point: ray.at(distance),
            normal,
            distance,
        })
    }
}

fn face_normal(t: f32, to_min: &[f32; 3], to_max: &[f32; 3]) -> Vector3<f32> {
    for axis in 0..3 {
        if t == to_min[axis] {
            return -Vector3::<f32>::ith(axis, 1.0);
        }
        if t == to_max[axis] {
            return Vector3::ith(axis, 1.0);
        }
    }
    // only reachable through NaN slabs from a ray lying inside a bounding plane
    Vector3::zeros()
}

/// Everything a ray can hit.
#[derive(Clone, Debug)]
pub enum Object {
    Cuboid(Cuboid),
}

impl Object {
    pub fn ray_intersect(&self, ray: &Ray) -> Option<Intersect> {
        match self {
            Object::Cuboid(cuboid) => cuboid.ray_intersect(ray),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Object::Cuboid(cuboid) => &cuboid.material,
        }
    }

    pub fn material_mut(&mut self) -> &mut Material {
        match self {
            Object::Cuboid(cuboid) => &mut cuboid.material,
        }
    }
}

impl From<Cuboid> for Object {
    fn from(value: Cuboid) -> Self {
        Object::Cuboid(value)
    }
}
