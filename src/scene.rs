use nalgebra::Point3;

use crate::object::Object;
use crate::picture::Color;
use crate::skybox::Skybox;

#[derive(Clone, Debug)]
pub struct Light {
    pub position: Point3<f32>,
    pub intensity: f32,
    pub color: Color,
}

impl Light {
    pub fn new(position: Point3<f32>, intensity: f32, color: Color) -> Self {
        Light { position, intensity, color }
    }
}

/// Owns everything rendered in a frame.
#[derive(Clone, Debug)]
pub struct Scene {
    pub objects: Vec<Object>,
    pub light: Light,
    pub skybox: Skybox,
}

impl Scene {
    pub fn new(light: Light, skybox: Skybox) -> Self {
        Scene {
            objects: Vec::new(),
            light,
            skybox,
        }
    }

    pub fn add(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    /// Moves every animated material forward by `delta_time` seconds.
    ///
    /// Must run before the shading pass of a frame; shading only reads materials.
    pub fn advance(&mut self, delta_time: f32) {
        for object in &mut self.objects {
            object.material_mut().advance(delta_time);
        }
    }
}
