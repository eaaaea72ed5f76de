use std::f32::consts::PI;
use std::path::Path;

use image::RgbImage;
use log::debug;
use nalgebra::Vector3;

use crate::picture::Color;

/// Background seen along rays that leave the scene.
#[derive(Clone, Debug)]
pub enum Skybox {
    /// Equirectangular panorama.
    Image(RgbImage),
    Gradient,
}

impl Skybox {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let image = image::open(path.as_ref())?.into_rgb8();
        debug!(target: "app", "Loaded skybox {:?}, {}x{}", path.as_ref(), image.width(), image.height());
        Ok(Skybox::Image(image))
    }

    pub fn color(&self, direction: &Vector3<f32>) -> Color {
        let direction = direction.normalize();
        match self {
            Skybox::Image(image) => {
                let u = 0.5 + direction.z.atan2(direction.x) / (2.0 * PI);
                let v = 0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI;
                let x = ((u * image.width() as f32) as u32).min(image.width() - 1);
                let y = ((v * image.height() as f32) as u32).min(image.height() - 1);
                let [r, g, b] = image.get_pixel(x, y).0;
                Color::from_rgb8(r, g, b)
            }
            Skybox::Gradient => {
                let t = 0.5 * (direction.y + 1.0);
                (1.0 - t) * Color::WHITE + t * Color::new(0.5, 0.7, 1.0, 1.0)
            }
        }
    }
}
