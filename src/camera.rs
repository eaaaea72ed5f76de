use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::ray::Ray;

pub const FOV_DEGREES: f32 = 90.0;

const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
// 87.5° in radians
const MAX_ELEVATION: f32 = 1.527;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Degrees per rotation step.
    pub rotation_speed: f32,
    /// Units per move step.
    pub move_speed: f32,
}

impl Camera {
    pub fn new(position: Point3<f32>, target: Point3<f32>, rotation_speed: f32) -> Self {
        Camera {
            position,
            target,
            rotation_speed,
            move_speed: 1.0,
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Translates position and target together along the view axis.
    pub fn move_forward(&mut self, delta_z: f32) {
        let step = self.forward() * delta_z * self.move_speed;
        self.position += step;
        self.target += step;
    }

    /// Orbits the position around the target, yaw about world up then pitch about the right axis.
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), (delta_x * self.rotation_speed).to_radians());
        let mut offset = yaw * (self.position - self.target);

        if delta_y != 0.0 {
            let angle = (delta_y * self.rotation_speed).to_radians();
            let elevation = offset.normalize().dot(&WORLD_UP).clamp(-1.0, 1.0).asin();
            // pitching by `angle` about the right axis lowers the elevation by `angle`
            if (elevation - angle).abs() < MAX_ELEVATION {
                if let Some(right) = Unit::try_new((-offset).cross(&WORLD_UP), 1.0e-6) {
                    offset = Rotation3::from_axis_angle(&right, angle) * offset;
                }
            }
        }

        self.position = self.target + offset;
    }

    pub fn viewport(&self, width: u32, height: u32) -> Viewport {
        let image_width = width as f32;
        let image_height = height as f32;

        let forward = self.forward();
        let right = forward.cross(&WORLD_UP).normalize();
        let up = right.cross(&forward);

        Viewport {
            origin: self.position,
            image_width,
            image_height,
            aspect_ratio: image_width / image_height,
            scale: (FOV_DEGREES.to_radians() / 2.0).tan(),
            forward,
            right,
            up,
        }
    }
}

/// Camera basis frozen for one frame.
#[derive(Clone, Debug)]
pub struct Viewport {
    pub origin: Point3<f32>,
    pub image_width: f32,
    pub image_height: f32,
    pub aspect_ratio: f32,
    pub scale: f32,
    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Viewport {
    /// Unit direction through pixel column `x`, row `y` (row 0 at the top).
    pub fn ray_direction(&self, x: u32, y: u32) -> Vector3<f32> {
        let screen_x = (2.0 * x as f32 / self.image_width - 1.0) * self.aspect_ratio * self.scale;
        let screen_y = (1.0 - 2.0 * y as f32 / self.image_height) * self.scale;
        (self.forward + self.right * screen_x + self.up * screen_y).normalize()
    }

    pub fn emit_ray(&self, x: u32, y: u32) -> Ray {
        Ray::new(self.origin, self.ray_direction(x, y))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use super::*;

    fn camera() -> Camera {
        Camera::new(point![-10.0, 0.0, 0.0], Point3::origin(), 10.0)
    }

    #[test]
    fn center_pixel_looks_at_target() {
        let viewport = camera().viewport(800, 600);
        let direction = viewport.ray_direction(400, 300);
        assert!((direction - vector![1.0, 0.0, 0.0]).magnitude() < 1e-5);
    }

    #[test]
    fn top_left_pixel_points_up_and_left() {
        let viewport = camera().viewport(800, 600);
        let direction = viewport.ray_direction(0, 0);
        // looking down +x with y up, right is +z
        assert!(direction.y > 0.0);
        assert!(direction.z < 0.0);
        assert!((direction.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn horizontal_extent_follows_aspect_ratio() {
        let viewport = camera().viewport(800, 400);
        let left = viewport.ray_direction(0, 200);
        let top = viewport.ray_direction(400, 0);
        assert!((left.z / left.x + 2.0).abs() < 1e-5);
        assert!((top.y / top.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn move_forward_translates_both_points() {
        let mut camera = camera();
        camera.move_speed = 2.0;
        camera.move_forward(1.5);
        assert!((camera.position - point![-7.0, 0.0, 0.0]).magnitude() < 1e-5);
        assert!((camera.target - point![3.0, 0.0, 0.0]).magnitude() < 1e-5);
    }

    #[test]
    fn yaw_orbits_around_target() {
        let mut camera = camera();
        camera.rotate(9.0, 0.0);
        assert!(((camera.position - camera.target).magnitude() - 10.0).abs() < 1e-4);
        assert!((camera.position - point![0.0, 0.0, 10.0]).magnitude() < 1e-3);
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn pitch_stops_short_of_the_pole() {
        let mut camera = camera();
        camera.rotate(0.0, 8.0);
        let elevated = camera.position;
        assert!(elevated.y.abs() > 1.0);

        camera.rotate(0.0, 2.0);
        assert_eq!(camera.position, elevated);
        assert!(camera.viewport(8, 6).right.iter().all(|c| c.is_finite()));
    }
}
