use nalgebra::Vector3;

use crate::picture::Color;

/// Mirror `v` about the plane with normal `n`.
pub fn reflect(v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    v - 2.0 * v.dot(n) * n
}

/// Bends the unit vector `uv` through a surface with normal `n` for the ratio `eta`.
///
/// Returns `None` under total internal reflection.
pub fn refract(uv: &Vector3<f32>, n: &Vector3<f32>, eta: f32) -> Option<Vector3<f32>> {
    let cos_i = n.dot(uv);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    let refracted = eta * uv - (eta * cos_i + k.sqrt()) * n;
    if refracted.iter().all(|c| c.is_finite()) && refracted.magnitude_squared() > 0.0 {
        Some(refracted)
    } else {
        None
    }
}

/// Cycles through a list of diffuse colors at a fixed rate.
#[derive(Clone, Debug)]
pub struct AnimatedSurface {
    frames: Vec<Color>,
    frame_rate: f32,
    current_frame: usize,
    time_accumulator: f32,
}

impl AnimatedSurface {
    pub fn new(frames: Vec<Color>, frame_rate: f32) -> Self {
        assert!(!frames.is_empty(), "animated surface needs at least one frame");
        AnimatedSurface {
            frames,
            frame_rate,
            current_frame: 0,
            time_accumulator: 0.0,
        }
    }

    /// Steps one frame per full period `1 / frame_rate` accumulated, keeping the remainder.
    ///
    /// Whole cycles through the frame list are dropped first, so a huge `delta_time`
    /// lands on the same frame as its remainder. Non-finite deltas are ignored.
    pub fn advance(&mut self, delta_time: f32) {
        let frame_count = self.frames.len();
        if frame_count < 2 || !(self.frame_rate > 0.0) || !delta_time.is_finite() {
            return;
        }

        let period = 1.0 / self.frame_rate;
        let cycle = period * frame_count as f32;
        self.time_accumulator = (self.time_accumulator + delta_time.max(0.0)) % cycle;

        let steps = (self.time_accumulator / period).floor();
        if steps >= 1.0 {
            self.time_accumulator -= steps * period;
            let steps = steps as usize % frame_count;
            self.current_frame = (self.current_frame + steps) % frame_count;
        }
    }

    pub fn current_frame(&self) -> Color {
        self.frames[self.current_frame]
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub diffuse: Color,
    pub albedo: f32,
    pub specular_albedo: f32,
    /// Phong exponent.
    pub specular_coefficient: f32,
    pub reflectivity: f32,
    pub transparency: f32,
    pub refraction_index: f32,
    pub animation: Option<AnimatedSurface>,
}

impl Material {
    pub fn new(diffuse: Color, albedo: f32, specular_albedo: f32, specular_coefficient: f32) -> Self {
        Material {
            diffuse,
            albedo,
            specular_albedo,
            specular_coefficient,
            reflectivity: 0.0,
            transparency: 0.0,
            refraction_index: 0.0,
            animation: None,
        }
    }

    pub fn animated(surface: AnimatedSurface, albedo: f32, specular_albedo: f32, specular_coefficient: f32) -> Self {
        Material {
            animation: Some(surface),
            ..Material::new(Color::BLACK, albedo, specular_albedo, specular_coefficient)
        }
    }

    pub fn reflective(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn transparent(mut self, transparency: f32, refraction_index: f32) -> Self {
        self.transparency = transparency;
        self.refraction_index = refraction_index;
        self
    }

    /// The diffuse color for the current frame.
    pub fn diffuse(&self) -> Color {
        match &self.animation {
            Some(surface) => surface.current_frame(),
            None => self.diffuse,
        }
    }

    pub fn advance(&mut self, delta_time: f32) {
        if let Some(surface) = &mut self.animation {
            surface.advance(delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::vector;

    use super::*;

    const A: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    const B: Color = Color::new(0.0, 0.0, 1.0, 1.0);

    #[test]
    fn animation_steps_after_one_period_and_wraps() {
        let mut surface = AnimatedSurface::new(vec![A, B], 2.0);
        assert_eq!(surface.current_frame(), A);

        surface.advance(0.25);
        assert_eq!(surface.current_frame(), A);
        surface.advance(0.25);
        assert_eq!(surface.current_frame(), B);
        surface.advance(0.5);
        assert_eq!(surface.current_frame(), A);
    }

    #[test]
    fn animation_catches_up_on_long_frames() {
        let mut surface = AnimatedSurface::new(vec![A, B], 2.0);
        surface.advance(1.5);
        assert_eq!(surface.current_frame(), B);
    }

    #[test]
    fn huge_or_infinite_delta_does_not_overflow() {
        let mut surface = AnimatedSurface::new(vec![A, B], 2.0);
        surface.advance(1.0e30);
        let frame = surface.current_frame();
        assert!(frame == A || frame == B);

        surface.advance(f32::INFINITY);
        surface.advance(f32::NAN);
        assert_eq!(surface.current_frame(), frame);

        // still steps normally afterwards
        surface.advance(0.5);
        assert_ne!(surface.current_frame(), frame);
    }

    #[test]
    fn whole_cycles_land_on_the_same_frame() {
        let mut surface = AnimatedSurface::new(vec![A, B, A], 1.0);
        surface.advance(1.0);
        assert_eq!(surface.current_frame(), B);

        let mut skipped = AnimatedSurface::new(vec![A, B, A], 1.0);
        skipped.advance(301.0);
        assert_eq!(skipped.current_frame(), B);
    }

    #[test]
    fn zero_delta_keeps_frame() {
        let mut surface = AnimatedSurface::new(vec![A, B], 5.0);
        surface.advance(0.0);
        assert_eq!(surface.current_frame(), A);
    }

    #[test]
    fn static_material_ignores_time() {
        let mut material = Material::new(A, 0.5, 0.5, 10.0);
        material.advance(10.0);
        assert_eq!(material.diffuse(), A);

        let mut animated = Material::animated(AnimatedSurface::new(vec![A, B], 1.0), 0.5, 0.5, 10.0);
        animated.advance(1.0);
        assert_eq!(animated.diffuse(), B);
    }

    #[test]
    fn reflect_flips_normal_component() {
        let reflected = reflect(&vector![1.0, -1.0, 0.0], &vector![0.0, 1.0, 0.0]);
        assert_eq!(reflected, vector![1.0, 1.0, 0.0]);
    }

    #[test]
    fn refract_head_on_passes_straight() {
        let refracted = refract(&vector![1.0, 0.0, 0.0], &vector![-1.0, 0.0, 0.0], 1.33)
            .expect("head on ray refracts");
        assert!((refracted - vector![1.0, 0.0, 0.0]).magnitude() < 1e-4);
    }

    #[test]
    fn refract_total_internal_reflection_is_none() {
        let grazing = vector![1.0, -0.05, 0.0].normalize();
        assert!(refract(&grazing, &vector![0.0, 1.0, 0.0], 1.5).is_none());
    }
}
