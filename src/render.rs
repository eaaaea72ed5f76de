use float_ord::FloatOrd;
use log::trace;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::camera::Viewport;
use crate::material::{reflect, refract};
use crate::object::Object;
use crate::picture::{Color, Picture, PixelFormat};
use crate::ray::{Intersect, Ray};
use crate::scene::Scene;

/// Offset along the normal for secondary rays, keeps them off the surface they leave.
pub const BIAS: f32 = 0.01;
/// Bounces a primary ray may take before the sky is returned.
pub const MAX_RECURSION_DEPTH: u32 = 2;

/// Nearest non-negative hit along `ray` and the index of the object that produced it.
fn nearest_hit(ray: &Ray, objects: &[Object]) -> Option<(usize, Intersect)> {
    objects.iter()
        .enumerate()
        .filter_map(|(index, object)| object.ray_intersect(ray).map(|hit| (index, hit)))
        .filter(|(_, hit)| hit.distance >= 0.0)
        .min_by_key(|(_, hit)| FloatOrd(hit.distance))
}

/// How much of the light reaches `origin`, 1.0 meaning fully lit.
///
/// Stops at the first occluder in scene order rather than the nearest one; the falloff
/// is `1 - min(1, occluder_distance / light_distance)`.
pub fn cast_shadow(origin: &Point3<f32>, light_dir: &Vector3<f32>, light_position: &Point3<f32>, objects: &[Object], exclude: Option<usize>) -> f32 {
    let ray = Ray::new(*origin, *light_dir);
    let light_distance = (light_position - origin).magnitude();

    objects.iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != exclude)
        .filter_map(|(_, object)| object.ray_intersect(&ray))
        .find(|hit| hit.distance > 0.0)
        .map(|hit| 1.0 - f32::min(1.0, hit.distance / light_distance))
        .unwrap_or(1.0)
}

/// Color seen along `ray`, following reflection and refraction up to [`MAX_RECURSION_DEPTH`].
pub fn cast_ray(ray: &Ray, scene: &Scene, depth: u32) -> Color {
    let (index, hit) = match nearest_hit(ray, &scene.objects) {
        Some(nearest) if depth < MAX_RECURSION_DEPTH => nearest,
        _ => return scene.skybox.color(&ray.direction),
    };

    let material = scene.objects[index].material();
    let light = &scene.light;

    let light_dir = (light.position - hit.point).normalize();
    let view_dir = (ray.origin - hit.point).normalize();

    let shadow_origin = hit.point + hit.normal * BIAS;
    let shadow = cast_shadow(&shadow_origin, &light_dir, &light.position, &scene.objects, Some(index));
    let intensity = shadow * light.intensity;

    let diffuse = f32::max(0.0, hit.normal.dot(&light_dir));
    let highlight_dir = reflect(&-light_dir, &hit.normal);
    let specular = f32::max(0.0, view_dir.dot(&highlight_dir)).powf(material.specular_coefficient);

    let diffuse_light = intensity * diffuse * material.albedo * material.diffuse();
    let specular_light = intensity * specular * material.specular_albedo * light.color;

    let mut reflected = Color::BLACK;
    if material.reflectivity > 0.0 {
        let direction = reflect(&ray.direction, &hit.normal);
        let bounce = Ray::new(hit.point + hit.normal * BIAS, direction);
        reflected = material.reflectivity * cast_ray(&bounce, scene, depth + 1);
    }

    let mut refracted = Color::BLACK;
    if material.transparency > 0.0 {
        let incident = ray.direction.normalize();
        if let Some(direction) = refract(&incident, &hit.normal, material.refraction_index) {
            let through = Ray::new(hit.point - hit.normal * BIAS, direction);
            refracted = material.transparency * cast_ray(&through, scene, depth + 1);
        }
    }

    (1.0 - material.reflectivity - material.transparency) * (diffuse_light + specular_light) + reflected + refracted
}

/// Advances the scene by `delta_time`, then shades every pixel of `picture`.
///
/// Rows are shaded in parallel, each worker owning exactly one row of the buffer.
pub fn render_frame<P>(picture: &mut Picture<&mut [P]>, viewport: &Viewport, scene: &mut Scene, delta_time: f32)
    where P: PixelFormat + Send {
    scene.advance(delta_time);
    let scene: &Scene = scene;

    let width = picture.width() as usize;
    trace!(target: "app", "Rendering {}x{} frame, dt {:.4}s", picture.width(), picture.height(), delta_time);

    picture.buffer_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = viewport.emit_ray(x as u32, y as u32);
                *pixel = P::from(cast_ray(&ray, scene, 0));
            }
        });
}
