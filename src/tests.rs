use nalgebra::{point, vector, Point3};

use crate::camera::Camera;
use crate::material::{AnimatedSurface, Material};
use crate::object::Cuboid;
use crate::picture::{Color, Picture, RGBA8};
use crate::render::render_frame;
use crate::scene::{Light, Scene};
use crate::skybox::Skybox;

const WIDTH: u32 = 40;
const HEIGHT: u32 = 30;

fn brightness(pixel: &RGBA8) -> u32 {
    pixel.r as u32 + pixel.g as u32 + pixel.b as u32
}

fn single_box_scene(light: Point3<f32>) -> Scene {
    let mut scene = Scene::new(Light::new(light, 1.5, Color::WHITE), Skybox::Gradient);
    let material = Material::new(Color::from_rgb8(100, 100, 80), 0.6, 0.3, 50.0);
    scene.add(Cuboid::new(point![-1.0, -1.0, -1.0], vector![2.0, 2.0, 2.0], material));
    scene
}

fn render(scene: &mut Scene, camera: &Camera, delta_time: f32) -> Vec<RGBA8> {
    let mut pixels = vec![RGBA8::BLACK; (WIDTH * HEIGHT) as usize];
    let mut picture = Picture::new(pixels.as_mut_slice(), (WIDTH, HEIGHT));
    render_frame(&mut picture, &camera.viewport(WIDTH, HEIGHT), scene, delta_time);
    pixels
}

fn center(pixels: &[RGBA8]) -> RGBA8 {
    pixels[(HEIGHT / 2 * WIDTH + WIDTH / 2) as usize]
}

#[test]
fn lit_face_is_brighter_than_unlit_face() {
    let camera = Camera::new(point![-10.0, 0.0, 0.0], Point3::origin(), 10.0);
    let sky = RGBA8::from(Skybox::Gradient.color(&vector![1.0, 0.0, 0.0]));

    let mut behind = single_box_scene(point![20.0, 0.0, 0.0]);
    let mut facing = single_box_scene(point![-20.0, 0.0, 0.0]);
    let behind = center(&render(&mut behind, &camera, 0.0));
    let facing = center(&render(&mut facing, &camera, 0.0));

    assert_ne!(behind, sky);
    assert_ne!(facing, sky);
    assert!(brightness(&facing) > brightness(&behind));
}

#[test]
fn corners_see_the_sky() {
    let camera = Camera::new(point![-10.0, 0.0, 0.0], Point3::origin(), 10.0);
    let mut scene = single_box_scene(point![-20.0, 0.0, 0.0]);
    let pixels = render(&mut scene, &camera, 0.0);
    let viewport = camera.viewport(WIDTH, HEIGHT);
    let expected = RGBA8::from(Skybox::Gradient.color(&viewport.ray_direction(0, 0)));
    assert_eq!(pixels[0], expected);
}

#[test]
fn rendering_is_deterministic() {
    let camera = Camera::new(point![-10.0, 2.0, 3.0], Point3::origin(), 10.0);
    let mut first = single_box_scene(point![-20.0, 5.0, 0.0]);
    let mut second = first.clone();
    assert_eq!(render(&mut first, &camera, 0.016), render(&mut second, &camera, 0.016));
}

#[test]
fn animation_advances_once_per_frame() {
    let red = Color::new(1.0, 0.0, 0.0, 1.0);
    let blue = Color::new(0.0, 0.0, 1.0, 1.0);
    let surface = AnimatedSurface::new(vec![red, blue], 2.0);

    let mut scene = Scene::new(Light::new(point![-20.0, 0.0, 0.0], 1.0, Color::WHITE), Skybox::Gradient);
    scene.add(Cuboid::new(point![-1.0, -1.0, -1.0], vector![2.0, 2.0, 2.0], Material::animated(surface, 1.0, 0.0, 1.0)));
    let camera = Camera::new(point![-10.0, 0.0, 0.0], Point3::origin(), 10.0);

    // every pixel shades the same material; a per-ray advance would skip frames
    let first = center(&render(&mut scene, &camera, 0.25));
    assert!(first.r > 0 && first.b == 0);

    let second = center(&render(&mut scene, &camera, 0.25));
    assert!(second.b > 0 && second.r == 0);

    let third = center(&render(&mut scene, &camera, 0.5));
    assert_eq!(third, first);
}
