//! Recursive ray tracer for scenes of axis-aligned boxes under a single point light,
//! with reflection, refraction, soft shadows and animated surface colors.

use std::sync::{Arc, Mutex};
use std::thread::{JoinHandle, spawn};
use std::time::Instant;

use log::{debug, info, warn};
use nalgebra::{point, vector, Point3};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use crate::camera::Camera;
use crate::gpu::{Display, Frame, Gpu};
use crate::material::{AnimatedSurface, Material};
use crate::object::Cuboid;
use crate::picture::{Color, Picture, RGBA8};
use crate::render::render_frame;
use crate::scene::{Light, Scene};
use crate::skybox::Skybox;

mod camera;
mod gpu;
mod material;
mod object;
mod picture;
mod ray;
mod render;
mod scene;
mod skybox;
#[cfg(test)]
mod tests;

const SCREEN_WIDTH: u32 = 800;
const SCREEN_HEIGHT: u32 = 600;
const DEFAULT_SKYBOX: &str = "./textures/sky.jpg";

#[derive(Clone)]
struct State {
    camera: Camera,
}

/// Applies a key press to the camera, returns whether the key is bound.
fn handle_key(camera: &mut Camera, key: VirtualKeyCode) -> bool {
    match key {
        VirtualKeyCode::Up => camera.move_forward(1.0),
        VirtualKeyCode::Down => camera.move_forward(-1.0),
        VirtualKeyCode::A => camera.rotate(-1.0, 0.0),
        VirtualKeyCode::D => camera.rotate(1.0, 0.0),
        VirtualKeyCode::W => camera.rotate(0.0, -1.0),
        VirtualKeyCode::S => camera.rotate(0.0, 1.0),
        _ => return false,
    }
    true
}

#[derive(Default)]
struct FpsCounter {
    frames: u32,
    elapsed: f32,
}

impl FpsCounter {
    fn tick(&mut self, delta_time: f32) {
        self.frames += 1;
        self.elapsed += delta_time;
        if self.elapsed >= 1.0 {
            info!(target: "app", "FPS: {:.1}", self.frames as f32 / self.elapsed);
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }
}

fn spawn_worker(frame: &Arc<Mutex<Frame<RGBA8>>>, state: Arc<Mutex<State>>, mut scene: Scene) -> JoinHandle<()> {
    let frame = Arc::downgrade(frame);
    let size = (SCREEN_WIDTH, SCREEN_HEIGHT);

    info!(target: "app", "Spawning worker thread");
    spawn(move || {
        let mut pixels = vec![RGBA8::BLACK; size.0 as usize * size.1 as usize];
        let mut last_frame: Option<Instant> = None;
        let mut fps = FpsCounter::default();

        while let Some(frame) = frame.upgrade() {
            let now = Instant::now();
            let delta_time = last_frame.map_or(0.0, |last| now.duration_since(last).as_secs_f32());
            last_frame = Some(now);

            let camera = state.lock().expect("state lock").camera.clone();
            let viewport = camera.viewport(size.0, size.1);
            {
                let mut picture = Picture::new(pixels.as_mut_slice(), size);
                render_frame(&mut picture, &viewport, &mut scene, delta_time);
            }

            frame.lock()
                .expect("frame submission lock")
                .picture_mut()
                .copy_from(&pixels);
            fps.tick(delta_time);
        }
        info!(target: "app", "Worker lost frame, stopping");
    })
}

fn water_frames() -> Vec<Color> {
    vec![
        Color::from_rgb8(0, 162, 255),
        Color::from_rgb8(0, 102, 255),
        Color::from_rgb8(0, 51, 204),
        Color::from_rgb8(0, 76, 230),
        Color::from_rgb8(0, 0, 255),
        Color::from_rgb8(30, 144, 255),
        Color::from_rgb8(0, 191, 255),
    ]
}

/// River between two banks with a few trees.
fn demo_scene(skybox: Skybox) -> Scene {
    let wood = Material::new(Color::from_rgb8(139, 69, 19), 0.5, 0.2, 20.0).reflective(0.1);
    let leaves = Material::new(Color::from_rgb8(34, 139, 34), 0.2, 0.5, 10.0)
        .reflective(0.1)
        .transparent(0.3, 1.0);
    let velvet = Material::new(Color::from_rgb8(204, 0, 204), 0.8, 0.1, 10.0).reflective(0.01);
    let leather = Material::new(Color::from_rgb8(105, 55, 5), 0.4, 0.25, 22.0).reflective(0.05);
    let water = Material::animated(AnimatedSurface::new(water_frames(), 5.0), 0.5, 1.0, 75.0)
        .reflective(0.5)
        .transparent(0.98, 1.33);

    let boxes = [
        (point![30.0, 0.0, 0.0], vector![5.0, 15.0, 3.0], &water),
        (point![25.0, 0.0, 0.0], vector![30.0, 1.0, 30.0], &water),
        (point![0.0, 0.0, 0.0], vector![30.0, 2.0, 30.0], &leather),
        (point![35.0, 0.0, 0.0], vector![30.0, 2.0, 30.0], &leather),
        (point![5.0, 1.0, 5.0], vector![4.0, 12.0, 4.0], &wood),
        (point![5.0, 13.0, 5.0], vector![8.0, 8.0, 8.0], &leaves),
        (point![15.0, 1.0, 15.0], vector![4.0, 15.0, 4.0], &wood),
        (point![15.0, 16.0, 15.0], vector![10.0, 10.0, 10.0], &leaves),
        (point![45.0, 1.0, 10.0], vector![4.0, 12.0, 4.0], &wood),
        (point![45.0, 13.0, 10.0], vector![8.0, 8.0, 8.0], &velvet),
        (point![55.0, 1.0, 5.0], vector![4.0, 15.0, 4.0], &wood),
        (point![55.0, 16.0, 5.0], vector![10.0, 10.0, 10.0], &velvet),
    ];

    let light = Light::new(point![20.0, 0.0, 0.0], 1.5, Color::WHITE);
    let mut scene = Scene::new(light, skybox);
    for (min, extents, material) in boxes {
        scene.add(Cuboid::new(min, extents, material.clone()));
    }
    scene
}

fn load_skybox() -> Skybox {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SKYBOX.to_string());
    match Skybox::load(&path) {
        Ok(skybox) => skybox,
        Err(err) => {
            warn!(target: "app", "Could not load skybox {}: {}, using gradient", path, err);
            Skybox::Gradient
        }
    }
}

fn main() {
    env_logger::builder().target(env_logger::Target::Stdout).init();

    let event_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_title("Cube Tracer")
        .with_inner_size(LogicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT))
        .build(&event_loop)
        .expect("window");

    let mut display = smol::block_on(async {
        let gpu = Gpu::new().await;
        let surface = gpu.surface(&window);

        let size = window.inner_size();
        Display::new(gpu, surface, (size.width, size.height), (SCREEN_WIDTH, SCREEN_HEIGHT))
    });

    let state = Arc::new(Mutex::new(State {
        camera: Camera::new(point![-20.0, 0.0, 0.0], Point3::origin(), 10.0),
    }));

    let scene = demo_scene(load_skybox());
    info!(target: "app", "Scene ready, {} objects", scene.objects.len());
    spawn_worker(&display.frame(), state.clone(), scene);

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_poll();

        match event {
            Event::RedrawRequested(window_id) if window.id() == window_id => {
                display.present();
            }
            Event::RedrawEventsCleared => {
                window.request_redraw();
            }
            Event::WindowEvent { event, window_id } if window.id() == window_id => match event {
                WindowEvent::Resized(size) => {
                    display.resize((size.width, size.height));
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    display.resize((new_inner_size.width, new_inner_size.height));
                }
                WindowEvent::CloseRequested => control_flow.set_exit(),
                WindowEvent::KeyboardInput {
                    input: KeyboardInput { state: ElementState::Pressed, virtual_keycode: Some(key), .. },
                    ..
                } => {
                    let mut state = state.lock().expect("state write lock");
                    if handle_key(&mut state.camera, key) {
                        debug!(target: "app", "Camera at {:?} looking at {:?}", state.camera.position, state.camera.target);
                    }
                }
                _ => {}
            }
            _ => {}
        }
    });
}
