use std::ops::{Add, Mul};

use bytemuck_derive::{AnyBitPattern, NoUninit};
use wgpu::TextureFormat;

/// Linear color, one unit per channel equals 255 on the wire.
///
/// Channels are never clamped during shading; values above 1.0 or below 0.0 are
/// only cut when the color is written out as an [`RGBA8`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Self) -> Self::Output {
        Color::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a,
        )
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        Color::new(
            self.r * rhs,
            self.g * rhs,
            self.b * rhs,
            self.a,
        )
    }
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, AnyBitPattern, NoUninit)]
#[repr(C)]
pub struct RGBA8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Color> for RGBA8 {
    fn from(value: Color) -> Self {
        RGBA8::new_norm(value.r, value.g, value.b, value.a)
    }
}

fn normalize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

impl RGBA8 {
    pub const BLACK: RGBA8 = RGBA8::new_hex(0x000000FF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        RGBA8 { r, g, b, a }
    }

    pub const fn new_hex(rgba: u32) -> RGBA8 {
        RGBA8 {
            r: ((rgba & 0xff000000) >> 24) as u8,
            g: ((rgba & 0x00ff0000) >> 16) as u8,
            b: ((rgba & 0x0000ff00) >> 8) as u8,
            a: (rgba & 0x000000ff) as u8,
        }
    }

    /// Clamps every channel to `[0, 1]` before scaling to a byte.
    pub fn new_norm(r: f32, g: f32, b: f32, a: f32) -> Self {
        RGBA8::new(normalize(r), normalize(g), normalize(b), normalize(a))
    }
}

impl PixelFormat for RGBA8 {
    fn texture_format() -> TextureFormat {
        TextureFormat::Rgba8Unorm
    }
}

pub trait PixelFormat: From<Color> + bytemuck::AnyBitPattern + bytemuck::NoUninit {
    fn texture_format() -> TextureFormat;
}

/// Row-major grid of pixels of a fixed size.
pub struct Picture<P> {
    pixels: P,
    size: (u32, u32),
}

impl<P> Picture<P> {
    pub fn new(pixels: P, size: (u32, u32)) -> Self {
        Picture { pixels, size }
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    #[cfg(test)]
    fn to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width() as usize + x as usize
    }
}

impl<'a, T> Picture<&'a mut [T]> {
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> &T {
        &self.pixels[self.to_index(x, y)]
    }

    pub fn buffer_mut(&mut self) -> &mut [T] {
        self.pixels
    }
}

impl<'a, T: Copy> Picture<&'a mut [T]> {
    pub fn copy_from(&mut self, pixels: &[T]) {
        self.pixels.copy_from_slice(pixels);
    }
}
