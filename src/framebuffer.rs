use crate::algebra::Color;
use image::{Rgb, RgbImage};

/// Row-major pixel buffer the renderer writes into; colors stay unclamped
/// until the 8-bit conversion at the very end.
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Clamp each channel to [0,1] and quantize to 8-bit RGB.
    pub fn into_image(self) -> RgbImage {
        let mut img = RgbImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.pixel(x, y);
                img.put_pixel(
                    x,
                    y,
                    Rgb([
                        (c.0.clamp(0.0, 1.0) * 255.0) as u8,
                        (c.1.clamp(0.0, 1.0) * 255.0) as u8,
                        (c.2.clamp(0.0, 1.0) * 255.0) as u8,
                    ]),
                );
            }
        }
        img
    }
}
