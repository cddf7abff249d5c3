use std::fmt;

use crate::vec3::Vec3;

/// A `W x H` grid of linear-light RGB samples, indexed by raster coordinates
/// `(x, y)` with `y` growing downward. Out-of-range access is reported
/// rather than panicking, since the dispatcher and the image writer both
/// treat it as a recoverable configuration/programmer error (see
/// `tracer::Error::Bounds`).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

/// Raised when `(x, y)` falls outside `0..width, 0..height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pixel ({}, {}) out of bounds for a {}x{} buffer",
            self.x, self.y, self.width, self.height
        )
    }
}

impl std::error::Error for OutOfBounds {}

impl PixelBuffer {
    /// Create a new buffer of the given dimensions, filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![Vec3::zero(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, OutOfBounds> {
        if x >= self.width || y >= self.height {
            return Err(OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Vec3, OutOfBounds> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u32, y: u32, c: Vec3) -> Result<(), OutOfBounds> {
        let i = self.index(x, y)?;
        self.pixels[i] = c;
        Ok(())
    }

    /// Iterate over all pixels in row-major order as `(x, y, color)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Vec3)> + '_ {
        let width = self.width;
        self.pixels.iter().enumerate().map(move |(i, c)| {
            let i = i as u32;
            (i % width, i / width, *c)
        })
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }
}
