// src/rasterizer.rs

//! Software RGBA framebuffer implementing [`Surface`].
//!
//! Pixels are stored row-major, 4 bytes per pixel. All fills are clipped to
//! the buffer bounds, so operations may freely draw partially off-canvas
//! (figures near an edge, moves that push figures outside).

use crate::color::Color;
use crate::surface::{Point, Rect, Size, Surface, SurfaceFactory};
use anyhow::{ensure, Result};
use log::trace;
use std::io::{self, Write};

const BYTES_PER_PIXEL: usize = 4;

/// Heap-allocated RGBA pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width_px: usize,
    height_px: usize,
    pixels: Box<[u8]>,
}

impl Framebuffer {
    /// Creates a framebuffer cleared to transparent black.
    pub fn new(width_px: usize, height_px: usize) -> Self {
        let buffer_size = width_px * height_px * BYTES_PER_PIXEL;
        Self {
            width_px,
            height_px,
            pixels: vec![0u8; buffer_size].into_boxed_slice(),
        }
    }

    pub fn width_px(&self) -> usize {
        self.width_px
    }

    pub fn height_px(&self) -> usize {
        self.height_px
    }

    /// Raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.bounds().contains(Point::new(x, y)) {
            return None;
        }
        let idx = (y as usize * self.width_px + x as usize) * BYTES_PER_PIXEL;
        let px = &self.pixels[idx..idx + BYTES_PER_PIXEL];
        Some(Color::new(px[0], px[1], px[2], px[3]))
    }

    /// Encodes the buffer as a binary PPM (`P6`) image. Alpha is dropped.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width_px, self.height_px)?;
        let mut row = Vec::with_capacity(self.width_px * 3);
        for line in self.pixels.chunks_exact(self.width_px.max(1) * BYTES_PER_PIXEL) {
            row.clear();
            for px in line.chunks_exact(BYTES_PER_PIXEL) {
                row.extend_from_slice(&px[..3]);
            }
            out.write_all(&row)?;
        }
        out.flush()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .finish_non_exhaustive()
    }
}

impl Surface for Framebuffer {
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width_px as i32, self.height_px as i32)
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let clipped = rect.intersect(&self.bounds());
        if clipped.is_empty() {
            trace!("Framebuffer: fill {} is off-canvas, skipped", rect);
            return;
        }
        let color_bytes = color.to_bytes();
        let x_px = clipped.min.x as usize;
        let width_px = clipped.width() as usize;

        for y_pos in clipped.min.y as usize..clipped.max.y as usize {
            let row_start = (y_pos * self.width_px + x_px) * BYTES_PER_PIXEL;
            let row_end = row_start + width_px * BYTES_PER_PIXEL;
            for pixel in self.pixels[row_start..row_end].chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&color_bytes);
            }
        }
    }
}

/// Allocates [`Framebuffer`]s for the paint loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramebufferFactory;

impl SurfaceFactory for FramebufferFactory {
    type Surface = Framebuffer;

    fn new_surface(&self, size: Size) -> Result<Framebuffer> {
        ensure!(
            size.width > 0 && size.height > 0,
            "Cannot allocate a {}x{} framebuffer",
            size.width,
            size.height
        );
        Ok(Framebuffer::new(size.width as usize, size.height as usize))
    }
}
