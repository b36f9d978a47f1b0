// src/surface.rs
//! Drawing capability consumed by operations.
//!
//! The paint loop never knows what a surface is backed by. It needs exactly
//! two primitives:
//! - `SurfaceFactory::new_surface` to allocate the drawing/standby pair
//! - `Surface::fill` to paint a rectangular region with a solid color
//!
//! `crate::rasterizer::Framebuffer` is the software implementation shipped
//! with the crate; tests plug in recording surfaces.

use crate::color::Color;
use anyhow::Result;
use std::fmt;

/// Fixed logical extent of the canvas (both axes).
pub const CANVAS_EXTENT: i32 = 800;

/// Size of every surface allocated by the paint loop.
pub const CANVAS_SIZE: Size = Size {
    width: CANVAS_EXTENT as u32,
    height: CANVAS_EXTENT as u32,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Half-open rectangle `[min, max)`. Coordinates may lie outside a surface;
/// `fill` implementations clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Builds a rectangle from two corners, normalizing their order.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            min: Point::new(x1.min(x2), y1.min(y2)),
            max: Point::new(x1.max(x2), y1.max(y2)),
        }
    }

    /// Rectangle of the given width/height centred on `center`. Edges
    /// saturate at the `i32` range.
    pub fn centered(center: Point, width: i32, height: i32) -> Self {
        let (half_w, half_h) = (width / 2, height / 2);
        Self::new(
            center.x.saturating_sub(half_w),
            center.y.saturating_sub(half_h),
            center.x.saturating_add(half_w),
            center.y.saturating_add(half_h),
        )
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    pub fn width(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Intersection of two rectangles; empty (default) if they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() {
            Rect::default()
        } else {
            r
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}

/// A raster buffer supporting region fills.
///
/// Surfaces are moved onto the paint loop's worker thread and only ever
/// touched there, hence `Send`.
pub trait Surface: Send {
    /// The full extent of the surface.
    fn bounds(&self) -> Rect;

    /// Fill `rect` (clipped to `bounds()`) with `color`.
    fn fill(&mut self, rect: Rect, color: Color);
}

/// Allocates surfaces for the paint loop.
pub trait SurfaceFactory {
    type Surface: Surface + 'static;

    fn new_surface(&self, size: Size) -> Result<Self::Surface>;
}
