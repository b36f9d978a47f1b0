// src/painter/op.rs
//! Drawing operations executed by the paint loop.
//!
//! `Operation` is a closed set of variants with a single dispatch point,
//! [`Operation::apply`]. Applying an operation mutates the surface (and, for
//! `Move`, the shared figure arena) and reports whether the surface is now a
//! complete frame. It never blocks and never fails.

use crate::color::Color;
use crate::config::FigureConfig;
use crate::surface::{Point, Rect, Surface};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Arena of figure positions shared between the parser and the operations
/// it emitted.
///
/// Cloning the handle shares the arena. A `Move` holding a handle moves every
/// figure in it, including figures appended after the move was created.
/// All mutation happens on the paint loop's single worker thread; the mutex
/// only makes the handle `Send + Sync`.
#[derive(Clone, Default)]
pub struct SharedFigures(Arc<Mutex<Vec<Point>>>);

impl SharedFigures {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Point>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a figure and returns its index in the arena.
    pub fn push(&self, position: Point) -> usize {
        let mut figures = self.lock();
        figures.push(position);
        figures.len() - 1
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.lock().get(index).copied()
    }

    /// Snapshot of every figure position.
    pub fn positions(&self) -> Vec<Point> {
        self.lock().clone()
    }

    /// Shifts every figure by `(dx, dy)`, saturating at the `i32` range.
    pub fn translate_all(&self, dx: i32, dy: i32) {
        for figure in self.lock().iter_mut() {
            figure.x = figure.x.saturating_add(dx);
            figure.y = figure.y.saturating_add(dy);
        }
    }

    /// True if both handles refer to the same arena.
    pub fn same_arena(&self, other: &SharedFigures) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedFigures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.lock().iter()).finish()
    }
}

/// Opaque surface mutation. Never signals readiness.
#[derive(Clone)]
pub struct Task(Arc<dyn Fn(&mut dyn Surface) + Send + Sync>);

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Task(..)")
    }
}

#[derive(Debug, Clone)]
pub enum Operation {
    /// Fill the whole surface.
    Fill(Color),
    /// Fill a rectangle.
    RectFill { rect: Rect, color: Color },
    /// Draw the figure at `index` in `figures`, at its current position.
    Figure {
        figures: SharedFigures,
        index: usize,
        style: FigureConfig,
    },
    /// Shift every figure in `figures`.
    Move {
        dx: i32,
        dy: i32,
        figures: SharedFigures,
    },
    /// Apply children in order. Ready if any child is ready.
    List(Vec<Operation>),
    /// Marks the surface as a complete frame.
    Ready,
    Task(Task),
}

impl Operation {
    /// Wraps a closure as an operation.
    pub fn task<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Surface) + Send + Sync + 'static,
    {
        Operation::Task(Task(Arc::new(f)))
    }

    /// Applies the operation to `surface`, returning true if the surface
    /// should now be published.
    pub fn apply(&self, surface: &mut dyn Surface) -> bool {
        match self {
            Operation::Fill(color) => {
                let bounds = surface.bounds();
                surface.fill(bounds, *color);
                false
            }
            Operation::RectFill { rect, color } => {
                surface.fill(*rect, *color);
                false
            }
            Operation::Figure {
                figures,
                index,
                style,
            } => {
                if let Some(center) = figures.get(*index) {
                    draw_figure(surface, center, style);
                }
                false
            }
            Operation::Move { dx, dy, figures } => {
                figures.translate_all(*dx, *dy);
                false
            }
            Operation::List(ops) => {
                // Every child runs; readiness does not short-circuit.
                let mut ready = false;
                for op in ops {
                    ready |= op.apply(surface);
                }
                ready
            }
            Operation::Ready => true,
            Operation::Task(Task(f)) => {
                (f.as_ref())(surface);
                false
            }
        }
    }
}

fn draw_figure(surface: &mut dyn Surface, center: Point, style: &FigureConfig) {
    let vertical = Rect::centered(center, style.bar_thickness, style.bar_length);
    let horizontal = Rect::centered(center, style.bar_length, style.bar_thickness);
    surface.fill(vertical, style.color);
    surface.fill(horizontal, style.color);
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Fill(color) => write!(f, "fill({})", color),
            Operation::RectFill { rect, color } => write!(f, "rect({} {})", rect, color),
            Operation::Figure { figures, index, .. } => match figures.get(*index) {
                Some(p) => write!(f, "figure@{},{}", p.x, p.y),
                None => write!(f, "figure#{}", index),
            },
            Operation::Move { dx, dy, .. } => write!(f, "move({},{})", dx, dy),
            Operation::List(ops) => {
                f.write_str("list[")?;
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", op)?;
                }
                f.write_str("]")
            }
            Operation::Ready => f.write_str("ready"),
            Operation::Task(_) => f.write_str("task"),
        }
    }
}
