// src/painter/mod.rs
//! Operation queue and the double-buffered paint loop.
//!
//! - `op`: the `Operation` sum type and shared figure arena
//! - `queue`: blocking FIFO between producers and the paint thread
//! - `event_loop`: the paint thread, surface swapping and shutdown

pub mod event_loop;
pub mod op;
pub mod queue;

pub use event_loop::{PaintHandle, PaintLoop, Receiver};
pub use op::{Operation, SharedFigures, Task};
pub use queue::OperationQueue;

#[cfg(test)]
mod tests;
