// src/lib.rs
//! Script-driven, double-buffered drawing pipeline.
//!
//! ```text
//! script lines ─► lang::Parser ─► Batch ─► painter::PaintLoop ─► Receiver
//!                 (caller thread)          (paint thread, two surfaces)
//! ```
//!
//! - `lang`: the line-oriented script compiler
//! - `painter`: operations, the blocking queue and the paint loop
//! - `surface`: the drawing capability operations run against
//! - `rasterizer`: software RGBA framebuffer implementing `Surface`
//! - `display`: headless frame sink implementing `Receiver`
//! - `script`: glue posting compiled batches onto a running loop

pub mod color;
pub mod config;
pub mod display;
pub mod lang;
pub mod painter;
pub mod rasterizer;
pub mod script;
pub mod surface;
