// src/lang/mod.rs
//! The drawing script language.
//!
//! One command per line; the first token names the command and the rest are
//! numeric arguments. See [`parser::Parser`] for the flush rules.

pub mod error;
pub mod parser;

pub use error::ParseError;
pub use parser::{scale_coordinate, Batch, Command, Parser};
