// src/script.rs
//! Feeds a script through the parser and onto the paint loop.
//!
//! The whole script is compiled before anything is posted, so a malformed
//! script produces no operations at all. Every intermediate flush is then
//! posted in order, each batch as one atomic `List`.

use crate::lang::{Batch, ParseError, Parser};
use crate::painter::PaintHandle;
use log::{debug, info};
use std::io::BufRead;
use std::thread;
use std::time::Duration;

/// What a run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Script lines read, including blank ones.
    pub lines: usize,
    /// Flushed batches posted to the loop.
    pub batches: usize,
    /// Total operations across those batches.
    pub operations: usize,
}

pub struct ScriptRunner<'a> {
    parser: &'a mut Parser,
    handle: PaintHandle,
    batch_delay: Duration,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(parser: &'a mut Parser, handle: PaintHandle) -> Self {
        Self {
            parser,
            handle,
            batch_delay: Duration::ZERO,
        }
    }

    /// Pause between posted batches, for watching an animation unfold.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Compiles every line, collecting each flushed batch.
    pub fn compile<R: BufRead>(&mut self, input: R) -> Result<(Vec<Batch>, usize), ParseError> {
        self.parser.begin();
        let mut batches = Vec::new();
        let mut lines = 0;
        for line in input.lines() {
            lines += 1;
            if let Some(batch) = self.parser.parse_line(&line?)? {
                batches.push(batch);
            }
        }
        debug!("ScriptRunner: {} lines, {} flushes", lines, batches.len());
        Ok((batches, lines))
    }

    /// Compiles `input` and posts its batches. Nothing is posted on error.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<RunSummary, ParseError> {
        let (batches, lines) = self.compile(input)?;
        let mut summary = RunSummary {
            lines,
            ..RunSummary::default()
        };

        for batch in batches {
            if summary.batches > 0 && !self.batch_delay.is_zero() {
                thread::sleep(self.batch_delay);
            }
            summary.batches += 1;
            summary.operations += batch.len();
            self.handle.post_all(batch);
        }

        info!(
            "ScriptRunner: Posted {} batches ({} operations) from {} lines",
            summary.batches, summary.operations, summary.lines
        );
        Ok(summary)
    }
}
