// src/lang/parser.rs

//! Incremental compiler from script lines to operation batches.
//!
//! The parser accumulates drawing intent line by line and emits a full
//! batch whenever its flush flag is set. The flag is *toggled* by `update`,
//! and checked after every line:
//!
//! ```text
//! figure 10 10   flag=false  no batch
//! update         flag=true   batch [bg, figure, ready]
//! figure 20 20   flag=true   batch [bg, figure, figure, ready]
//! update         flag=false  no batch
//! update         flag=true   batch [bg, figure, figure, ready]
//! ```
//!
//! A second `update` therefore turns flushing off rather than flushing again.

use super::error::ParseError;
use crate::color::Color;
use crate::config::{ColorScheme, Config, FigureConfig};
use crate::painter::{Operation, SharedFigures};
use crate::surface::{Point, Rect, CANVAS_EXTENT};
use log::{debug, trace};
use std::io::BufRead;

/// Operations emitted together by one flush, in execution order.
pub type Batch = Vec<Operation>;

/// A parsed script line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    White,
    Green,
    BgRect { x1: i32, y1: i32, x2: i32, y2: i32 },
    Figure { x: i32, y: i32 },
    Move { dx: i32, dy: i32 },
    Reset,
    Update,
}

impl Command {
    /// Parses one non-blank line. `line_no` is only used for errors.
    ///
    /// Arguments are parsed before the command is looked up, so a bad
    /// number is reported even for an unknown command.
    pub fn parse(line: &str, line_no: usize) -> Result<Option<Self>, ParseError> {
        let mut fields = line.split_whitespace();
        let Some(name) = fields.next() else {
            return Ok(None);
        };

        let args = fields
            .map(|field| {
                field
                    .parse::<f64>()
                    .map(scale_coordinate)
                    .map_err(|_| ParseError::InvalidArgument {
                        line: line_no,
                        command: name.to_string(),
                        argument: field.to_string(),
                    })
            })
            .collect::<Result<Vec<i32>, _>>()?;

        let take = |expected: usize| take_args(&args, expected, name, line_no);

        let command = match name {
            "white" => Command::White,
            "green" => Command::Green,
            "bgrect" => {
                let a = take(4)?;
                Command::BgRect {
                    x1: a[0],
                    y1: a[1],
                    x2: a[2],
                    y2: a[3],
                }
            }
            "figure" => {
                let a = take(2)?;
                Command::Figure { x: a[0], y: a[1] }
            }
            "move" => {
                let a = take(2)?;
                Command::Move { dx: a[0], dy: a[1] }
            }
            "reset" => Command::Reset,
            "update" => Command::Update,
            _ => {
                return Err(ParseError::UnknownCommand {
                    line: line_no,
                    command: name.to_string(),
                })
            }
        };
        Ok(Some(command))
    }
}

fn take_args<'a>(
    args: &'a [i32],
    expected: usize,
    command: &str,
    line_no: usize,
) -> Result<&'a [i32], ParseError> {
    args.get(..expected)
        .ok_or_else(|| ParseError::MissingArgument {
            line: line_no,
            command: command.to_string(),
            expected,
            found: args.len(),
        })
}

/// Values strictly between 0 and 1 are fractions of the canvas extent;
/// everything else is an absolute coordinate. Both truncate toward zero.
pub fn scale_coordinate(value: f64) -> i32 {
    let value = if value > 0.0 && value < 1.0 {
        value * f64::from(CANVAS_EXTENT)
    } else {
        value
    };
    value as i32
}

/// Stateful script compiler.
///
/// Not thread-safe by design: it runs on the caller's thread, and the
/// batches it emits are posted to the paint loop by the caller.
#[derive(Debug)]
pub struct Parser {
    colors: ColorScheme,
    figure_style: FigureConfig,

    background: Operation,
    bg_rect: Option<Operation>,
    figures: SharedFigures,
    moves: Vec<Operation>,
    update: Option<Operation>,
    flush: bool,
    last_batch: Batch,
    line_no: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Parser {
    pub fn new(config: &Config) -> Self {
        Self {
            colors: config.colors.clone(),
            figure_style: config.figure,
            background: Operation::Fill(config.colors.white),
            bg_rect: None,
            figures: SharedFigures::new(),
            moves: Vec::new(),
            update: None,
            flush: false,
            last_batch: Vec::new(),
            line_no: 0,
        }
    }

    /// Compiles a whole script and returns the last batch it emitted, or an
    /// empty batch if no line flushed.
    ///
    /// The ready marker and last batch are cleared first; all other state
    /// (background, figures, flush flag, ...) carries over between calls.
    pub fn parse<R: BufRead>(&mut self, input: R) -> Result<Batch, ParseError> {
        self.begin();
        for line in input.lines() {
            self.parse_line(&line?)?;
        }
        Ok(self.last_batch.clone())
    }

    /// Starts a new script: line numbers restart at 1, and the ready marker
    /// and last batch are cleared. Called by [`Parser::parse`]; callers driving
    /// [`Parser::parse_line`] themselves call it once per script.
    pub fn begin(&mut self) {
        self.update = None;
        self.last_batch.clear();
        self.line_no = 0;
    }

    pub fn parse_str(&mut self, script: &str) -> Result<Batch, ParseError> {
        self.parse(script.as_bytes())
    }

    /// Processes one line. Returns the batch if this line flushed.
    pub fn parse_line(&mut self, line: &str) -> Result<Option<Batch>, ParseError> {
        self.line_no += 1;
        let Some(command) = Command::parse(line, self.line_no)? else {
            return Ok(None);
        };
        trace!("Parser: line {}: {:?}", self.line_no, command);
        self.apply(command);

        if !self.flush {
            return Ok(None);
        }
        let batch = self.generate();
        debug!(
            "Parser: line {} flushed {} operations",
            self.line_no,
            batch.len()
        );
        self.last_batch = batch.clone();
        Ok(Some(batch))
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::White => self.background = Operation::Fill(self.colors.white),
            Command::Green => self.background = Operation::Fill(self.colors.green),
            Command::BgRect { x1, y1, x2, y2 } => {
                self.bg_rect = Some(Operation::RectFill {
                    rect: Rect::new(x1, y1, x2, y2),
                    color: self.colors.bgrect,
                });
            }
            Command::Figure { x, y } => {
                self.figures.push(Point::new(x, y));
            }
            Command::Move { dx, dy } => self.moves.push(Operation::Move {
                dx,
                dy,
                figures: self.figures.clone(),
            }),
            Command::Reset => {
                if !self.figures.is_empty() {
                    debug!("Parser: reset drops {} figures", self.figures.len());
                }
                // Earlier operations keep the old arena alive.
                self.figures = SharedFigures::new();
                self.bg_rect = None;
                self.moves.clear();
                self.background = Operation::Fill(self.colors.reset);
            }
            Command::Update => {
                self.flush = !self.flush;
                self.update = Some(Operation::Ready);
            }
        }
    }

    /// Snapshot of the current state. Consumes pending moves.
    fn generate(&mut self) -> Batch {
        let figure_count = self.figures.len();
        let mut batch = Vec::with_capacity(self.moves.len() + figure_count + 3);

        batch.push(self.background.clone());
        batch.extend(self.bg_rect.clone());
        batch.append(&mut self.moves);
        batch.extend((0..figure_count).map(|index| Operation::Figure {
            figures: self.figures.clone(),
            index,
            style: self.figure_style,
        }));
        batch.extend(self.update.clone());
        batch
    }

    /// The batch emitted by the most recent flush of the current `parse`.
    pub fn last_batch(&self) -> &[Operation] {
        &self.last_batch
    }

    /// Whether the next processed line will flush.
    pub fn flush_pending(&self) -> bool {
        self.flush
    }

    /// Handle to the live figure arena.
    pub fn figures(&self) -> &SharedFigures {
        &self.figures
    }

    pub fn figure_count(&self) -> usize {
        self.figures.len()
    }

    pub fn background_color(&self) -> Option<Color> {
        match self.background {
            Operation::Fill(color) => Some(color),
            _ => None,
        }
    }
}
