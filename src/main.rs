// src/main.rs

use painter::{
    config::CONFIG,
    display::HeadlessDisplay,
    lang::Parser,
    painter::PaintLoop,
    rasterizer::FramebufferFactory,
    script::ScriptRunner,
};

use anyhow::Context;
use log::{error, info};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::time::Duration;

const USAGE: &str = "usage: painter [SCRIPT]  (reads stdin when SCRIPT is missing or '-')";

/// Opens the script named on the command line, or stdin.
fn open_script(arg: Option<String>) -> anyhow::Result<(String, Box<dyn BufRead>)> {
    match arg.as_deref() {
        None | Some("-") => Ok(("<stdin>".to_string(), Box::new(io::stdin().lock()))),
        Some("-h") | Some("--help") => anyhow::bail!(USAGE),
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
            Ok((path.to_string(), Box::new(BufReader::new(file))))
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting painter...");

    let (source, script) = open_script(std::env::args().nth(1))?;
    info!("Reading script from {}", source);

    let display = HeadlessDisplay::new(&CONFIG.display).context("Failed to set up display")?;
    let mut paint_loop =
        PaintLoop::start(&FramebufferFactory, display).context("Failed to start paint loop")?;

    let mut parser = Parser::new(&CONFIG);
    let result = ScriptRunner::new(&mut parser, paint_loop.handle())
        .with_batch_delay(Duration::from_millis(CONFIG.script.line_delay_ms))
        .run(script);

    // Drain whatever was posted before reporting errors.
    paint_loop.stop_and_wait();

    match result {
        Ok(summary) => {
            info!(
                "painter finished: {} frames from {} batches",
                paint_loop.frames_published(),
                summary.batches
            );
            Ok(())
        }
        Err(e) => {
            error!("Script {} rejected: {}", source, e);
            Err(e).with_context(|| format!("Failed to compile {}", source))
        }
    }
}
