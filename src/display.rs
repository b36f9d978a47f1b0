// src/display.rs
//! Headless display sink.
//!
//! Stands in for a window: it receives every published frame on the paint
//! thread, logs it, and optionally writes it to disk as a PPM image.

use crate::config::DisplayConfig;
use crate::painter::Receiver;
use crate::rasterizer::Framebuffer;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct HeadlessDisplay {
    frames: u64,
    dump_dir: Option<PathBuf>,
}

impl HeadlessDisplay {
    /// Creates the display, creating `dump_dir` if one is configured.
    pub fn new(config: &DisplayConfig) -> Result<Self> {
        if let Some(dir) = &config.dump_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create frame dump dir {}", dir.display()))?;
            info!("HeadlessDisplay: Dumping frames to {}", dir.display());
        }
        Ok(Self {
            frames: 0,
            dump_dir: config.dump_dir.clone(),
        })
    }

    /// Frames received so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Path of the dump file for frame number `index`.
    pub fn frame_path(dir: &Path, index: u64) -> PathBuf {
        dir.join(format!("frame-{:05}.ppm", index))
    }

    fn dump(&self, dir: &Path, frame: &Framebuffer) -> Result<PathBuf> {
        let path = Self::frame_path(dir, self.frames);
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        frame
            .write_ppm(BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl Receiver<Framebuffer> for HeadlessDisplay {
    fn update(&mut self, frame: &Framebuffer) {
        self.frames += 1;
        debug!(
            "HeadlessDisplay: Frame {} ({}x{})",
            self.frames,
            frame.width_px(),
            frame.height_px()
        );

        if let Some(dir) = &self.dump_dir {
            // A failed dump must not stall the pipeline.
            match self.dump(dir, frame) {
                Ok(path) => debug!("HeadlessDisplay: Wrote {}", path.display()),
                Err(e) => warn!("HeadlessDisplay: {:#}", e),
            }
        }
    }
}
