// src/painter/event_loop.rs
//! PaintLoop - Dedicated thread executing drawing operations.
//!
//! Threading model:
//! - Owns: the drawing/standby surface pair and the frame `Receiver`
//! - Any thread may post; operations run in global push order
//! - A ready operation publishes the drawing surface, then the pair swaps
//! - Shutdown is cooperative: the queue is drained before the thread exits

use super::op::Operation;
use super::queue::OperationQueue;
use crate::surface::{Surface, SurfaceFactory, CANVAS_SIZE};
use anyhow::{Context, Result};
use log::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

/// Sink for completed frames.
///
/// Called on the paint thread once per ready signal. Blocking here stalls
/// the whole pipeline.
pub trait Receiver<S: ?Sized>: Send {
    fn update(&mut self, frame: &S);
}

impl<S: ?Sized, F> Receiver<S> for F
where
    F: FnMut(&S) + Send,
{
    fn update(&mut self, frame: &S) {
        self(frame)
    }
}

/// Cloneable posting handle for producer threads.
#[derive(Debug, Clone)]
pub struct PaintHandle {
    queue: Arc<OperationQueue>,
}

impl PaintHandle {
    pub fn post(&self, op: Operation) {
        self.queue.push(op);
    }

    /// Posts a batch as one `List` so no other producer's operation can
    /// interleave with it.
    pub fn post_all(&self, ops: Vec<Operation>) {
        if !ops.is_empty() {
            self.queue.push(Operation::List(ops));
        }
    }
}

/// State moved onto the paint thread.
struct PaintWorker<S, R> {
    queue: Arc<OperationQueue>,
    stopped: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
    drawing: S,
    standby: S,
    receiver: R,
}

impl<S, R> PaintWorker<S, R>
where
    S: Surface,
    R: Receiver<S>,
{
    fn run(mut self) {
        info!("PaintLoop: Thread started");

        while !self.stopped.load(Ordering::Acquire) || !self.queue.is_empty() {
            let op = self.queue.pull();
            trace!("PaintLoop: Applying {}", op);

            if op.apply(&mut self.drawing) {
                self.receiver.update(&self.drawing);
                let published = self.frames.fetch_add(1, Ordering::AcqRel) + 1;
                debug!("PaintLoop: Published frame {}", published);
                std::mem::swap(&mut self.drawing, &mut self.standby);
            }
        }

        info!("PaintLoop: Thread stopped");
    }
}

/// Single-consumer execution loop over a double-buffered surface.
pub struct PaintLoop {
    handle: PaintHandle,
    stopped: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
    done_rx: mpsc::Receiver<()>,
    worker: Option<JoinHandle<()>>,
}

impl PaintLoop {
    /// Allocates the surface pair and spawns the paint thread.
    pub fn start<F, R>(factory: &F, receiver: R) -> Result<Self>
    where
        F: SurfaceFactory,
        R: Receiver<F::Surface> + 'static,
    {
        let drawing = factory
            .new_surface(CANVAS_SIZE)
            .context("Failed to allocate drawing surface")?;
        let standby = factory
            .new_surface(CANVAS_SIZE)
            .context("Failed to allocate standby surface")?;

        let queue = Arc::new(OperationQueue::new());
        let stopped = Arc::new(AtomicBool::new(false));
        let frames = Arc::new(AtomicU64::new(0));
        let (done_tx, done_rx) = mpsc::sync_channel(1);

        let worker = PaintWorker {
            queue: Arc::clone(&queue),
            stopped: Arc::clone(&stopped),
            frames: Arc::clone(&frames),
            drawing,
            standby,
            receiver,
        };

        let join = thread::Builder::new()
            .name("paint-loop".to_string())
            .spawn(move || {
                worker.run();
                // Dropped without sending if the worker unwinds.
                let _ = done_tx.send(());
            })
            .context("Failed to spawn paint thread")?;

        info!(
            "PaintLoop: Started with {}x{} surfaces",
            CANVAS_SIZE.width, CANVAS_SIZE.height
        );

        Ok(Self {
            handle: PaintHandle { queue },
            stopped,
            frames,
            done_rx,
            worker: Some(join),
        })
    }

    /// Enqueues `op`. Safe from any thread, also after stop was requested.
    pub fn post(&self, op: Operation) {
        self.handle.post(op);
    }

    /// Enqueues a batch as one atomic `List`.
    pub fn post_all(&self, ops: Vec<Operation>) {
        self.handle.post_all(ops);
    }

    pub fn handle(&self) -> PaintHandle {
        self.handle.clone()
    }

    /// Number of frames handed to the receiver so far.
    pub fn frames_published(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Operations posted but not yet pulled by the paint thread.
    pub fn pending(&self) -> usize {
        self.handle.queue.len()
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Requests shutdown and blocks until every queued operation has run.
    ///
    /// A panic on the paint thread is resumed on the caller.
    pub fn stop_and_wait(&mut self) {
        if let Err(payload) = self.shutdown() {
            std::panic::resume_unwind(payload);
        }
    }

    fn shutdown(&mut self) -> thread::Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        info!("PaintLoop: Stop requested, draining {} ops", self.pending());

        let stopped = Arc::clone(&self.stopped);
        self.post(Operation::task(move |_| {
            stopped.store(true, Ordering::Release);
        }));
        // The worker may observe this before the sentinel runs; the flag
        // only gates loop exit, and the sentinel keeps the queue non-empty.
        self.stopped.store(true, Ordering::Release);

        if self.done_rx.recv().is_err() {
            error!("PaintLoop: Paint thread exited without completing");
        }
        worker.join()
    }
}

impl Drop for PaintLoop {
    fn drop(&mut self) {
        if self.worker.is_some() {
            if let Err(e) = self.shutdown() {
                error!("PaintLoop: Paint thread panicked: {:?}", e);
            }
        }
    }
}

impl std::fmt::Debug for PaintLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintLoop")
            .field("running", &self.is_running())
            .field("pending", &self.pending())
            .field("frames_published", &self.frames_published())
            .finish()
    }
}
