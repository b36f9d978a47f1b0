// src/painter/queue.rs
//! Unbounded blocking FIFO feeding the paint loop.

use super::op::Operation;
use log::trace;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Multi-producer, single-consumer operation queue.
///
/// `push` never blocks beyond the internal lock. `pull` blocks while the
/// queue is empty; each push wakes at most one waiter.
#[derive(Debug, Default)]
pub struct OperationQueue {
    ops: Mutex<VecDeque<Operation>>,
    not_empty: Condvar,
}

impl OperationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // No user code runs under this lock, so a poisoned guard still holds a
    // consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Operation>> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `op` to the tail and wakes one blocked `pull`.
    pub fn push(&self, op: Operation) {
        let mut ops = self.lock();
        ops.push_back(op);
        trace!("OperationQueue: push (len={})", ops.len());
        drop(ops);
        self.not_empty.notify_one();
    }

    /// Removes and returns the head, blocking while the queue is empty.
    pub fn pull(&self) -> Operation {
        let mut ops = self.lock();
        loop {
            if let Some(op) = ops.pop_front() {
                return op;
            }
            trace!("OperationQueue: empty, waiting");
            ops = self
                .not_empty
                .wait(ops)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Snapshot; stale as soon as it returns if producers are active.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot; stale as soon as it returns if producers are active.
    pub fn len(&self) -> usize {
        self.lock().len()
    }
}
