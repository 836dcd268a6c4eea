//! Off-audio-thread recompute queue.
//!
//! The audio thread submits jobs without blocking; the host's worker thread
//! drains them, computes, and publishes results; the audio thread applies the
//! results at the start of a later block. Both directions are bounded
//! lock-free channels, so the real-time side never allocates or waits.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

use crate::error::{Error, Result};

const DEFAULT_CAPACITY: usize = 16;

/// Bounded job/result queue between the audio thread and a worker.
///
/// Clone freely; all clones share the same channels.
#[derive(Debug, Clone)]
pub struct WorkerQueue<J, R> {
    job_tx: Sender<J>,
    job_rx: Receiver<J>,
    result_tx: Sender<R>,
    result_rx: Receiver<R>,
}

impl<J, R> WorkerQueue<J, R> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (job_tx, job_rx) = bounded(capacity);
        let (result_tx, result_rx) = bounded(capacity);
        Self {
            job_tx,
            job_rx,
            result_tx,
            result_rx,
        }
    }

    /// Submit a job from the audio thread. Never blocks.
    #[inline]
    pub fn submit(&self, job: J) -> Result<()> {
        self.job_tx.try_send(job).map_err(|e| {
            if e.is_full() {
                Error::WorkerQueueFull
            } else {
                Error::WorkerQueueClosed
            }
        })
    }

    /// Take the next pending job on the worker thread.
    #[inline]
    pub fn next_job(&self) -> Option<J> {
        match self.job_rx.try_recv() {
            Ok(job) => Some(job),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Publish a finished result from the worker thread.
    #[inline]
    pub fn publish(&self, result: R) -> Result<()> {
        self.result_tx.try_send(result).map_err(|e| {
            if e.is_full() {
                Error::WorkerQueueFull
            } else {
                Error::WorkerQueueClosed
            }
        })
    }

    /// Drain finished results on the audio thread, applying each in order.
    /// Returns how many results were applied.
    #[inline]
    pub fn apply_results(&self, mut apply: impl FnMut(R)) -> usize {
        let mut count = 0;
        while let Ok(result) = self.result_rx.try_recv() {
            apply(result);
            count += 1;
        }
        count
    }

    pub fn pending_jobs(&self) -> usize {
        self.job_rx.len()
    }
}

impl<J, R> Default for WorkerQueue<J, R> {
    fn default() -> Self {
        Self::new()
    }
}
