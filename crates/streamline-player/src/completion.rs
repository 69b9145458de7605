//! End-of-playback signalling between the audio callback and the control thread.
//!
//! The callback flips `running` once and posts a [`StopReason`] without blocking;
//! the control thread sleeps in [`Completion::wait`] until something is posted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

/// Why a playback session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The last frame of a non-looping buffer was delivered.
    EndOfStream,
    /// The controlling process asked playback to stop (for example Ctrl-C).
    Interrupted,
    /// The output device reported a stream error.
    StreamError,
}

/// Shared completion state for one playback session.
#[derive(Debug)]
pub struct Completion {
    running: AtomicBool,
    tx: Sender<StopReason>,
    rx: Receiver<StopReason>,
}

impl Completion {
    pub fn new() -> Arc<Self> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        Arc::new(Self {
            running: AtomicBool::new(true),
            tx,
            rx,
        })
    }

    /// `false` once the buffer has been played through (non-looping sessions only).
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Mark the buffer as played through and wake the control thread.
    ///
    /// Only the first call has any effect. Safe to call from the audio callback.
    pub(crate) fn finish(&self) -> bool {
        if !self.running.swap(false, Ordering::AcqRel) {
            return false;
        }
        let _ = self.tx.try_send(StopReason::EndOfStream);
        true
    }

    /// Ask the control thread to end the session.
    ///
    /// Never blocks. If a reason is already pending, this one is dropped.
    pub fn request_stop(&self, reason: StopReason) {
        let _ = self.tx.try_send(reason);
    }

    /// Block until a stop reason is posted.
    pub fn wait(&self) -> StopReason {
        match self.rx.recv() {
            Ok(reason) => reason,
            // Unreachable while `self` holds the sender.
            Err(_) => StopReason::EndOfStream,
        }
    }

    /// Like [`Completion::wait`], giving up after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<StopReason> {
        self.rx.recv_timeout(timeout).ok()
    }
}
