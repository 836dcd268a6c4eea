//! Host transport snapshot.
//!
//! The host delivers position updates as structured messages; the core keeps
//! the latest snapshot and treats it as read-only for the rest of the block.

use serde::{Deserialize, Serialize};

/// Block-stable snapshot of the host transport.
///
/// A `beat_unit` of zero means the host has not sent time info yet; consumers
/// that would divide by it must fall back to free-running behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    /// Tempo in beats per minute.
    pub bpm: f32,
    /// Current global frame.
    pub frame: i64,
    /// Transport speed (0.0 stopped, 1.0 normal playback, negative reverse).
    pub speed: f32,
    /// Beat unit denominator of the time signature. 0 = unknown.
    pub beat_unit: u32,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            frame: 0,
            speed: 0.0,
            beat_unit: 0,
        }
    }
}

impl TransportState {
    #[inline]
    pub fn beat_unit_known(&self) -> bool {
        self.beat_unit != 0
    }

    /// Whether the transport is moving forward.
    #[inline]
    pub fn is_rolling(&self) -> bool {
        self.speed > 1e-5
    }

    /// Frames per beat at the given sample rate.
    #[inline]
    pub fn frames_per_beat(&self, sample_rate: f32) -> f32 {
        60.0 / self.bpm * sample_rate
    }
}
