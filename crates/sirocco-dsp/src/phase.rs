//! Phase and period computation.
//!
//! The LFO tracks an integer sample index inside a period. The period length
//! and the precomputed per-sample multipliers are recomputed only when the
//! frequency, sync settings, run mode or host transport change.

use std::f32::consts::TAU;

use sirocco_core::TransportState;

/// Lowest usable frequency in Hz. Guards every division below.
pub const MIN_FREQ: f32 = 0.01;
/// Default frequency in Hz.
pub const DEF_FREQ: f32 = 1.0;
/// Highest frequency exposed on the port.
pub const MAX_FREQ: f32 = 60.0;

/// Precomputed cycle state. Cheap to copy, recomputed as a unit so a worker
/// thread can produce it and the audio thread can apply it transactionally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseState {
    /// Samples per LFO cycle. Always >= 1.
    pub period_size: u64,
    /// Current sample index within the period, in `[0, period_size)`.
    pub current_sample: u64,
    /// Radians per sample; `sin(sample * sine_multiplier)` gives the sine.
    pub sine_multiplier: f32,
    /// Cycle fraction per sample.
    pub saw_multiplier: f32,
}

/// Frequency actually used for the cycle.
///
/// Free-running mode uses the raw port frequency. Synced mode derives the
/// frequency from host tempo, unless the host has not sent time info yet
/// (beat unit 0), in which case the raw frequency is the fallback.
#[inline]
pub fn effective_frequency(
    freerunning: bool,
    freq_hz: f32,
    transport: &TransportState,
    sync_ratio: f32,
) -> f32 {
    if freerunning || !transport.beat_unit_known() {
        if !freerunning {
            tracing::warn!("host did not send time info; beat unit is unknown");
        }
        freq_hz.max(MIN_FREQ)
    } else {
        let freq =
            transport.bpm / (60.0 * transport.beat_unit as f32 * sync_ratio.max(f32::EPSILON));
        freq.max(MIN_FREQ)
    }
}

/// Recompute the full phase state.
///
/// Pure: identical inputs produce identical output, so re-running it is safe
/// and a deferred (worker-computed) result can replace an inline one.
pub fn recalc_phase(
    freerunning: bool,
    freq_hz: f32,
    transport: &TransportState,
    sync_ratio: f32,
    sample_rate: f32,
) -> PhaseState {
    let synced = !freerunning && transport.beat_unit_known();
    let freq = effective_frequency(freerunning, freq_hz, transport, sync_ratio);

    let period_size = if synced {
        let frames_per_beat = transport.frames_per_beat(sample_rate);
        (frames_per_beat * transport.beat_unit as f32 * sync_ratio) as u64
    } else {
        (sample_rate / freq) as u64
    }
    .max(1);

    // Synced mode locks the cycle to the global frame; otherwise restart.
    let current_sample = if synced {
        transport.frame.rem_euclid(period_size as i64) as u64
    } else {
        0
    };

    PhaseState {
        period_size,
        current_sample,
        sine_multiplier: (freq / sample_rate) * TAU,
        saw_multiplier: freq / sample_rate,
    }
}

/// Reflect the sample index about the period when horizontally inverted, then
/// shift by up to half a period in either direction (0.5 = no shift). The
/// result is wrapped back into `[0, period)`.
#[inline]
pub fn invert_and_shift(sample: u64, period: u64, hinvert: bool, shift: f32) -> u64 {
    let period = period.max(1) as i64;
    let mut x = (sample as i64) % period;

    if hinvert {
        x = period - x;
        while x >= period {
            x -= period;
        }
    }

    let half_period = period as f32 / 2.0;
    if shift >= 0.5 {
        x += (((shift - 0.5) * 2.0) * half_period) as i64;
        x %= period;
    } else {
        x -= (((0.5 - shift) * 2.0) * half_period) as i64;
        while x < 0 {
            x += period;
        }
    }

    x as u64
}
