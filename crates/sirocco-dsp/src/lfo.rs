//! Block-based LFO engine.
//!
//! One engine per plugin instance, driven by the audio thread only. Each
//! block it gets a fresh parameter snapshot, recomputes the cycle when
//! something relevant changed, and renders the five waveform outputs through
//! the shared invert/step/gate/range pipeline.

use serde::{Deserialize, Serialize};
use sirocco_core::TransportState;

use crate::curve::NodeSet;
use crate::phase::{invert_and_shift, recalc_phase, PhaseState, DEF_FREQ};
use crate::sync::{sync_ratio, GridStep, SyncRate, SyncRateType};

/// Frequency changes below this are ignored by change detection.
const FREQ_EPSILON: f32 = 1e-4;
/// CV gate level above which the gate is open.
const CV_GATE_THRESHOLD: f32 = 0.001;
/// CV trigger level above which the cycle restarts.
const CV_TRIGGER_THRESHOLD: f32 = 1e-5;
/// Triangle/square switch from the rising to the falling half.
const HALF_RATIO: f32 = 0.4999;

/// Block-stable snapshot of every control port.
#[derive(Debug, Clone, PartialEq)]
pub struct LfoParams {
    pub freerunning: bool,
    /// Free-running frequency in Hz.
    pub freq: f32,
    pub sync_rate: SyncRate,
    pub sync_rate_type: SyncRateType,
    /// Phase shift, 0..1 with 0.5 = none.
    pub shift: f32,
    pub range_min: f32,
    pub range_max: f32,
    pub step_mode: bool,
    pub grid_step: GridStep,
    pub hinvert: bool,
    pub vinvert: bool,
    pub gated_mode: bool,
    /// Control-port gate.
    pub gate: bool,
    /// Control-port trigger; restarts the cycle at the block edge.
    pub trigger: bool,
    pub sine_on: bool,
    pub saw_on: bool,
    pub triangle_on: bool,
    pub square_on: bool,
    pub custom_on: bool,
    pub nodes: NodeSet,
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            freerunning: false,
            freq: DEF_FREQ,
            sync_rate: SyncRate::default(),
            sync_rate_type: SyncRateType::default(),
            shift: 0.5,
            range_min: -1.0,
            range_max: 1.0,
            step_mode: false,
            grid_step: GridStep::default(),
            hinvert: false,
            vinvert: false,
            gated_mode: false,
            gate: false,
            trigger: false,
            sine_on: true,
            saw_on: false,
            triangle_on: false,
            square_on: false,
            custom_on: false,
            nodes: NodeSet::default(),
        }
    }
}

/// Per-sample CV inputs. Empty slices mean "not connected".
#[derive(Debug, Default, Clone, Copy)]
pub struct LfoInputs<'a> {
    pub cv_gate: &'a [f32],
    pub cv_trigger: &'a [f32],
}

/// The five output buffers. All must have the same length.
pub struct LfoOutputs<'a> {
    pub sine: &'a mut [f32],
    pub saw: &'a mut [f32],
    pub triangle: &'a mut [f32],
    pub square: &'a mut [f32],
    pub custom: &'a mut [f32],
}

/// Snapshot of the engine internals for the UI notification channel.
/// Observability only; audio output never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub current_sample: u64,
    pub period_size: u64,
    pub sample_rate: f32,
    pub sine_multiplier: f32,
    pub saw_multiplier: f32,
}

/// Cached inputs of the last recalc, for cheap change detection.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RecalcCache {
    freq: f32,
    sync_rate: SyncRate,
    sync_rate_type: SyncRateType,
    freerunning: bool,
}

impl RecalcCache {
    fn of(params: &LfoParams) -> Self {
        Self {
            freq: params.freq,
            sync_rate: params.sync_rate,
            sync_rate_type: params.sync_rate_type,
            freerunning: params.freerunning,
        }
    }
}

#[derive(Debug)]
pub struct LfoEngine {
    sample_rate: f32,
    transport: TransportState,
    transport_changed: bool,
    phase: PhaseState,
    cache: Option<RecalcCache>,
}

impl LfoEngine {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            transport: TransportState::default(),
            transport_changed: false,
            phase: recalc_phase(true, DEF_FREQ, &TransportState::default(), 1.0, sample_rate),
            cache: None,
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[inline]
    pub fn phase(&self) -> &PhaseState {
        &self.phase
    }

    #[inline]
    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    /// Store the latest host position update. Takes effect on the next
    /// recalc; parameter changes never apply mid-block.
    pub fn set_transport(&mut self, transport: TransportState) {
        self.transport = transport;
        self.transport_changed = true;
    }

    /// Called by the shell on plugin activation.
    pub fn activate(&mut self, params: &LfoParams) {
        self.recalc(params);
    }

    /// Whether the cycle state is stale against this parameter snapshot.
    pub fn needs_recalc(&self, params: &LfoParams) -> bool {
        if self.transport_changed {
            return true;
        }
        match &self.cache {
            None => true,
            Some(cache) => {
                (cache.freq - params.freq).abs() > FREQ_EPSILON
                    || cache.sync_rate != params.sync_rate
                    || cache.sync_rate_type != params.sync_rate_type
                    || cache.freerunning != params.freerunning
            }
        }
    }

    /// Pure cycle computation, usable from a worker thread.
    pub fn compute_phase(
        params: &LfoParams,
        transport: &TransportState,
        sample_rate: f32,
    ) -> PhaseState {
        let ratio = sync_ratio(params.sync_rate, params.sync_rate_type);
        recalc_phase(
            params.freerunning,
            params.freq,
            transport,
            ratio,
            sample_rate,
        )
    }

    /// Inline recalc path.
    pub fn recalc(&mut self, params: &LfoParams) {
        self.phase = Self::compute_phase(params, &self.transport, self.sample_rate);
        self.mark_recalc_submitted(params);
    }

    /// Commit the change-detection cache without touching the phase, for the
    /// deferred path where the result arrives from the worker later.
    pub fn mark_recalc_submitted(&mut self, params: &LfoParams) {
        self.cache = Some(RecalcCache::of(params));
        self.transport_changed = false;
    }

    /// Apply a worker-computed cycle state at a block edge.
    pub fn apply_phase(&mut self, phase: PhaseState) {
        self.phase = phase;
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            current_sample: self.phase.current_sample,
            period_size: self.phase.period_size,
            sample_rate: self.sample_rate,
            sine_multiplier: self.phase.sine_multiplier,
            saw_multiplier: self.phase.saw_multiplier,
        }
    }

    /// Render one block. Disabled waveforms write plain zeros; enabled ones
    /// go through invert, gating and range remapping. Gating zeroes the
    /// waveform before the range remap, like the original pipeline, so a
    /// closed gate lands on the middle of the output range.
    pub fn run(&mut self, params: &LfoParams, inputs: &LfoInputs, outputs: &mut LfoOutputs) {
        let n = outputs.sine.len();
        debug_assert!(
            outputs.saw.len() == n
                && outputs.triangle.len() == n
                && outputs.square.len() == n
                && outputs.custom.len() == n
        );

        let min_range = params.range_min.min(params.range_max);
        let max_range = params.range_min.max(params.range_max);
        let range = max_range - min_range;

        let step_frames = (self.phase.period_size / params.grid_step.divisor()).max(1);

        if params.trigger {
            self.phase.current_sample = 0;
        }

        let advancing = params.freerunning || self.transport.is_rolling();

        for i in 0..n {
            if cv_at(inputs.cv_trigger, i) > CV_TRIGGER_THRESHOLD {
                self.phase.current_sample = 0;
            }

            let mut shifted = invert_and_shift(
                self.phase.current_sample,
                self.phase.period_size,
                params.hinvert,
                params.shift,
            );

            if params.step_mode {
                // Snap to the middle of the closest grid division.
                shifted = (shifted / step_frames) * step_frames + step_frames / 2;
            }

            let ratio = shifted as f32 / self.phase.period_size as f32;

            let gate_open = !params.gated_mode
                || params.gate
                || cv_at(inputs.cv_gate, i) > CV_GATE_THRESHOLD;

            let finish = |raw: f32| -> f32 {
                let v = if params.vinvert { -raw } else { raw };
                let v = if gate_open { v } else { 0.0 };
                min_range + ((v + 1.0) / 2.0) * range
            };

            outputs.sine[i] = if params.sine_on {
                finish((shifted as f32 * self.phase.sine_multiplier).sin())
            } else {
                0.0
            };
            outputs.saw[i] = if params.saw_on {
                finish((1.0 - ratio) * 2.0 - 1.0)
            } else {
                0.0
            };
            outputs.triangle[i] = if params.triangle_on {
                finish(if ratio > HALF_RATIO {
                    (1.0 - ratio) * 4.0 - 1.0
                } else {
                    ratio * 4.0 - 1.0
                })
            } else {
                0.0
            };
            outputs.square[i] = if params.square_on {
                finish(if ratio > HALF_RATIO { -1.0 } else { 1.0 })
            } else {
                0.0
            };
            outputs.custom[i] = if params.custom_on {
                finish(params.nodes.value_at(ratio) * 2.0 - 1.0)
            } else {
                0.0
            };

            if advancing {
                self.phase.current_sample += 1;
            }
            if self.phase.current_sample >= self.phase.period_size {
                self.phase.current_sample = 0;
            }
        }
    }
}

#[inline]
fn cv_at(cv: &[f32], i: usize) -> f32 {
    cv.get(i).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveNode;
    use approx::assert_relative_eq;

    const SR: f32 = 100.0;

    fn freerun_params() -> LfoParams {
        LfoParams {
            freerunning: true,
            sine_on: true,
            saw_on: true,
            triangle_on: true,
            square_on: true,
            custom_on: true,
            ..Default::default()
        }
    }

    fn run_block(engine: &mut LfoEngine, params: &LfoParams, n: usize) -> [Vec<f32>; 5] {
        let mut sine = vec![0.0; n];
        let mut saw = vec![0.0; n];
        let mut triangle = vec![0.0; n];
        let mut square = vec![0.0; n];
        let mut custom = vec![0.0; n];
        if engine.needs_recalc(params) {
            engine.recalc(params);
        }
        engine.run(
            params,
            &LfoInputs::default(),
            &mut LfoOutputs {
                sine: &mut sine,
                saw: &mut saw,
                triangle: &mut triangle,
                square: &mut square,
                custom: &mut custom,
            },
        );
        [sine, saw, triangle, square, custom]
    }

    #[test]
    fn test_phase_wraps_modulo_period() {
        let mut engine = LfoEngine::new(SR);
        let params = freerun_params(); // 1 Hz at 100 Hz SR = period 100
        engine.activate(&params);
        assert_eq!(engine.phase().period_size, 100);

        // 3 blocks of 83 samples = 249 processed samples.
        for _ in 0..3 {
            run_block(&mut engine, &params, 83);
        }
        assert_eq!(engine.phase().current_sample, 249 % 100);
        assert!(engine.phase().current_sample < engine.phase().period_size);
    }

    #[test]
    fn test_waveform_symmetry() {
        let mut engine = LfoEngine::new(SR);
        let params = freerun_params();
        engine.activate(&params);
        let [sine, saw, triangle, square, _] = run_block(&mut engine, &params, 100);

        // Saw starts at +1 and falls toward -1.
        assert_relative_eq!(saw[0], 1.0);
        assert!(saw[99] < -0.9);

        // Square: +1 in the first half, -1 in the second.
        assert_relative_eq!(square[25], 1.0);
        assert_relative_eq!(square[75], -1.0);

        // Triangle crosses zero at the quarter points, rising then falling.
        assert_relative_eq!(triangle[25], 0.0, epsilon = 1e-5);
        assert!(triangle[26] > triangle[25]);
        assert_relative_eq!(triangle[75], 0.0, epsilon = 1e-5);
        assert!(triangle[76] < triangle[75]);

        // Sine peaks a quarter of the way through.
        assert_relative_eq!(sine[25], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_custom_waveform_follows_nodes() {
        let mut engine = LfoEngine::new(SR);
        let mut params = freerun_params();
        params.nodes = NodeSet::new(&[CurveNode::new(0.0, 1.0), CurveNode::new(1.0, 0.0)]);
        engine.activate(&params);
        let [_, _, _, _, custom] = run_block(&mut engine, &params, 100);

        // Node value 1.0 remaps to +1, midpoint 0.5 remaps to 0.
        assert_relative_eq!(custom[0], 1.0);
        assert_relative_eq!(custom[50], 0.0, epsilon = 0.05);
    }

    #[test]
    fn test_disabled_waveforms_stay_zero() {
        let mut engine = LfoEngine::new(SR);
        let params = LfoParams {
            freerunning: true,
            sine_on: true,
            // range that would push a remapped zero away from 0.0
            range_min: 0.2,
            range_max: 1.0,
            ..Default::default()
        };
        engine.activate(&params);
        let [sine, saw, ..] = run_block(&mut engine, &params, 64);
        assert!(saw.iter().all(|&v| v == 0.0));
        assert!(sine.iter().all(|&v| (0.2..=1.0).contains(&v)));
    }

    #[test]
    fn test_range_remap_handles_swapped_bounds() {
        let mut engine = LfoEngine::new(SR);
        let params = LfoParams {
            freerunning: true,
            square_on: true,
            sine_on: false,
            range_min: 1.0,
            range_max: 0.0,
            ..Default::default()
        };
        engine.activate(&params);
        let [_, _, _, square, _] = run_block(&mut engine, &params, 100);
        assert_relative_eq!(square[10], 1.0);
        assert_relative_eq!(square[90], 0.0);
    }

    #[test]
    fn test_gated_mode_without_gate_holds_range_middle() {
        let mut engine = LfoEngine::new(SR);
        let params = LfoParams {
            freerunning: true,
            square_on: true,
            gated_mode: true,
            gate: false,
            ..Default::default()
        };
        engine.activate(&params);
        let [_, _, _, square, _] = run_block(&mut engine, &params, 64);
        // Default range is -1..1, so the gated value sits at 0.
        assert!(square.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_control_gate_opens_gated_mode() {
        let mut engine = LfoEngine::new(SR);
        let params = LfoParams {
            freerunning: true,
            square_on: true,
            gated_mode: true,
            gate: true,
            sine_on: false,
            ..Default::default()
        };
        engine.activate(&params);
        let [_, _, _, square, _] = run_block(&mut engine, &params, 10);
        assert_relative_eq!(square[0], 1.0);
    }

    #[test]
    fn test_cv_trigger_restarts_cycle() {
        let mut engine = LfoEngine::new(SR);
        let params = freerun_params();
        engine.activate(&params);
        run_block(&mut engine, &params, 42);
        assert_eq!(engine.phase().current_sample, 42);

        let mut outs = [vec![0.0; 8], vec![0.0; 8], vec![0.0; 8], vec![0.0; 8], vec![0.0; 8]];
        let mut cv_trigger = vec![0.0; 8];
        cv_trigger[3] = 1.0;
        let [a, b, c, d, e] = &mut outs;
        engine.run(
            &params,
            &LfoInputs {
                cv_gate: &[],
                cv_trigger: &cv_trigger,
            },
            &mut LfoOutputs {
                sine: a,
                saw: b,
                triangle: c,
                square: d,
                custom: e,
            },
        );
        // Reset at sample 3, then advanced 5 more.
        assert_eq!(engine.phase().current_sample, 5);
    }

    #[test]
    fn test_block_trigger_restarts_cycle() {
        let mut engine = LfoEngine::new(SR);
        let mut params = freerun_params();
        engine.activate(&params);
        run_block(&mut engine, &params, 30);
        params.trigger = true;
        run_block(&mut engine, &params, 10);
        assert_eq!(engine.phase().current_sample, 10);
    }

    #[test]
    fn test_change_detection() {
        let mut engine = LfoEngine::new(SR);
        let mut params = freerun_params();
        engine.activate(&params);
        assert!(!engine.needs_recalc(&params));

        // Sub-epsilon jitter is ignored.
        params.freq += 1e-5;
        assert!(!engine.needs_recalc(&params));

        params.freq = 2.0;
        assert!(engine.needs_recalc(&params));
        engine.recalc(&params);
        assert!(!engine.needs_recalc(&params));

        params.sync_rate = SyncRate::Sync1_8;
        assert!(engine.needs_recalc(&params));
        engine.recalc(&params);

        params.freerunning = false;
        assert!(engine.needs_recalc(&params));
        engine.recalc(&params);

        engine.set_transport(TransportState {
            bpm: 140.0,
            frame: 0,
            speed: 1.0,
            beat_unit: 4,
        });
        assert!(engine.needs_recalc(&params));
    }

    #[test]
    fn test_synced_stopped_transport_does_not_advance() {
        let mut engine = LfoEngine::new(SR);
        let params = LfoParams::default(); // synced
        engine.set_transport(TransportState {
            bpm: 120.0,
            frame: 0,
            speed: 0.0,
            beat_unit: 4,
        });
        engine.recalc(&params);
        let before = engine.phase().current_sample;
        run_block(&mut engine, &params, 64);
        assert_eq!(engine.phase().current_sample, before);
    }

    #[test]
    fn test_step_mode_quantizes_to_grid_centers() {
        let mut engine = LfoEngine::new(SR);
        let params = LfoParams {
            freerunning: true,
            saw_on: true,
            sine_on: false,
            step_mode: true,
            grid_step: GridStep::Fourth,
            ..Default::default()
        };
        engine.activate(&params);
        let [_, saw, ..] = run_block(&mut engine, &params, 100);

        // Within one grid division every sample collapses to its center.
        assert!(saw[..24].windows(2).all(|w| w[0] == w[1]));
        assert_ne!(saw[10], saw[30]);

        // Only 4 distinct values over the whole period.
        let mut distinct: Vec<f32> = Vec::new();
        for &v in &saw {
            if !distinct.iter().any(|&d| (d - v).abs() < 1e-6) {
                distinct.push(v);
            }
        }
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn test_ui_state_reflects_engine() {
        let mut engine = LfoEngine::new(SR);
        let params = freerun_params();
        engine.activate(&params);
        run_block(&mut engine, &params, 7);
        let ui = engine.ui_state();
        assert_eq!(ui.current_sample, 7);
        assert_eq!(ui.period_size, 100);
        assert_eq!(ui.sample_rate, SR);
        assert_relative_eq!(ui.saw_multiplier, 1.0 / SR);
    }

    #[test]
    fn test_deferred_phase_application() {
        let mut engine = LfoEngine::new(SR);
        let mut params = freerun_params();
        engine.activate(&params);

        params.freq = 4.0;
        assert!(engine.needs_recalc(&params));

        // Deferred path: commit the cache now, apply the result later.
        let job_phase = LfoEngine::compute_phase(&params, engine.transport(), SR);
        engine.mark_recalc_submitted(&params);
        assert!(!engine.needs_recalc(&params));
        assert_eq!(engine.phase().period_size, 100); // still the old cycle

        engine.apply_phase(job_phase);
        assert_eq!(engine.phase().period_size, 25);
    }
}
