//! The LFO plugin shell.
//!
//! Glues the port table, the control event stream and the worker queue to
//! the engine. All parameter and transport changes are picked up at block
//! start; nothing applies mid-block.

use sirocco_core::{TransportState, WorkerQueue};
use sirocco_dsp::{
    CurveNode, GridStep, LfoEngine, LfoInputs, LfoOutputs, LfoParams, NodeSet, PhaseState,
    SyncRate, SyncRateType, MAX_NODES,
};

use crate::descriptor::{HostFeature, HostFeatures, Plugin};
use crate::error::InstantiateError;
use crate::notify::{Notification, NotificationSender};
use crate::ports::{lfo_ports, PortValues};

/// Structured messages arriving on the control port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Host position update.
    Position(TransportState),
    /// A UI attached and wants state notifications.
    UiOn,
    UiOff,
}

/// Cycle recompute request for the worker thread.
#[derive(Debug, Clone)]
pub struct RecalcJob {
    params: LfoParams,
    transport: TransportState,
    sample_rate: f32,
}

#[derive(Debug)]
pub struct LfoPlugin {
    ports: PortValues,
    engine: LfoEngine,
    worker: Option<WorkerQueue<RecalcJob, PhaseState>>,
    notify: Option<NotificationSender>,
    ui_active: bool,
}

/// Everything one `run` call touches.
pub struct LfoBlockIo<'a> {
    pub events: &'a [ControlEvent],
    pub cv_gate: &'a [f32],
    pub cv_trigger: &'a [f32],
    pub sine: &'a mut [f32],
    pub saw: &'a mut [f32],
    pub triangle: &'a mut [f32],
    pub square: &'a mut [f32],
    pub custom: &'a mut [f32],
    /// Control-rate output mirroring the cycle position for generic hosts.
    pub sample_to_ui: &'a mut f32,
}

impl LfoPlugin {
    pub fn new(sample_rate: f64, features: &HostFeatures) -> Result<Self, InstantiateError> {
        features.require(HostFeature::UridMap)?;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(InstantiateError::InvalidSampleRate(sample_rate as f32));
        }

        // Recompute inline when the host offers no worker thread.
        let worker = features
            .has(HostFeature::WorkerSchedule)
            .then(WorkerQueue::new);

        Ok(Self {
            ports: PortValues::new(&lfo_ports::TABLE)?,
            engine: LfoEngine::new(sample_rate as f32),
            worker,
            notify: None,
            ui_active: false,
        })
    }

    /// Attach the UI notification channel.
    pub fn set_notifier(&mut self, notify: NotificationSender) {
        self.notify = Some(notify);
    }

    pub fn ports(&self) -> &PortValues {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut PortValues {
        &mut self.ports
    }

    pub fn engine(&self) -> &LfoEngine {
        &self.engine
    }

    /// Worker-thread entry point: drain pending recompute jobs. Returns how
    /// many jobs were completed.
    pub fn perform_work(&self) -> usize {
        let Some(queue) = &self.worker else {
            return 0;
        };
        let mut completed = 0;
        while let Some(job) = queue.next_job() {
            let phase = LfoEngine::compute_phase(&job.params, &job.transport, job.sample_rate);
            if queue.publish(phase).is_err() {
                break;
            }
            completed += 1;
        }
        completed
    }

    /// Build the block-stable parameter snapshot from the port values.
    fn snapshot(&self) -> LfoParams {
        let p = &self.ports;

        let num_nodes = p.index(lfo_ports::NUM_NODES).min(MAX_NODES);
        let mut nodes = [CurveNode::default(); MAX_NODES];
        for (i, node) in nodes.iter_mut().enumerate().take(num_nodes) {
            let base = lfo_ports::NODES_START + i * lfo_ports::FIELDS_PER_NODE;
            *node = CurveNode {
                pos: p.get(base),
                val: p.get(base + 1),
                curve: p.get(base + 2),
            };
        }

        LfoParams {
            freerunning: p.toggle(lfo_ports::FREERUN),
            freq: p.get(lfo_ports::FREQ),
            sync_rate: SyncRate::from_port_value(p.get(lfo_ports::SYNC_RATE)),
            sync_rate_type: SyncRateType::from_port_value(p.get(lfo_ports::SYNC_RATE_TYPE)),
            shift: p.get(lfo_ports::SHIFT),
            range_min: p.get(lfo_ports::RANGE_MIN),
            range_max: p.get(lfo_ports::RANGE_MAX),
            step_mode: p.toggle(lfo_ports::STEP_MODE),
            grid_step: GridStep::from_port_value(p.get(lfo_ports::GRID_STEP)),
            hinvert: p.toggle(lfo_ports::HINVERT),
            vinvert: p.toggle(lfo_ports::VINVERT),
            gated_mode: p.toggle(lfo_ports::GATED_MODE),
            gate: p.toggle(lfo_ports::GATE),
            trigger: p.toggle(lfo_ports::TRIGGER),
            sine_on: p.toggle(lfo_ports::SINE_ON),
            saw_on: p.toggle(lfo_ports::SAW_ON),
            triangle_on: p.toggle(lfo_ports::TRIANGLE_ON),
            square_on: p.toggle(lfo_ports::SQUARE_ON),
            custom_on: p.toggle(lfo_ports::CUSTOM_ON),
            nodes: NodeSet::new(&nodes[..num_nodes]),
        }
    }

    fn handle_event(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Position(transport) => {
                self.engine.set_transport(*transport);
                if self.ui_active {
                    self.send(Notification::Position(*transport));
                }
            }
            ControlEvent::UiOn => self.ui_active = true,
            ControlEvent::UiOff => self.ui_active = false,
        }
    }

    fn send(&self, notification: Notification) {
        if let Some(notify) = &self.notify {
            notify.send(notification);
        }
    }

    /// Refresh the cycle state if this snapshot made it stale. Routed
    /// through the worker when available; the result lands on a later
    /// block. A full queue falls back to the inline path so the cycle can
    /// never stay stale indefinitely.
    fn refresh_phase(&mut self, params: &LfoParams) {
        if let Some(queue) = &self.worker {
            queue.apply_results(|phase| self.engine.apply_phase(phase));
        }
        if !self.engine.needs_recalc(params) {
            return;
        }
        match &self.worker {
            Some(queue) => {
                let job = RecalcJob {
                    params: params.clone(),
                    transport: *self.engine.transport(),
                    sample_rate: self.engine.sample_rate(),
                };
                if queue.submit(job).is_err() {
                    tracing::debug!("worker queue full, recomputing inline");
                    self.engine.recalc(params);
                } else {
                    self.engine.mark_recalc_submitted(params);
                }
            }
            None => self.engine.recalc(params),
        }
    }
}

impl Plugin for LfoPlugin {
    type BlockIo<'a, 'b>
        = LfoBlockIo<'a>
    where
        'b: 'a;

    fn activate(&mut self) {
        let params = self.snapshot();
        self.engine.activate(&params);
        self.send(Notification::UiState(self.engine.ui_state()));
    }

    fn run(&mut self, io: LfoBlockIo<'_>) {
        for event in io.events {
            self.handle_event(event);
        }

        let params = self.snapshot();
        self.refresh_phase(&params);

        let inputs = LfoInputs {
            cv_gate: io.cv_gate,
            cv_trigger: io.cv_trigger,
        };
        let mut outputs = LfoOutputs {
            sine: io.sine,
            saw: io.saw,
            triangle: io.triangle,
            square: io.square,
            custom: io.custom,
        };
        self.engine.run(&params, &inputs, &mut outputs);

        *io.sample_to_ui = self.engine.phase().current_sample as f32;
        if self.ui_active {
            self.send(Notification::UiState(self.engine.ui_state()));
        }
    }

    fn deactivate(&mut self) {
        self.ui_active = false;
    }
}
