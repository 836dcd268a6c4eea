//! The Sirocco LFO core: a cycling phase counter whose period comes from a
//! free-running frequency or from host tempo plus a musical sync rate, five
//! simultaneous waveform outputs per sample, and a user-editable
//! piecewise-linear custom curve.
//!
//! Everything runs inside the host's block callback with bounded per-sample
//! cost; nothing here allocates or blocks.

mod curve;
pub use curve::{CurveNode, NodeSet, MAX_NODES, MIN_NODES};

mod lfo;
pub use lfo::{LfoEngine, LfoInputs, LfoOutputs, LfoParams, UiState};

mod phase;
pub use phase::{effective_frequency, invert_and_shift, recalc_phase, PhaseState};
pub use phase::{DEF_FREQ, MAX_FREQ, MIN_FREQ};

mod sync;
pub use sync::{sync_ratio, GridStep, SyncRate, SyncRateType};
