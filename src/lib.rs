//! Sirocco: a tempo-synced LFO and a diatonic chord expander, built as
//! host-agnostic plugin engines.
//!
//! The umbrella crate re-exports the subsystem crates:
//! - [`core`] — transport, MIDI events, parameter specs, worker queue.
//! - [`dsp`] — phase/waveform engine, sync tables, custom curve.
//! - [`chord`] — scale math and chord expansion.
//! - [`plugin`] — port tables, event writer, the two plugin shells.

pub use sirocco_chord as chord;
pub use sirocco_core as core;
pub use sirocco_dsp as dsp;
pub use sirocco_plugin as plugin;

pub use sirocco_plugin::{ChordPlugin, HostFeature, HostFeatures, LfoPlugin, Plugin};
