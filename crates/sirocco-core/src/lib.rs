//! Shared plugin-core types: host transport snapshots, parameter specs with
//! host-tolerant clamping, raw 3-byte MIDI events, and the off-audio-thread
//! worker queue. Everything here is ABI-agnostic; the host binding shells in
//! `sirocco-plugin` translate to and from the actual wire format.

mod error;
pub use error::{Error, Result};

mod event;
pub use event::{RawMidiEvent, CC_ALL_NOTES_OFF, STATUS_CONTROLLER, STATUS_NOTE_OFF, STATUS_NOTE_ON};

mod parameter;
pub use parameter::{ParameterScale, ParameterSpec, TOGGLE_THRESHOLD};

mod transport;
pub use transport::TransportState;

mod worker;
pub use worker::WorkerQueue;
