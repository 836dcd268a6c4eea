//! Host-facing shells for the Sirocco plugins.
//!
//! The shells bind port tables, control event streams and worker queues to
//! the engines in `sirocco-dsp` and `sirocco-chord`, while staying agnostic
//! of any particular plugin ABI. A binding layer owns the raw host buffers
//! and translates them into the `BlockIo` types here.

mod chord_plugin;
pub use chord_plugin::{ChordBlockIo, ChordPlugin};

mod descriptor;
pub use descriptor::{HostFeature, HostFeatures, Plugin};

mod error;
pub use error::InstantiateError;

mod lfo_plugin;
pub use lfo_plugin::{ControlEvent, LfoBlockIo, LfoPlugin, RecalcJob};

mod notify;
pub use notify::{notification_channel, Notification, NotificationSender};

mod ports;
pub use ports::{chord_ports, lfo_ports, PortValues};

mod writer;
pub use writer::{event_bytes, EventWriter};
