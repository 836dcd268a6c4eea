//! The chord expander plugin shell.

use sirocco_chord::{ChordEngine, ChordParams, ScaleFamily, ScaleRoot};
use sirocco_core::RawMidiEvent;

use crate::descriptor::{HostFeature, HostFeatures, Plugin};
use crate::error::InstantiateError;
use crate::ports::{chord_ports, PortValues};
use crate::writer::EventWriter;

#[derive(Debug)]
pub struct ChordPlugin {
    ports: PortValues,
    engine: ChordEngine,
}

/// One block's event I/O: input events in, expanded events out through the
/// bounded writer.
pub struct ChordBlockIo<'a, 'b> {
    pub input: &'a [RawMidiEvent],
    pub output: &'a mut EventWriter<'b>,
}

impl ChordPlugin {
    pub fn new(features: &HostFeatures) -> Result<Self, InstantiateError> {
        features.require(HostFeature::UridMap)?;
        Ok(Self {
            ports: PortValues::new(&chord_ports::TABLE)?,
            engine: ChordEngine::new(),
        })
    }

    pub fn ports(&self) -> &PortValues {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut PortValues {
        &mut self.ports
    }

    pub fn engine(&self) -> &ChordEngine {
        &self.engine
    }

    fn snapshot(&self) -> ChordParams {
        let p = &self.ports;
        ChordParams {
            root: ScaleRoot::from_port_value(p.get(chord_ports::SCALE)),
            family: if p.toggle(chord_ports::MAJOR) {
                ScaleFamily::Major
            } else {
                ScaleFamily::Minor
            },
            first: p.get(chord_ports::FIRST),
            bass: p.get(chord_ports::BASS),
            third: p.get(chord_ports::THIRD),
            fifth: p.get(chord_ports::FIFTH),
            seventh: p.get(chord_ports::SEVENTH),
            octave: p.get(chord_ports::OCTAVE),
            ninth: p.get(chord_ports::NINTH),
            eleventh: p.get(chord_ports::ELEVENTH),
            thirteenth: p.get(chord_ports::THIRTEENTH),
        }
    }
}

impl Plugin for ChordPlugin {
    type BlockIo<'a, 'b>
        = ChordBlockIo<'a, 'b>
    where
        'b: 'a;

    fn activate(&mut self) {}

    fn run(&mut self, io: ChordBlockIo<'_, '_>) {
        let params = self.snapshot();
        for event in io.input {
            for expanded in self.engine.process(&params, event) {
                if !io.output.write(expanded) {
                    tracing::debug!(
                        frame_offset = event.frame_offset,
                        "output buffer full, dropping event"
                    );
                }
            }
        }
    }

    /// Held notes do not survive deactivation; the host is expected to
    /// silence its downstream itself.
    fn deactivate(&mut self) {
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin() -> ChordPlugin {
        let features = HostFeatures::new().with(HostFeature::UridMap);
        ChordPlugin::new(&features).unwrap()
    }

    fn run_events(
        plugin: &mut ChordPlugin,
        input: &[RawMidiEvent],
        capacity_bytes: usize,
    ) -> Vec<RawMidiEvent> {
        let mut buf = [RawMidiEvent::new(0, [0; 3]); 32];
        let mut writer = EventWriter::new(&mut buf, capacity_bytes);
        plugin.run(ChordBlockIo {
            input,
            output: &mut writer,
        });
        writer.written().to_vec()
    }

    #[test]
    fn test_requires_urid_map() {
        assert_eq!(
            ChordPlugin::new(&HostFeatures::new()).unwrap_err(),
            InstantiateError::MissingFeature(HostFeature::UridMap)
        );
    }

    #[test]
    fn test_default_ports_give_major_triad() {
        let mut plugin = plugin();
        let out = run_events(&mut plugin, &[RawMidiEvent::note_on(0, 0, 60, 100)], 1024);
        let notes: Vec<u8> = out.iter().map(|e| e.note()).collect();
        assert_eq!(notes, vec![60, 64, 67]);
    }

    #[test]
    fn test_minor_scale_via_ports() {
        let mut plugin = plugin();
        plugin.ports_mut().set_by_symbol("major", 0.0);
        plugin.ports_mut().set_by_symbol("scale", 9.0); // A minor
        let out = run_events(&mut plugin, &[RawMidiEvent::note_on(0, 0, 60, 100)], 1024);
        let notes: Vec<u8> = out.iter().map(|e| e.note()).collect();
        // Degree 0 of A minor: A minor triad above the pressed octave.
        assert_eq!(notes, vec![69, 72, 76]);
    }

    #[test]
    fn test_note_off_releases_after_knob_change() {
        let mut plugin = plugin();
        plugin.ports_mut().set_by_symbol("seventh", 1.0);
        let on = run_events(&mut plugin, &[RawMidiEvent::note_on(0, 0, 60, 100)], 1024);
        assert_eq!(on.len(), 4);

        plugin.ports_mut().set_by_symbol("seventh", 0.0);
        let off = run_events(&mut plugin, &[RawMidiEvent::note_off(0, 0, 60, 0)], 1024);
        assert_eq!(off.len(), 4);
        assert!(off.iter().all(|e| e.is_note_off()));
    }

    #[test]
    fn test_capacity_limits_output() {
        let mut plugin = plugin();
        // Budget for two 24-byte events; the triad's fifth is dropped.
        let out = run_events(&mut plugin, &[RawMidiEvent::note_on(0, 0, 60, 100)], 48);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_deactivate_forgets_held_notes() {
        let mut plugin = plugin();
        run_events(&mut plugin, &[RawMidiEvent::note_on(0, 0, 60, 100)], 1024);
        assert_eq!(plugin.engine().active_notes(), 1);
        plugin.deactivate();
        assert_eq!(plugin.engine().active_notes(), 0);
    }
}
