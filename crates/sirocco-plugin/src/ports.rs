//! Data-driven control port tables.
//!
//! Each plugin describes its control ports as a static [`ParameterSpec`]
//! slice; [`PortValues`] holds the current raw values and answers typed,
//! clamped reads. Hosts address ports by index (stable, table order) or by
//! symbol.

use sirocco_core::ParameterSpec;

use crate::error::InstantiateError;

/// Current values of one plugin's control ports.
#[derive(Debug)]
pub struct PortValues {
    table: &'static [ParameterSpec],
    values: Vec<f32>,
}

impl PortValues {
    /// Allocate values at their defaults. Validates the whole table once so
    /// a bad entry fails instantiation instead of surfacing mid-block.
    pub fn new(table: &'static [ParameterSpec]) -> Result<Self, InstantiateError> {
        for spec in table {
            spec.validate()
                .map_err(|_| InstantiateError::InvalidPortTable {
                    symbol: spec.symbol,
                })?;
        }
        Ok(Self {
            table,
            values: table.iter().map(|spec| spec.default).collect(),
        })
    }

    #[inline]
    pub fn table(&self) -> &'static [ParameterSpec] {
        self.table
    }

    pub fn find(&self, symbol: &str) -> Option<usize> {
        self.table.iter().position(|spec| spec.symbol == symbol)
    }

    /// Store a raw host value, clamped per its table entry. Out-of-table indices
    /// are ignored (the host connected a port we do not have).
    pub fn set(&mut self, index: usize, raw: f32) {
        match self.table.get(index) {
            Some(spec) => self.values[index] = spec.clamp(raw),
            None => tracing::warn!(index, "ignoring write to unknown port"),
        }
    }

    /// Store by symbol; returns false for unknown symbols.
    pub fn set_by_symbol(&mut self, symbol: &str, raw: f32) -> bool {
        match self.find(symbol) {
            Some(index) => {
                self.set(index, raw);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.values[index]
    }

    #[inline]
    pub fn toggle(&self, index: usize) -> bool {
        self.table[index].as_toggle(self.values[index])
    }

    /// Enum-port read: rounded, clamped index.
    #[inline]
    pub fn index(&self, index: usize) -> usize {
        self.table[index].as_index(self.values[index])
    }

    /// Reset every port to its declared default.
    pub fn reset(&mut self) {
        for (value, spec) in self.values.iter_mut().zip(self.table) {
            *value = spec.default;
        }
    }
}

/// LFO control ports. Scalar ports first, then 16 node triples.
pub mod lfo_ports {
    use sirocco_core::ParameterSpec;
    use sirocco_dsp::{DEF_FREQ, MAX_FREQ, MIN_FREQ};

    pub const GATE: usize = 0;
    pub const TRIGGER: usize = 1;
    pub const GATED_MODE: usize = 2;
    pub const FREERUN: usize = 3;
    pub const FREQ: usize = 4;
    pub const SHIFT: usize = 5;
    pub const RANGE_MIN: usize = 6;
    pub const RANGE_MAX: usize = 7;
    pub const STEP_MODE: usize = 8;
    pub const GRID_STEP: usize = 9;
    pub const SYNC_RATE: usize = 10;
    pub const SYNC_RATE_TYPE: usize = 11;
    pub const HINVERT: usize = 12;
    pub const VINVERT: usize = 13;
    pub const SINE_ON: usize = 14;
    pub const SAW_ON: usize = 15;
    pub const TRIANGLE_ON: usize = 16;
    pub const SQUARE_ON: usize = 17;
    pub const CUSTOM_ON: usize = 18;
    pub const NUM_NODES: usize = 19;

    /// First node port; nodes follow as (pos, val, curve) triples.
    pub const NODES_START: usize = 20;
    pub const FIELDS_PER_NODE: usize = 3;
    pub const NODE_COUNT: usize = 16;

    macro_rules! node_triples {
        ($($n:literal),+ $(,)?) => {
            [
                ParameterSpec::toggle("gate", "Gate", false),
                ParameterSpec::toggle("trigger", "Trigger", false),
                ParameterSpec::toggle("gated_mode", "Gated mode", false),
                ParameterSpec::toggle("freerun", "Free running", false),
                ParameterSpec::linear("freq", "Frequency", DEF_FREQ, MIN_FREQ, MAX_FREQ),
                ParameterSpec::linear("shift", "Phase shift", 0.5, 0.0, 1.0),
                ParameterSpec::linear("range_min", "Range minimum", -1.0, -1.0, 1.0),
                ParameterSpec::linear("range_max", "Range maximum", 1.0, -1.0, 1.0),
                ParameterSpec::toggle("step_mode", "Step mode", false),
                ParameterSpec::enumeration("grid_step", "Grid step", 0, 6),
                ParameterSpec::enumeration("sync_rate", "Sync rate", 7, 15),
                ParameterSpec::enumeration("sync_rate_type", "Sync rate type", 0, 3),
                ParameterSpec::toggle("hinvert", "Horizontal invert", false),
                ParameterSpec::toggle("vinvert", "Vertical invert", false),
                ParameterSpec::toggle("sine_on", "Sine on", true),
                ParameterSpec::toggle("saw_on", "Saw on", false),
                ParameterSpec::toggle("triangle_on", "Triangle on", false),
                ParameterSpec::toggle("square_on", "Square on", false),
                ParameterSpec::toggle("custom_on", "Custom on", false),
                ParameterSpec::enumeration("num_nodes", "Node count", 2, 17),
                $(
                    ParameterSpec::linear(
                        concat!("node", $n, "_pos"),
                        concat!("Node ", $n, " position"),
                        0.0, 0.0, 1.0,
                    ),
                    ParameterSpec::linear(
                        concat!("node", $n, "_val"),
                        concat!("Node ", $n, " value"),
                        0.5, 0.0, 1.0,
                    ),
                    ParameterSpec::linear(
                        concat!("node", $n, "_curve"),
                        concat!("Node ", $n, " curve"),
                        0.0, 0.0, 1.0,
                    ),
                )+
            ]
        };
    }

    pub static TABLE: [ParameterSpec; NODES_START + NODE_COUNT * FIELDS_PER_NODE] =
        node_triples!(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16);
}

/// Chord expander control ports.
pub mod chord_ports {
    use sirocco_core::ParameterSpec;

    pub const SCALE: usize = 0;
    pub const MAJOR: usize = 1;
    pub const FIRST: usize = 2;
    pub const BASS: usize = 3;
    pub const THIRD: usize = 4;
    pub const FIFTH: usize = 5;
    pub const SEVENTH: usize = 6;
    pub const OCTAVE: usize = 7;
    pub const NINTH: usize = 8;
    pub const ELEVENTH: usize = 9;
    pub const THIRTEENTH: usize = 10;

    pub static TABLE: [ParameterSpec; 11] = [
        ParameterSpec::enumeration("scale", "Scale", 0, 12),
        ParameterSpec::toggle("major", "Major", true),
        ParameterSpec::linear("first", "First", 1.0, 0.0, 1.0),
        ParameterSpec::linear("bass", "Bass", 0.0, 0.0, 1.0),
        ParameterSpec::linear("third", "Third", 1.0, 0.0, 1.0),
        ParameterSpec::linear("fifth", "Fifth", 1.0, 0.0, 1.0),
        ParameterSpec::linear("seventh", "Seventh", 0.0, 0.0, 1.0),
        ParameterSpec::linear("octave", "Octave", 0.0, 0.0, 1.0),
        ParameterSpec::linear("ninth", "Ninth", 0.0, 0.0, 1.0),
        ParameterSpec::linear("eleventh", "Eleventh", 0.0, 0.0, 1.0),
        ParameterSpec::linear("thirteenth", "Thirteenth", 0.0, 0.0, 1.0),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_validate() {
        assert!(PortValues::new(&lfo_ports::TABLE).is_ok());
        assert!(PortValues::new(&chord_ports::TABLE).is_ok());
    }

    #[test]
    fn test_defaults_and_clamping() {
        let mut ports = PortValues::new(&lfo_ports::TABLE).unwrap();
        assert_eq!(ports.get(lfo_ports::FREQ), 1.0);
        assert!(ports.toggle(lfo_ports::SINE_ON));
        assert!(!ports.toggle(lfo_ports::SAW_ON));

        ports.set(lfo_ports::FREQ, 500.0);
        assert_eq!(ports.get(lfo_ports::FREQ), 60.0);

        ports.set(lfo_ports::SYNC_RATE, 99.0);
        assert_eq!(ports.index(lfo_ports::SYNC_RATE), 14);
    }

    #[test]
    fn test_symbol_lookup() {
        let mut ports = PortValues::new(&lfo_ports::TABLE).unwrap();
        assert!(ports.set_by_symbol("node3_pos", 0.25));
        let idx = lfo_ports::NODES_START + 2 * lfo_ports::FIELDS_PER_NODE;
        assert_eq!(ports.find("node3_pos"), Some(idx));
        assert_eq!(ports.get(idx), 0.25);
        assert!(!ports.set_by_symbol("no_such_port", 1.0));
    }

    #[test]
    fn test_node_table_layout() {
        let table = &lfo_ports::TABLE;
        assert_eq!(table.len(), 68);
        assert_eq!(table[lfo_ports::NODES_START].symbol, "node1_pos");
        assert_eq!(table[lfo_ports::NODES_START + 1].symbol, "node1_val");
        assert_eq!(table[table.len() - 1].symbol, "node16_curve");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut ports = PortValues::new(&chord_ports::TABLE).unwrap();
        ports.set(chord_ports::THIRD, 0.0);
        ports.reset();
        assert_eq!(ports.get(chord_ports::THIRD), 1.0);
    }

    #[test]
    fn test_symbols_are_unique() {
        for table in [&lfo_ports::TABLE[..], &chord_ports::TABLE[..]] {
            for (i, a) in table.iter().enumerate() {
                for b in &table[i + 1..] {
                    assert_ne!(a.symbol, b.symbol, "duplicate symbol {}", a.symbol);
                }
            }
        }
    }
}
