//! Diatonic chord expansion: turns single white-key notes into full chords
//! voiced from a selected scale, one event in, up to nine events out.

mod expand;
pub use expand::{expand_note, ChordEngine, ChordEvents, ChordParams, MAX_CHORD_NOTES, MIN_MIX};

mod scale;
pub use scale::{
    degree_offset, interval_semitones, white_key_degree, ChordInterval, ScaleFamily, ScaleRoot,
};
