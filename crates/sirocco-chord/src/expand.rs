//! Chord expansion.
//!
//! Each incoming white-key note-on fans out into up to 9 chord-tone events.
//! `expand_note_on` is the pure half; [`ChordEngine`] adds release tracking
//! on top so a chord pressed under one mix setup still releases cleanly
//! after the knobs moved.

use smallvec::{smallvec, SmallVec};
use sirocco_core::RawMidiEvent;

use crate::scale::{
    degree_offset, interval_semitones, white_key_degree, ChordInterval, ScaleFamily, ScaleRoot,
};

/// Mix values at or below this suppress the chord tone entirely.
pub const MIN_MIX: f32 = 0.01;

/// Most events a single input event can expand into.
pub const MAX_CHORD_NOTES: usize = 9;

/// One output buffer's worth of expanded events.
pub type ChordEvents = SmallVec<[RawMidiEvent; MAX_CHORD_NOTES]>;

/// Scale selection plus the nine chord-tone mix knobs, 0..1 each.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordParams {
    pub root: ScaleRoot,
    pub family: ScaleFamily,
    pub first: f32,
    pub bass: f32,
    pub third: f32,
    pub fifth: f32,
    pub seventh: f32,
    pub octave: f32,
    pub ninth: f32,
    pub eleventh: f32,
    pub thirteenth: f32,
}

impl Default for ChordParams {
    /// A plain triad: first, third and fifth at full mix.
    fn default() -> Self {
        Self {
            root: ScaleRoot::default(),
            family: ScaleFamily::default(),
            first: 1.0,
            bass: 0.0,
            third: 1.0,
            fifth: 1.0,
            seventh: 0.0,
            octave: 0.0,
            ninth: 0.0,
            eleventh: 0.0,
            thirteenth: 0.0,
        }
    }
}

impl ChordParams {
    fn interval_mix(&self, interval: ChordInterval) -> f32 {
        match interval {
            ChordInterval::Bass => self.bass,
            ChordInterval::Third => self.third,
            ChordInterval::Fifth => self.fifth,
            ChordInterval::Seventh => self.seventh,
            ChordInterval::Octave => self.octave,
            ChordInterval::Ninth => self.ninth,
            ChordInterval::Eleventh => self.eleventh,
            ChordInterval::Thirteenth => self.thirteenth,
        }
    }
}

const INTERVAL_ORDER: [ChordInterval; 8] = [
    ChordInterval::Bass,
    ChordInterval::Third,
    ChordInterval::Fifth,
    ChordInterval::Seventh,
    ChordInterval::Octave,
    ChordInterval::Ninth,
    ChordInterval::Eleventh,
    ChordInterval::Thirteenth,
];

#[inline]
fn scaled_velocity(velocity: u8, mix: f32) -> u8 {
    (velocity as f32 * mix).round() as u8
}

/// Expand one note message into chord-tone events.
///
/// Black keys are not harmonized and expand to nothing. Chord tones that
/// would land outside the 0..=127 note range are dropped rather than
/// wrapped. The status byte of the input carries over unchanged, so the
/// same function serves note-ons and note-offs.
pub fn expand_note(params: &ChordParams, event: &RawMidiEvent) -> ChordEvents {
    let mut out = ChordEvents::new();

    let degree = match white_key_degree(event.note() % 12) {
        Some(d) => d,
        None => return out,
    };
    let octave = (event.note() / 12) as i32;
    let base = octave * 12 + params.root.semitones() + degree_offset(params.family, degree);

    let mut push = |note: i32, mix: f32| {
        if mix > MIN_MIX && (0..=127).contains(&note) {
            out.push(RawMidiEvent::new(
                event.frame_offset,
                [
                    event.data[0],
                    note as u8,
                    scaled_velocity(event.velocity(), mix),
                ],
            ));
        }
    };

    push(base, params.first);
    for interval in INTERVAL_ORDER {
        push(
            base + interval_semitones(params.family, degree, interval),
            params.interval_mix(interval),
        );
    }

    out
}

/// Notes turned on for one held input key.
type HeldNotes = SmallVec<[u8; MAX_CHORD_NOTES]>;

/// Stateful expander that remembers, per held input note, exactly which
/// chord tones were turned on, and releases those same tones on note-off
/// regardless of where the mix knobs sit by then.
#[derive(Debug)]
pub struct ChordEngine {
    active: [Option<HeldNotes>; 128],
}

impl Default for ChordEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordEngine {
    pub fn new() -> Self {
        Self {
            active: std::array::from_fn(|_| None),
        }
    }

    /// Number of input notes currently held.
    pub fn active_notes(&self) -> usize {
        self.active.iter().filter(|slot| slot.is_some()).count()
    }

    /// Forget all held notes, e.g. on deactivate.
    pub fn reset(&mut self) {
        for slot in self.active.iter_mut() {
            *slot = None;
        }
    }

    /// Process one input event and return the events to emit in its place.
    ///
    /// Non-note messages pass through unchanged, except "all notes off"
    /// which clears the held-note table and is swallowed. A note-on with
    /// velocity zero releases like a note-off.
    pub fn process(&mut self, params: &ChordParams, event: &RawMidiEvent) -> ChordEvents {
        if event.is_all_notes_off() {
            self.reset();
            return ChordEvents::new();
        }
        if !event.is_note_message() {
            return smallvec![*event];
        }

        if event.is_note_on() {
            let expanded = expand_note(params, event);
            self.active[event.note() as usize] =
                Some(expanded.iter().map(|ev| ev.note()).collect());
            return expanded;
        }

        // Release: replay the exact notes this key turned on, keeping the
        // incoming status and velocity bytes.
        match self.active[event.note() as usize].take() {
            Some(held) => held
                .iter()
                .map(|&note| {
                    RawMidiEvent::new(
                        event.frame_offset,
                        [event.data[0], note, event.data[2]],
                    )
                })
                .collect(),
            // Untracked release (held across activation): expand fresh.
            None => expand_note(params, event),
        }
    }
}
