//! Scale tables and diatonic interval math.
//!
//! Everything works in semitone offsets relative to the scale root, driven by
//! the two step masks. Degrees are 0-based: degree 0 is the tonic.

/// Semitone membership of the major scale, tonic first.
const MAJOR_SCALE: [bool; 12] = [
    true, false, true, false, true, true, false, true, false, true, false, true,
];
/// Semitone membership of the natural minor scale.
const MINOR_SCALE: [bool; 12] = [
    true, false, true, true, false, true, false, true, true, false, true, false,
];

/// Root note of the scale, as a pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleRoot {
    #[default]
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl ScaleRoot {
    pub fn all() -> &'static [ScaleRoot] {
        &[
            ScaleRoot::C,
            ScaleRoot::CSharp,
            ScaleRoot::D,
            ScaleRoot::DSharp,
            ScaleRoot::E,
            ScaleRoot::F,
            ScaleRoot::FSharp,
            ScaleRoot::G,
            ScaleRoot::GSharp,
            ScaleRoot::A,
            ScaleRoot::ASharp,
            ScaleRoot::B,
        ]
    }

    /// Semitone offset from C.
    #[inline]
    pub fn semitones(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScaleRoot::C => "C",
            ScaleRoot::CSharp => "C#",
            ScaleRoot::D => "D",
            ScaleRoot::DSharp => "D#",
            ScaleRoot::E => "E",
            ScaleRoot::F => "F",
            ScaleRoot::FSharp => "F#",
            ScaleRoot::G => "G",
            ScaleRoot::GSharp => "G#",
            ScaleRoot::A => "A",
            ScaleRoot::ASharp => "A#",
            ScaleRoot::B => "B",
        }
    }

    /// Decode a raw enum-port value, clamping out-of-range indices.
    #[inline]
    pub fn from_port_value(value: f32) -> Self {
        let all = Self::all();
        let idx = (value.round().max(0.0) as usize).min(all.len() - 1);
        all[idx]
    }
}

/// Major or natural minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleFamily {
    #[default]
    Major,
    Minor,
}

impl ScaleFamily {
    #[inline]
    fn mask(&self) -> &'static [bool; 12] {
        match self {
            ScaleFamily::Major => &MAJOR_SCALE,
            ScaleFamily::Minor => &MINOR_SCALE,
        }
    }
}

/// Degree 0..6 of a white-key pitch class, or `None` for black keys.
/// Black keys are not harmonized.
#[inline]
pub fn white_key_degree(pitch_class: u8) -> Option<u8> {
    match pitch_class {
        0 => Some(0),  // C
        2 => Some(1),  // D
        4 => Some(2),  // E
        5 => Some(3),  // F
        7 => Some(4),  // G
        9 => Some(5),  // A
        11 => Some(6), // B
        _ => None,
    }
}

/// Semitone offset of the nth scale tone from the root, by counting scale
/// tones along the step mask.
#[inline]
pub fn degree_offset(family: ScaleFamily, degree: u8) -> i32 {
    let mask = family.mask();
    let mut count = -1i32;
    for (i, &in_scale) in mask.iter().enumerate() {
        if in_scale {
            count += 1;
        }
        if count == degree as i32 {
            return i as i32;
        }
    }
    0
}

/// Chord tones offered above (or below) the pressed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordInterval {
    Bass,
    Third,
    Fifth,
    Seventh,
    Octave,
    Ninth,
    Eleventh,
    Thirteenth,
}

/// Semitones from the chord base note to this chord tone, for a chord built
/// on the given scale degree.
pub fn interval_semitones(family: ScaleFamily, degree: u8, interval: ChordInterval) -> i32 {
    match interval {
        ChordInterval::Bass => -12,
        ChordInterval::Octave => 12,
        ChordInterval::Third => match family {
            ScaleFamily::Major => match degree {
                1 | 2 | 5 | 6 => 3,
                _ => 4,
            },
            ScaleFamily::Minor => match degree {
                0 | 1 | 3 | 4 => 3,
                _ => 4,
            },
        },
        ChordInterval::Fifth => match (family, degree) {
            (ScaleFamily::Major, 6) | (ScaleFamily::Minor, 1) => 6, // diminished
            _ => 7,
        },
        ChordInterval::Seventh => match family {
            ScaleFamily::Major => match degree {
                6 => 9, // diminished
                1 | 2 | 5 => 10,
                _ => 11,
            },
            ScaleFamily::Minor => match degree {
                1 => 9, // diminished
                0 | 3 | 4 => 10,
                _ => 11,
            },
        },
        // Extensions start above the octave and climb to the next scale tone.
        ChordInterval::Ninth => 12 + walk_to_scale_tone(family, degree, 1),
        ChordInterval::Eleventh => 12 + walk_to_scale_tone(family, degree, 5),
        ChordInterval::Thirteenth => 12 + walk_to_scale_tone(family, degree, 8),
    }
}

/// From `base` semitones above the chord root, advance one semitone at a
/// time until landing on a scale tone.
fn walk_to_scale_tone(family: ScaleFamily, degree: u8, base: i32) -> i32 {
    let mask = family.mask();
    let root_offset = degree_offset(family, degree);
    let mut add = base;
    while !mask[((root_offset + add) % 12) as usize] {
        add += 1;
    }
    add
}
