//! Musical sync-rate and grid-step tables.

/// Note length used when the LFO period is derived from host tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncRate {
    Sync1_128,
    Sync1_64,
    Sync1_32,
    Sync1_16,
    Sync1_8,
    Sync1_4,
    Sync1_2,
    #[default]
    Sync1_1,
    Sync2_1,
    Sync4_1,
    Sync8_1,
    Sync16_1,
    Sync32_1,
    Sync64_1,
    Sync128_1,
}

impl SyncRate {
    pub fn all() -> &'static [SyncRate] {
        &[
            SyncRate::Sync1_128,
            SyncRate::Sync1_64,
            SyncRate::Sync1_32,
            SyncRate::Sync1_16,
            SyncRate::Sync1_8,
            SyncRate::Sync1_4,
            SyncRate::Sync1_2,
            SyncRate::Sync1_1,
            SyncRate::Sync2_1,
            SyncRate::Sync4_1,
            SyncRate::Sync8_1,
            SyncRate::Sync16_1,
            SyncRate::Sync32_1,
            SyncRate::Sync64_1,
            SyncRate::Sync128_1,
        ]
    }

    /// Note-length ratio relative to a whole note.
    #[inline]
    pub fn ratio(&self) -> f32 {
        match self {
            SyncRate::Sync1_128 => 1.0 / 128.0,
            SyncRate::Sync1_64 => 1.0 / 64.0,
            SyncRate::Sync1_32 => 1.0 / 32.0,
            SyncRate::Sync1_16 => 1.0 / 16.0,
            SyncRate::Sync1_8 => 1.0 / 8.0,
            SyncRate::Sync1_4 => 1.0 / 4.0,
            SyncRate::Sync1_2 => 1.0 / 2.0,
            SyncRate::Sync1_1 => 1.0,
            SyncRate::Sync2_1 => 2.0,
            SyncRate::Sync4_1 => 4.0,
            SyncRate::Sync8_1 => 8.0,
            SyncRate::Sync16_1 => 16.0,
            SyncRate::Sync32_1 => 32.0,
            SyncRate::Sync64_1 => 64.0,
            SyncRate::Sync128_1 => 128.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SyncRate::Sync1_128 => "1/128",
            SyncRate::Sync1_64 => "1/64",
            SyncRate::Sync1_32 => "1/32",
            SyncRate::Sync1_16 => "1/16",
            SyncRate::Sync1_8 => "1/8",
            SyncRate::Sync1_4 => "1/4",
            SyncRate::Sync1_2 => "1/2",
            SyncRate::Sync1_1 => "1/1",
            SyncRate::Sync2_1 => "2/1",
            SyncRate::Sync4_1 => "4/1",
            SyncRate::Sync8_1 => "8/1",
            SyncRate::Sync16_1 => "16/1",
            SyncRate::Sync32_1 => "32/1",
            SyncRate::Sync64_1 => "64/1",
            SyncRate::Sync128_1 => "128/1",
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

/// Modifier applied on top of the base note length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncRateType {
    #[default]
    Normal,
    Dotted,
    Triplet,
}

impl SyncRateType {
    pub fn all() -> &'static [SyncRateType] {
        &[
            SyncRateType::Normal,
            SyncRateType::Dotted,
            SyncRateType::Triplet,
        ]
    }

    #[inline]
    pub fn modifier(&self) -> f32 {
        match self {
            SyncRateType::Normal => 1.0,
            SyncRateType::Dotted => 1.5,
            SyncRateType::Triplet => 2.0 / 3.0,
        }
    }

    #[inline]
    pub fn from_port_value(value: f32) -> Self {
        let all = Self::all();
        let idx = (value.round().max(0.0) as usize).min(all.len() - 1);
        all[idx]
    }
}

/// Combined ratio for a note length and its modifier.
#[inline]
pub fn sync_ratio(rate: SyncRate, rate_type: SyncRateType) -> f32 {
    rate.ratio() * rate_type.modifier()
}

/// Grid resolution for step mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStep {
    #[default]
    Full,
    Half,
    Fourth,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl GridStep {
    pub fn all() -> &'static [GridStep] {
        &[
            GridStep::Full,
            GridStep::Half,
            GridStep::Fourth,
            GridStep::Eighth,
            GridStep::Sixteenth,
            GridStep::ThirtySecond,
        ]
    }

    /// Number the period is divided by, e.g. Half -> 2.
    #[inline]
    pub fn divisor(&self) -> u64 {
        match self {
            GridStep::Full => 1,
            GridStep::Half => 2,
            GridStep::Fourth => 4,
            GridStep::Eighth => 8,
            GridStep::Sixteenth => 16,
            GridStep::ThirtySecond => 32,
        }
    }

    #[inline]
    pub fn from_port_value(value: f32) -> Self {
        let all = Self::all();
        let idx = (value.round().max(0.0) as usize).min(all.len() - 1);
        all[idx]
    }
}
