//! Raw 3-byte MIDI events with sample-accurate timing.

/// Note-on status nibble.
pub const STATUS_NOTE_ON: u8 = 0x90;
/// Note-off status nibble.
pub const STATUS_NOTE_OFF: u8 = 0x80;
/// Control-change status nibble.
pub const STATUS_CONTROLLER: u8 = 0xB0;
/// "All notes off" controller number.
pub const CC_ALL_NOTES_OFF: u8 = 0x7B;

/// Raw 3-byte MIDI event tagged with its frame offset inside the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMidiEvent {
    /// Offset within the current buffer (0 = first sample).
    pub frame_offset: i64,
    pub data: [u8; 3],
    /// Valid bytes in `data` (1-3).
    pub len: u8,
}

impl RawMidiEvent {
    #[inline]
    pub fn new(frame_offset: i64, data: [u8; 3]) -> Self {
        Self {
            frame_offset,
            data,
            len: 3,
        }
    }

    #[inline]
    pub fn note_on(frame_offset: i64, channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(
            frame_offset,
            [STATUS_NOTE_ON | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        )
    }

    #[inline]
    pub fn note_off(frame_offset: i64, channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(
            frame_offset,
            [STATUS_NOTE_OFF | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        )
    }

    #[inline]
    pub fn control_change(frame_offset: i64, channel: u8, cc: u8, value: u8) -> Self {
        Self::new(
            frame_offset,
            [STATUS_CONTROLLER | (channel & 0x0F), cc & 0x7F, value & 0x7F],
        )
    }

    /// Status nibble without the channel.
    #[inline]
    pub fn status(&self) -> u8 {
        self.data[0] & 0xF0
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.data[0] & 0x0F
    }

    #[inline]
    pub fn note(&self) -> u8 {
        self.data[1]
    }

    #[inline]
    pub fn velocity(&self) -> u8 {
        self.data[2]
    }

    /// Note-on with a velocity of zero counts as note-off.
    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.status() == STATUS_NOTE_ON && self.velocity() > 0
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.status() == STATUS_NOTE_OFF
            || (self.status() == STATUS_NOTE_ON && self.velocity() == 0)
    }

    #[inline]
    pub fn is_note_message(&self) -> bool {
        matches!(self.status(), STATUS_NOTE_ON | STATUS_NOTE_OFF)
    }

    #[inline]
    pub fn is_all_notes_off(&self) -> bool {
        self.status() == STATUS_CONTROLLER && self.data[1] == CC_ALL_NOTES_OFF
    }
}
