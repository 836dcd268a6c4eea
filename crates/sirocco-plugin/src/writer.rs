//! Bounded MIDI event sink.
//!
//! The host hands the output port a fixed byte capacity per block; events
//! that do not fit are dropped and counted, never written partially. Byte
//! accounting mirrors a sequence buffer: a 16-byte event header plus the
//! message body padded to 8 bytes.

use sirocco_core::RawMidiEvent;

const EVENT_HEADER_BYTES: usize = 16;

#[inline]
fn pad8(len: usize) -> usize {
    (len + 7) & !7
}

/// Bytes one event occupies in the output buffer.
#[inline]
pub fn event_bytes(event: &RawMidiEvent) -> usize {
    EVENT_HEADER_BYTES + pad8(event.len as usize)
}

/// Writes events into a caller-provided slice under a byte budget.
pub struct EventWriter<'a> {
    events: &'a mut [RawMidiEvent],
    capacity_bytes: usize,
    used_bytes: usize,
    len: usize,
    dropped: usize,
}

impl<'a> EventWriter<'a> {
    pub fn new(events: &'a mut [RawMidiEvent], capacity_bytes: usize) -> Self {
        Self {
            events,
            capacity_bytes,
            used_bytes: 0,
            len: 0,
            dropped: 0,
        }
    }

    /// Append one event. Returns false when the byte budget or the slice is
    /// exhausted; the event is dropped whole.
    pub fn write(&mut self, event: RawMidiEvent) -> bool {
        let bytes = event_bytes(&event);
        if self.used_bytes + bytes > self.capacity_bytes || self.len >= self.events.len() {
            self.dropped += 1;
            return false;
        }
        self.events[self.len] = event;
        self.len += 1;
        self.used_bytes += bytes;
        true
    }

    /// Events written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Events dropped for lack of space.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    #[inline]
    pub fn written(&self) -> &[RawMidiEvent] {
        &self.events[..self.len]
    }
}
