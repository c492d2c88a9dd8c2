//! Builders for the handful of messages the device originates itself.

use super::{
    ALL_NOTES_OFF, CHANNEL_MASK, CONTROL_CHANGE, DATA_MASK, MIDI_CHANNEL_COUNT, NOTE_OFF, NOTE_ON,
};
use crate::io::ByteSink;

/// Builds a Note On message. Out-of-range bits in any argument are discarded.
pub const fn encode_note_on(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [
        NOTE_ON | (channel & CHANNEL_MASK),
        note & DATA_MASK,
        velocity & DATA_MASK,
    ]
}

/// Builds a Note Off message. Out-of-range bits in any argument are discarded.
pub const fn encode_note_off(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [
        NOTE_OFF | (channel & CHANNEL_MASK),
        note & DATA_MASK,
        velocity & DATA_MASK,
    ]
}

/// Builds the "All Notes Off" channel mode message for a single channel.
pub const fn encode_all_notes_off(channel: u8) -> [u8; 3] {
    [CONTROL_CHANGE | (channel & CHANNEL_MASK), ALL_NOTES_OFF, 0]
}

/// Builds "All Notes Off" for every channel, in ascending channel order.
pub fn encode_all_notes_off_broadcast() -> [[u8; 3]; MIDI_CHANNEL_COUNT as usize] {
    core::array::from_fn(|channel| encode_all_notes_off(channel as u8))
}

/// Writes a Note On message to `sink`.
pub fn send_note_on<K: ByteSink + ?Sized>(sink: &mut K, channel: u8, note: u8, velocity: u8) {
    sink.write(&encode_note_on(channel, note, velocity));
}

/// Writes a Note Off message to `sink`.
pub fn send_note_off<K: ByteSink + ?Sized>(sink: &mut K, channel: u8, note: u8, velocity: u8) {
    sink.write(&encode_note_off(channel, note, velocity));
}

/// Writes "All Notes Off" for a single channel to `sink`.
pub fn send_all_notes_off<K: ByteSink + ?Sized>(sink: &mut K, channel: u8) {
    sink.write(&encode_all_notes_off(channel));
}

/// Writes "All Notes Off" for all sixteen channels to `sink`.
///
/// Useful at startup (or whenever forwarding changes) to silence anything downstream that may have been left hanging.
pub fn send_all_notes_off_broadcast<K: ByteSink + ?Sized>(sink: &mut K) {
    for message in encode_all_notes_off_broadcast() {
        sink.write(&message);
    }
}
