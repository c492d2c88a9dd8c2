//! Wire-level MIDI 1.0 handling for a device sitting in-line on a MIDI cable.
//!
//! The centerpiece is [`RunningStatusParser`], which pulls raw bytes from a MIDI IN port, reassembles Note On and
//! Note Off messages (honoring running status), and decides which of the remaining bytes are passed through to MIDI
//! OUT. The rest of the module consists of small stateless helpers for building outgoing messages and classifying
//! notes.

mod encode;
pub use encode::*;

mod keys;
pub use keys::*;

mod note;
pub use note::*;

mod stream;
pub use stream::*;

/// Number of channels addressable by a single MIDI port.
pub const MIDI_CHANNEL_COUNT: u8 = 16;

/// Controller number of the "All Notes Off" channel mode message.
pub const ALL_NOTES_OFF: u8 = 123;

const STATUS_BIT: u8 = 0x80;
const STATUS_MASK: u8 = 0xF0;
const CHANNEL_MASK: u8 = 0x0F;
const DATA_MASK: u8 = 0x7F;

// status nibbles
const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const KEY_PRESSURE: u8 = 0xA0;
const CONTROL_CHANGE: u8 = 0xB0;
const PROGRAM_CHANGE: u8 = 0xC0;
const CHANNEL_PRESSURE: u8 = 0xD0;
const PITCH_BEND: u8 = 0xE0;
const SYSTEM: u8 = 0xF0;

const SYSEX_START: u8 = 0xF0;
/// Highest System Common status; everything above is System Real-Time.
const SYSEX_END: u8 = 0xF7;
