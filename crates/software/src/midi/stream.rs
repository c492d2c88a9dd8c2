//! Provides [`RunningStatusParser`], which turns an undelimited stream of MIDI bytes (as it arrives over a DIN cable)
//! into Note On and Note Off events.
//!
//! # Running status
//!
//! A transmitter may omit the status byte of a channel message when it matches the previous one. The parser therefore
//! keeps the last Note On/Note Off status (and its channel) in effect after each completed message, so that a bare
//! pair of data bytes yields another event on the same channel. Any other channel message or System Common message
//! clears running status. System Real-Time messages may appear anywhere, even between the data bytes of another
//! message, and leave running status untouched.
//!
//! # Pass-through
//!
//! Bytes that are not part of a note message are either swallowed or written to a [`ByteSink`] (MIDI OUT) depending on
//! the parser's [`Forwarding`] configuration. Note messages themselves are always consumed.
//!
//! Malformed input never produces an error. Unexpected bytes fall through to whichever branch applies, and a partially
//! assembled message is silently abandoned when a new status byte arrives.

use super::{
    CHANNEL_MASK, CHANNEL_PRESSURE, CONTROL_CHANGE, KEY_PRESSURE, NOTE_OFF, NOTE_ON, NoteEvent,
    NoteRecord, PITCH_BEND, PROGRAM_CHANGE, STATUS_BIT, STATUS_MASK, SYSEX_END, SYSEX_START,
    SYSTEM,
};
use crate::io::{ByteSink, ByteSource};

/// Length of a Note On/Note Off message: status (channel), note and velocity.
const MESSAGE_LEN: usize = 3;

/// Selects which non-note traffic the parser passes through to MIDI OUT.
///
/// With both flags off (the default) the device is a strict note extractor that silently swallows everything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Forwarding {
    /// Forward channel messages other than notes, System Common and System Real-Time messages, along with their data.
    pub forward_non_note: bool,
    /// Forward System Exclusive start bytes and the data that follows them.
    pub forward_sysex: bool,
}

impl Forwarding {
    /// Swallow everything that isn't a note.
    pub const NONE: Self = Self {
        forward_non_note: false,
        forward_sysex: false,
    };

    /// Pass through everything that isn't a note.
    pub const ALL: Self = Self {
        forward_non_note: true,
        forward_sysex: true,
    };
}

/// A single-pass state machine extracting note events from a raw MIDI byte stream.
///
/// State persists across calls, so a message may be split across any number of calls to [`poll()`](Self::poll).
/// Each instance is independent; a device with several MIDI IN ports would keep one parser per port.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunningStatusParser {
    /// The running status in effect; [`NoteEvent::None`] whenever `byte_count` is zero.
    pending_event: NoteEvent,
    /// Channel, note and velocity, in order of arrival.
    buffer: [u8; MESSAGE_LEN],
    /// Number of valid bytes in `buffer`; always below [`MESSAGE_LEN`] between calls.
    byte_count: usize,
    /// Set by a SysEx start byte and cleared by any other System Common byte; channel messages leave it alone.
    in_sysex: bool,
    forwarding: Forwarding,
}

impl RunningStatusParser {
    /// Constructs a parser with no running status in effect.
    pub const fn new(forwarding: Forwarding) -> Self {
        Self {
            pending_event: NoteEvent::None,
            buffer: [0; MESSAGE_LEN],
            byte_count: 0,
            in_sysex: false,
            forwarding,
        }
    }

    /// Returns the current pass-through configuration.
    pub fn forwarding(&self) -> Forwarding {
        self.forwarding
    }

    /// Replaces the pass-through configuration. Takes effect with the next byte processed.
    pub fn set_forwarding(&mut self, forwarding: Forwarding) {
        self.forwarding = forwarding;
    }

    /// Forgets any running status, partial message and SysEx state. The pass-through configuration is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.forwarding);
    }

    /// Drains `source` until a note message completes or no more bytes are available.
    ///
    /// On completion, the message is copied into `record` and its kind is returned immediately; any bytes still
    /// buffered in `source` are left for the next call. If the source runs dry first, [`NoteEvent::None`] is returned
    /// and `record` is left untouched.
    ///
    /// Bytes not consumed as part of a note message may be written to `sink`, depending on [`Forwarding`].
    pub fn poll<S, K>(&mut self, source: &mut S, sink: &mut K, record: &mut NoteRecord) -> NoteEvent
    where
        S: ByteSource + ?Sized,
        K: ByteSink + ?Sized,
    {
        while source.bytes_available() > 0 {
            let Some(byte) = source.read_byte() else {
                break;
            };
            if let Some((event, completed)) = self.process_byte(byte, sink) {
                *record = completed;
                return event;
            }
        }
        NoteEvent::None
    }

    /// Returns an [`Iterator`] over the note events that can be assembled from the bytes currently in `source`.
    ///
    /// Each item corresponds to one successful call to [`poll()`](Self::poll); iteration ends when a call completes
    /// no message.
    pub fn events<'a, S, K>(&'a mut self, source: &'a mut S, sink: &'a mut K) -> Events<'a, S, K>
    where
        S: ByteSource + ?Sized,
        K: ByteSink + ?Sized,
    {
        Events {
            parser: self,
            source,
            sink,
        }
    }

    /// Classifies a single byte, updating state and forwarding it to `sink` if configured to.
    ///
    /// Returns the event and its payload when the byte completes a note message.
    pub fn process_byte<K>(&mut self, byte: u8, sink: &mut K) -> Option<(NoteEvent, NoteRecord)>
    where
        K: ByteSink + ?Sized,
    {
        if byte & STATUS_BIT != 0 {
            self.process_status(byte, sink);
            return None;
        }

        // byte count is zero when running status was cleared, which makes this the payload of some other message
        if self.byte_count == 0 {
            let forward = if self.in_sysex {
                self.forwarding.forward_sysex
            } else {
                self.forwarding.forward_non_note
            };
            forward_if(forward, byte, sink);
            return None;
        }

        self.buffer[self.byte_count] = byte;
        self.byte_count += 1;

        (self.byte_count == MESSAGE_LEN).then(|| self.complete())
    }

    fn process_status<K>(&mut self, status: u8, sink: &mut K)
    where
        K: ByteSink + ?Sized,
    {
        match status & STATUS_MASK {
            NOTE_OFF => self.begin(NoteEvent::NoteOff, status),
            NOTE_ON => self.begin(NoteEvent::NoteOn, status),
            KEY_PRESSURE | CONTROL_CHANGE | PROGRAM_CHANGE | CHANNEL_PRESSURE | PITCH_BEND => {
                self.clear_running_status(status);
                forward_if(self.forwarding.forward_non_note, status, sink);
            }
            SYSTEM if status <= SYSEX_END => {
                // System Common, SysEx included
                self.clear_running_status(status);
                self.in_sysex = status == SYSEX_START;
                let forward = if self.in_sysex {
                    self.forwarding.forward_sysex
                } else {
                    self.forwarding.forward_non_note
                };
                forward_if(forward, status, sink);
            }
            SYSTEM => {
                // System Real-Time may interrupt anything, so running status is left alone
                forward_if(self.forwarding.forward_non_note, status, sink);
            }
            _ => {}
        }
    }

    fn begin(&mut self, event: NoteEvent, status: u8) {
        if self.byte_count > 1 {
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "Discarding partial message; {=u8:#x} arrived after {} bytes",
                status,
                self.byte_count
            );
        }
        self.pending_event = event;
        self.buffer[0] = status & CHANNEL_MASK;
        self.byte_count = 1;
    }

    fn clear_running_status(&mut self, _status: u8) {
        if self.pending_event.is_some() {
            #[cfg(feature = "defmt")]
            defmt::trace!("Running status cleared by {=u8:#x}", _status);
        }
        self.pending_event = NoteEvent::None;
        self.byte_count = 0;
    }

    fn complete(&mut self) -> (NoteEvent, NoteRecord) {
        let [channel, note, velocity] = self.buffer;
        let record = NoteRecord {
            channel,
            note,
            velocity,
        };

        // a Note On with zero velocity is a Note Off; only the reported event changes, running status stays Note On
        let event = match self.pending_event {
            NoteEvent::NoteOn if velocity == 0 => NoteEvent::NoteOff,
            event => event,
        };

        // keep the channel for running status
        self.byte_count = 1;

        #[cfg(feature = "defmt")]
        defmt::debug!("Assembled {}: {}", event, record);

        (event, record)
    }
}

fn forward_if<K: ByteSink + ?Sized>(enabled: bool, byte: u8, sink: &mut K) {
    if enabled {
        sink.write(&[byte]);
    }
}

/// Iterator returned by [`RunningStatusParser::events()`].
pub struct Events<'a, S: ?Sized, K: ?Sized> {
    parser: &'a mut RunningStatusParser,
    source: &'a mut S,
    sink: &'a mut K,
}

impl<S, K> Iterator for Events<'_, S, K>
where
    S: ByteSource + ?Sized,
    K: ByteSink + ?Sized,
{
    type Item = (NoteEvent, NoteRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = NoteRecord::default();
        match self.parser.poll(self.source, self.sink, &mut record) {
            NoteEvent::None => None,
            event => Some((event, record)),
        }
    }
}
