use super::{CHANNEL_MASK, DATA_MASK, is_white_key};
use wmidi::{Channel, MidiMessage, Note, U7, Velocity};

const CHANNELS: [Channel; super::MIDI_CHANNEL_COUNT as usize] = [
    Channel::Ch1,
    Channel::Ch2,
    Channel::Ch3,
    Channel::Ch4,
    Channel::Ch5,
    Channel::Ch6,
    Channel::Ch7,
    Channel::Ch8,
    Channel::Ch9,
    Channel::Ch10,
    Channel::Ch11,
    Channel::Ch12,
    Channel::Ch13,
    Channel::Ch14,
    Channel::Ch15,
    Channel::Ch16,
];

/// The kind of note message (if any) produced by a call to [`RunningStatusParser::poll()`](super::RunningStatusParser::poll).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoteEvent {
    /// No complete message was assembled.
    #[default]
    None,
    /// A key was struck.
    NoteOn,
    /// A key was released. Note On messages with zero velocity are reported as this variant.
    NoteOff,
}

impl NoteEvent {
    /// Returns true for any value other than [`NoteEvent::None`].
    pub fn is_some(&self) -> bool {
        *self != Self::None
    }
}

/// The payload of a Note On or Note Off message.
///
/// Values are kept as raw bytes, as received: the channel occupies the low nibble and note and velocity the low
/// seven bits. The accessors convert into [`wmidi`] types for callers that prefer them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoteRecord {
    /// Zero-based MIDI channel, `0..=15`.
    pub channel: u8,
    /// MIDI note number, `0..=127`.
    pub note: u8,
    /// Strike or release velocity, `0..=127`.
    pub velocity: u8,
}

impl NoteRecord {
    /// Constructs a [`NoteRecord`], discarding any bits outside the valid range of each field.
    pub const fn new(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            channel: channel & CHANNEL_MASK,
            note: note & DATA_MASK,
            velocity: velocity & DATA_MASK,
        }
    }

    /// Returns the record's channel as a [`Channel`].
    pub fn channel(&self) -> Channel {
        CHANNELS[usize::from(self.channel & CHANNEL_MASK)]
    }

    /// Returns the record's note as a [`Note`].
    pub fn note(&self) -> Note {
        Note::from(U7::from_u8_lossy(self.note))
    }

    /// Returns the record's velocity as a [`Velocity`].
    pub fn velocity(&self) -> Velocity {
        U7::from_u8_lossy(self.velocity)
    }

    /// Whether the note falls on a white key of a piano keyboard.
    pub fn is_white_key(&self) -> bool {
        is_white_key(self.note)
    }

    /// Pairs the record with an event to produce the equivalent [`MidiMessage`].
    ///
    /// Returns `None` for [`NoteEvent::None`], since there's no message to speak of.
    pub fn to_midi_message(&self, event: NoteEvent) -> Option<MidiMessage<'static>> {
        let (channel, note, velocity) = (self.channel(), self.note(), self.velocity());
        match event {
            NoteEvent::None => None,
            NoteEvent::NoteOn => Some(MidiMessage::NoteOn(channel, note, velocity)),
            NoteEvent::NoteOff => Some(MidiMessage::NoteOff(channel, note, velocity)),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NoteRecord {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "NoteRecord {{ channel: {}, note: {} ({}), velocity: {} }}",
            self.channel,
            self.note().to_str(),
            self.note,
            self.velocity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_masks_out_of_range_bits() {
        assert_eq!(
            NoteRecord {
                channel: 0x0F,
                note: 72,
                velocity: 0x7F,
            },
            NoteRecord::new(0x1F, 200, 0xFF),
            "Expected left but got right"
        );
    }

    #[test]
    fn wmidi_accessors() {
        let record = NoteRecord::new(9, 60, 100);
        assert_eq!(Channel::Ch10, record.channel());
        assert_eq!(Note::C4, record.note());
        assert_eq!(100, u8::from(record.velocity()));
    }

    #[test]
    fn is_some() {
        assert!(!NoteEvent::None.is_some(), "None should not be some");
        assert!(NoteEvent::NoteOn.is_some());
        assert!(NoteEvent::NoteOff.is_some());
    }

    mod to_midi_message {
        use super::*;

        #[test]
        fn note_on() {
            let record = NoteRecord::new(0, 64, 90);
            assert_eq!(
                Some(MidiMessage::NoteOn(
                    Channel::Ch1,
                    Note::E4,
                    U7::from_u8_lossy(90)
                )),
                record.to_midi_message(NoteEvent::NoteOn),
                "Expected left but got right"
            );
        }

        #[test]
        fn note_off() {
            let record = NoteRecord::new(15, 67, 0);
            assert_eq!(
                Some(MidiMessage::NoteOff(
                    Channel::Ch16,
                    Note::G4,
                    U7::from_u8_lossy(0)
                )),
                record.to_midi_message(NoteEvent::NoteOff),
                "Expected left but got right"
            );
        }

        #[test]
        fn none() {
            assert_eq!(None, NoteRecord::default().to_midi_message(NoteEvent::None));
        }
    }
}
