use crate::midi::Forwarding;
use num_derive::{FromPrimitive, ToPrimitive};

/// Determines which MIDI traffic, besides the notes the device consumes, is passed through to MIDI OUT.
///
/// Each variant is a combination of the two independent [`Forwarding`] flags. A pushbutton steps through them in
/// declaration order: nothing forwarded, non-note traffic only, SysEx only, then both.
#[derive(Debug, Default, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PassThrough {
    /// Strict note extractor: everything else is swallowed.
    #[default]
    Notes,
    /// Channel messages other than notes, System Common and System Real-Time are forwarded; SysEx is swallowed.
    NonNote,
    /// SysEx is forwarded; everything else is swallowed.
    SysEx,
    /// Everything but the notes themselves is forwarded.
    All,
}

impl PassThrough {
    /// Returns the parser configuration corresponding to this setting.
    pub fn forwarding(&self) -> Forwarding {
        match self {
            Self::Notes => Forwarding::NONE,
            Self::NonNote => Forwarding {
                forward_non_note: true,
                forward_sysex: false,
            },
            Self::SysEx => Forwarding {
                forward_non_note: false,
                forward_sysex: true,
            },
            Self::All => Forwarding::ALL,
        }
    }

    /// Returns true for any value other than [`PassThrough::Notes`].
    pub fn is_enabled(&self) -> bool {
        *self != Self::Notes
    }
}

impl super::CycleConfig for PassThrough {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::CycleConfig;

    #[test]
    fn default_is_strict() {
        assert_eq!(Forwarding::default(), PassThrough::default().forwarding());
        assert!(!PassThrough::default().is_enabled(), "Should be disabled");
    }

    #[test]
    fn flags() {
        let non_note = PassThrough::NonNote.forwarding();
        assert!(non_note.forward_non_note && !non_note.forward_sysex);

        let sysex = PassThrough::SysEx.forwarding();
        assert!(!sysex.forward_non_note && sysex.forward_sysex);

        assert_eq!(Forwarding::ALL, PassThrough::All.forwarding());
    }

    #[test]
    fn cycles_through_every_variant() {
        let mut config = PassThrough::Notes;
        let mut seen = [false; 4];
        for _ in 0..4 {
            seen[config as usize] = true;
            config = config.cycle();
        }
        assert!(seen.iter().all(|&s| s), "Every variant should be visited");
        assert_eq!(PassThrough::Notes, config, "Should wrap around to first variant");
    }
}
