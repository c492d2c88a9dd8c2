//! This crate contains architecture-agnostic logic for Floppy DDS, a device which sits in-line on a
//! [MIDI](https://midi.org/midi-1-0) cable, extracts Note On/Note Off events from the raw byte stream arriving at its
//! MIDI IN port to drive an array of floppy drives, and optionally passes the rest of the traffic through to its
//! MIDI OUT port.

#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

/// Non-blocking byte source and sink abstractions over the serial ports.
pub mod io;

pub mod midi;

pub mod held_notes;

pub mod configuration;
