//! Seams between the parser and the serial hardware.
//!
//! The parser never touches a UART directly. Instead it polls a [`ByteSource`] (the MIDI IN side) and writes whatever
//! it decides not to consume to a [`ByteSink`] (the MIDI OUT side). Neither trait is allowed to block: a source reports
//! how many bytes it can hand over right now, and a sink accepts bytes on a fire-and-forget basis.

use tinyvec::{Array, ArrayVec};

/// A non-blocking supplier of raw MIDI bytes, typically the receive buffer of a serial port.
pub trait ByteSource {
    /// Returns the number of bytes that can be read without waiting.
    fn bytes_available(&self) -> usize;

    /// Takes the next byte from the source, or `None` if nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;
}

/// A fire-and-forget consumer of raw MIDI bytes, typically the transmit side of a serial port.
///
/// Implementations are responsible for their own backpressure; bytes that cannot be delivered may be dropped.
pub trait ByteSink {
    /// Writes `bytes` in order.
    fn write(&mut self, bytes: &[u8]);
}

/// Reads from the front of the slice, shrinking it as bytes are consumed.
impl ByteSource for &[u8] {
    fn bytes_available(&self) -> usize {
        self.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let (&first, rest) = self.split_first()?;
        *self = rest;
        Some(first)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn bytes_available(&self) -> usize {
        (**self).bytes_available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}

/// Appends until full; anything past capacity is dropped.
impl<A: Array<Item = u8>> ByteSink for ArrayVec<A> {
    fn write(&mut self, bytes: &[u8]) {
        let room = self.capacity() - self.len();
        self.extend_from_slice(&bytes[..bytes.len().min(room)]);
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write(&mut self, bytes: &[u8]) {
        (**self).write(bytes)
    }
}

/// A [`ByteSink`] that swallows everything written to it, for devices without a MIDI OUT port.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Discard;

impl ByteSink for Discard {
    fn write(&mut self, _bytes: &[u8]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyvec::array_vec;

    #[test]
    fn slice_source_drains_from_front() {
        let data = [0x90, 60, 100];
        let mut source: &[u8] = &data;
        assert_eq!(3, source.bytes_available());
        assert_eq!(Some(0x90), source.read_byte());
        assert_eq!(Some(60), source.read_byte());
        assert_eq!(1, source.bytes_available());
        assert_eq!(Some(100), source.read_byte());
        assert_eq!(0, source.bytes_available());
        assert_eq!(None, source.read_byte(), "Exhausted source should yield nothing");
    }

    #[test]
    fn array_vec_sink_drops_overflow() {
        let mut sink: ArrayVec<[u8; 4]> = array_vec!();
        sink.write(&[1, 2, 3]);
        sink.write(&[4, 5, 6]);
        assert_eq!(&[1, 2, 3, 4], sink.as_slice(), "Expected left but got right");

        // further writes are silently ignored
        sink.write(&[7]);
        assert_eq!(4, sink.len());
    }

    #[test]
    fn borrowed_sink_writes_through() {
        fn clock(mut sink: impl ByteSink) {
            sink.write(&[0xF8]);
        }

        let mut sink: ArrayVec<[u8; 8]> = array_vec!();
        clock(&mut sink);
        clock(&mut sink);
        assert_eq!(&[0xF8, 0xF8], sink.as_slice());
    }
}
