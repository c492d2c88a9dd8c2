//! Binds the parser's byte seams to the MIDI DIN ports.
//!
//! MIDI IN is read by [`midi_in_task`] as fast as the UART delivers it and queued on [`MIDI_IN`], from which the MIDI task
//! drains it through [`MidiIn`] without ever waiting. MIDI OUT is written directly through [`MidiOut`].

use defmt::*;
use embassy_stm32::{
    mode::Async,
    usart::{RingBufferedUartRx, UartTx},
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use floppy_dds_lib::io::{ByteSink, ByteSource};

/// MIDI runs at 31.25 kbaud, 8N1.
pub const MIDI_BAUD_RATE: u32 = 31_250;

/// Roughly 100ms of back-to-back MIDI traffic.
const MIDI_IN_CAPACITY: usize = 256;

/// Bytes received on MIDI IN, waiting to be parsed.
pub static MIDI_IN: Channel<CriticalSectionRawMutex, u8, MIDI_IN_CAPACITY> = Channel::new();

type MidiInSender<'a> = Sender<'a, CriticalSectionRawMutex, u8, MIDI_IN_CAPACITY>;
type MidiInReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, u8, MIDI_IN_CAPACITY>;

/// Non-blocking [`ByteSource`] over the bytes queued on [`MIDI_IN`].
pub struct MidiIn(pub MidiInReceiver<'static>);

impl ByteSource for MidiIn {
    fn bytes_available(&self) -> usize {
        self.0.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.0.try_receive().ok()
    }
}

/// [`ByteSink`] writing to the MIDI OUT port. Errors are logged and the bytes dropped.
pub struct MidiOut(pub UartTx<'static, Async>);

impl ByteSink for MidiOut {
    fn write(&mut self, bytes: &[u8]) {
        if let Err(e) = self.0.blocking_write(bytes) {
            warn!("Dropped {} bytes bound for MIDI OUT: {}", bytes.len(), e);
        }
    }
}

/// Task responsible for moving bytes from the UART's DMA ring buffer onto [`MIDI_IN`].
#[embassy_executor::task]
pub async fn midi_in_task(mut rx: RingBufferedUartRx<'static>, midi_in: MidiInSender<'static>) -> ! {
    let mut buf = [0; 32];
    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    midi_in.send(byte).await;
                }
            }
            // overruns and framing errors lose bytes; the parser recovers at the next status byte
            Err(e) => warn!("MIDI IN error: {}", e),
        }
    }
}
