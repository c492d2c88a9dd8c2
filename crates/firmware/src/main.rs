//! Floppy DDS is [Embassy](https://embassy.dev)-based firmware for a MIDI device that sits in-line on a DIN MIDI cable.
//! The firmware runs on the [Nucleo-F767ZI development board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html),
//! which is powered by an F7-series STM32 microcontroller.
//!
//! Bytes arriving at MIDI IN are handed to a running-status parser which reconstructs Note On and Note Off events for
//! the instrument (an array of floppy drives). Everything else is swallowed or passed through to MIDI OUT, according
//! to the [`PassThrough`] setting selected with the user button.
//!
//! Pinout:
//! - MIDI IN: USART2 RX on PD6
//! - MIDI OUT: USART2 TX on PD5
//! - User button (PC13): cycles the pass-through setting
//! - Blue LED (PB7): lit while pass-through is enabled
//! - Green LED (PB0): lit while any note is held

#![no_std]
#![no_main]

mod midi_io;
mod pass_through;

use crate::{
    midi_io::{MIDI_BAUD_RATE, MIDI_IN, MidiIn, MidiOut, midi_in_task},
    pass_through::{PASS_THROUGH_SYNC, PassThroughReceiver, pass_through_config},
};
use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_stm32::{
    Config, bind_interrupts,
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
    peripherals,
    time::Hertz,
    usart::{self, Uart},
};
use embassy_time::{Duration, Ticker};
use floppy_dds_lib::{
    configuration::PassThrough,
    held_notes::HeldNotes,
    midi::{RunningStatusParser, send_all_notes_off_broadcast},
};
use static_cell::StaticCell;

#[cfg(feature = "defmt-rtt")]
use defmt_rtt as _;
#[cfg(not(feature = "panic-probe"))]
use panic_halt as _;
#[cfg(feature = "panic-probe")]
use panic_probe as _;

bind_interrupts!(
    #[doc(hidden)]
    struct Irqs {
        USART2 => usart::InterruptHandler<peripherals::USART2>;
    }
);

/// How often the MIDI task drains MIDI IN. At 31.25 kbaud, about three bytes arrive per millisecond.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing Floppy DDS");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop, crucial for dividing clock
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            divq: None,
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        // USART2 hangs off APB1, which tops out at 54MHz
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
    }
    let p = embassy_stm32::init(config);

    let mut uart_config = usart::Config::default();
    uart_config.baudrate = MIDI_BAUD_RATE;

    // DMA: direct memory access controller; per RM0410, USART2 RX is on stream 5 and TX on stream 6 of DMA1
    let uart = unwrap!(Uart::new(
        p.USART2,
        p.PD6,
        p.PD5,
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH5,
        uart_config
    ));
    let (tx, rx) = uart.split();

    static RX_DMA_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
    let rx = rx.into_ring_buffered(RX_DMA_BUFFER.init([0; 256]));
    unwrap!(spawner.spawn(midi_in_task(rx, MIDI_IN.sender())));

    let button = ExtiInput::new(p.PC13, p.EXTI13, Pull::None);
    let blue_led = Output::new(p.PB7, Level::Low, Speed::Low);
    unwrap!(spawner.spawn(pass_through_config(
        button,
        blue_led,
        PASS_THROUGH_SYNC.sender()
    )));

    let green_led = Output::new(p.PB0, Level::Low, Speed::Low);
    let pass_through = PASS_THROUGH_SYNC
        .receiver()
        .expect("Pass-through synchronizer should have a receiver available");
    unwrap!(spawner.spawn(midi_task(
        MidiIn(MIDI_IN.receiver()),
        MidiOut(tx),
        green_led,
        pass_through
    )));
}

/// Task responsible for turning MIDI IN into note events and keeping MIDI OUT fed.
///
/// Each tick drains whatever has been received since the last one. When the pass-through setting changes, the parser
/// starts over and All Notes Off is broadcast so nothing downstream is left hanging by a half-forwarded message.
#[embassy_executor::task]
async fn midi_task(
    mut midi_in: MidiIn,
    mut midi_out: MidiOut,
    mut note_led: Output<'static>,
    mut pass_through: PassThroughReceiver<'static>,
) -> ! {
    let mut parser = RunningStatusParser::new(PassThrough::default().forwarding());
    let mut held_notes = HeldNotes::new();

    send_all_notes_off_broadcast(&mut midi_out);
    info!("Listening on MIDI IN");

    let mut ticker = Ticker::every(POLL_INTERVAL);
    loop {
        match select(ticker.next(), pass_through.changed()).await {
            Either::First(_) => {
                for (event, record) in parser.events(&mut midi_in, &mut midi_out) {
                    held_notes.apply(event, &record);
                    info!(
                        "{}: {} on a {} key",
                        event,
                        record,
                        if record.is_white_key() { "white" } else { "black" }
                    );
                }

                if held_notes.is_empty() {
                    note_led.set_low();
                } else {
                    note_led.set_high();
                }
            }
            Either::Second(config) => {
                parser.set_forwarding(config.forwarding());
                parser.reset();
                held_notes.clear();
                note_led.set_low();
                send_all_notes_off_broadcast(&mut midi_out);
            }
        }
    }
}
