//! Tasks and types related to the [pass-through](`PassThrough`) configuration.

use defmt::info;
use embassy_stm32::{exti::ExtiInput, gpio::Output};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    watch::{Receiver, Sender, Watch},
};
use floppy_dds_lib::configuration::{CycleConfig, PassThrough};

const PASS_THROUGH_RECEIVER_CNT: usize = 1;
/// Syncs [pass-through](`PassThrough`) config across tasks.
pub static PASS_THROUGH_SYNC: Watch<CriticalSectionRawMutex, PassThrough, PASS_THROUGH_RECEIVER_CNT> =
    Watch::new_with(PassThrough::Notes);
pub type PassThroughSender<'a> =
    Sender<'a, CriticalSectionRawMutex, PassThrough, PASS_THROUGH_RECEIVER_CNT>;
pub type PassThroughReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, PassThrough, PASS_THROUGH_RECEIVER_CNT>;

/// Input and status indicator for the pass-through setting.
///
/// Each press of the button advances to the next [`PassThrough`] variant. The LED is lit whenever anything other than
/// notes is being passed through to MIDI OUT, and dark when the device is a strict note extractor.
#[embassy_executor::task]
pub async fn pass_through_config(
    mut button: ExtiInput<'static>,
    mut led: Output<'static>,
    pass_through: PassThroughSender<'static>,
) -> ! {
    loop {
        button.wait_for_rising_edge().await;

        let new_state = pass_through.try_get().unwrap_or_default().cycle();
        pass_through.send(new_state);
        info!("Pass-through set to {}", new_state);

        if new_state.is_enabled() {
            led.set_high();
        } else {
            led.set_low();
        }
    }
}
