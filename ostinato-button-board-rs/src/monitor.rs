//! Per-line edge monitor loop.
//!
//! One [`monitor_line`] runs per bound [`ButtonLine`], waiting on the pin
//! hardware for edges and feeding them to the shared [`SelectEngine`].
//! Requires the `task` cargo feature for the `embassy-sync` mutex type.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::digital::Wait;

use ostinato::select_engine::{EdgeOutcome, SelectEngine};

use crate::line::ButtonLine;

/// Edge monitor loop for one bound line.
///
/// This is a regular `async fn` — **not** an Embassy `#[task]`. Callers
/// should create a thin, concrete task wrapper that calls this function,
/// since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task(pool_size = 2)]
/// async fn button_task(
///     line: ButtonLine<Input<'static>, Output<'static>>,
///     engine: &'static Mutex<CriticalSectionRawMutex, SelectEngine>,
/// ) {
///     monitor_line(line, engine).await;
/// }
/// ```
///
/// # Control flow
///
/// Per iteration:
/// 1. Wait for any edge — press and release both wake the loop.
/// 2. Read the level and translate it through the line's polarity.
/// 3. Lock the engine and record the edge; resolving the line and latching
///    the press happen under one lock acquisition, and a press arriving
///    mid-stream only latches — the in-flight transfer is untouched.
/// 4. Mirror the asserted state onto the indicator, outside the lock.
///    An edge on a line the registry no longer knows is logged and
///    otherwise ignored; the indicator is left alone.
///
/// The loop never blocks outside its edge wait and never exits on its own;
/// a line dies with its task. Pin faults are logged and the loop carries
/// on waiting for the next edge.
pub async fn monitor_line<I, O, M>(
    mut line: ButtonLine<I, O>,
    engine: &Mutex<M, SelectEngine>,
) -> !
where
    I: Wait + InputPin,
    O: OutputPin,
    M: RawMutex,
{
    #[cfg(feature = "defmt")]
    defmt::info!("monitoring button {} on pin {}", line.button, line.input_pin);

    loop {
        if line.input.wait_for_any_edge().await.is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("edge wait failed on pin {}", line.input_pin);
            continue;
        }

        let asserted = match line.input.is_high() {
            Ok(level_high) => line.polarity.is_asserted(level_high),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::error!("level read failed on pin {}", line.input_pin);
                continue;
            }
        };

        // Resolve + latch under one lock acquisition; released before any
        // pin I/O below.
        let outcome = { engine.lock().await.on_edge(line.id, asserted) };

        match outcome {
            EdgeOutcome::Latched { button: _button } => {
                #[cfg(feature = "defmt")]
                defmt::debug!("button {} pressed", _button);
            }
            EdgeOutcome::Released { .. } => {}
            EdgeOutcome::Ignored => {
                #[cfg(feature = "defmt")]
                defmt::warn!("edge on unbound line, pin {}", line.input_pin);
                continue;
            }
        }

        if line.mirror(asserted).is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("indicator write failed for button {}", line.button);
        }
    }
}
