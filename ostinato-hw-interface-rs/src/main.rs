//! ostinato-hw-interface
//!
//! Button → SelectEngine → UART integration firmware for the Raspberry Pi
//! Pico 2. Wires the two library crates into a live control surface for a
//! software synthesizer:
//!
//! 1. A panel button is pressed.
//! 2. The line's monitor task wakes on the edge, latches the press on the
//!    shared `SelectEngine` mutex, and mirrors the level onto the button's
//!    LED.
//! 3. The drain task polls the engine, skips idle sentinels, and forwards
//!    command bytes ("select 0 1 0 0\n", ...) to UART0, where the synth
//!    host reads them.
//!
//! At startup the soundfont load command (registry entry 0, no pins) is
//! queued once with `select(0)` so the synth host receives it before any
//! button traffic.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::uart::{self, Blocking, UartTx};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Timer;
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use button_board::{monitor_line, ButtonBoard, ButtonLine, PinProvider, Polarity};
use ostinato::select_engine::{ButtonSpec, SelectEngine, IDLE_SENTINEL};

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The button table. Entry 0 has no pins — it is queued programmatically
/// once at startup. The wired entries match the controller hardware:
/// buttons to 3V3 (active-high), LEDs on the paired outputs.
static BUTTONS: [ButtonSpec; 3] = [
    ButtonSpec::bare("load /usr/share/sounds/sf2/TimGM6mb.sf2"),
    ButtonSpec::wired("select 0 1 0 0", 6, 12),
    ButtonSpec::wired("select 0 2 0 16", 13, 16),
];

/// Registry entry queued once at startup.
const SOUNDFONT_ENTRY: usize = 0;

/// Drain poll period. The consumer never blocks on the engine, so this is
/// purely the idle polling rate.
const DRAIN_PERIOD_MS: u64 = 20;

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Shared selection engine — written by the button monitor tasks, drained
/// by the UART task.
static ENGINE: StaticCell<Mutex<CriticalSectionRawMutex, SelectEngine>> = StaticCell::new();

// ---------------------------------------------------------------------------
// Pin provider
// ---------------------------------------------------------------------------

/// GPIO numbers the board may claim, with their degraded pin peripherals.
///
/// Built in `main` from the concrete `PIN_x` peripherals; the board claims
/// from it by number. Released pins are simply dropped — an embassy pin
/// returns its pad to hardware reset state on drop.
struct RpPinProvider {
    pins: Vec<(u8, Peri<'static, AnyPin>), 8>,
}

/// The requested GPIO number was never handed to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
struct PinUnassigned(u8);

impl RpPinProvider {
    fn new() -> Self {
        Self { pins: Vec::new() }
    }

    fn add(&mut self, number: u8, pin: Peri<'static, AnyPin>) {
        if self.pins.push((number, pin)).is_err() {
            warn!("pin table full, dropping GP{}", number);
        }
    }

    fn take(&mut self, number: u8) -> Result<Peri<'static, AnyPin>, PinUnassigned> {
        let index = self
            .pins
            .iter()
            .position(|(n, _)| *n == number)
            .ok_or(PinUnassigned(number))?;
        Ok(self.pins.swap_remove(index).1)
    }
}

impl PinProvider for RpPinProvider {
    type Input = Input<'static>;
    type Output = Output<'static>;
    type Error = PinUnassigned;

    fn claim_input(&mut self, pin: u8) -> Result<Input<'static>, PinUnassigned> {
        // Active-high buttons: pull down so a released button reads low.
        Ok(Input::new(self.take(pin)?, Pull::Down))
    }

    fn claim_output_low(&mut self, pin: u8) -> Result<Output<'static>, PinUnassigned> {
        Ok(Output::new(self.take(pin)?, Level::Low))
    }

    fn release_input(&mut self, _pin: u8, input: Input<'static>) {
        drop(input);
    }

    fn release_output(&mut self, _pin: u8, output: Output<'static>) {
        drop(output);
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `monitor_line` loop so it
/// can be spawned as a concrete Embassy task, once per wired table entry.
#[embassy_executor::task(pool_size = 2)]
async fn button_task(
    line: ButtonLine<Input<'static>, Output<'static>>,
    engine: &'static Mutex<CriticalSectionRawMutex, SelectEngine>,
) {
    monitor_line(line, engine).await
}

/// Drains the command stream to UART0.
///
/// Polls the engine at `DRAIN_PERIOD_MS`; on a non-sentinel read it keeps
/// reading until the engine reports idle again, so a command crosses the
/// wire without waiting out the poll period between chunks. The buffer is
/// deliberately smaller than the longest command — chunked delivery runs
/// on real hardware exactly as it does in the host tests.
#[embassy_executor::task]
async fn drain_task(
    mut tx: UartTx<'static, Blocking>,
    engine: &'static Mutex<CriticalSectionRawMutex, SelectEngine>,
) {
    let mut buf = [0u8; 8];
    loop {
        Timer::after_millis(DRAIN_PERIOD_MS).await;

        loop {
            // Mutex held only for the in-memory copy — never during UART.
            let n = { engine.lock().await.read(&mut buf) };
            if n == 1 && buf[0] == IDLE_SENTINEL {
                break;
            }
            if tx.blocking_write(&buf[..n]).is_err() {
                warn!("UART write failed, dropped {} bytes", n);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("ostinato-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // BUTTON_1 → GP6   LED_1 → GP12
    // BUTTON_2 → GP13  LED_2 → GP16
    // UART0 TX → GP0   (115200 8N1, default config)
    // ———————————————————————————————————————————————————————————————————————

    let mut provider = RpPinProvider::new();
    provider.add(6, p.PIN_6.into());
    provider.add(12, p.PIN_12.into());
    provider.add(13, p.PIN_13.into());
    provider.add(16, p.PIN_16.into());

    let mut engine = match SelectEngine::from_specs(&BUTTONS) {
        Ok(engine) => engine,
        Err(error) => {
            error!("button table rejected: {}", error);
            return;
        }
    };

    // —— Open the session ———————————————————————————————————————————————————

    // Claims every wired pin, drives the LEDs low, and stamps the line
    // handles. A partial failure has already rolled everything back, so
    // bailing out here leaves the hardware unclaimed.
    let mut board = ButtonBoard::new(provider, Polarity::ActiveHigh);
    match board.open(&mut engine) {
        Ok(bound) => info!("bound {} button lines", bound),
        Err(error) => {
            error!("board open failed: {}", error);
            return;
        }
    }

    // Queue the soundfont load command so the synth host receives it ahead
    // of any button traffic.
    if engine.select(SOUNDFONT_ENTRY).is_err() {
        warn!("no soundfont entry in the table, skipping preload");
    }

    let engine = ENGINE.init(Mutex::new(engine));

    let uart_tx = UartTx::new_blocking(p.UART0, p.PIN_0, uart::Config::default());

    // —— Spawn tasks ————————————————————————————————————————————————————————

    let mut lines = board.take_lines();
    while let Some(line) = lines.pop() {
        spawner.spawn(button_task(line, engine)).unwrap();
    }
    spawner.spawn(drain_task(uart_tx, engine)).unwrap();

    info!("All tasks spawned");
}
