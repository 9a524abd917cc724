//! The polled controller: open/read/write/close without interrupts.
//!
//! Where the button-board variant binds edge lines, this variant samples
//! every wired input at the start of each read call, mirrors the levels
//! onto the indicators, and latches a press when a line goes from low to
//! high between two consecutive reads. No interrupt lines are held, so
//! open and close configure registers one-shot and own nothing in between.

use ostinato::select_engine::{SelectEngine, MAX_BUTTONS};

use crate::driver::{Direction, PinBank};
use crate::error::GpioError;
use crate::registers::COMMAND_PIN;
use crate::window::WindowProvider;

/// Polling-variant device: the selection engine plus direct register
/// access through a [`WindowProvider`].
///
/// Single-context by construction — there is no asynchronous edge path,
/// so no lock is needed around the engine. The wiring is assumed
/// active-high, matching the controller's button-to-3V3 hardware.
pub struct PolledController<P: WindowProvider> {
    bank: PinBank<P>,
    engine: SelectEngine,
    /// Input level seen for each entry on the previous scan; a press is a
    /// low→high transition between consecutive reads.
    previous: [bool; MAX_BUTTONS],
    session_open: bool,
}

impl<P> PolledController<P>
where
    P: WindowProvider,
{
    /// Wrap a provider and an already-built engine. Commands are
    /// finalized here so every stream ends in a newline even if the
    /// caller never opens the device.
    pub fn new(provider: P, mut engine: SelectEngine) -> Self {
        engine.finalize();
        Self {
            bank: PinBank::new(provider),
            engine,
            previous: [false; MAX_BUTTONS],
            session_open: false,
        }
    }

    /// Open the device: one-shot direction configuration.
    ///
    /// Every indicator pin becomes an output driven low, every button pin
    /// an input, and the command pin an output driven low. Selection state
    /// from a previous session is discarded. Nothing long-lived is
    /// claimed, so there is nothing to unwind on failure — the error is
    /// propagated as-is and the caller may retry.
    pub fn open(&mut self) -> Result<(), GpioError<P::Error>> {
        for index in 0..self.engine.registry.len() {
            let (input_pin, led_pin) = match self.engine.registry.get(index) {
                Some(button) => (button.input_pin, button.led_pin),
                None => break,
            };
            if let Some(led) = led_pin {
                self.bank.set_direction(led, Direction::Output)?;
                self.bank.write_level(led, false)?;
            }
            if let Some(input) = input_pin {
                self.bank.set_direction(input, Direction::Input)?;
            }
        }
        self.bank.set_direction(COMMAND_PIN, Direction::Output)?;
        self.bank.write_level(COMMAND_PIN, false)?;

        self.engine.reset();
        self.previous = [false; MAX_BUTTONS];
        self.session_open = true;
        Ok(())
    }

    /// One read call: scan the buttons, then run one step of the stream
    /// protocol. Returns how many bytes were placed at the front of `buf`.
    ///
    /// The scan samples every wired input, mirrors each level onto its
    /// indicator, and latches a press for every low→high transition since
    /// the previous read — the last such entry in table order wins, the
    /// same latest-wins rule as the edge variant. Before open the scan is
    /// skipped and the engine simply reports idle.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, GpioError<P::Error>> {
        if self.session_open {
            self.scan()?;
        }
        Ok(self.engine.read(buf))
    }

    /// One write call: `'1'` drives the command pin high, any other byte
    /// drives it low. Direct and non-debounced, independent of the button
    /// table. Returns the number of bytes accepted (always 1).
    pub fn write(&mut self, byte: u8) -> Result<usize, GpioError<P::Error>> {
        self.bank.write_level(COMMAND_PIN, byte == b'1')?;
        Ok(1)
    }

    /// Close the device. No hardware claims are held, so this only marks
    /// the session closed and drops any unconsumed selection.
    pub fn close(&mut self) {
        self.engine.reset();
        self.previous = [false; MAX_BUTTONS];
        self.session_open = false;
    }

    /// The selection engine, for inspection.
    pub fn engine(&self) -> &SelectEngine {
        &self.engine
    }

    fn scan(&mut self) -> Result<(), GpioError<P::Error>> {
        for index in 0..self.engine.registry.len() {
            let (input_pin, led_pin) = match self.engine.registry.get(index) {
                Some(button) => (button.input_pin, button.led_pin),
                None => break,
            };
            let Some(input_pin) = input_pin else { continue };

            let level = self.bank.read_level(input_pin)?;
            if let Some(led) = led_pin {
                self.bank.write_level(led, level)?;
            }
            if level && !self.previous[index] {
                // The index comes straight from the registry walk, so the
                // latch cannot be rejected.
                let _ = self.engine.select(index);
            }
            self.previous[index] = level;
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
