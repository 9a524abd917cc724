//! Device lifecycle: binding the button table to real pins and releasing
//! them again.
//!
//! [`ButtonBoard`] walks the registry at open, claims every wired pin from
//! a [`PinProvider`], and stamps a fresh line handle into each bound entry.
//! A claim failure unwinds everything acquired during the same open, in
//! reverse order, before the error is returned — a failed open leaves no
//! partial bindings behind. Close releases exactly what open claimed.

use embedded_hal::digital::OutputPin;
use heapless::Vec;

use ostinato::select_engine::{SelectEngine, MAX_BUTTONS};

use crate::error::OpenError;
use crate::line::{ButtonLine, Indicator, Polarity};

/// Source of claimable GPIO resources.
///
/// The firmware implements this over the target HAL's pin types; tests
/// implement it with mock pins that count claims and releases. A provider
/// hands out each pin at most once between claim and release.
pub trait PinProvider {
    /// Claimed input resource. The monitor loop additionally requires
    /// [`Wait`](embedded_hal_async::digital::Wait) + `InputPin`; the
    /// lifecycle itself does not touch levels.
    type Input;
    /// Claimed indicator output.
    type Output: OutputPin;
    /// Why a claim was refused.
    type Error;

    /// Claim `pin` configured as a button input.
    fn claim_input(&mut self, pin: u8) -> Result<Self::Input, Self::Error>;

    /// Claim `pin` configured as an output, driven low.
    fn claim_output_low(&mut self, pin: u8) -> Result<Self::Output, Self::Error>;

    /// Hand an input back. Called once per successful [`claim_input`]
    /// (providers whose pins release their pad on drop may simply drop it).
    ///
    /// [`claim_input`]: Self::claim_input
    fn release_input(&mut self, pin: u8, input: Self::Input);

    /// Hand an output back. Called once per successful [`claim_output_low`].
    ///
    /// [`claim_output_low`]: Self::claim_output_low
    fn release_output(&mut self, pin: u8, output: Self::Output);
}

/// Lifecycle manager for the wired half of a button table.
///
/// Owns the pin provider and, between open and close, the bound lines.
/// Firmware that runs one monitor task per line moves the lines out with
/// [`take_lines`](Self::take_lines) after a successful open.
pub struct ButtonBoard<P: PinProvider> {
    provider: P,
    polarity: Polarity,
    lines: Vec<ButtonLine<P::Input, P::Output>, MAX_BUTTONS>,
}

impl<P: PinProvider> ButtonBoard<P> {
    /// A closed board over `provider`. Every line on one board shares one
    /// electrical polarity.
    pub fn new(provider: P, polarity: Polarity) -> Self {
        Self {
            provider,
            polarity,
            lines: Vec::new(),
        }
    }

    /// Open a session: finalize the commands, clear stale selection state,
    /// and bind every registry entry that names an input pin.
    ///
    /// Per entry, the indicator (if wired) is claimed as an output driven
    /// low, then the input is claimed, then the line handle is stamped.
    /// Returns the number of lines bound.
    ///
    /// # Errors
    /// The first refused claim aborts the open; everything claimed during
    /// this call is released, in reverse acquisition order, and every stamp
    /// made during this call is cleared before the error is returned.
    pub fn open(&mut self, engine: &mut SelectEngine) -> Result<usize, OpenError<P::Error>> {
        engine.finalize();
        engine.reset();

        match self.bind_all(engine) {
            Ok(()) => Ok(self.lines.len()),
            Err(error) => {
                self.unwind(engine);
                Err(error)
            }
        }
    }

    /// Close the session: release every bound line, newest first, and
    /// invalidate all line handles. Exactly one release per claim.
    pub fn close(&mut self, engine: &mut SelectEngine) {
        self.unwind(engine);
    }

    /// Move the bound lines out, e.g. into per-line monitor tasks.
    ///
    /// A board emptied this way has nothing left to release; ownership of
    /// the pins travels with the lines.
    pub fn take_lines(&mut self) -> Vec<ButtonLine<P::Input, P::Output>, MAX_BUTTONS> {
        core::mem::take(&mut self.lines)
    }

    /// Bound lines still held by the board.
    pub fn lines(&self) -> &[ButtonLine<P::Input, P::Output>] {
        &self.lines
    }

    fn bind_all(&mut self, engine: &mut SelectEngine) -> Result<(), OpenError<P::Error>> {
        for index in 0..engine.registry.len() {
            let (input_pin, led_pin) = match engine.registry.get(index) {
                Some(button) => (button.input_pin, button.led_pin),
                None => break,
            };
            // Entries without an input have no edges to monitor; their
            // commands remain reachable through SelectEngine::select().
            let Some(input_pin) = input_pin else { continue };

            let indicator = match led_pin {
                Some(pin) => Some(Indicator {
                    pin,
                    output: self.provider.claim_output_low(pin)?,
                }),
                None => None,
            };

            let input = match self.provider.claim_input(input_pin) {
                Ok(input) => input,
                Err(error) => {
                    self.release_indicator(indicator);
                    return Err(OpenError::Pin(error));
                }
            };

            let id = match engine.registry.attach_line(index) {
                Ok(id) => id,
                Err(error) => {
                    self.provider.release_input(input_pin, input);
                    self.release_indicator(indicator);
                    return Err(OpenError::Registry(error));
                }
            };

            let line = ButtonLine {
                id,
                button: index,
                input_pin,
                input,
                indicator,
                polarity: self.polarity,
            };
            if let Err(line) = self.lines.push(line) {
                // Unreachable: the registry and the line store share one
                // capacity bound. Kept as a handled case, not a panic.
                self.provider.release_input(line.input_pin, line.input);
                self.release_indicator(line.indicator);
                return Err(OpenError::Registry(
                    ostinato::select_engine::EngineError::RegistryFull,
                ));
            }
        }
        Ok(())
    }

    /// Release every held line, newest first, and clear all stamps.
    fn unwind(&mut self, engine: &mut SelectEngine) {
        while let Some(line) = self.lines.pop() {
            let ButtonLine {
                input_pin,
                input,
                indicator,
                ..
            } = line;
            // Reverse of the per-entry acquisition order.
            self.provider.release_input(input_pin, input);
            self.release_indicator(indicator);
        }
        engine.registry.clear_lines();
    }

    fn release_indicator(&mut self, indicator: Option<Indicator<P::Output>>) {
        if let Some(indicator) = indicator {
            self.provider.release_output(indicator.pin, indicator.output);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use embedded_hal::digital::{ErrorType, OutputPin};
    use ostinato::select_engine::{ButtonSpec, SelectEngine};

    /// Shared tally of provider traffic, inspected after open/close.
    #[derive(Default)]
    struct Tally {
        claimed_inputs: std::vec::Vec<u8>,
        claimed_outputs: std::vec::Vec<u8>,
        released_inputs: std::vec::Vec<u8>,
        released_outputs: std::vec::Vec<u8>,
    }

    struct MockPin;

    impl ErrorType for MockPin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Provider that hands out `MockPin`s and can be told to refuse a
    /// specific pin number.
    struct MockProvider {
        tally: Rc<RefCell<Tally>>,
        refuse: Option<u8>,
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Refused(u8);

    impl PinProvider for MockProvider {
        type Input = MockPin;
        type Output = MockPin;
        type Error = Refused;

        fn claim_input(&mut self, pin: u8) -> Result<MockPin, Refused> {
            if self.refuse == Some(pin) {
                return Err(Refused(pin));
            }
            self.tally.borrow_mut().claimed_inputs.push(pin);
            Ok(MockPin)
        }

        fn claim_output_low(&mut self, pin: u8) -> Result<MockPin, Refused> {
            if self.refuse == Some(pin) {
                return Err(Refused(pin));
            }
            self.tally.borrow_mut().claimed_outputs.push(pin);
            Ok(MockPin)
        }

        fn release_input(&mut self, pin: u8, _input: MockPin) {
            self.tally.borrow_mut().released_inputs.push(pin);
        }

        fn release_output(&mut self, pin: u8, _output: MockPin) {
            self.tally.borrow_mut().released_outputs.push(pin);
        }
    }

    fn demo_engine() -> SelectEngine {
        SelectEngine::from_specs(&[
            ButtonSpec::bare("load /usr/share/sounds/sf2/TimGM6mb.sf2"),
            ButtonSpec::wired("select 0 1 0 0", 6, 12),
            ButtonSpec::wired("select 0 2 0 16", 13, 16),
        ])
        .unwrap()
    }

    fn board(refuse: Option<u8>) -> (ButtonBoard<MockProvider>, Rc<RefCell<Tally>>) {
        let tally = Rc::new(RefCell::new(Tally::default()));
        let provider = MockProvider {
            tally: Rc::clone(&tally),
            refuse,
        };
        (ButtonBoard::new(provider, Polarity::ActiveHigh), tally)
    }

    // ── Open ─────────────────────────────────────────────────────────

    #[test]
    fn open_binds_only_the_wired_entries() {
        let mut engine = demo_engine();
        let (mut board, tally) = board(None);

        let bound = board.open(&mut engine).unwrap();
        assert_eq!(bound, 2);

        let tally = tally.borrow();
        assert_eq!(tally.claimed_inputs, [6, 13]);
        assert_eq!(tally.claimed_outputs, [12, 16]);
        assert!(tally.released_inputs.is_empty());
        assert!(tally.released_outputs.is_empty());
    }

    #[test]
    fn open_stamps_resolvable_line_handles() {
        let mut engine = demo_engine();
        let (mut board, _tally) = board(None);
        board.open(&mut engine).unwrap();

        for line in board.lines() {
            assert_eq!(engine.registry.find_by_line(line.id), Some(line.button));
        }
        assert_eq!(board.lines()[0].button, 1);
        assert_eq!(board.lines()[1].button, 2);
    }

    #[test]
    fn open_finalizes_commands_and_clears_stale_state() {
        let mut engine = demo_engine();
        engine.select(0).unwrap();

        let (mut board, _tally) = board(None);
        board.open(&mut engine).unwrap();

        assert_eq!(engine.pending(), None);
        assert!(engine.registry.get(1).unwrap().command.is_finalized());
    }

    // ── Failed open rollback ─────────────────────────────────────────

    #[test]
    fn refused_input_unwinds_every_prior_claim() {
        let mut engine = demo_engine();
        // Entry 1 (LED 12, input 6) binds; entry 2 fails at input 13
        // after LED 16 was already claimed.
        let (mut board, tally) = board(Some(13));

        let error = board.open(&mut engine).unwrap_err();
        assert!(matches!(error, OpenError::Pin(Refused(13))));

        let tally = tally.borrow();
        assert_eq!(tally.claimed_inputs, [6]);
        assert_eq!(tally.claimed_outputs, [12, 16]);
        // Everything claimed was handed back, the partial entry first.
        assert_eq!(tally.released_inputs, [6]);
        assert_eq!(tally.released_outputs, [16, 12]);
        assert!(board.lines().is_empty());
    }

    #[test]
    fn failed_open_leaves_no_line_stamps() {
        let mut engine = demo_engine();
        let (mut failing, _tally) = board(Some(13));
        failing.open(&mut engine).unwrap_err();

        // No handle survives a failed open: a retry with a healthy
        // provider starts from a clean registry and binds everything.
        let (mut retry, _retry_tally) = board(None);
        let bound = retry.open(&mut engine).unwrap();
        assert_eq!(bound, 2);
        for line in retry.lines() {
            assert_eq!(engine.registry.find_by_line(line.id), Some(line.button));
        }
    }

    #[test]
    fn refused_indicator_fails_before_the_input_is_claimed() {
        let mut engine = demo_engine();
        let (mut board, tally) = board(Some(12));

        let error = board.open(&mut engine).unwrap_err();
        assert!(matches!(error, OpenError::Pin(Refused(12))));

        let tally = tally.borrow();
        assert!(tally.claimed_inputs.is_empty());
        assert!(tally.claimed_outputs.is_empty());
    }

    // ── Close symmetry ───────────────────────────────────────────────

    #[test]
    fn close_releases_exactly_what_open_claimed() {
        let mut engine = demo_engine();
        let (mut board, tally) = board(None);

        board.open(&mut engine).unwrap();
        board.close(&mut engine);

        let tally = tally.borrow();
        let mut claimed: std::vec::Vec<u8> = tally.claimed_inputs.clone();
        claimed.extend(&tally.claimed_outputs);
        let mut released: std::vec::Vec<u8> = tally.released_inputs.clone();
        released.extend(&tally.released_outputs);
        claimed.sort_unstable();
        released.sort_unstable();
        assert_eq!(claimed, released);
    }

    #[test]
    fn close_invalidates_line_handles() {
        let mut engine = demo_engine();
        let (mut board, _tally) = board(None);

        board.open(&mut engine).unwrap();
        let stale = board.lines()[0].id;
        board.close(&mut engine);

        assert_eq!(engine.registry.find_by_line(stale), None);
    }

    #[test]
    fn close_after_take_lines_releases_nothing() {
        let mut engine = demo_engine();
        let (mut board, tally) = board(None);

        board.open(&mut engine).unwrap();
        let lines = board.take_lines();
        assert_eq!(lines.len(), 2);

        board.close(&mut engine);
        let tally = tally.borrow();
        assert!(tally.released_inputs.is_empty());
        assert!(tally.released_outputs.is_empty());
    }

    #[test]
    fn reopen_after_close_binds_the_same_pins_again() {
        let mut engine = demo_engine();
        let (mut board, tally) = board(None);

        board.open(&mut engine).unwrap();
        board.close(&mut engine);
        let bound = board.open(&mut engine).unwrap();

        assert_eq!(bound, 2);
        assert_eq!(tally.borrow().claimed_inputs, [6, 13, 6, 13]);
    }
}
