//! One bound button line: the claimed input, its registry handle, and the
//! indicator output that follows it.

use embedded_hal::digital::OutputPin;

use ostinato::select_engine::LineId;

/// Electrical orientation of a button input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pressing pulls the line high (button to 3V3, pull-down resistor).
    ActiveHigh,
    /// Pressing pulls the line low (button to ground, pull-up resistor).
    ActiveLow,
}

impl Polarity {
    /// Maps a raw pin level to "the button is pressed".
    pub fn is_asserted(self, level_high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => level_high,
            Polarity::ActiveLow => !level_high,
        }
    }
}

/// A claimed indicator output together with the pin number it came from.
///
/// The pin number is only needed to hand the resource back to the provider
/// when the session closes.
pub struct Indicator<O> {
    pub pin: u8,
    pub output: O,
}

/// One bound button line.
///
/// Produced by [`ButtonBoard::open`](crate::board::ButtonBoard::open) for
/// every table row that names an input pin. The firmware moves each line
/// into its own monitor task.
pub struct ButtonLine<I, O> {
    /// Handle minted by the registry for this session. Stale once the
    /// session closes.
    pub id: LineId,
    /// Registry index, kept for logging.
    pub button: usize,
    /// Pin number the input was claimed from.
    pub input_pin: u8,
    /// The claimed input resource.
    pub input: I,
    /// Indicator output, if the table wires one.
    pub indicator: Option<Indicator<O>>,
    /// How raw levels on `input` map to presses.
    pub polarity: Polarity,
}

impl<I, O> ButtonLine<I, O>
where
    O: OutputPin,
{
    /// Drives the indicator to follow the button: lit while pressed, dark
    /// while released. Runs on every edge, whether or not the press was
    /// latched. A line without an indicator is a no-op.
    pub fn mirror(&mut self, asserted: bool) -> Result<(), O::Error> {
        match &mut self.indicator {
            Some(indicator) if asserted => indicator.output.set_high(),
            Some(indicator) => indicator.output.set_low(),
            None => Ok(()),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
