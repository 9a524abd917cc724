use super::command::Command;
use super::error::EngineError;
use super::registry::LineId;

/// Compile-time description of one registry entry.
///
/// Tables of these drive [`ButtonRegistry::from_specs()`] — the registry
/// contents are configuration the surrounding system supplies at startup,
/// not something changed at runtime.
///
/// [`ButtonRegistry::from_specs()`]: super::ButtonRegistry::from_specs
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSpec {
    /// Command text; the trailing newline is appended at finalization if
    /// the text does not already carry one.
    pub command: &'static str,
    /// GPIO number of the button input, or `None` for an entry with no
    /// physical control (selectable only through
    /// [`SelectEngine::select()`](super::SelectEngine::select)).
    pub input_pin: Option<u8>,
    /// GPIO number of the paired indicator output, or `None` if unwired.
    pub led_pin: Option<u8>,
}

impl ButtonSpec {
    /// Entry wired to a physical button and indicator.
    pub const fn wired(command: &'static str, input_pin: u8, led_pin: u8) -> Self {
        Self {
            command,
            input_pin: Some(input_pin),
            led_pin: Some(led_pin),
        }
    }

    /// Entry with no pins — software-selectable only.
    pub const fn bare(command: &'static str) -> Self {
        Self {
            command,
            input_pin: None,
            led_pin: None,
        }
    }
}

/// One registry entry: a command payload plus its hardware wiring.
///
/// Immutable after registry finalization except for `line`, which the
/// device lifecycle stamps at open and clears at close.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    /// The command streamed to the reader when this button is selected.
    pub command: Command,
    /// GPIO number of the button input (`None` = not wired).
    pub input_pin: Option<u8>,
    /// GPIO number of the paired indicator output (`None` = not wired).
    pub led_pin: Option<u8>,
    /// Opaque handle of the bound edge line; `Some` only while the device
    /// is open.
    pub line: Option<LineId>,
}

impl Button {
    /// Build an entry from its spec. The command is validated but not yet
    /// finalized.
    pub fn from_spec(spec: &ButtonSpec) -> Result<Self, EngineError> {
        Ok(Self {
            command: Command::new(spec.command)?,
            input_pin: spec.input_pin,
            led_pin: spec.led_pin,
            line: None,
        })
    }
}
