//! The fixed, ordered table of buttons.

use heapless::Vec;

use super::button::{Button, ButtonSpec};
use super::error::EngineError;
use super::MAX_BUTTONS;

/// Opaque handle identifying a bound edge line.
///
/// Minted by [`ButtonRegistry::attach_line()`] during open and invalidated
/// by [`ButtonRegistry::clear_lines()`] at close. Tokens are never reused
/// across sessions, so a handle that outlives its session resolves to
/// nothing instead of to a different button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineId(u16);

/// Ordered table of [`Button`] descriptors, built once at startup.
///
/// Read-only after setup except for the per-entry line handles, which the
/// device lifecycle stamps while the device is open.
#[derive(Debug, Default)]
pub struct ButtonRegistry {
    buttons: Vec<Button, MAX_BUTTONS>,
    next_line: u16,
}

impl ButtonRegistry {
    /// Build the registry from a compiled-in spec table.
    ///
    /// # Errors
    /// * [`EngineError::RegistryFull`] if the table exceeds [`MAX_BUTTONS`].
    /// * [`EngineError::CommandTooLong`] if any command cannot be finalized
    ///   within its buffer.
    pub fn from_specs(specs: &[ButtonSpec]) -> Result<Self, EngineError> {
        let mut buttons = Vec::new();
        for spec in specs {
            buttons
                .push(Button::from_spec(spec)?)
                .map_err(|_| EngineError::RegistryFull)?;
        }
        Ok(Self {
            buttons,
            next_line: 0,
        })
    }

    /// Append the trailing newline to every command that still lacks one.
    ///
    /// Runs effectively once: entries already finalized are skipped, so
    /// repeat calls never double-append or change lengths.
    pub fn finalize(&mut self) {
        for button in &mut self.buttons {
            button.command.finalize();
        }
    }

    /// Resolve a bound line handle to its button index.
    ///
    /// Linear scan — the registry holds at most [`MAX_BUTTONS`] entries and
    /// this sits on the edge-handler path, so it must stay O(table size)
    /// rather than O(command length).
    pub fn find_by_line(&self, line: LineId) -> Option<usize> {
        self.buttons.iter().position(|b| b.line == Some(line))
    }

    /// Mint a fresh line handle and stamp it on the entry at `index`.
    ///
    /// # Errors
    /// [`EngineError::UnknownButton`] if `index` is out of bounds.
    pub fn attach_line(&mut self, index: usize) -> Result<LineId, EngineError> {
        let button = self
            .buttons
            .get_mut(index)
            .ok_or(EngineError::UnknownButton)?;
        let id = LineId(self.next_line);
        self.next_line = self.next_line.wrapping_add(1);
        button.line = Some(id);
        Ok(id)
    }

    /// Clear every line stamp. Handles minted before this call no longer
    /// resolve.
    pub fn clear_lines(&mut self) {
        for button in &mut self.buttons {
            button.line = None;
        }
    }

    /// Entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Button> {
        self.buttons.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Iterate the entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Button> {
        self.buttons.iter()
    }
}
