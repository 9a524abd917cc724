//! Owned command payloads.

use heapless::Vec;

use super::error::EngineError;
use super::COMMAND_CAPACITY;

/// A single synthesizer command, stored as an owned, bounds-checked byte
/// buffer.
///
/// Construction copies the text and reserves room for the trailing newline;
/// [`finalize()`](Command::finalize) appends it exactly once. The stream
/// side only ever sees finalized commands, so every delivered message ends
/// in `\n` and is at least one byte long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    bytes: Vec<u8, COMMAND_CAPACITY>,
}

impl Command {
    /// Create a command from its text.
    ///
    /// The text may or may not already carry a trailing newline; either way
    /// the finalized form must fit in [`COMMAND_CAPACITY`] bytes.
    ///
    /// # Errors
    /// [`EngineError::CommandTooLong`] if the finalized form would not fit.
    pub fn new(text: &str) -> Result<Self, EngineError> {
        let raw = text.as_bytes();
        let finalized_len = if raw.ends_with(b"\n") {
            raw.len()
        } else {
            raw.len() + 1
        };
        if finalized_len > COMMAND_CAPACITY {
            return Err(EngineError::CommandTooLong);
        }

        let mut bytes = Vec::new();
        bytes
            .extend_from_slice(raw)
            .expect("length checked against COMMAND_CAPACITY");
        Ok(Self { bytes })
    }

    /// Append the trailing newline if it is not already there.
    ///
    /// Idempotent: any number of calls leaves exactly one newline at the
    /// end and the length unchanged after the first.
    pub fn finalize(&mut self) {
        if !self.is_finalized() {
            self.bytes
                .push(b'\n')
                .expect("newline slot reserved at construction");
        }
    }

    /// `true` once the trailing newline is in place.
    pub fn is_finalized(&self) -> bool {
        self.bytes.last() == Some(&b'\n')
    }

    /// The command bytes in their current form.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Command text without the trailing newline, for diagnostics.
    pub fn text(&self) -> &str {
        let end = self.bytes.len() - usize::from(self.is_finalized());
        core::str::from_utf8(&self.bytes[..end]).unwrap_or("")
    }

    /// Current length in bytes (includes the newline once finalized).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` only for a command built from the empty string before
    /// finalization.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_appends_single_newline() {
        let mut cmd = Command::new("select 0 1 0 0").unwrap();
        assert_eq!(cmd.len(), 14);
        assert!(!cmd.is_finalized());

        cmd.finalize();
        assert_eq!(cmd.len(), 15);
        assert_eq!(cmd.as_bytes(), b"select 0 1 0 0\n");

        cmd.finalize();
        assert_eq!(cmd.len(), 15);
        assert_eq!(cmd.as_bytes(), b"select 0 1 0 0\n");
    }

    #[test]
    fn pre_terminated_text_is_kept_as_is() {
        let mut cmd = Command::new("gain 0.8\n").unwrap();
        assert!(cmd.is_finalized());
        cmd.finalize();
        assert_eq!(cmd.as_bytes(), b"gain 0.8\n");
    }

    #[test]
    fn text_strips_the_newline() {
        let mut cmd = Command::new("select 0 2 0 16").unwrap();
        cmd.finalize();
        assert_eq!(cmd.text(), "select 0 2 0 16");
    }

    #[test]
    fn rejects_text_that_cannot_take_the_newline() {
        // 63 bytes finalize to 64 and fit; 64 bytes would need 65.
        let just_fits = "x".repeat(COMMAND_CAPACITY - 1);
        assert!(Command::new(&just_fits).is_ok());

        let too_long = "x".repeat(COMMAND_CAPACITY);
        assert_eq!(Command::new(&too_long), Err(EngineError::CommandTooLong));
    }

    #[test]
    fn pre_terminated_text_may_fill_the_buffer() {
        let mut text = "y".repeat(COMMAND_CAPACITY - 1);
        text.push('\n');
        let cmd = Command::new(&text).unwrap();
        assert!(cmd.is_finalized());
        assert_eq!(cmd.len(), COMMAND_CAPACITY);
    }

    #[test]
    fn empty_text_finalizes_to_a_lone_newline() {
        let mut cmd = Command::new("").unwrap();
        assert!(cmd.is_empty());
        cmd.finalize();
        assert_eq!(cmd.as_bytes(), b"\n");
    }
}
