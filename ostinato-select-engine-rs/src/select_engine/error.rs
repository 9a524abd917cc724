/// Errors that can occur when building or driving the selection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// A command's finalized form would not fit in its buffer
    /// (must be ≤ [`COMMAND_CAPACITY`](super::COMMAND_CAPACITY) bytes,
    /// newline included).
    CommandTooLong,
    /// The spec table holds more than [`MAX_BUTTONS`](super::MAX_BUTTONS)
    /// entries.
    RegistryFull,
    /// A button index is out of bounds for the registry.
    UnknownButton,
}
