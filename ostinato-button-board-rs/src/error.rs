//! Error types for the button board.

use core::fmt;

use ostinato::select_engine::EngineError;

/// Errors that can occur while binding the button table to real pins.
#[derive(Debug)]
pub enum OpenError<E> {
    /// The pin provider refused a claim, e.g. the pin is already in use.
    Pin(E),

    /// The registry rejected a line attachment.
    Registry(EngineError),
}

// Allow ergonomic `?` propagation from raw provider errors.
impl<E> From<E> for OpenError<E> {
    fn from(error: E) -> Self {
        OpenError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for OpenError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OpenError::Pin(e) => write!(f, "pin claim failed: {:?}", e),
            OpenError::Registry(e) => write!(f, "line attachment rejected: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for OpenError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OpenError::Pin(e) => defmt::write!(f, "pin claim failed: {}", e),
            OpenError::Registry(e) => defmt::write!(f, "line attachment rejected: {}", e),
        }
    }
}
