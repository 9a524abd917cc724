//! Error types for the polled GPIO variant.

use core::fmt;

/// Errors that can occur while touching the GPIO registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError<E> {
    /// Pin number past the end of the GPIO bank.
    InvalidPin(u8),

    /// The provider refused to map a register window. Propagated loudly —
    /// a half-configured electrical direction is not something to retry
    /// into.
    Window(E),
}

// Allow ergonomic `?` propagation from raw provider errors.
impl<E> From<E> for GpioError<E> {
    fn from(error: E) -> Self {
        GpioError::Window(error)
    }
}

impl<E: fmt::Debug> fmt::Display for GpioError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GpioError::InvalidPin(pin) => write!(f, "invalid GPIO pin {}", pin),
            GpioError::Window(e) => write!(f, "register window mapping failed: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for GpioError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            GpioError::InvalidPin(pin) => defmt::write!(f, "invalid GPIO pin {}", pin),
            GpioError::Window(e) => {
                defmt::write!(f, "register window mapping failed: {}", e)
            }
        }
    }
}
