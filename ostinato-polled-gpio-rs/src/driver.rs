//! Low-level register operations over the mapping seam.
//!
//! Implements the per-pin primitives (direction, level read, level write)
//! against the BCM2835 register layout, paying one map/unmap per touch.
//!
//! This module is crate-private — consumers interact with
//! [`PolledController`] in `controller.rs` instead.

use crate::error::GpioError;
use crate::registers::{
    FSEL_BITS, FSEL_INPUT, FSEL_OUTPUT, GPCLR0, GPFSEL0, GPIO_BASE, GPLEV0, GPSET0, MAX_PIN,
    PINS_PER_FSEL,
};
use crate::window::{RegisterWindow, WindowProvider};

/// Electrical direction of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    fn fsel_bits(self) -> u32 {
        match self {
            Direction::Input => FSEL_INPUT,
            Direction::Output => FSEL_OUTPUT,
        }
    }
}

/// Low-level pin operations over a [`WindowProvider`].
///
/// Owns the provider; every method maps the one register it needs and the
/// window is unmapped (dropped) before the method returns.
pub(crate) struct PinBank<P> {
    provider: P,
}

impl<P> PinBank<P>
where
    P: WindowProvider,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Set `pin`'s function-select field.
    ///
    /// Read-modify-write of the 3-bit field only: the other nine pins in
    /// the same `GPFSEL` register keep their function.
    pub fn set_direction(
        &mut self,
        pin: u8,
        direction: Direction,
    ) -> Result<(), GpioError<P::Error>> {
        check_pin(pin)?;

        let register = GPIO_BASE + GPFSEL0 + 4 * u32::from(pin / PINS_PER_FSEL);
        let shift = FSEL_BITS * u32::from(pin % PINS_PER_FSEL);

        let mut window = self.provider.map(register)?;
        let mut value = window.read();
        value &= !(0b111 << shift);
        value |= direction.fsel_bits() << shift;
        window.write(value);
        Ok(())
    }

    /// Drive an output pin high or low.
    ///
    /// `GPSET`/`GPCLR` are write-1-to-act, so a blind single-bit write is
    /// correct here — no read-modify-write needed.
    pub fn write_level(&mut self, pin: u8, high: bool) -> Result<(), GpioError<P::Error>> {
        check_pin(pin)?;

        let bank_offset = if high { GPSET0 } else { GPCLR0 };
        let register = GPIO_BASE + bank_offset + 4 * u32::from(pin / 32);

        let mut window = self.provider.map(register)?;
        window.write(1 << (pin % 32));
        Ok(())
    }

    /// Sample a pin's level.
    pub fn read_level(&mut self, pin: u8) -> Result<bool, GpioError<P::Error>> {
        check_pin(pin)?;

        let register = GPIO_BASE + GPLEV0 + 4 * u32::from(pin / 32);

        let window = self.provider.map(register)?;
        Ok(window.read() & (1 << (pin % 32)) != 0)
    }
}

fn check_pin<E>(pin: u8) -> Result<(), GpioError<E>> {
    if pin > MAX_PIN {
        return Err(GpioError::InvalidPin(pin));
    }
    Ok(())
}
