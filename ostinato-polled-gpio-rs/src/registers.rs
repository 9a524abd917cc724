//! BCM2835 GPIO register map.
//!
//! Physical addresses from the BCM2835 peripherals datasheet, as seen by
//! the ARM on a Raspberry Pi with the peripheral block at `0x3F00_0000`.

/// Physical base of the peripheral block as seen by the ARM.
pub const PERIPHERAL_BASE: u32 = 0x3F00_0000;

/// Physical base of the GPIO register block.
pub const GPIO_BASE: u32 = PERIPHERAL_BASE + 0x0020_0000;

/// Function select 0 (pins 0–9, 3 bits per pin). Five more follow at
/// 4-byte strides for the remaining pins.
pub const GPFSEL0: u32 = 0x0000;

/// Output set 0 (pins 0–31, write-1-to-set). `GPSET1` follows.
pub const GPSET0: u32 = 0x001C;

/// Output clear 0 (pins 0–31, write-1-to-clear). `GPCLR1` follows.
pub const GPCLR0: u32 = 0x0028;

/// Pin level 0 (pins 0–31, read-only). `GPLEV1` follows.
pub const GPLEV0: u32 = 0x0034;

/// Every register touch maps exactly one 32-bit register.
pub const WINDOW_LEN: usize = 4;

/// Highest valid GPIO number on the BCM2835.
pub const MAX_PIN: u8 = 53;

/// Pins per function-select register.
pub const PINS_PER_FSEL: u8 = 10;

/// Width of one function-select field.
pub const FSEL_BITS: u32 = 3;

/// Function-select field value: input.
pub const FSEL_INPUT: u32 = 0b000;

/// Function-select field value: output.
pub const FSEL_OUTPUT: u32 = 0b001;

/// GPIO driven by the single-pin write path (`'1'` asserts, anything else
/// clears).
pub const COMMAND_PIN: u8 = 4;
