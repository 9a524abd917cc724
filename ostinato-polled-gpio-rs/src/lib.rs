//! Polled BCM2835 GPIO variant of the ostinato button controller.
//!
//! This crate is the interrupt-free rendition of the button device for the
//! Raspberry Pi's BCM2835: no edge lines are bound; instead every read
//! call samples the wired inputs through short-lived register windows and
//! latches presses on low→high transitions between consecutive reads.
//!
//! The crate is split into two layers:
//!
//! - **`driver`** (crate-private) — per-pin register primitives over the
//!   BCM2835 layout: function-select read-modify-write, set/clear writes,
//!   level reads, one window mapping per touch.
//! - **[`PolledController`]** (public) — validated open/read/write/close
//!   surface over the [`ostinato`] selection engine.
//!
//! The mapping itself sits behind [`WindowProvider`], so the register
//! logic runs against a simulated GPIO block in the host tests; the
//! surrounding system supplies the real physical-memory provider.
//!
//! # Crate Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on error types
//!   for embedded logging.

#![cfg_attr(not(test), no_std)]

pub use controller::PolledController;
pub use error::GpioError;
pub use registers::{COMMAND_PIN, GPIO_BASE, PERIPHERAL_BASE, WINDOW_LEN};
pub use window::{RegisterWindow, WindowProvider};

pub mod controller;
mod driver;
pub mod error;
pub mod registers;
pub mod window;
