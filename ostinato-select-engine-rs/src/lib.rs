//! Core selection engine for the ostinato synth controller.
//!
//! This crate holds everything that can be reasoned about without hardware:
//! the command buffers, the button registry, and the selection state machine
//! that turns latched presses into a chunked byte stream. Pin drivers and
//! register access live in the `button-board` and `ostinato-polled-gpio-rs`
//! crates; firmware wiring lives in `ostinato-hw-interface`.
//!
//! # Crate Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations for embedded
//!   logging.

#![cfg_attr(not(test), no_std)]

pub mod select_engine;
