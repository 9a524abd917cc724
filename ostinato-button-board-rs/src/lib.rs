//! Async GPIO button-board driver for the ostinato synth controller.
//!
//! This crate binds an [`ostinato`] button table to real pins. It is
//! generic over the `embedded-hal` 1.0 digital traits (plus
//! `embedded-hal-async`'s [`Wait`](embedded_hal_async::digital::Wait) for
//! edges), so the same code drives a Pico 2 in the firmware crate and mock
//! pins in the host tests.
//!
//! # Architecture
//!
//! - [`PinProvider`] — the seam to the target HAL: claim and release pins
//!   by number.
//! - [`ButtonBoard`] — device lifecycle: open binds every wired registry
//!   entry (indicator low, input claimed, line handle stamped) with full
//!   rollback on a partial failure; close releases exactly what open
//!   claimed.
//! - [`ButtonLine`] — one bound line: input, optional indicator, polarity.
//! - [`monitor_line`] — the per-line edge loop: wait for an edge, record
//!   it on the shared engine, mirror the level onto the indicator.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`].
//! - **`task`** — enables [`monitor_line`] (pulls in `embassy-sync`).

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod error;
pub mod line;
#[cfg(feature = "task")]
pub mod monitor;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use board::{ButtonBoard, PinProvider};
pub use error::OpenError;
pub use line::{ButtonLine, Indicator, Polarity};
#[cfg(feature = "task")]
pub use monitor::monitor_line;
