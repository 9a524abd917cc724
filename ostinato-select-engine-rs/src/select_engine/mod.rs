//! Button-press selection and command streaming.
//!
//! This module provides the [`SelectEngine`] data structure that turns
//! latched button presses into a sequential byte stream of synthesizer
//! commands. It is the central shared state accessed by the per-line edge
//! monitors and by whatever drains the stream to a consumer.
//!
//! # Architecture
//!
//! Every physical control is described by one [`Button`]: a newline-
//! terminated [`Command`] payload plus the input and indicator pin numbers
//! it is wired to. The ordered [`ButtonRegistry`] is built once at startup
//! from a compiled-in [`ButtonSpec`] table and never grows afterwards.
//!
//! ```text
//! edge monitor ──on_edge──▶ ┌──────────────┐ ──read──▶ consumer
//!                           │ SelectEngine │
//! session wiring ──select─▶ └──────────────┘
//! ```
//!
//! # Handoff
//!
//! The edge path and the read path meet in a single pending-selection slot:
//!
//! - [`SelectEngine::on_edge()`] resolves a bound line to a button and, on
//!   an asserting edge, overwrites the pending slot — the latest press wins,
//!   nothing is queued.
//! - [`SelectEngine::read()`] adopts the pending slot the next time it is
//!   idle and streams the command out in caller-sized chunks, exactly once
//!   per press.
//!
//! Callers that share an engine between tasks must wrap the whole value in
//! one mutex and perform each `on_edge`/`read` call under a single lock
//! acquisition; the engine itself contains no interior synchronization.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation. Storage is bounded by [`MAX_BUTTONS`] and
//! [`COMMAND_CAPACITY`]. The optional `defmt` feature enables structured
//! logging for embedded targets.

mod button;
mod command;
mod engine;
mod error;
mod registry;
mod selection;

pub use button::{Button, ButtonSpec};
pub use command::Command;
pub use engine::{EdgeOutcome, SelectEngine};
pub use error::EngineError;
pub use registry::{ButtonRegistry, LineId};
pub use selection::{SelectionState, StreamPos};

/// Maximum number of registry entries.
pub const MAX_BUTTONS: usize = 8;

/// Maximum finalized command length in bytes, trailing newline included.
pub const COMMAND_CAPACITY: usize = 64;

/// Byte emitted by [`SelectEngine::read()`] when the engine is idle and no
/// press is pending. Lets a reader poll without blocking.
pub const IDLE_SENTINEL: u8 = 0;
