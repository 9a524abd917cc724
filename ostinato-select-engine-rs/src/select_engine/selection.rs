/// Position inside the command currently being streamed.
///
/// Bundling the button index with its cursor makes a cursor from one
/// selection impossible to pair with another: the two travel together or
/// not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamPos {
    /// Registry index of the command being streamed.
    pub button: usize,
    /// Bytes already delivered to the reader.
    pub cursor: usize,
}

/// The mutable heart of the engine: what is streaming and what is pending.
///
/// Written by exactly two actors — the edge path latches `pending`, the
/// read path owns `stream` — and must always be observed and mutated under
/// one lock together with the registry lookups that feed it.
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectionState {
    /// Current streaming selection and its cursor; `None` while idle.
    pub stream: Option<StreamPos>,
    /// Press latched by the edge path awaiting pickup by the next read.
    /// A new press overwrites an unconsumed one — the latest wins.
    pub pending: Option<usize>,
}

impl SelectionState {
    /// Fresh state: idle, nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a press. Overwrites any prior unconsumed press.
    pub fn latch(&mut self, button: usize) {
        self.pending = Some(button);
    }

    /// Take the pending press, leaving the slot empty.
    pub fn take_pending(&mut self) -> Option<usize> {
        self.pending.take()
    }

    /// `true` when no command is mid-stream.
    pub fn is_idle(&self) -> bool {
        self.stream.is_none()
    }

    /// Drop any in-flight stream and pending press. Used when a session
    /// opens so stale state from a previous session cannot leak through.
    pub fn reset(&mut self) {
        self.stream = None;
        self.pending = None;
    }
}
