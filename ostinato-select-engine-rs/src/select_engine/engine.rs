//! The engine façade: edge intake, programmatic selection, and the
//! sequential read protocol, all over one registry + selection pair.

use super::button::ButtonSpec;
use super::error::EngineError;
use super::registry::{ButtonRegistry, LineId};
use super::selection::{SelectionState, StreamPos};
use super::IDLE_SENTINEL;

/// What an edge amounted to once resolved against the registry.
///
/// The monitor task reports this so the firmware can log and mirror
/// without holding the engine lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// Asserting edge on a bound line. The press is latched as pending
    /// and will be adopted by the next idle read.
    Latched { button: usize },
    /// Deasserting edge on a bound line. Observed but never latched.
    Released { button: usize },
    /// The line resolves to no registry entry, e.g. a handle from a
    /// closed session. No state was touched.
    Ignored,
}

/// Selection engine: the button table plus the selection state, with
/// every mutation funnelled through one place.
///
/// Callers that share an engine across tasks wrap it in a mutex and
/// hold the lock for the whole of [`on_edge`](Self::on_edge) or
/// [`read`](Self::read). Each call is a single indivisible step of the
/// protocol; the engine itself never blocks or performs I/O.
pub struct SelectEngine {
    /// The button table. Public so the lifecycle layer can stamp line
    /// handles while it claims pins.
    pub registry: ButtonRegistry,
    selection: SelectionState,
}

impl SelectEngine {
    /// Wraps an already-built registry.
    pub fn new(registry: ButtonRegistry) -> Self {
        Self {
            registry,
            selection: SelectionState::new(),
        }
    }

    /// Builds the registry from a spec table and wraps it.
    pub fn from_specs(specs: &[ButtonSpec]) -> Result<Self, EngineError> {
        Ok(Self::new(ButtonRegistry::from_specs(specs)?))
    }

    /// Newline-terminates every command. Idempotent; call once before
    /// the first read.
    pub fn finalize(&mut self) {
        self.registry.finalize();
    }

    /// Drops any pending press and any stream in progress. Called when
    /// a session opens so the first read starts from Idle.
    pub fn reset(&mut self) {
        self.selection.reset();
    }

    /// Records an edge on a bound line.
    ///
    /// An asserting edge overwrites whatever press was pending; the
    /// stream in progress, if any, is never disturbed. Unknown lines
    /// are reported as [`EdgeOutcome::Ignored`] with no side effects.
    pub fn on_edge(&mut self, line: LineId, asserted: bool) -> EdgeOutcome {
        let button = match self.registry.find_by_line(line) {
            Some(button) => button,
            None => return EdgeOutcome::Ignored,
        };

        if asserted {
            self.selection.latch(button);
            EdgeOutcome::Latched { button }
        } else {
            EdgeOutcome::Released { button }
        }
    }

    /// Latches a press on `index` without any pin involvement, exactly
    /// as if its button had been pressed. Used for entries that have no
    /// wiring, such as a boot-time soundfont load.
    pub fn select(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.registry.len() {
            return Err(EngineError::UnknownButton);
        }
        self.selection.latch(index);
        Ok(())
    }

    /// One step of the read protocol. Returns how many bytes were
    /// placed at the front of `buf`.
    ///
    /// Idle with no press pending emits a single [`IDLE_SENTINEL`]
    /// byte. Idle with a press pending adopts it and starts streaming
    /// that button's command; an in-progress stream continues where it
    /// left off. The step back to idle happens in the same call that
    /// delivers the last byte, so a newly latched press can never
    /// interleave with a command already on the wire.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }

        let pos = match self.selection.stream {
            Some(pos) => pos,
            None => match self.selection.take_pending() {
                Some(button) => StreamPos { button, cursor: 0 },
                None => {
                    buf[0] = IDLE_SENTINEL;
                    return 1;
                }
            },
        };

        let message = self
            .registry
            .get(pos.button)
            .expect("latched indices are validated against the registry")
            .command
            .as_bytes();

        let remaining = message.len() - pos.cursor;
        if buf.len() >= remaining {
            buf[..remaining].copy_from_slice(&message[pos.cursor..]);
            self.selection.stream = None;
            remaining
        } else {
            let take = buf.len();
            buf[..take].copy_from_slice(&message[pos.cursor..pos.cursor + take]);
            self.selection.stream = Some(StreamPos {
                button: pos.button,
                cursor: pos.cursor + take,
            });
            take
        }
    }

    /// True while a command is partway through delivery.
    pub fn is_streaming(&self) -> bool {
        self.selection.stream.is_some()
    }

    /// The button index latched and not yet adopted, if any.
    pub fn pending(&self) -> Option<usize> {
        self.selection.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOAD_SOUNDFONT: &str = "load /usr/share/sounds/sf2/TimGM6mb.sf2";

    /// Engine over the demo table with sessions opened the way the
    /// lifecycle layer does it: finalize, reset, stamp the wired rows.
    fn demo_engine() -> (SelectEngine, LineId, LineId) {
        let mut engine = SelectEngine::from_specs(&[
            ButtonSpec::bare(LOAD_SOUNDFONT),
            ButtonSpec::wired("select 0 1 0 0", 6, 12),
            ButtonSpec::wired("select 0 2 0 16", 13, 16),
        ])
        .unwrap();
        engine.finalize();
        engine.reset();
        let first = engine.registry.attach_line(1).unwrap();
        let second = engine.registry.attach_line(2).unwrap();
        (engine, first, second)
    }

    /// Reads until the engine goes idle, concatenating the chunks.
    fn drain(engine: &mut SelectEngine, chunk: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = engine.read(&mut buf);
            out.extend_from_slice(&buf[..n]);
            if !engine.is_streaming() {
                return out;
            }
        }
    }

    // ── Idle behaviour ──────────────────────────────────────────────

    #[test]
    fn idle_read_emits_a_single_sentinel_byte() {
        let (mut engine, _, _) = demo_engine();

        for capacity in [1usize, 4, 64] {
            let mut buf = vec![0xAAu8; capacity];
            assert_eq!(engine.read(&mut buf), 1);
            assert_eq!(buf[0], IDLE_SENTINEL);
            assert!(!engine.is_streaming());
        }
    }

    #[test]
    fn empty_buffer_reads_nothing_and_changes_nothing() {
        let (mut engine, first, _) = demo_engine();
        engine.on_edge(first, true);

        assert_eq!(engine.read(&mut []), 0);
        assert_eq!(engine.pending(), Some(1));

        // The press is still there for the next real read.
        assert_eq!(drain(&mut engine, 64), b"select 0 1 0 0\n");
    }

    // ── Press to stream ─────────────────────────────────────────────

    #[test]
    fn press_streams_the_whole_command_in_one_large_read() {
        let (mut engine, first, _) = demo_engine();

        assert_eq!(engine.on_edge(first, true), EdgeOutcome::Latched { button: 1 });

        let mut buf = [0u8; 64];
        let n = engine.read(&mut buf);
        assert_eq!(&buf[..n], b"select 0 1 0 0\n");

        // Delivered exactly once; the engine is idle again.
        let mut buf = [0u8; 64];
        assert_eq!(engine.read(&mut buf), 1);
        assert_eq!(buf[0], IDLE_SENTINEL);
    }

    #[test]
    fn exact_capacity_completes_the_transfer_in_one_call() {
        let (mut engine, first, _) = demo_engine();
        engine.on_edge(first, true);

        let mut buf = [0u8; 15];
        assert_eq!(engine.read(&mut buf), 15);
        assert_eq!(&buf, b"select 0 1 0 0\n");
        assert!(!engine.is_streaming());
    }

    #[test]
    fn chunked_reads_reassemble_the_command() {
        let (mut engine, first, _) = demo_engine();
        engine.on_edge(first, true);

        let mut buf = [0u8; 5];
        assert_eq!(engine.read(&mut buf), 5);
        assert_eq!(&buf, b"selec");
        assert!(engine.is_streaming());

        assert_eq!(engine.read(&mut buf), 5);
        assert_eq!(&buf, b"t 0 1");
        assert!(engine.is_streaming());

        let mut tail = [0u8; 64];
        let n = engine.read(&mut tail);
        assert_eq!(&tail[..n], b" 0 0\n");
        assert!(!engine.is_streaming());

        let mut buf = [0u8; 1];
        assert_eq!(engine.read(&mut buf), 1);
        assert_eq!(buf[0], IDLE_SENTINEL);
    }

    #[test]
    fn single_byte_reads_eventually_deliver_everything() {
        let (mut engine, _, second) = demo_engine();
        engine.on_edge(second, true);

        assert_eq!(drain(&mut engine, 1), b"select 0 2 0 16\n");
    }

    // ── Press coalescing ────────────────────────────────────────────

    #[test]
    fn rapid_presses_coalesce_to_the_latest() {
        let (mut engine, first, second) = demo_engine();

        engine.on_edge(first, true);
        engine.on_edge(second, true);

        assert_eq!(drain(&mut engine, 64), b"select 0 2 0 16\n");

        // The overwritten press is gone, not queued.
        let mut buf = [0u8; 64];
        assert_eq!(engine.read(&mut buf), 1);
        assert_eq!(buf[0], IDLE_SENTINEL);
    }

    #[test]
    fn press_mid_stream_waits_for_the_current_transfer() {
        let (mut engine, first, second) = demo_engine();
        engine.on_edge(first, true);

        let mut head = [0u8; 5];
        assert_eq!(engine.read(&mut head), 5);
        assert_eq!(&head, b"selec");

        // Latched while streaming: pending, but the stream is untouched.
        assert_eq!(engine.on_edge(second, true), EdgeOutcome::Latched { button: 2 });
        assert!(engine.is_streaming());

        let mut tail = [0u8; 64];
        let n = engine.read(&mut tail);
        assert_eq!(&tail[..n], b"t 0 1 0 0\n");

        // Only now does the second press get its turn.
        assert_eq!(drain(&mut engine, 64), b"select 0 2 0 16\n");
    }

    // ── Edge resolution ─────────────────────────────────────────────

    #[test]
    fn release_edges_are_observed_but_never_latch() {
        let (mut engine, first, _) = demo_engine();

        assert_eq!(engine.on_edge(first, false), EdgeOutcome::Released { button: 1 });
        assert_eq!(engine.pending(), None);

        let mut buf = [0u8; 64];
        assert_eq!(engine.read(&mut buf), 1);
        assert_eq!(buf[0], IDLE_SENTINEL);
    }

    #[test]
    fn lines_from_a_closed_session_are_ignored() {
        let (mut engine, first, _) = demo_engine();
        engine.registry.clear_lines();

        assert_eq!(engine.on_edge(first, true), EdgeOutcome::Ignored);
        assert_eq!(engine.pending(), None);
    }

    // ── Programmatic selection ──────────────────────────────────────

    #[test]
    fn select_latches_without_any_wiring() {
        let (mut engine, _, _) = demo_engine();

        engine.select(0).unwrap();

        let mut expected = Vec::from(LOAD_SOUNDFONT.as_bytes());
        expected.push(b'\n');
        assert_eq!(drain(&mut engine, 64), expected);
    }

    #[test]
    fn select_rejects_indices_past_the_table() {
        let (mut engine, _, _) = demo_engine();
        assert_eq!(engine.select(3), Err(EngineError::UnknownButton));
        assert_eq!(engine.pending(), None);
    }

    // ── Session reset ───────────────────────────────────────────────

    #[test]
    fn reset_discards_a_stream_in_progress() {
        let (mut engine, first, second) = demo_engine();
        engine.on_edge(first, true);

        let mut buf = [0u8; 5];
        assert_eq!(engine.read(&mut buf), 5);
        engine.on_edge(second, true);

        engine.reset();

        // Neither the half-sent stream nor the pending press survives.
        let mut buf = [0u8; 64];
        assert_eq!(engine.read(&mut buf), 1);
        assert_eq!(buf[0], IDLE_SENTINEL);
    }
}
