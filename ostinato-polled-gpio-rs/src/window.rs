//! The mapping seam: one register window per touch.
//!
//! The polled variant deliberately maps a 4-byte physical window for each
//! register access and unmaps it immediately afterwards — simplicity over
//! performance. The traits here capture that shape so the register logic
//! is testable against a simulated GPIO block; the surrounding system
//! supplies the real `/dev/mem`-style provider.

/// A mapped 32-bit register. Dropping the window unmaps it.
pub trait RegisterWindow {
    /// Volatile read of the mapped register.
    fn read(&self) -> u32;

    /// Volatile write to the mapped register.
    fn write(&mut self, value: u32);
}

/// Maps physical register addresses, one window at a time.
///
/// Each window covers [`WINDOW_LEN`](crate::registers::WINDOW_LEN) bytes
/// and lives for a single operation; nothing is cached across calls.
pub trait WindowProvider {
    /// The mapped-window type.
    type Window: RegisterWindow;
    /// Why a mapping was refused.
    type Error;

    /// Map the 4-byte register at `physical`.
    fn map(&mut self, physical: u32) -> Result<Self::Window, Self::Error>;
}
