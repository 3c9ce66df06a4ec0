//! LED output abstraction and the in-memory backend.
//!
//! Every backend keeps a pending buffer that `set`/`clear_all` edit freely;
//! only [`LedOutput::commit`] pushes it to the device.

use strip_map::Color;

use crate::error::DeviceError;

// ════════════════════════════════════════════════════════════════════════════
// LedOutput
// ════════════════════════════════════════════════════════════════════════════

/// An addressable strip with an explicit commit step.
///
/// Backends release their hardware in `Drop`, leaving the strip dark.
pub trait LedOutput {
    /// Number of LEDs on the strip.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set LED `index` to `color`, or switch it off for `None`.
    /// Indices past the end are ignored.
    fn set(&mut self, index: usize, color: Option<Color>);

    /// Switch every LED off.
    fn clear_all(&mut self);

    /// Push the pending buffer to the device.
    fn commit(&mut self) -> Result<(), DeviceError>;

    /// Called once per loop iteration whether or not anything changed.
    /// Backends with an event pump to service do it here.
    fn idle(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }
}

impl<T: LedOutput + ?Sized> LedOutput for Box<T> {
    fn len(&self) -> usize { (**self).len() }
    fn set(&mut self, index: usize, color: Option<Color>) { (**self).set(index, color) }
    fn clear_all(&mut self) { (**self).clear_all() }
    fn commit(&mut self) -> Result<(), DeviceError> { (**self).commit() }
    fn idle(&mut self) -> Result<(), DeviceError> { (**self).idle() }
}

// ════════════════════════════════════════════════════════════════════════════
// MemoryOutput — headless backend
// ════════════════════════════════════════════════════════════════════════════

/// A strip that only exists in memory.  Useful headless (logs show what
/// would light) and as the output in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryOutput {
    pending:   Vec<Option<Color>>,
    committed: Vec<Option<Color>>,
    commits:   usize,
}

impl MemoryOutput {
    pub fn new(len: usize) -> Self {
        MemoryOutput {
            pending:   vec![None; len],
            committed: vec![None; len],
            commits:   0,
        }
    }

    /// State as of the last commit.
    pub fn committed(&self) -> &[Option<Color>] { &self.committed }

    /// Number of commits so far.
    pub fn commits(&self) -> usize { self.commits }

    /// Number of LEDs lit as of the last commit.
    pub fn lit(&self) -> usize {
        self.committed.iter().filter(|c| c.is_some()).count()
    }
}

impl LedOutput for MemoryOutput {
    fn len(&self) -> usize { self.pending.len() }

    fn set(&mut self, index: usize, color: Option<Color>) {
        if let Some(slot) = self.pending.get_mut(index) {
            *slot = color;
        }
    }

    fn clear_all(&mut self) {
        self.pending.fill(None);
    }

    fn commit(&mut self) -> Result<(), DeviceError> {
        self.committed.clone_from(&self.pending);
        self.commits += 1;
        tracing::trace!(lit = self.lit(), "memory strip committed");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
