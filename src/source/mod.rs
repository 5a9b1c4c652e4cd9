//! Argument sources: where the raw argument region of a process comes from.
//!
//! A source hands out one of two shapes per call:
//!
//! - [`BoundedBuffer`]: an arena plus inclusive start/end markers.
//! - [`PointerTable`]: an arena plus the offset at which each argument starts.
//!
//! Whatever a source hands out must be given back through
//! [`ArgumentSource::release`] exactly once.

mod fixture;
pub mod procargs;
#[cfg(target_os = "macos")]
mod sysctl;

pub use fixture::FixtureSource;
#[cfg(target_os = "macos")]
pub use sysctl::SysctlSource;

use crate::error::RawSignal;
use crate::options::{Pid, RetrievalOptions};

/// Contiguous argument bytes delimited by inclusive markers.
///
/// Both markers absent means zero arguments. Markers are offsets into the
/// arena; the arena may hold bytes outside the marked range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedBuffer {
    arena: Vec<u8>,
    start: Option<usize>,
    end: Option<usize>,
}

impl BoundedBuffer {
    pub fn new(arena: Vec<u8>, start: Option<usize>, end: Option<usize>) -> Self {
        Self { arena, start, end }
    }

    /// A buffer describing zero arguments.
    pub fn empty(arena: Vec<u8>) -> Self {
        Self::new(arena, None, None)
    }

    pub fn arena(&self) -> &[u8] {
        &self.arena
    }

    /// `(start, end)` when both markers are present.
    pub fn markers(&self) -> Option<(usize, usize)> {
        Some((self.start?, self.end?))
    }
}

/// Offsets of each argument inside one arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTable {
    arena: Vec<u8>,
    entries: Vec<usize>,
    count: usize,
}

impl PointerTable {
    pub fn new(arena: Vec<u8>, entries: Vec<usize>, count: usize) -> Self {
        Self {
            arena,
            entries,
            count,
        }
    }

    pub fn arena(&self) -> &[u8] {
        &self.arena
    }

    /// Argument start offsets, ascending.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// Number of valid entries as reported by the source.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Anything a source has handed out and expects back.
#[derive(Debug)]
pub enum Acquired {
    Buffer(BoundedBuffer),
    Table(PointerTable),
}

impl Acquired {
    pub fn len(&self) -> usize {
        match self {
            Acquired::Buffer(buffer) => buffer.arena.len(),
            Acquired::Table(table) => table.arena.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Platform primitive that copies another process's argument region.
pub trait ArgumentSource {
    /// Fetch the arguments of `options.pid` with skip and substitution applied.
    fn fetch_buffer(&self, options: &RetrievalOptions) -> Result<BoundedBuffer, RawSignal>;

    /// Fetch every argument of `pid` as a table of start offsets.
    fn fetch_pointer_table(&self, pid: Pid) -> Result<PointerTable, RawSignal>;

    /// Return a buffer or table. Called exactly once per successful fetch.
    fn release(&self, acquired: Acquired);
}

impl<S: ArgumentSource + ?Sized> ArgumentSource for &S {
    fn fetch_buffer(&self, options: &RetrievalOptions) -> Result<BoundedBuffer, RawSignal> {
        (**self).fetch_buffer(options)
    }

    fn fetch_pointer_table(&self, pid: Pid) -> Result<PointerTable, RawSignal> {
        (**self).fetch_pointer_table(pid)
    }

    fn release(&self, acquired: Acquired) {
        (**self).release(acquired)
    }
}
