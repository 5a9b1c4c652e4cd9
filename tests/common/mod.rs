//! Shared test utilities and scripted argument sources.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use getargv::source::{Acquired, ArgumentSource, BoundedBuffer, PointerTable};
use getargv::{Pid, RawSignal, RetrievalOptions};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Source that replays a fixed answer and records every call.
pub struct ScriptedSource {
    buffer: Result<BoundedBuffer, RawSignal>,
    table: Result<PointerTable, RawSignal>,
    pub seen: Mutex<Vec<RetrievalOptions>>,
    fetches: AtomicUsize,
    releases: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(
        buffer: Result<BoundedBuffer, RawSignal>,
        table: Result<PointerTable, RawSignal>,
    ) -> Self {
        Self {
            buffer,
            table,
            seen: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    pub fn buffer(buffer: BoundedBuffer) -> Self {
        Self::new(Ok(buffer), Err(RawSignal::malformed()))
    }

    pub fn table(table: PointerTable) -> Self {
        Self::new(Err(RawSignal::malformed()), Ok(table))
    }

    pub fn failing(signal: RawSignal) -> Self {
        Self::new(Err(signal), Err(signal))
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl ArgumentSource for ScriptedSource {
    fn fetch_buffer(&self, options: &RetrievalOptions) -> Result<BoundedBuffer, RawSignal> {
        self.seen.lock().push(*options);
        let buffer = self.buffer.clone()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(buffer)
    }

    fn fetch_pointer_table(&self, pid: Pid) -> Result<PointerTable, RawSignal> {
        self.seen.lock().push(RetrievalOptions::new(pid));
        let table = self.table.clone()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(table)
    }

    fn release(&self, _acquired: Acquired) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Lay `args` out contiguously, each followed by a NUL, returning the arena
/// and the offset of every argument.
pub fn contiguous(args: &[&str]) -> (Vec<u8>, Vec<usize>) {
    let mut arena = Vec::new();
    let mut offsets = Vec::new();
    for arg in args {
        offsets.push(arena.len());
        arena.extend_from_slice(arg.as_bytes());
        arena.push(0);
    }
    (arena, offsets)
}

/// Create a temporary config file with the given contents.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
