//! In-memory argument source.
//!
//! Serves one fake process whose region is laid out exactly like the
//! kernel's, so everything downstream of the source runs unchanged.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::RawSignal;
use crate::options::{Pid, RetrievalOptions};
use crate::source::{procargs, Acquired, ArgumentSource, BoundedBuffer, PointerTable};

/// Source answering for a single pid with a fixed region.
#[derive(Debug)]
pub struct FixtureSource {
    pid: Pid,
    region: Vec<u8>,
    max_len: Option<usize>,
    fetches: AtomicUsize,
    releases: AtomicUsize,
}

impl FixtureSource {
    /// Fake process `pid` started with `args`.
    ///
    /// The region is laid out like the kernel's, where NUL padding follows
    /// the exec path. An empty `args[0]` cannot be told apart from that
    /// padding, so such a fixture reports `MalformedSourceData` on every
    /// fetch, exactly as a real process with an empty `argv[0]` would.
    pub fn new<A: AsRef<[u8]>>(pid: Pid, args: &[A]) -> Self {
        let exec_path: &[u8] = match args.first() {
            Some(arg0) => arg0.as_ref(),
            None => b"/usr/bin/true",
        };
        Self::from_region(pid, procargs::encode(exec_path, args, &[]))
    }

    /// Serve a raw region as-is, well-formed or not.
    pub fn from_region(pid: Pid, region: Vec<u8>) -> Self {
        Self {
            pid,
            region,
            max_len: None,
            fetches: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    /// Refuse regions longer than `max_len` bytes, like `KERN_ARGMAX`.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Successful fetches so far.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Releases so far.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Fetched buffers not yet released.
    pub fn outstanding(&self) -> usize {
        self.fetches().saturating_sub(self.releases())
    }

    fn copy_region(&self, pid: Pid) -> Result<Vec<u8>, RawSignal> {
        if pid == 0 {
            return Err(RawSignal::permission_denied());
        }
        if pid != self.pid {
            return Err(RawSignal::no_such_process());
        }
        if self.max_len.is_some_and(|max| self.region.len() > max) {
            return Err(RawSignal::too_large());
        }
        Ok(self.region.clone())
    }

    fn record_fetch<T>(&self, result: Result<T, RawSignal>) -> Result<T, RawSignal> {
        if result.is_ok() {
            self.fetches.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

impl ArgumentSource for FixtureSource {
    fn fetch_buffer(&self, options: &RetrievalOptions) -> Result<BoundedBuffer, RawSignal> {
        let result = self.copy_region(options.pid).and_then(|region| {
            procargs::bounded_buffer(region, options.skip, options.substitute_terminators)
        });
        self.record_fetch(result)
    }

    fn fetch_pointer_table(&self, pid: Pid) -> Result<PointerTable, RawSignal> {
        let result = self.copy_region(pid).and_then(procargs::pointer_table);
        self.record_fetch(result)
    }

    fn release(&self, acquired: Acquired) {
        tracing::trace!(pid = self.pid, bytes = acquired.len(), "Fixture region released");
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_zero_is_permission_denied() {
        let source = FixtureSource::new(10, &["prog"]);
        let err = source.fetch_pointer_table(0).unwrap_err();
        assert_eq!(err, RawSignal::permission_denied());
        assert_eq!(source.fetches(), 0);
    }

    #[test]
    fn test_other_pid_is_no_such_process() {
        let source = FixtureSource::new(10, &["prog"]);
        let err = source.fetch_buffer(&RetrievalOptions::new(11)).unwrap_err();
        assert_eq!(err, RawSignal::no_such_process());
    }

    #[test]
    fn test_oversized_region_is_too_large() {
        let source = FixtureSource::new(10, &["prog", "a-long-argument"]).with_max_len(8);
        let err = source.fetch_pointer_table(10).unwrap_err();
        assert_eq!(err, RawSignal::too_large());
    }

    #[test]
    fn test_empty_first_arg_is_absorbed_into_padding() {
        let source = FixtureSource::new(10, &["", "x"]);
        assert_eq!(source.fetch_pointer_table(10).unwrap_err(), RawSignal::malformed());
        let err = source.fetch_buffer(&RetrievalOptions::new(10)).unwrap_err();
        assert_eq!(err, RawSignal::malformed());
        assert_eq!(source.fetches(), 0);
    }

    #[test]
    fn test_counts_fetches_and_releases() {
        let source = FixtureSource::new(10, &["prog"]);
        let table = source.fetch_pointer_table(10).unwrap();
        assert_eq!(source.outstanding(), 1);
        source.release(Acquired::Table(table));
        assert_eq!(source.fetches(), 1);
        assert_eq!(source.releases(), 1);
        assert_eq!(source.outstanding(), 0);
    }
}
