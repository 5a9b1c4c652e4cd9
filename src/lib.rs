//! Fetch the arguments of other processes in multiple formats.
//!
//! Three shapes are offered:
//!
//! - [`Getargv::as_bytes`]: the raw argument bytes, optionally skipping
//!   leading arguments and turning NUL separators into spaces.
//! - [`Getargv::as_string`]: the same bytes as text.
//! - [`Getargv::as_strings`]: one owned string per argument.
//!
//! On macOS the free functions [`as_bytes`], [`as_string`] and
//! [`as_strings`] read from the kernel directly.

pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod logging;
pub mod options;
pub mod source;

pub use error::{classify, ArgvError, RawSignal};
pub use options::{Pid, RetrievalOptions};
pub use source::{ArgumentSource, FixtureSource};

#[cfg(target_os = "macos")]
pub use source::SysctlSource;

/// Argument retrieval over a particular source.
#[derive(Debug, Clone, Default)]
pub struct Getargv<S> {
    source: S,
}

impl<S: ArgumentSource> Getargv<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Arguments of `pid` as bytes, with `skip` leading arguments dropped and
    /// NUL separators replaced by spaces if `nuls` is true.
    ///
    /// Fails if:
    /// - the caller may not view the arguments of `pid`
    /// - `pid` does not exist
    /// - the source returns the arguments in an invalid format
    /// - the arguments are longer than the source will copy
    /// - `skip` is larger than the number of arguments
    pub fn as_bytes(&self, pid: Pid, skip: u32, nuls: bool) -> Result<Vec<u8>, ArgvError> {
        self.as_bytes_with(&RetrievalOptions::new(pid).skip(skip).substitute_terminators(nuls))
    }

    pub fn as_bytes_with(&self, options: &RetrievalOptions) -> Result<Vec<u8>, ArgvError> {
        extract::extract_bytes(&self.source, options)
    }

    /// Arguments of `pid` as text. Fails like [`Getargv::as_bytes`].
    pub fn as_string(&self, pid: Pid, skip: u32, nuls: bool) -> Result<String, ArgvError> {
        self.as_string_with(&RetrievalOptions::new(pid).skip(skip).substitute_terminators(nuls))
    }

    pub fn as_string_with(&self, options: &RetrievalOptions) -> Result<String, ArgvError> {
        extract::extract_text(&self.source, options)
    }

    /// Arguments of `pid`, one string each, in their original order.
    ///
    /// Fails like [`Getargv::as_bytes`] except that nothing is skipped.
    pub fn as_strings(&self, pid: Pid) -> Result<Vec<String>, ArgvError> {
        decode::decode_list(&self.source, pid)
    }
}

#[cfg(target_os = "macos")]
impl Getargv<SysctlSource> {
    /// Retrieval from the running kernel.
    pub fn native() -> Self {
        Self::new(SysctlSource::new())
    }
}

/// [`Getargv::as_bytes`] against the running kernel.
#[cfg(target_os = "macos")]
pub fn as_bytes(pid: Pid, skip: u32, nuls: bool) -> Result<Vec<u8>, ArgvError> {
    Getargv::native().as_bytes(pid, skip, nuls)
}

/// [`Getargv::as_string`] against the running kernel.
#[cfg(target_os = "macos")]
pub fn as_string(pid: Pid, skip: u32, nuls: bool) -> Result<String, ArgvError> {
    Getargv::native().as_string(pid, skip, nuls)
}

/// [`Getargv::as_strings`] against the running kernel.
#[cfg(target_os = "macos")]
pub fn as_strings(pid: Pid) -> Result<Vec<String>, ArgvError> {
    Getargv::native().as_strings(pid)
}
