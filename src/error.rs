//! Error taxonomy for argument retrieval.
//!
//! Every failure an [`ArgumentSource`](crate::source::ArgumentSource) can
//! report is a [`RawSignal`] carrying a platform errno. [`classify`] folds
//! those into the closed [`ArgvError`] set that callers match on.

use std::fmt;
use std::io;

use thiserror::Error;

/// Ways a single retrieval call can fail.
///
/// Variants carry no payload and compare by kind only.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgvError {
    /// The caller may not inspect the target process.
    #[error("permission denied reading arguments of target process")]
    PermissionDenied,

    /// No process exists with the requested pid.
    #[error("no such process")]
    NoSuchProcess,

    /// The source produced data violating the buffer layout invariants.
    #[error("argument data returned by the source is malformed")]
    MalformedSourceData,

    /// The argument region is larger than the source will copy.
    #[error("argument region exceeds the maximum argument length")]
    ArgumentsTooLarge,

    /// More leading arguments were skipped than the process has.
    #[error("skip count exceeds the number of arguments")]
    SkipExceedsAvailable,
}

impl ArgvError {
    /// Canonical errno for this kind.
    pub fn errno(self) -> i32 {
        match self {
            ArgvError::PermissionDenied => libc::EPERM,
            ArgvError::NoSuchProcess => libc::ESRCH,
            ArgvError::MalformedSourceData => libc::EINVAL,
            ArgvError::ArgumentsTooLarge => libc::EOVERFLOW,
            ArgvError::SkipExceedsAvailable => libc::ERANGE,
        }
    }
}

impl From<ArgvError> for io::Error {
    fn from(err: ArgvError) -> Self {
        io::Error::from_raw_os_error(err.errno())
    }
}

/// Failure signal reported by an argument source, as a raw errno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSignal(pub i32);

impl RawSignal {
    pub fn permission_denied() -> Self {
        RawSignal(libc::EPERM)
    }

    pub fn no_such_process() -> Self {
        RawSignal(libc::ESRCH)
    }

    pub fn malformed() -> Self {
        RawSignal(libc::EINVAL)
    }

    pub fn too_large() -> Self {
        RawSignal(libc::EOVERFLOW)
    }

    pub fn skip_out_of_range() -> Self {
        RawSignal(libc::ERANGE)
    }

    /// Capture `errno` of the last failed libc call.
    pub fn last_os_error() -> Self {
        Self::from_io(&io::Error::last_os_error())
    }

    /// Signal for an I/O error; errors without an OS code count as malformed.
    pub fn from_io(err: &io::Error) -> Self {
        RawSignal(err.raw_os_error().unwrap_or(libc::EINVAL))
    }
}

impl fmt::Display for RawSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errno {} ({})", self.0, io::Error::from_raw_os_error(self.0))
    }
}

/// Map a source failure onto the error taxonomy.
///
/// Total over all errno values: anything not recognised is reported as
/// [`ArgvError::MalformedSourceData`].
pub fn classify(signal: RawSignal) -> ArgvError {
    match signal.0 {
        libc::EPERM | libc::EACCES => ArgvError::PermissionDenied,
        libc::ESRCH => ArgvError::NoSuchProcess,
        libc::EINVAL | libc::EFAULT | libc::EIO => ArgvError::MalformedSourceData,
        libc::EOVERFLOW | libc::E2BIG | libc::ENOMEM => ArgvError::ArgumentsTooLarge,
        libc::ERANGE => ArgvError::SkipExceedsAvailable,
        _ => {
            tracing::warn!(%signal, "Unmapped source signal, reporting as malformed data");
            ArgvError::MalformedSourceData
        }
    }
}

impl From<RawSignal> for ArgvError {
    fn from(signal: RawSignal) -> Self {
        classify(signal)
    }
}
