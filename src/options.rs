//! Per-call retrieval options.

/// Process identifier.
pub type Pid = u32;

/// Byte separating consecutive arguments in a buffer.
pub const TERMINATOR: u8 = 0;

/// Byte written over interior terminators when substitution is requested.
pub const SUBSTITUTE: u8 = b' ';

/// Options for a single buffer retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalOptions {
    pub pid: Pid,
    /// Leading arguments to omit.
    pub skip: u32,
    /// Replace interior terminators with spaces.
    pub substitute_terminators: bool,
}

impl RetrievalOptions {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            skip: 0,
            substitute_terminators: false,
        }
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    pub fn substitute_terminators(mut self, substitute: bool) -> Self {
        self.substitute_terminators = substitute;
        self
    }
}
