//! Darwin `KERN_PROCARGS2` region layout.
//!
//! ```text
//! [argc: i32, native endian][exec path]\0[\0 padding][argv0]\0 ... [argvN]\0[env ...]
//! ```
//!
//! The parser turns a copied region into the buffer shapes handed out by
//! sources. Layout violations are reported as `EINVAL`, a skip past the end
//! of the arguments as `ERANGE`.

use crate::error::RawSignal;
use crate::options::{SUBSTITUTE, TERMINATOR};
use crate::source::{BoundedBuffer, PointerTable};

const ARGC_LEN: usize = std::mem::size_of::<i32>();

/// Start offset and terminator offset of each argument.
struct Layout {
    starts: Vec<usize>,
    last_terminator: Option<usize>,
}

fn find_terminator(region: &[u8], from: usize) -> Option<usize> {
    region
        .get(from..)?
        .iter()
        .position(|&b| b == TERMINATOR)
        .map(|pos| from + pos)
}

fn parse_layout(region: &[u8]) -> Result<Layout, RawSignal> {
    let argc_bytes: [u8; ARGC_LEN] = region
        .get(..ARGC_LEN)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(RawSignal::malformed)?;
    let argc = usize::try_from(i32::from_ne_bytes(argc_bytes)).map_err(|_| RawSignal::malformed())?;

    // Every argument needs at least its terminator byte.
    if argc > region.len() - ARGC_LEN {
        return Err(RawSignal::malformed());
    }

    let exec_path_end = find_terminator(region, ARGC_LEN).ok_or_else(RawSignal::malformed)?;
    let mut pos = exec_path_end + 1;
    while region.get(pos) == Some(&TERMINATOR) {
        pos += 1;
    }

    let mut starts = Vec::with_capacity(argc);
    let mut last_terminator = None;
    for _ in 0..argc {
        let terminator = find_terminator(region, pos).ok_or_else(RawSignal::malformed)?;
        starts.push(pos);
        last_terminator = Some(terminator);
        pos = terminator + 1;
    }

    Ok(Layout {
        starts,
        last_terminator,
    })
}

/// Build a [`BoundedBuffer`] over `region`, skipping `skip` leading arguments
/// and optionally replacing interior terminators with spaces.
///
/// The terminator after the last argument is left in place.
pub fn bounded_buffer(mut region: Vec<u8>, skip: u32, substitute: bool) -> Result<BoundedBuffer, RawSignal> {
    let layout = parse_layout(&region)?;
    let skip = usize::try_from(skip).map_err(|_| RawSignal::skip_out_of_range())?;

    if skip > layout.starts.len() {
        return Err(RawSignal::skip_out_of_range());
    }

    let (start, end) = match (layout.starts.get(skip), layout.last_terminator) {
        (Some(&start), Some(end)) => (start, end),
        _ => return Ok(BoundedBuffer::empty(region)),
    };

    if substitute {
        for byte in &mut region[start..end] {
            if *byte == TERMINATOR {
                *byte = SUBSTITUTE;
            }
        }
    }

    Ok(BoundedBuffer::new(region, Some(start), Some(end)))
}

/// Build a [`PointerTable`] holding the start offset of every argument.
pub fn pointer_table(region: Vec<u8>) -> Result<PointerTable, RawSignal> {
    let layout = parse_layout(&region)?;
    let count = layout.starts.len();
    Ok(PointerTable::new(region, layout.starts, count))
}

/// Lay out a region the way the kernel does, for in-memory sources.
pub fn encode<A: AsRef<[u8]>>(exec_path: &[u8], args: &[A], env: &[A]) -> Vec<u8> {
    let argc = i32::try_from(args.len()).unwrap_or(i32::MAX);
    let mut region = argc.to_ne_bytes().to_vec();
    region.extend_from_slice(exec_path);
    region.push(TERMINATOR);
    // Pad to pointer alignment like the kernel does after the exec path.
    while region.len() % std::mem::size_of::<usize>() != 0 {
        region.push(TERMINATOR);
    }
    for arg in args.iter().chain(env) {
        region.extend_from_slice(arg.as_ref());
        region.push(TERMINATOR);
    }
    region
}
