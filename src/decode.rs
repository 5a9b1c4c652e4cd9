//! Pointer-table decoding: argument start offsets → owned strings.

use scopeguard::guard;

use crate::error::ArgvError;
use crate::options::{Pid, TERMINATOR};
use crate::source::{Acquired, ArgumentSource, PointerTable};

/// Byte range of one argument inside the table's arena, terminator excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

/// Compute the span of every argument in `table`.
///
/// Arguments before the last are bounded by the next entry, less the one
/// terminator between them. The last argument runs to its own terminator,
/// which must lie inside the arena.
pub fn spans(table: &PointerTable) -> Result<Vec<Span>, ArgvError> {
    let arena = table.arena();
    let entries = table
        .entries()
        .get(..table.count())
        .ok_or(ArgvError::MalformedSourceData)?;

    let mut spans = Vec::with_capacity(entries.len());
    for (i, &offset) in entries.iter().enumerate() {
        let len = match entries.get(i + 1) {
            Some(&next) => {
                let len = next
                    .checked_sub(offset)
                    .and_then(|delta| delta.checked_sub(1))
                    .ok_or(ArgvError::MalformedSourceData)?;
                if arena.get(offset + len) != Some(&TERMINATOR) {
                    return Err(ArgvError::MalformedSourceData);
                }
                len
            }
            None => arena
                .get(offset..)
                .and_then(|tail| tail.iter().position(|&b| b == TERMINATOR))
                .ok_or(ArgvError::MalformedSourceData)?,
        };
        spans.push(Span { offset, len });
    }
    Ok(spans)
}

/// Fetch the pointer table for `pid` and copy each argument out.
///
/// The table is released exactly once whatever the outcome.
pub fn decode_list<S>(source: &S, pid: Pid) -> Result<Vec<String>, ArgvError>
where
    S: ArgumentSource + ?Sized,
{
    let table = source.fetch_pointer_table(pid)?;
    let table = guard(table, |table| source.release(Acquired::Table(table)));

    if table.count() == 0 {
        return Ok(Vec::new());
    }

    let arena = table.arena();
    let args = spans(&table)?
        .into_iter()
        .map(|span| String::from_utf8_lossy(&arena[span.offset..span.offset + span.len]).into_owned())
        .collect::<Vec<_>>();

    tracing::trace!(pid, argc = args.len(), "Decoded argument list");
    Ok(args)
}
