//! Buffer extraction: bounded buffers → owned bytes or text.

use scopeguard::guard;

use crate::error::ArgvError;
use crate::options::{RetrievalOptions, TERMINATOR};
use crate::source::{Acquired, ArgumentSource, BoundedBuffer};

/// Copy the marked range of a buffer.
///
/// Absent markers mean zero arguments and yield an empty vector. Markers
/// that are reversed, point past the arena, or end on anything but a
/// terminator are malformed.
fn copy_marked(buffer: &BoundedBuffer) -> Result<Vec<u8>, ArgvError> {
    let Some((start, end)) = buffer.markers() else {
        return Ok(Vec::new());
    };

    if start > end {
        return Err(ArgvError::MalformedSourceData);
    }

    let bytes = buffer
        .arena()
        .get(start..=end)
        .ok_or(ArgvError::MalformedSourceData)?;
    if bytes.last() != Some(&TERMINATOR) {
        return Err(ArgvError::MalformedSourceData);
    }
    Ok(bytes.to_vec())
}

/// Fetch a bounded buffer for `options` and copy out its bytes.
///
/// The buffer is released exactly once whatever the outcome.
pub fn extract_bytes<S>(source: &S, options: &RetrievalOptions) -> Result<Vec<u8>, ArgvError>
where
    S: ArgumentSource + ?Sized,
{
    let buffer = source.fetch_buffer(options)?;
    let buffer = guard(buffer, |buffer| source.release(Acquired::Buffer(buffer)));

    let bytes = copy_marked(&buffer)?;
    tracing::trace!(pid = options.pid, bytes = bytes.len(), "Extracted argument bytes");
    Ok(bytes)
}

/// Same as [`extract_bytes`], read as text.
///
/// Invalid UTF-8 sequences are replaced, never rejected.
pub fn extract_text<S>(source: &S, options: &RetrievalOptions) -> Result<String, ArgvError>
where
    S: ArgumentSource + ?Sized,
{
    let bytes = extract_bytes(source, options)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}
