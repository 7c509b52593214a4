//! Offset to line conversion.

use memchr::memchr_iter;

/// Convert a byte offset into a 1-based line number.
///
/// Offsets past the end of `source` clamp to the last line.
#[inline]
pub fn line_at(source: &str, offset: u32) -> u32 {
    let end = (offset as usize).min(source.len());
    memchr_iter(b'\n', &source.as_bytes()[..end]).count() as u32 + 1
}
