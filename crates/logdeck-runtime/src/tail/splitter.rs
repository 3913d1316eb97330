//! Byte-to-line splitting for tailed files.
//!
//! Server processes can write non-UTF8 bytes, so lines are split on raw `\n`
//! bytes and decoded lossily.

/// Result of splitting one chunk of bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split {
    /// Complete lines, in file order, without their terminators.
    pub lines: Vec<String>,
    /// Bytes of the chunk covered by `lines`. The rest is a partial line.
    pub consumed: usize,
}

/// Splits chunks into complete lines and reports how far it got.
///
/// The splitter is stateless: the caller advances its file offset by
/// `consumed` and re-reads the held-back partial line on the next poll.
#[derive(Debug, Clone, Copy)]
pub struct LineSplitter {
    max_line_bytes: usize,
}

impl LineSplitter {
    /// `max_line_bytes` bounds a line without a terminator: a chunk at least
    /// that long with no `\n` is flushed as one line.
    pub const fn new(max_line_bytes: usize) -> Self {
        Self {
            max_line_bytes: if max_line_bytes == 0 { 1 } else { max_line_bytes },
        }
    }

    pub fn split(&self, chunk: &[u8]) -> Split {
        let mut split = Split::default();
        let mut start = 0;

        while let Some(pos) = chunk[start..].iter().position(|&b| b == b'\n') {
            let end = start + pos;
            split.lines.push(decode_line(&chunk[start..end]));
            start = end + 1;
        }
        split.consumed = start;

        if split.consumed == 0 && chunk.len() >= self.max_line_bytes {
            split.lines.push(decode_line(chunk));
            split.consumed = chunk.len();
        }

        split
    }
}

impl Default for LineSplitter {
    fn default() -> Self {
        Self::new(super::MAX_READ_PER_POLL)
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
