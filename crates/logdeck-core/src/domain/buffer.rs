//! Bounded per-tab line buffer.

use std::collections::VecDeque;

/// Maximum number of lines retained per tab.
pub const MAX_RETAINED_LINES: usize = 2500;

/// A retained line and whether the current filter shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedLine {
    pub text: String,
    pub visible: bool,
}

/// Ring buffer of the lines shown in one tab.
///
/// Holds at most `capacity` lines; the oldest line is evicted first.
#[derive(Debug, Clone)]
pub struct TabBuffer {
    lines: VecDeque<BufferedLine>,
    capacity: usize,
    /// Whether the view was following the bottom the last time this tab was
    /// active or received a line while active.
    pub is_at_bottom: bool,
}

impl TabBuffer {
    /// Create an empty buffer. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(MAX_RETAINED_LINES)),
            capacity,
            is_at_bottom: true,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    /// Remove and return the oldest line.
    pub fn evict_oldest(&mut self) -> Option<BufferedLine> {
        self.lines.pop_front()
    }

    /// Append a line, evicting the oldest one if the buffer is full.
    ///
    /// Returns the evicted line, if any.
    pub fn push(&mut self, line: BufferedLine) -> Option<BufferedLine> {
        let evicted = if self.is_full() {
            self.evict_oldest()
        } else {
            None
        };
        self.lines.push_back(line);
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &BufferedLine> {
        self.lines.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BufferedLine> {
        self.lines.iter_mut()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for TabBuffer {
    fn default() -> Self {
        Self::new(MAX_RETAINED_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> BufferedLine {
        BufferedLine {
            text: text.to_string(),
            visible: true,
        }
    }

    #[test]
    fn test_push_below_capacity_keeps_everything() {
        let mut buffer = TabBuffer::new(3);
        assert!(buffer.push(line("a")).is_none());
        assert!(buffer.push(line("b")).is_none());
        assert_eq!(buffer.len(), 2);
        assert!(!buffer.is_full());
    }

    #[test]
    fn test_push_at_capacity_evicts_oldest() {
        let mut buffer = TabBuffer::new(2);
        buffer.push(line("a"));
        buffer.push(line("b"));
        let evicted = buffer.push(line("c"));
        assert_eq!(evicted.map(|l| l.text), Some("a".to_string()));
        let texts: Vec<&str> = buffer.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_default_capacity_is_retention_cap() {
        let mut buffer = TabBuffer::default();
        for i in 0..MAX_RETAINED_LINES + 7 {
            buffer.push(line(&i.to_string()));
        }
        assert_eq!(buffer.len(), MAX_RETAINED_LINES);
        assert_eq!(buffer.iter().next().map(|l| l.text.as_str()), Some("7"));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let buffer = TabBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        assert!(buffer.is_at_bottom);
    }
}
