//! Table formatting utilities for CLI output.

/// Shorten a string to at most `max_len` characters by eliding its middle.
///
/// Paths keep their most telling parts (root and file name) this way.
///
/// ```rust
/// use logdeck_cli::presentation::truncate_middle;
///
/// assert_eq!(truncate_middle("short", 10), "short");
/// assert_eq!(truncate_middle("/var/log/server/file.txt", 15), "/var/l...le.txt");
/// ```
pub fn truncate_middle(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }

    let keep = max_len - 3;
    let head = keep.div_ceil(2);
    let tail = keep - head;
    let start: String = s.chars().take(head).collect();
    let end: String = s.chars().skip(len - tail).collect();
    format!("{start}...{end}")
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}
