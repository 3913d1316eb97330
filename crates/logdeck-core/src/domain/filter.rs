//! Case-insensitive substring filter shared by both tabs.

/// The single active filter.
///
/// The needle is stored case-folded. An empty needle matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    needle: String,
}

impl FilterState {
    pub fn new(substring: &str) -> Self {
        Self {
            needle: substring.to_lowercase(),
        }
    }

    /// Replace the filter. Returns `true` if the folded needle changed.
    pub fn set(&mut self, substring: &str) -> bool {
        let folded = substring.to_lowercase();
        if folded == self.needle {
            return false;
        }
        self.needle = folded;
        true
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Whether a line with this text is visible under the filter.
    pub fn matches(&self, text: &str) -> bool {
        self.needle.is_empty() || text.to_lowercase().contains(&self.needle)
    }
}
