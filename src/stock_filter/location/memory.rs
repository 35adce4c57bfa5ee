use super::Location;

/// A browser-like history kept in memory.
///
/// `navigate` pushes an entry and discards any forward history, as a real
/// navigation does.
#[derive(Debug, Clone)]
pub struct InMemoryLocation {
    entries: Vec<String>,
    cursor: usize,
}

impl InMemoryLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            entries: vec![href.into()],
            cursor: 0,
        }
    }

    /// Steps back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Steps forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Replaces the current entry without navigating (another tab or script
    /// rewriting the address).
    pub fn replace(&mut self, href: impl Into<String>) {
        self.entries[self.cursor] = href.into();
    }

    /// Every entry up to and including the current one.
    pub fn history(&self) -> &[String] {
        &self.entries[..=self.cursor]
    }

    /// Number of navigations performed since construction.
    pub fn navigations(&self) -> usize {
        self.entries.len() - 1
    }
}

impl Location for InMemoryLocation {
    fn href(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn navigate(&mut self, url: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url.to_string());
        self.cursor += 1;
    }
}
