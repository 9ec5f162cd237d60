use super::Navigator;

/// In-memory navigation history.
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigator {
    history: Vec<String>,
    cursor: usize,
}

impl MemoryNavigator {
    /// Start at `query`, as if the page had been loaded with it.
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let query = query.strip_prefix('?').unwrap_or(&query).to_string();
        Self {
            history: vec![query],
            cursor: 0,
        }
    }

    /// Every committed query, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}

impl Navigator for MemoryNavigator {
    fn current_query(&self) -> &str {
        self.history.get(self.cursor).map_or("", String::as_str)
    }

    fn push_query(&mut self, query: String) {
        // A push after going back drops the forward entries, like a browser.
        self.history.truncate(self.cursor + 1);
        self.history.push(query);
        self.cursor = self.history.len() - 1;
    }
}
