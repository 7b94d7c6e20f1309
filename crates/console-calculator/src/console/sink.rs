//! Console sinks for native hosts and tests

use super::{ConsoleEntry, ConsoleLevel, ConsoleSink};

/// Sink that keeps every entry in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    entries: Vec<ConsoleEntry>,
    clear_count: usize,
}

impl MemorySink {
    /// Creates an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries written since the last clear
    #[must_use]
    pub fn entries(&self) -> &[ConsoleEntry] {
        &self.entries
    }

    /// Message text of every entry
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    /// Entries at the given level
    #[must_use]
    pub fn at_level(&self, level: ConsoleLevel) -> Vec<&ConsoleEntry> {
        self.entries.iter().filter(|e| e.level == level).collect()
    }

    /// Returns true if any message contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&ConsoleEntry> {
        self.entries.last()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times the console was cleared
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl ConsoleSink for MemorySink {
    fn write(&mut self, entry: &ConsoleEntry) {
        self.entries.push(entry.clone());
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.clear_count += 1;
    }
}

/// Sink that forwards entries as `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ConsoleSink for TracingSink {
    fn write(&mut self, entry: &ConsoleEntry) {
        let method = format!("{:?}", entry.method);
        let data = entry.data.as_ref().map(ToString::to_string);
        let depth = entry.depth;
        match entry.level {
            ConsoleLevel::Log => tracing::info!(
                target: "console",
                method = method.as_str(),
                depth,
                data = data.as_deref(),
                "{}",
                entry.message
            ),
            ConsoleLevel::Warn => tracing::warn!(
                target: "console",
                method = method.as_str(),
                depth,
                data = data.as_deref(),
                "{}",
                entry.message
            ),
            ConsoleLevel::Error => tracing::error!(
                target: "console",
                method = method.as_str(),
                depth,
                data = data.as_deref(),
                "{}",
                entry.message
            ),
        }
    }

    fn clear(&mut self) {
        tracing::debug!(target: "console", "console cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleMethod;

    fn entry(level: ConsoleLevel, message: &str) -> ConsoleEntry {
        ConsoleEntry {
            level,
            method: ConsoleMethod::Log,
            message: message.to_string(),
            data: None,
            depth: 0,
        }
    }

    #[test]
    fn test_memory_sink_records() {
        let mut sink = MemorySink::new();
        sink.write(&entry(ConsoleLevel::Log, "one"));
        sink.write(&entry(ConsoleLevel::Error, "two"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.messages(), vec!["one", "two"]);
        assert_eq!(sink.at_level(ConsoleLevel::Error).len(), 1);
        assert!(sink.contains("tw"));
    }

    #[test]
    fn test_memory_sink_clear_counts() {
        let mut sink = MemorySink::new();
        sink.write(&entry(ConsoleLevel::Log, "one"));
        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(sink.clear_count(), 1);
    }

    #[test]
    fn test_tracing_sink_accepts_all_levels() {
        let mut sink = TracingSink;
        sink.write(&entry(ConsoleLevel::Log, "info"));
        sink.write(&entry(ConsoleLevel::Warn, "warn"));
        sink.write(&entry(ConsoleLevel::Error, "error"));
        sink.clear();
    }
}
