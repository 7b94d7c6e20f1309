//! Developer console emulation
//!
//! [`DevConsole`] implements the console API used by the page (log, count,
//! assert, group, table, timers, trace, ...) on top of a [`ConsoleSink`].
//! The console owns the stateful parts (counters, timers, group depth) so
//! every sink sees the same, already-rendered entries.

mod sink;

pub use sink::{MemorySink, TracingSink};

use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Severity of a console entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleLevel {
    /// `console.log` and friends
    Log,
    /// `console.warn`
    Warn,
    /// `console.error`
    Error,
}

/// Console API method that produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleMethod {
    /// `console.log`
    Log,
    /// `console.warn`
    Warn,
    /// `console.error`
    Error,
    /// `console.count`
    Count,
    /// `console.assert`
    Assert,
    /// `console.dir`
    Dir,
    /// `console.dirxml`
    DirXml,
    /// `console.group`
    Group,
    /// `console.groupEnd`
    GroupEnd,
    /// `console.table`
    Table,
    /// `console.time`
    Time,
    /// `console.timeEnd`
    TimeEnd,
    /// `console.trace`
    Trace,
    /// Banner written by `console.clear`
    Clear,
}

impl ConsoleMethod {
    /// True when devtools prints nothing of its own for this entry.
    ///
    /// `console.time` is silent until `timeEnd`, and `console.clear` prints
    /// its own banner.
    #[must_use]
    pub const fn is_silent_in_devtools(self) -> bool {
        matches!(self, Self::Time | Self::Clear)
    }
}

/// One rendered console line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    /// Severity
    pub level: ConsoleLevel,
    /// Producing method
    pub method: ConsoleMethod,
    /// Rendered message text
    pub message: String,
    /// Structured payload (objects, tables, stack frames)
    pub data: Option<Value>,
    /// Group nesting depth at the time of writing
    pub depth: usize,
}

impl ConsoleEntry {
    /// Renders the entry as one line, indented by group depth
    #[must_use]
    pub fn render(&self) -> String {
        let indent = "  ".repeat(self.depth);
        match &self.data {
            Some(data) => format!("{indent}{} {data}", self.message),
            None => format!("{indent}{}", self.message),
        }
    }
}

/// Destination for console entries
pub trait ConsoleSink {
    /// Writes one entry
    fn write(&mut self, entry: &ConsoleEntry);

    /// Clears previously written output, if the sink supports it
    fn clear(&mut self);
}

/// Console API over a sink
#[derive(Debug)]
pub struct DevConsole<S: ConsoleSink> {
    sink: S,
    clock: Arc<dyn Clock>,
    counters: HashMap<String, u64>,
    timers: HashMap<String, DateTime<Utc>>,
    depth: usize,
}

impl<S: ConsoleSink + Default> Default for DevConsole<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: ConsoleSink> DevConsole<S> {
    /// Creates a console writing to `sink`, timed by the system clock
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_clock(sink, Arc::new(SystemClock))
    }

    /// Creates a console with an explicit clock
    #[must_use]
    pub fn with_clock(sink: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            sink,
            clock,
            counters: HashMap::new(),
            timers: HashMap::new(),
            depth: 0,
        }
    }

    /// Returns the sink
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the clock used for timers
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Current group nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn emit(&mut self, level: ConsoleLevel, method: ConsoleMethod, message: String, data: Option<Value>) {
        let entry = ConsoleEntry {
            level,
            method,
            message,
            data,
            depth: self.depth,
        };
        self.sink.write(&entry);
    }

    /// `console.log(message)`
    pub fn log(&mut self, message: &str) {
        self.emit(ConsoleLevel::Log, ConsoleMethod::Log, message.to_string(), None);
    }

    /// `console.log(message, data)`
    pub fn log_with(&mut self, message: &str, data: Value) {
        self.emit(ConsoleLevel::Log, ConsoleMethod::Log, message.to_string(), Some(data));
    }

    /// `console.warn(message)`
    pub fn warn(&mut self, message: &str) {
        self.emit(ConsoleLevel::Warn, ConsoleMethod::Warn, message.to_string(), None);
    }

    /// `console.error(message)`
    pub fn error(&mut self, message: &str) {
        self.emit(ConsoleLevel::Error, ConsoleMethod::Error, message.to_string(), None);
    }

    /// `console.error(message, data)`
    pub fn error_with(&mut self, message: &str, data: Value) {
        self.emit(ConsoleLevel::Error, ConsoleMethod::Error, message.to_string(), Some(data));
    }

    /// `console.count(label)`: logs `label: n` and returns `n`
    pub fn count(&mut self, label: &str) -> u64 {
        let counter = self.counters.entry(label.to_string()).or_insert(0);
        *counter += 1;
        let n = *counter;
        self.emit(ConsoleLevel::Log, ConsoleMethod::Count, format!("{label}: {n}"), None);
        n
    }

    /// `console.assert(condition, message)`: writes only when the condition is false
    pub fn assert(&mut self, condition: bool, message: &str) {
        if !condition {
            self.emit(
                ConsoleLevel::Error,
                ConsoleMethod::Assert,
                format!("Assertion failed: {message}"),
                None,
            );
        }
    }

    /// `console.clear()`. Group nesting is reset as well.
    pub fn clear(&mut self) {
        self.depth = 0;
        self.sink.clear();
        self.emit(
            ConsoleLevel::Log,
            ConsoleMethod::Clear,
            "Console was cleared".to_string(),
            None,
        );
    }

    /// `console.dir(object)`
    pub fn dir(&mut self, object: Value) {
        self.emit(ConsoleLevel::Log, ConsoleMethod::Dir, String::new(), Some(object));
    }

    /// `console.dirxml(node)` with the node rendered as markup
    pub fn dirxml(&mut self, markup: &str) {
        self.emit(ConsoleLevel::Log, ConsoleMethod::DirXml, markup.to_string(), None);
    }

    /// `console.group(label)`
    pub fn group(&mut self, label: &str) {
        self.emit(ConsoleLevel::Log, ConsoleMethod::Group, label.to_string(), None);
        self.depth += 1;
    }

    /// `console.groupEnd()`. Ignored at depth 0.
    pub fn group_end(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
            self.emit(ConsoleLevel::Log, ConsoleMethod::GroupEnd, String::new(), None);
        }
    }

    /// `console.table(rows)`
    pub fn table(&mut self, rows: Value) {
        self.emit(ConsoleLevel::Log, ConsoleMethod::Table, String::new(), Some(rows));
    }

    /// `console.time(label)`
    pub fn time(&mut self, label: &str) {
        if self.timers.contains_key(label) {
            self.warn(&format!("Timer '{label}' already exists"));
            return;
        }
        let now = self.clock.now();
        self.timers.insert(label.to_string(), now);
        self.emit(ConsoleLevel::Log, ConsoleMethod::Time, label.to_string(), None);
    }

    /// `console.timeEnd(label)`: logs `label: <ms> ms` and returns the elapsed milliseconds
    pub fn time_end(&mut self, label: &str) -> Option<f64> {
        let Some(started) = self.timers.remove(label) else {
            self.warn(&format!("Timer '{label}' does not exist"));
            return None;
        };
        let elapsed = self.clock.now() - started;
        let ms = elapsed.num_microseconds().map_or_else(
            || elapsed.num_milliseconds() as f64,
            |us| us as f64 / 1000.0,
        );
        self.emit(
            ConsoleLevel::Log,
            ConsoleMethod::TimeEnd,
            format!("{label}: {ms} ms"),
            None,
        );
        Some(ms)
    }

    /// Returns true while a timer with this label is running
    #[must_use]
    pub fn has_timer(&self, label: &str) -> bool {
        self.timers.contains_key(label)
    }

    /// `console.trace(message)` with the caller chain, innermost first
    pub fn trace(&mut self, message: &str, frames: &[&str]) {
        let frames: Vec<Value> = frames.iter().map(|f| Value::from(*f)).collect();
        self.emit(
            ConsoleLevel::Log,
            ConsoleMethod::Trace,
            format!("Trace: {message}"),
            Some(Value::Array(frames)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use serde_json::json;

    fn console() -> DevConsole<MemorySink> {
        DevConsole::with_clock(MemorySink::new(), Arc::new(FixedClock::at_millis(0)))
    }

    #[test]
    fn test_log_and_levels() {
        let mut c = console();
        c.log("a");
        c.warn("b");
        c.error("c");
        let levels: Vec<_> = c.sink().entries().iter().map(|e| e.level).collect();
        assert_eq!(
            levels,
            vec![ConsoleLevel::Log, ConsoleLevel::Warn, ConsoleLevel::Error]
        );
    }

    #[test]
    fn test_log_with_data() {
        let mut c = console();
        c.log_with("payload", json!({"user": "testUser"}));
        let entry = c.sink().last().unwrap();
        assert_eq!(entry.data, Some(json!({"user": "testUser"})));
    }

    #[test]
    fn test_count_increments_per_label() {
        let mut c = console();
        assert_eq!(c.count("clicks"), 1);
        assert_eq!(c.count("clicks"), 2);
        assert_eq!(c.count("other"), 1);
        assert_eq!(c.sink().messages()[1], "clicks: 2");
    }

    #[test]
    fn test_assert_only_writes_on_failure() {
        let mut c = console();
        c.assert(true, "fine");
        assert!(c.sink().is_empty());
        c.assert(false, "broken");
        let entry = c.sink().last().unwrap();
        assert_eq!(entry.level, ConsoleLevel::Error);
        assert_eq!(entry.message, "Assertion failed: broken");
    }

    #[test]
    fn test_clear_resets_sink_and_depth() {
        let mut c = console();
        c.group("g");
        c.log("inside");
        c.clear();
        assert_eq!(c.depth(), 0);
        assert_eq!(c.sink().messages(), vec!["Console was cleared"]);
        assert_eq!(c.sink().clear_count(), 1);
        assert_eq!(c.sink().last().unwrap().method, ConsoleMethod::Clear);
    }

    #[test]
    fn test_devtools_silent_methods() {
        let mut c = console();
        c.time("t");
        c.clear();
        c.log("shown");
        c.time_end("t");
        let printed: Vec<_> = c
            .sink()
            .entries()
            .iter()
            .filter(|e| !e.method.is_silent_in_devtools())
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(printed, vec!["shown", "t: 0 ms"]);
        assert!(!ConsoleMethod::TimeEnd.is_silent_in_devtools());
        assert!(!ConsoleMethod::Log.is_silent_in_devtools());
    }

    #[test]
    fn test_group_depth() {
        let mut c = console();
        c.group("outer");
        c.log("one");
        c.group("inner");
        c.log("two");
        c.group_end();
        c.group_end();
        c.group_end(); // ignored
        let depths: Vec<_> = c.sink().entries().iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 1, 0]);
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn test_timer_reports_elapsed() {
        let clock = Arc::new(FixedClock::at_millis(0));
        let mut c = DevConsole::with_clock(MemorySink::new(), clock.clone());
        c.time("t");
        assert!(c.has_timer("t"));
        clock.advance(chrono::Duration::milliseconds(1500));
        assert_eq!(c.time_end("t"), Some(1500.0));
        assert!(!c.has_timer("t"));
        assert!(c.sink().contains("t: 1500 ms"));
    }

    #[test]
    fn test_timer_duplicate_and_missing() {
        let mut c = console();
        c.time("t");
        c.time("t");
        assert!(c.sink().contains("Timer 't' already exists"));
        assert_eq!(c.time_end("nope"), None);
        assert!(c.sink().contains("Timer 'nope' does not exist"));
    }

    #[test]
    fn test_table_and_dir_carry_data() {
        let mut c = console();
        c.table(json!([{"a": 1}]));
        c.dir(json!({"id": "result"}));
        let methods: Vec<_> = c.sink().entries().iter().map(|e| e.method).collect();
        assert_eq!(methods, vec![ConsoleMethod::Table, ConsoleMethod::Dir]);
    }

    #[test]
    fn test_trace_frames() {
        let mut c = console();
        c.trace("here", &["level3", "level2"]);
        let entry = c.sink().last().unwrap();
        assert_eq!(entry.message, "Trace: here");
        assert_eq!(entry.data, Some(json!(["level3", "level2"])));
    }

    #[test]
    fn test_entry_render_indents() {
        let entry = ConsoleEntry {
            level: ConsoleLevel::Log,
            method: ConsoleMethod::Log,
            message: "msg".into(),
            data: Some(json!(1)),
            depth: 2,
        };
        assert_eq!(entry.render(), "    msg 1");
    }
}
