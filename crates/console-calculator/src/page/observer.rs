//! Global error and rejection observer
//!
//! Errors that escape page handlers are reported here: logged to the console
//! and appended to the debug panel. The observer holds no application state.

use crate::console::{ConsoleSink, DevConsole};
use crate::page::dom::{escape, MockDom};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::panic::Location;
use std::sync::Once;

/// An uncaught error with its source position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Error message
    pub message: String,
    /// Source file
    pub source: String,
    /// Line number
    pub line: u32,
    /// Column number
    pub column: u32,
}

impl ErrorEvent {
    /// Creates an event with an explicit position
    #[must_use]
    pub fn new(message: &str, source: &str, line: u32, column: u32) -> Self {
        Self {
            message: message.to_string(),
            source: source.to_string(),
            line,
            column,
        }
    }

    /// Creates an event located at the caller
    #[must_use]
    #[track_caller]
    pub fn capture(message: &str) -> Self {
        let location = Location::caller();
        Self::new(message, location.file(), location.line(), location.column())
    }
}

impl std::fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}", self.message)
    }
}

/// Reports uncaught errors and rejections
#[derive(Debug, Clone)]
pub struct ErrorObserver {
    debug_info_id: String,
}

impl ErrorObserver {
    /// Creates an observer writing into the element `debug_info_id`
    #[must_use]
    pub fn new(debug_info_id: &str) -> Self {
        Self {
            debug_info_id: debug_info_id.to_string(),
        }
    }

    /// Logs an uncaught error and returns the debug-panel markup
    pub fn report_error<S: ConsoleSink>(
        &self,
        event: &ErrorEvent,
        console: &mut DevConsole<S>,
    ) -> String {
        console.error(&format!("Global Error Handler - Message: {}", event.message));
        console.error(&format!(
            "Source: {}, Line: {}, Column: {}",
            event.source, event.line, event.column
        ));
        console.error_with(
            "Error object:",
            serde_json::to_value(event).unwrap_or_else(|_| json!(event.to_string())),
        );
        format!(
            "<p style=\"color: red;\">Global Error: {} at line {}</p>",
            escape(&event.message),
            event.line
        )
    }

    /// Logs an unhandled rejection and returns the debug-panel markup
    pub fn report_rejection<S: ConsoleSink>(
        &self,
        reason: &str,
        console: &mut DevConsole<S>,
    ) -> String {
        console.error_with("Unhandled Promise Rejection:", json!(reason));
        format!(
            "<p style=\"color: red;\">Unhandled Promise Rejection: {}</p>",
            escape(reason)
        )
    }

    /// Reports an error and appends it to the page's debug panel
    pub fn on_error<S: ConsoleSink>(
        &self,
        event: &ErrorEvent,
        console: &mut DevConsole<S>,
        dom: &mut MockDom,
    ) {
        let markup = self.report_error(event, console);
        dom.append_html(&self.debug_info_id, &markup);
    }

    /// Reports a rejection and appends it to the page's debug panel
    pub fn on_rejection<S: ConsoleSink>(
        &self,
        reason: &str,
        console: &mut DevConsole<S>,
        dom: &mut MockDom,
    ) {
        let markup = self.report_rejection(reason, console);
        dom.append_html(&self.debug_info_id, &markup);
    }
}

static PANIC_OBSERVER: Once = Once::new();

/// Installs a process-wide panic hook that logs panics through `tracing`
///
/// Only the first call installs the hook; the previous hook still runs.
pub fn install_panic_observer() {
    PANIC_OBSERVER.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            match info.location() {
                Some(location) => tracing::error!(
                    file = location.file(),
                    line = location.line(),
                    column = location.column(),
                    "Global Error Handler - Message: {message}"
                ),
                None => tracing::error!("Global Error Handler - Message: {message}"),
            }
            previous(info);
        }));
    });
}

/// Returns true once [`install_panic_observer`] has run
#[must_use]
pub fn panic_observer_installed() -> bool {
    PANIC_OBSERVER.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::console::{ConsoleLevel, MemorySink};

    #[test]
    fn test_capture_records_caller() {
        let event = ErrorEvent::capture("boom");
        assert_eq!(event.message, "boom");
        assert!(event.source.ends_with("observer.rs"));
        assert!(event.line > 0);
    }

    #[test]
    fn test_error_event_display() {
        let event = ErrorEvent::new("boom", "page.js", 3, 7);
        assert_eq!(event.to_string(), "Error: boom");
    }

    #[test]
    fn test_report_error_logs_three_lines() {
        let observer = ErrorObserver::new("debug-info");
        let mut console = DevConsole::new(MemorySink::new());
        let markup = observer.report_error(&ErrorEvent::new("boom", "page.js", 3, 7), &mut console);

        let errors = console.sink().at_level(ConsoleLevel::Error);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].message, "Global Error Handler - Message: boom");
        assert_eq!(errors[1].message, "Source: page.js, Line: 3, Column: 7");
        assert_eq!(errors[2].data.as_ref().unwrap()["line"], 3);
        assert_eq!(markup, "<p style=\"color: red;\">Global Error: boom at line 3</p>");
    }

    #[test]
    fn test_report_rejection() {
        let observer = ErrorObserver::new("debug-info");
        let mut console = DevConsole::new(MemorySink::new());
        let markup = observer.report_rejection("timeout", &mut console);
        assert_eq!(
            console.sink().last().unwrap().message,
            "Unhandled Promise Rejection:"
        );
        assert_eq!(
            markup,
            "<p style=\"color: red;\">Unhandled Promise Rejection: timeout</p>"
        );
    }

    #[test]
    fn test_markup_is_escaped() {
        let observer = ErrorObserver::new("debug-info");
        let mut console = DevConsole::new(MemorySink::new());
        let markup = observer.report_rejection("<script>", &mut console);
        assert!(markup.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_on_error_appends_to_debug_panel() {
        let observer = ErrorObserver::new("debug-info");
        let mut console = DevConsole::new(MemorySink::new());
        let mut dom = MockDom::calculator_page(&PageConfig::default());
        observer.on_error(&ErrorEvent::new("a", "s", 1, 1), &mut console, &mut dom);
        observer.on_rejection("b", &mut console, &mut dom);
        let html = dom.inner_html("debug-info").unwrap();
        assert!(html.contains("Global Error: a at line 1"));
        assert!(html.contains("Unhandled Promise Rejection: b"));
    }

    #[test]
    fn test_install_panic_observer_is_idempotent() {
        install_panic_observer();
        install_panic_observer();
        assert!(panic_observer_installed());
    }
}
