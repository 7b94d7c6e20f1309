//! Browser WASM bindings for the calculator page
//!
//! The page script owns the real DOM and event listeners; it hands field
//! values and element facts to [`BrowserCalculatorPage`] and writes the
//! returned text back. Console output goes straight to the devtools console.

use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::config::PageConfig;
use crate::console::{ConsoleEntry, ConsoleMethod, ConsoleSink, DevConsole};
use crate::page::observer::ErrorEvent;
use crate::page::session::PageSession;

/// Console sink writing to the browser's devtools console
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSink;

fn to_js(value: &serde_json::Value) -> JsValue {
    let text = value.to_string();
    js_sys::JSON::parse(&text).unwrap_or_else(|_| JsValue::from_str(&text))
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

impl ConsoleSink for BrowserSink {
    fn write(&mut self, entry: &ConsoleEntry) {
        if entry.method.is_silent_in_devtools() {
            return;
        }
        let message = JsValue::from_str(&entry.message);
        let data = entry.data.as_ref().map(to_js);
        match (entry.method, data) {
            (ConsoleMethod::Group, _) => console::group_1(&message),
            (ConsoleMethod::GroupEnd, _) => console::group_end(),
            (ConsoleMethod::Table, data) => console::table_1(&data.unwrap_or(JsValue::NULL)),
            (ConsoleMethod::Dir, data) => console::dir_1(&data.unwrap_or(JsValue::NULL)),
            (ConsoleMethod::DirXml, _) => console::dirxml_1(&message),
            (ConsoleMethod::Trace, _) => console::trace_1(&message),
            (ConsoleMethod::Warn, Some(data)) => console::warn_2(&message, &data),
            (ConsoleMethod::Warn, None) => console::warn_1(&message),
            (ConsoleMethod::Error | ConsoleMethod::Assert, Some(data)) => {
                console::error_2(&message, &data);
            }
            (ConsoleMethod::Error | ConsoleMethod::Assert, None) => console::error_1(&message),
            (_, Some(data)) => console::log_2(&message, &data),
            (_, None) => console::log_1(&message),
        }
    }

    fn clear(&mut self) {
        console::clear();
    }
}

/// Browser Calculator Page - the main WASM entry point
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculatorPage {
    session: PageSession<BrowserSink>,
}

impl Default for BrowserCalculatorPage {
    fn default() -> Self {
        Self {
            session: PageSession::new(PageConfig::default(), DevConsole::new(BrowserSink)),
        }
    }
}

#[wasm_bindgen]
impl BrowserCalculatorPage {
    /// Creates a page with the default element ids
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self::default()
    }

    /// Creates a page from configuration JSON
    pub fn with_config(json: &str) -> Result<BrowserCalculatorPage, JsError> {
        console_error_panic_hook::set_once();
        let session = PageSession::from_json(json, DevConsole::new(BrowserSink)).map_err(js_error)?;
        Ok(Self { session })
    }

    /// Handles a form submit and returns the report as JSON
    pub fn submit(&mut self, first: &str, second: &str, operator: &str) -> Result<String, JsError> {
        let report = self.session.submit(first, second, operator);
        serde_json::to_string(&report).map_err(js_error)
    }

    /// Clicks a demo button. `result_text` and `result_class` describe
    /// `#result` as shown. Returns the message of an error the page must
    /// rethrow on a later tick, if the button raised one.
    pub fn click_demo(
        &mut self,
        index: usize,
        result_text: Option<String>,
        result_class: Option<String>,
    ) -> Result<Option<String>, JsError> {
        self.session
            .click_demo(index, result_text.as_deref(), result_class.as_deref())
            .map_err(js_error)
    }

    /// `window.onerror`: logs the error and returns debug-panel markup
    pub fn report_error(&mut self, message: &str, source: &str, line: u32, column: u32) -> String {
        self.session
            .report_error(&ErrorEvent::new(message, source, line, column))
    }

    /// `unhandledrejection`: logs the reason and returns debug-panel markup
    pub fn report_rejection(&mut self, reason: &str) -> String {
        self.session.report_rejection(reason)
    }

    /// Runs the load checks given the selectors found and the demo button count
    pub fn load_check(&mut self, present_selectors: Vec<String>, button_count: usize) -> bool {
        self.session
            .load_check(&present_selectors, button_count)
            .is_healthy()
    }

    /// Deferred post-load task
    pub fn delayed_initialization(&mut self) {
        self.session.delayed_initialization();
    }

    /// Selectors the page script should look up for [`Self::load_check`]
    pub fn required_selectors(&self) -> Vec<String> {
        self.session.required_selectors()
    }
}

/// Initialize the page module in the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
