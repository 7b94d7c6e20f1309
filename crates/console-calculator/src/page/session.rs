//! Page session driven from outside a mock document
//!
//! When the page script owns the real document it hands over plain values:
//! field text, what `#result` currently shows, which selectors resolved.
//! [`PageSession`] runs the handlers on those values and hands plain values
//! back. The browser bindings wrap a session over the devtools console.

use crate::config::PageConfig;
use crate::console::{ConsoleSink, DevConsole, MemorySink};
use crate::page::demo::{ConsoleDemo, DemoEffect};
use crate::page::dom::DomElement;
use crate::page::form::{CalculatorForm, FormSnapshot, SubmitReport};
use crate::page::observer::{ErrorEvent, ErrorObserver};
use crate::page::startup::{check_page, delayed_initialization, LoadReport};
use crate::page::PageError;

/// Calculator page handlers without a document
#[derive(Debug)]
pub struct PageSession<S: ConsoleSink = MemorySink> {
    config: PageConfig,
    console: DevConsole<S>,
    form: CalculatorForm,
    demo: ConsoleDemo,
    observer: ErrorObserver,
}

impl Default for PageSession<MemorySink> {
    fn default() -> Self {
        Self::new(PageConfig::default(), DevConsole::new(MemorySink::new()))
    }
}

impl<S: ConsoleSink> PageSession<S> {
    /// Creates a session for the page described by `config`
    #[must_use]
    pub fn new(config: PageConfig, console: DevConsole<S>) -> Self {
        Self {
            form: CalculatorForm::new(&config),
            demo: ConsoleDemo::new(&config),
            observer: ErrorObserver::new(&config.debug_info_id),
            config,
            console,
        }
    }

    /// Creates a session from configuration JSON
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Config`] if the JSON is malformed or names an
    /// empty id.
    pub fn from_json(json: &str, console: DevConsole<S>) -> Result<Self, PageError> {
        Ok(Self::new(PageConfig::from_json(json)?, console))
    }

    /// Page configuration
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Returns the console
    #[must_use]
    pub fn console(&self) -> &DevConsole<S> {
        &self.console
    }

    /// Handles a form submit with the given field values
    pub fn submit(&mut self, first: &str, second: &str, operator: &str) -> SubmitReport {
        let fields = FormSnapshot::for_page(&self.config, first, second, operator);
        self.form.submit(&fields, &mut self.console)
    }

    /// Clicks the demo button at `index`
    ///
    /// `result_text` and `result_class` describe `#result` as the page shows
    /// it; `None` text means the element is not on the page. Returns the
    /// message of an error the caller must rethrow on a later tick.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnknownDemoButton`] for an index past the last button.
    pub fn click_demo(
        &mut self,
        index: usize,
        result_text: Option<&str>,
        result_class: Option<&str>,
    ) -> Result<Option<String>, PageError> {
        let result = result_text.map(|text| {
            let mut element = DomElement::new("div")
                .with_id(&self.config.result_id)
                .with_text(text);
            element.set_class_name(result_class.unwrap_or(""));
            element
        });
        match self
            .demo
            .click_index(index, &mut self.console, result.as_ref())?
        {
            DemoEffect::None => Ok(None),
            DemoEffect::Uncaught(event) => Ok(Some(event.message)),
        }
    }

    /// Logs an uncaught error and returns the debug-panel markup
    pub fn report_error(&mut self, event: &ErrorEvent) -> String {
        self.observer.report_error(event, &mut self.console)
    }

    /// Logs an unhandled rejection and returns the debug-panel markup
    pub fn report_rejection(&mut self, reason: &str) -> String {
        self.observer.report_rejection(reason, &mut self.console)
    }

    /// Runs the load checks given the selectors that resolved and the demo button count
    pub fn load_check(&mut self, present_selectors: &[String], button_count: usize) -> LoadReport {
        check_page(
            &self.config,
            |selector| present_selectors.iter().any(|s| s == selector),
            button_count,
            &mut self.console,
        )
    }

    /// Deferred post-load task
    pub fn delayed_initialization(&mut self) {
        delayed_initialization(&mut self.console);
    }

    /// Selectors the page script should look up for [`Self::load_check`]
    #[must_use]
    pub fn required_selectors(&self) -> Vec<String> {
        self.config.required_selectors()
    }
}
