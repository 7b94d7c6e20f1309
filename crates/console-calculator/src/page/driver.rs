//! Page Driver - the whole calculator page on a mock document
//!
//! Owns the document, console, handlers and the deferred task queue, and
//! implements [`CalculatorDriver`] so the unified specifications run against
//! the page exactly as they run against the bare engine.

use crate::clock::Clock;
use crate::config::PageConfig;
use crate::console::{ConsoleEntry, ConsoleSink, DevConsole, MemorySink};
use crate::core::FailureKind;
use crate::driver::CalculatorDriver;
use crate::page::demo::{ConsoleDemo, DemoEffect};
use crate::page::dom::{DomEvent, MockDom};
use crate::page::form::{CalculatorForm, ResultClass, SubmitReport};
use crate::page::observer::{ErrorEvent, ErrorObserver};
use crate::page::startup::{check_dom, delayed_initialization, LoadReport};
use crate::page::PageError;
use std::collections::VecDeque;
use std::sync::Arc;

/// Work scheduled for a later tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Rethrow an error so it reaches the global observer
    Rethrow(ErrorEvent),
    /// Deliver an unhandled rejection
    Rejection(String),
    /// Post-load initialization
    DelayedInit,
}

/// Calculator page driver
#[derive(Debug)]
pub struct PageDriver<S: ConsoleSink = MemorySink> {
    config: PageConfig,
    dom: MockDom,
    console: DevConsole<S>,
    form: CalculatorForm,
    demo: ConsoleDemo,
    observer: ErrorObserver,
    deferred: VecDeque<DeferredTask>,
    last_report: Option<SubmitReport>,
}

impl Default for PageDriver<MemorySink> {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDriver<MemorySink> {
    /// Default page recording console output in memory
    #[must_use]
    pub fn new() -> Self {
        Self::with_console(PageConfig::default(), DevConsole::new(MemorySink::new()))
    }

    /// Default page with an explicit clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_console(
            PageConfig::default(),
            DevConsole::with_clock(MemorySink::new(), clock),
        )
    }

    /// Console entries written so far
    #[must_use]
    pub fn console_entries(&self) -> &[ConsoleEntry] {
        self.console.sink().entries()
    }
}

impl<S: ConsoleSink> PageDriver<S> {
    /// Builds the page described by `config` around an existing console
    #[must_use]
    pub fn with_console(config: PageConfig, console: DevConsole<S>) -> Self {
        Self {
            dom: MockDom::calculator_page(&config),
            form: CalculatorForm::new(&config),
            demo: ConsoleDemo::new(&config),
            observer: ErrorObserver::new(&config.debug_info_id),
            config,
            console,
            deferred: VecDeque::new(),
            last_report: None,
        }
    }

    /// Page configuration
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Returns a reference to the DOM
    #[must_use]
    pub fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Returns a mutable reference to the DOM
    pub fn dom_mut(&mut self) -> &mut MockDom {
        &mut self.dom
    }

    /// Returns the console
    #[must_use]
    pub fn console(&self) -> &DevConsole<S> {
        &self.console
    }

    /// Returns the console mutably
    pub fn console_mut(&mut self) -> &mut DevConsole<S> {
        &mut self.console
    }

    /// Console demo state
    #[must_use]
    pub fn demo(&self) -> &ConsoleDemo {
        &self.demo
    }

    /// Report of the most recent submit
    #[must_use]
    pub fn last_report(&self) -> Option<&SubmitReport> {
        self.last_report.as_ref()
    }

    /// Fires the load event: runs the load checks and schedules delayed init
    pub fn load(&mut self) -> LoadReport {
        self.dom.dispatch_event(DomEvent::Loaded);
        let report = check_dom(&self.config, &self.dom, &mut self.console);
        self.deferred.push_back(DeferredTask::DelayedInit);
        report
    }

    /// Types into an input
    pub fn type_into(&mut self, id: &str, text: &str) {
        self.dom.set_value(id, text);
    }

    /// Fills both operand inputs
    pub fn enter_operands(&mut self, first: &str, second: &str) {
        let first_id = self.config.first_input_id.clone();
        let second_id = self.config.second_input_id.clone();
        self.type_into(&first_id, first);
        self.type_into(&second_id, second);
    }

    /// Picks an operator in the select
    pub fn select_operator(&mut self, symbol: &str) {
        let id = self.config.operator_id.clone();
        self.type_into(&id, symbol);
    }

    /// Submits the calculator form and renders the report into `#result`
    ///
    /// The handler looks up the three fields and the result element before it
    /// runs. If any of them is missing the handler never runs; the failure
    /// goes to the global observer instead and `None` is returned.
    pub fn submit(&mut self) -> Option<SubmitReport> {
        self.dom.dispatch_event(DomEvent::submit(&self.config.form_id));

        if let Some(id) = self.missing_handler_element() {
            let err = PageError::missing(&id);
            self.raise(ErrorEvent::capture(&err.to_string()));
            return None;
        }
        if let Some(result) = self.dom.get_element_mut(&self.config.result_id) {
            result.set_class_name("");
        }

        let report = self.form.submit(&self.dom, &mut self.console);

        if let Some(result) = self.dom.get_element_mut(&self.config.result_id) {
            result.set_text(&report.display);
            result.set_class_name(report.class.as_str());
        }
        self.last_report = Some(report.clone());
        Some(report)
    }

    fn missing_handler_element(&self) -> Option<String> {
        self.form
            .field_ids()
            .into_iter()
            .chain([self.config.result_id.as_str()])
            .find(|id| self.dom.get_element(id).is_none())
            .map(str::to_string)
    }

    /// Clicks the console demo button at `index`
    pub fn click_demo(&mut self, index: usize) -> Result<(), PageError> {
        self.dom.dispatch_event(DomEvent::click(&format!(
            "{}::{index}",
            self.config.demo_buttons_id
        )));
        let result = self.dom.get_element(&self.config.result_id).cloned();
        match self.demo.click_index(index, &mut self.console, result.as_ref())? {
            DemoEffect::None => {}
            DemoEffect::Uncaught(event) => self.deferred.push_back(DeferredTask::Rethrow(event)),
        }
        Ok(())
    }

    /// Schedules an unhandled promise rejection
    pub fn reject(&mut self, reason: &str) {
        self.deferred
            .push_back(DeferredTask::Rejection(reason.to_string()));
    }

    /// Reports an unhandled rejection immediately
    pub fn report_rejection(&mut self, reason: &str) {
        self.observer
            .on_rejection(reason, &mut self.console, &mut self.dom);
    }

    /// Reports an uncaught error immediately
    pub fn raise(&mut self, event: ErrorEvent) {
        self.observer.on_error(&event, &mut self.console, &mut self.dom);
    }

    /// Number of tasks waiting for [`PageDriver::run_deferred`]
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Runs queued tasks in order, including any they schedule. Returns how many ran.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.deferred.pop_front() {
            match task {
                DeferredTask::Rethrow(event) => self.raise(event),
                DeferredTask::Rejection(reason) => self.report_rejection(&reason),
                DeferredTask::DelayedInit => delayed_initialization(&mut self.console),
            }
            ran += 1;
        }
        ran
    }

    /// Text of the result element
    #[must_use]
    pub fn result_text(&self) -> Option<&str> {
        self.dom.get_element_text(&self.config.result_id)
    }

    /// Class of the result element, if it carries one
    #[must_use]
    pub fn result_class(&self) -> Option<ResultClass> {
        let result = self.dom.get_element(&self.config.result_id)?;
        if result.has_class("success") {
            Some(ResultClass::Success)
        } else if result.has_class("error") {
            Some(ResultClass::Error)
        } else {
            None
        }
    }

    /// Markup collected in the debug panel
    #[must_use]
    pub fn debug_info(&self) -> &str {
        self.dom.inner_html(&self.config.debug_info_id).unwrap_or("")
    }
}

impl<S: ConsoleSink> CalculatorDriver for PageDriver<S> {
    fn calculate(&mut self, first: &str, operator: &str, second: &str) -> Option<f64> {
        self.enter_operands(first, second);
        self.select_operator(operator);
        self.submit().and_then(|report| report.value)
    }

    fn result_text(&self) -> String {
        PageDriver::result_text(self).unwrap_or_default().to_string()
    }

    fn failure_kind(&self) -> Option<FailureKind> {
        self.last_report.as_ref().and_then(|r| r.kind)
    }

    fn reset(&mut self) {
        self.enter_operands("", "");
        self.select_operator("+");
        self.last_report = None;
        let result_id = self.config.result_id.clone();
        if let Some(result) = self.dom.get_element_mut(&result_id) {
            result.set_text("");
            result.set_class_name("");
        }
    }
}
