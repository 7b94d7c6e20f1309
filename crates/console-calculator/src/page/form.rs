//! Calculator form submit handler

use crate::clock::iso_timestamp;
use crate::config::PageConfig;
use crate::console::{ConsoleSink, DevConsole};
use crate::core::number::trim_number_text;
use crate::core::{evaluate, format_number, CalcError, FailureKind};
use crate::page::dom::MockDom;
use crate::page::PageError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error as _;
use thiserror::Error;

/// Text shown when a submit fails for a reason other than the calculation
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Check console for details.";

/// Read access to form field values by element id
pub trait FormFields {
    /// Current value of the field, or `None` if the field is not on the page
    fn field(&self, id: &str) -> Option<String>;
}

impl FormFields for MockDom {
    fn field(&self, id: &str) -> Option<String> {
        self.value(id).map(str::to_string)
    }
}

/// Field values captured outside a document (browser calls, tests)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    values: BTreeMap<String, String>,
}

impl FormSnapshot {
    /// Snapshot of the three calculator fields under the configured ids
    #[must_use]
    pub fn for_page(config: &PageConfig, first: &str, second: &str, operator: &str) -> Self {
        Self::default()
            .with_field(&config.first_input_id, first)
            .with_field(&config.second_input_id, second)
            .with_field(&config.operator_id, operator)
    }

    /// Sets one field
    #[must_use]
    pub fn with_field(mut self, id: &str, value: &str) -> Self {
        self.values.insert(id.to_string(), value.to_string());
        self
    }

    /// Drops one field
    #[must_use]
    pub fn without_field(mut self, id: &str) -> Self {
        self.values.remove(id);
        self
    }
}

impl FormFields for FormSnapshot {
    fn field(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }
}

/// Styling applied to the result element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultClass {
    /// Calculation succeeded
    Success,
    /// Calculation failed
    Error,
}

impl ResultClass {
    /// CSS class name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Why a submit did not produce a value
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Classified calculation failure
    #[error(transparent)]
    Calculation(#[from] CalcError),
    /// Anything else, such as a field missing from the page
    #[error(transparent)]
    Unexpected(#[from] PageError),
}

impl SubmitError {
    /// Failure kind, for classified failures
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Calculation(err) => Some(err.kind()),
            Self::Unexpected(_) => None,
        }
    }

    /// Text shown in the result element
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Calculation(err) => err.user_message(),
            Self::Unexpected(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }

    /// Diagnostic lines logged after a failure: the error, its causes, the handler
    #[must_use]
    pub fn diagnostic(&self) -> Vec<String> {
        let name = self
            .kind()
            .map_or_else(|| "PageError".to_string(), |k| k.to_string());
        let mut lines = vec![format!("{name}: {self}")];
        let mut source = self.source();
        while let Some(cause) = source {
            let line = format!("    caused by: {cause}");
            if !lines.contains(&line) && cause.to_string() != self.to_string() {
                lines.push(line);
            }
            source = cause.source();
        }
        lines.push("    at CalculatorForm::submit".to_string());
        lines
    }
}

/// What a submit did to the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReport {
    /// Text for the result element
    pub display: String,
    /// Class for the result element
    pub class: ResultClass,
    /// Computed value on success
    pub value: Option<f64>,
    /// Failure kind for classified failures
    pub kind: Option<FailureKind>,
    /// Completion timestamp (ISO-8601)
    pub completed_at: String,
}

impl SubmitReport {
    /// True for a successful calculation
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.class == ResultClass::Success
    }
}

/// Operands and operator as read from the form
struct Submission {
    first: String,
    second: String,
    operator: String,
}

/// Submit handler bound to the configured field ids
#[derive(Debug, Clone)]
pub struct CalculatorForm {
    first_input_id: String,
    second_input_id: String,
    operator_id: String,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self::new(&PageConfig::default())
    }
}

impl CalculatorForm {
    /// Creates a handler reading the fields named in `config`
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            first_input_id: config.first_input_id.clone(),
            second_input_id: config.second_input_id.clone(),
            operator_id: config.operator_id.clone(),
        }
    }

    /// Ids of the fields the handler reads, in read order
    #[must_use]
    pub fn field_ids(&self) -> [&str; 3] {
        [
            self.first_input_id.as_str(),
            self.second_input_id.as_str(),
            self.operator_id.as_str(),
        ]
    }

    /// Handles one submit: read, evaluate, log, report
    ///
    /// Never fails; every failure ends up in the report and the console.
    /// A field absent from `fields` is reported as an unexpected failure.
    /// On a document, elements are looked up before the handler runs, so
    /// [`PageDriver::submit`](crate::page::PageDriver::submit) raises a
    /// missing element as an uncaught error instead of calling this.
    pub fn submit<F, S>(&self, fields: &F, console: &mut DevConsole<S>) -> SubmitReport
    where
        F: FormFields + ?Sized,
        S: ConsoleSink,
    {
        let report = match self.calculate(fields) {
            Ok((submission, value)) => {
                let display = format_number(value);
                console.log(&format!(
                    "Calculation successful: {} {} {} = {display}",
                    submission.first, submission.operator, submission.second
                ));
                SubmitReport {
                    display,
                    class: ResultClass::Success,
                    value: Some(value),
                    kind: None,
                    completed_at: String::new(),
                }
            }
            Err(err) => {
                match &err {
                    SubmitError::Calculation(calc) => console.error(&calc.user_message()),
                    SubmitError::Unexpected(page) => console.error_with(
                        "Unexpected error during calculation:",
                        json!(page.to_string()),
                    ),
                }
                console.error_with("Stack trace:", json!(err.diagnostic()));
                SubmitReport {
                    display: err.user_message(),
                    class: ResultClass::Error,
                    value: None,
                    kind: err.kind(),
                    completed_at: String::new(),
                }
            }
        };

        let completed_at = iso_timestamp(console.clock().now());
        console.log_with("Calculation attempt completed at:", json!(completed_at));
        SubmitReport {
            completed_at,
            ..report
        }
    }

    fn calculate<F: FormFields + ?Sized>(
        &self,
        fields: &F,
    ) -> Result<(Submission, f64), SubmitError> {
        let submission = Submission {
            first: trim_number_text(&read(fields, &self.first_input_id)?).to_string(),
            second: trim_number_text(&read(fields, &self.second_input_id)?).to_string(),
            operator: read(fields, &self.operator_id)?,
        };
        let value = evaluate(&submission.first, &submission.second, &submission.operator)?;
        Ok((submission, value))
    }
}

fn read<F: FormFields + ?Sized>(fields: &F, id: &str) -> Result<String, PageError> {
    fields.field(id).ok_or_else(|| PageError::missing(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::console::{ConsoleLevel, MemorySink};
    use crate::core::InputProblem;
    use std::sync::Arc;

    fn console() -> DevConsole<MemorySink> {
        DevConsole::with_clock(
            MemorySink::new(),
            Arc::new(FixedClock::at_millis(1_700_000_000_123)),
        )
    }

    fn submit(first: &str, second: &str, op: &str) -> (SubmitReport, DevConsole<MemorySink>) {
        let config = PageConfig::default();
        let mut console = console();
        let report = CalculatorForm::new(&config)
            .submit(&FormSnapshot::for_page(&config, first, second, op), &mut console);
        (report, console)
    }

    #[test]
    fn test_success_report_and_logs() {
        let (report, console) = submit(" 12 ", "30", "+");
        assert!(report.is_success());
        assert_eq!(report.display, "42");
        assert_eq!(report.value, Some(42.0));
        assert_eq!(report.kind, None);
        assert_eq!(
            console.sink().messages(),
            vec![
                "Calculation successful: 12 + 30 = 42",
                "Calculation attempt completed at:"
            ]
        );
    }

    #[test]
    fn test_fractional_display() {
        let (report, _) = submit("0.1", "0.2", "+");
        assert_eq!(report.display, "0.30000000000000004");
        let (report, _) = submit("1", "3", "/");
        assert_eq!(report.display, "0.3333333333333333");
    }

    #[test]
    fn test_completion_timestamp_always_logged() {
        let (report, console) = submit("", "", "+");
        assert_eq!(report.completed_at, "2023-11-14T22:13:20.123Z");
        let last = console.sink().last().unwrap();
        assert_eq!(last.message, "Calculation attempt completed at:");
        assert_eq!(last.data, Some(json!("2023-11-14T22:13:20.123Z")));
    }

    #[test]
    fn test_input_error() {
        let (report, console) = submit("abc", "3", "+");
        assert_eq!(report.class, ResultClass::Error);
        assert_eq!(report.kind, Some(FailureKind::InputError));
        assert_eq!(report.display, "Input Error: Please enter valid numbers only");
        let errors = console.sink().at_level(ConsoleLevel::Error);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Input Error: Please enter valid numbers only");
        assert_eq!(errors[1].message, "Stack trace:");
    }

    #[test]
    fn test_division_error() {
        let (report, _) = submit("5", "0", "/");
        assert_eq!(report.kind, Some(FailureKind::DivideByZeroError));
        assert_eq!(report.display, "Division Error: Division by zero is not allowed");
    }

    #[test]
    fn test_calculation_error() {
        let (report, _) = submit("3", "4", "%");
        assert_eq!(report.kind, Some(FailureKind::CalculationError));
        assert_eq!(report.display, "Calculation Error: Unknown operator: %");
    }

    #[test]
    fn test_missing_field_is_unexpected() {
        let config = PageConfig::default();
        let mut console = console();
        let fields = FormSnapshot::for_page(&config, "1", "2", "+").without_field("operator");
        let report = CalculatorForm::new(&config).submit(&fields, &mut console);
        assert_eq!(report.display, UNEXPECTED_MESSAGE);
        assert_eq!(report.class, ResultClass::Error);
        assert_eq!(report.kind, None);
        let errors = console.sink().at_level(ConsoleLevel::Error);
        assert_eq!(errors[0].message, "Unexpected error during calculation:");
        assert_eq!(
            errors[0].data,
            Some(json!("Required element not found: #operator"))
        );
    }

    #[test]
    fn test_field_ids_follow_config() {
        let config = PageConfig::from_json(r#"{"operator_id": "op"}"#).unwrap();
        assert_eq!(
            CalculatorForm::new(&config).field_ids(),
            ["first-num", "second-num", "op"]
        );
    }

    #[test]
    fn test_operator_is_not_trimmed() {
        let (report, _) = submit("1", "2", "+ ");
        assert_eq!(report.display, "Calculation Error: Unknown operator: + ");
    }

    #[test]
    fn test_reads_from_mock_dom() {
        let config = PageConfig::default();
        let mut dom = MockDom::calculator_page(&config);
        dom.set_value("first-num", "6");
        dom.set_value("second-num", "7");
        dom.set_value("operator", "*");
        let mut console = console();
        let report = CalculatorForm::new(&config).submit(&dom, &mut console);
        assert_eq!(report.display, "42");
    }

    #[test]
    fn test_diagnostic_lines() {
        let err = SubmitError::from(CalcError::from(InputProblem::TooLarge));
        let lines = err.diagnostic();
        assert_eq!(lines[0], "InputError: Numbers are too large for safe calculation");
        assert_eq!(lines.last().unwrap(), "    at CalculatorForm::submit");

        let err = SubmitError::from(PageError::missing("result"));
        assert!(err.diagnostic()[0].starts_with("PageError: Required element"));
    }

    #[test]
    fn test_report_serializes_lowercase_class() {
        let (report, _) = submit("1", "1", "+");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["class"], "success");
        assert_eq!(json["value"], 2.0);
        assert_eq!(ResultClass::Error.as_str(), "error");
    }
}
