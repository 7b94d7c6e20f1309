//! Calculator page model
//!
//! The page glue around the engine: a mock document, the form submit handler,
//! the console demo buttons, the global error observer and the load checks.
//! [`PageDriver`] wires them together over the mock document. [`PageSession`]
//! runs the same handlers on plain values, and the `wasm` feature binds a
//! session to a real browser.

#[cfg(feature = "wasm")]
pub mod browser;
pub mod demo;
pub mod dom;
pub mod driver;
pub mod form;
pub mod observer;
pub mod session;
pub mod startup;

pub use demo::{ConsoleDemo, DemoButton, DemoEffect};
pub use dom::{DomElement, DomEvent, MockDom};
pub use driver::PageDriver;
pub use form::{CalculatorForm, FormFields, FormSnapshot, ResultClass, SubmitError, SubmitReport};
pub use observer::{install_panic_observer, panic_observer_installed, ErrorEvent, ErrorObserver};
pub use session::PageSession;
pub use startup::LoadReport;

use crate::config::ConfigError;
use thiserror::Error;

/// Failures of the page glue itself, as opposed to calculation failures
#[derive(Debug, Error)]
pub enum PageError {
    /// An element the handler reads is not on the page
    #[error("Required element not found: {selector}")]
    MissingElement {
        /// `#id` selector that did not resolve
        selector: String,
    },
    /// Demo button index out of range
    #[error("Unknown console demo button: {0}")]
    UnknownDemoButton(usize),
    /// Page configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PageError {
    /// Missing element error for an element id
    #[must_use]
    pub fn missing(id: &str) -> Self {
        Self::MissingElement {
            selector: format!("#{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_element_message() {
        let err = PageError::missing("first-num");
        assert_eq!(err.to_string(), "Required element not found: #first-num");
    }

    #[test]
    fn test_unknown_button_message() {
        assert_eq!(
            PageError::UnknownDemoButton(20).to_string(),
            "Unknown console demo button: 20"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: PageError = crate::config::PageConfig::from_json("[").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid page configuration"));
    }
}
