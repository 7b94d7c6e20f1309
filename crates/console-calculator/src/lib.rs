//! Console Calculator - validated four-operator calculator with console demos
//!
//! A pure calculator engine that turns two operand texts and an operator
//! symbol into a value or a classified failure, plus the page model around
//! it: form handler, developer-console demo buttons, global error observer
//! and page-load checks. The page model runs natively on a mock document;
//! the `wasm` feature binds it to a real browser.
//!
//! # Example
//!
//! ```rust
//! use console_calculator::prelude::*;
//!
//! assert_eq!(evaluate("6", "7", "*"), Ok(42.0));
//!
//! let err = evaluate("5", "0", "/").unwrap_err();
//! assert_eq!(err.kind(), FailureKind::DivideByZeroError);
//! assert_eq!(err.user_message(), "Division Error: Division by zero is not allowed");
//!
//! // The whole page, on a mock document
//! let mut page = PageDriver::new();
//! page.load();
//! page.enter_operands("0.1", "0.2");
//! page.select_operator("+");
//! let report = page.submit().unwrap();
//! assert_eq!(report.display, "0.30000000000000004");
//! ```

// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod clock;
pub mod config;
pub mod console;
pub mod core;
pub mod driver;
pub mod page;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::{ConfigError, PageConfig};
    pub use crate::console::{
        ConsoleEntry, ConsoleLevel, ConsoleMethod, ConsoleSink, DevConsole, MemorySink,
        TracingSink,
    };
    pub use crate::core::{
        evaluate, format_number, parse_number, CalcError, CalculationOutcome,
        CalculationRequest, FailureKind, InputProblem, Operation, MAX_SAFE_INTEGER,
    };
    pub use crate::driver::{CalculatorDriver, EngineDriver};
    pub use crate::page::{
        install_panic_observer, CalculatorForm, ConsoleDemo, DemoButton, DemoEffect, DomElement,
        ErrorEvent, ErrorObserver, FormFields, FormSnapshot, MockDom, PageDriver, PageError,
        PageSession, ResultClass, SubmitError, SubmitReport,
    };

    #[cfg(feature = "wasm")]
    pub use crate::page::browser::{BrowserCalculatorPage, BrowserSink};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_prelude_imports() {
        assert_eq!(evaluate("2", "3", "+"), Ok(5.0));
        assert_eq!(Operation::from_symbol("*"), Some(Operation::Multiply));
    }

    #[test]
    fn test_request_direct() {
        let request = CalculationRequest::new("10", "4", "-");
        assert_eq!(request.evaluate(), Ok(6.0));
    }

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            evaluate("", "1", "+").unwrap_err().kind(),
            FailureKind::InputError
        );
        assert_eq!(
            evaluate("1", "0", "/").unwrap_err().kind(),
            FailureKind::DivideByZeroError
        );
        assert_eq!(
            evaluate("1", "1", "^").unwrap_err().kind(),
            FailureKind::CalculationError
        );
    }

    #[test]
    fn test_full_page_session() {
        let clock = Arc::new(FixedClock::at_millis(0));
        let mut page = PageDriver::with_clock(clock.clone());
        assert!(page.load().is_healthy());

        page.enter_operands("12", "3");
        page.select_operator("/");
        assert_eq!(page.submit().map(|r| r.display), Some("4".to_string()));

        page.click_demo(DemoButton::TimerStart.index()).unwrap();
        clock.advance(chrono::Duration::milliseconds(5));
        page.click_demo(DemoButton::TimerEnd.index()).unwrap();
        page.click_demo(DemoButton::GlobalError.index()).unwrap();
        assert_eq!(page.run_deferred(), 2);

        let messages: Vec<&str> = page.console_entries().iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"Performance Timer: 5 ms"));
        assert!(messages.contains(&"Delayed initialization completed"));
        assert!(page.debug_info().contains("Global Error:"));
    }

    #[test]
    fn test_tracing_sink_console() {
        let mut console = DevConsole::new(TracingSink);
        console.log("goes to tracing");
        assert_eq!(console.depth(), 0);
    }
}
