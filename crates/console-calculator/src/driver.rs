//! Unified Calculator Driver
//!
//! **Write the test logic once, run it everywhere.** The same specifications
//! run against the bare engine and against the full page model.

use crate::core::FailureKind;

pub use engine_driver::EngineDriver;

/// Abstract driver trait for calculator interactions
///
/// Implemented by [`EngineDriver`] and [`crate::page::PageDriver`].
///
/// # Example
///
/// ```rust
/// use console_calculator::driver::{CalculatorDriver, EngineDriver};
///
/// fn verify_sum<D: CalculatorDriver>(driver: &mut D) {
///     assert_eq!(driver.calculate("10", "+", "32"), Some(42.0));
///     assert_eq!(driver.result_text(), "42");
/// }
///
/// verify_sum(&mut EngineDriver::new());
/// verify_sum(&mut console_calculator::page::PageDriver::new());
/// ```
pub trait CalculatorDriver {
    /// Submits one calculation, returning the value on success
    fn calculate(&mut self, first: &str, operator: &str, second: &str) -> Option<f64>;

    /// Text the user sees for the last calculation
    fn result_text(&self) -> String;

    /// Kind of the last failure, if the last calculation failed with one
    fn failure_kind(&self) -> Option<FailureKind>;

    /// Returns to the initial state
    fn reset(&mut self);
}

/// Engine-only driver
pub mod engine_driver {
    use super::CalculatorDriver;
    use crate::core::{evaluate, format_number, CalculationOutcome, FailureKind};

    /// Driver calling [`evaluate`] directly
    #[derive(Debug, Default)]
    pub struct EngineDriver {
        last: Option<CalculationOutcome>,
        attempts: usize,
    }

    impl EngineDriver {
        /// Creates a new engine driver
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Outcome of the last calculation
        #[must_use]
        pub fn last_outcome(&self) -> Option<&CalculationOutcome> {
            self.last.as_ref()
        }

        /// Number of calculations since the last reset
        #[must_use]
        pub fn attempts(&self) -> usize {
            self.attempts
        }
    }

    impl CalculatorDriver for EngineDriver {
        fn calculate(&mut self, first: &str, operator: &str, second: &str) -> Option<f64> {
            let outcome = evaluate(first, second, operator);
            let value = outcome.as_ref().ok().copied();
            self.last = Some(outcome);
            self.attempts += 1;
            value
        }

        fn result_text(&self) -> String {
            match &self.last {
                Some(Ok(value)) => format_number(*value),
                Some(Err(err)) => err.user_message(),
                None => String::new(),
            }
        }

        fn failure_kind(&self) -> Option<FailureKind> {
            match &self.last {
                Some(Err(err)) => Some(err.kind()),
                _ => None,
            }
        }

        fn reset(&mut self) {
            self.last = None;
            self.attempts = 0;
        }
    }
}

// ===== Unified Test Specifications =====
// These work with ANY CalculatorDriver implementation

fn expect_value<D: CalculatorDriver>(driver: &mut D, a: &str, op: &str, b: &str, shown: &str) {
    let value = driver.calculate(a, op, b);
    assert!(value.is_some(), "{a:?} {op} {b:?} should succeed");
    assert_eq!(driver.result_text(), shown, "{a:?} {op} {b:?}");
    assert_eq!(driver.failure_kind(), None);
    driver.reset();
}

fn expect_failure<D: CalculatorDriver>(
    driver: &mut D,
    a: &str,
    op: &str,
    b: &str,
    kind: FailureKind,
    shown: &str,
) {
    assert_eq!(driver.calculate(a, op, b), None, "{a:?} {op} {b:?} should fail");
    assert_eq!(driver.failure_kind(), Some(kind), "{a:?} {op} {b:?}");
    assert_eq!(driver.result_text(), shown);
    driver.reset();
}

/// Verifies the four operators
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) {
    expect_value(driver, "2", "+", "3", "5");
    expect_value(driver, "10", "-", "4", "6");
    expect_value(driver, "4", "-", "10", "-6");
    expect_value(driver, "6", "*", "7", "42");
    expect_value(driver, "20", "/", "4", "5");
    expect_value(driver, "0", "*", "0", "0");
    expect_value(driver, "0.1", "+", "0.2", "0.30000000000000004");
}

/// Verifies number conversion of operand text
pub fn verify_number_formats<D: CalculatorDriver>(driver: &mut D) {
    expect_value(driver, "  12  ", "+", "\t30\n", "42");
    expect_value(driver, "0x10", "+", "1", "17");
    expect_value(driver, "0b101", "*", "0o7", "35");
    expect_value(driver, ".5", "*", "2", "1");
    expect_value(driver, "1e3", "+", "-1E2", "900");
    expect_value(driver, "1e-7", "+", "0", "1e-7");
    expect_value(driver, "-0", "*", "1", "0");
}

/// Verifies the input validation failures
pub fn verify_input_validation<D: CalculatorDriver>(driver: &mut D) {
    let required = "Input Error: Both number fields are required";
    let invalid = "Input Error: Please enter valid numbers only";
    let large = "Input Error: Numbers are too large for safe calculation";

    expect_failure(driver, "", "+", "3", FailureKind::InputError, required);
    expect_failure(driver, "3", "+", "", FailureKind::InputError, required);
    expect_failure(driver, "   ", "+", "3", FailureKind::InputError, required);
    expect_failure(driver, "abc", "+", "3", FailureKind::InputError, invalid);
    expect_failure(driver, "3", "+", "1_000", FailureKind::InputError, invalid);
    expect_failure(driver, "1e", "+", "3", FailureKind::InputError, invalid);
    expect_failure(driver, "1152921504606846976", "+", "1", FailureKind::InputError, large);
    expect_failure(driver, "Infinity", "+", "1", FailureKind::InputError, large);
    expect_failure(driver, "1e400", "-", "1", FailureKind::InputError, large);
    // Emptiness is checked before the operator
    expect_failure(driver, "", "%", "1", FailureKind::InputError, required);
}

/// Verifies division by zero
pub fn verify_division_by_zero<D: CalculatorDriver>(driver: &mut D) {
    let shown = "Division Error: Division by zero is not allowed";
    expect_failure(driver, "5", "/", "0", FailureKind::DivideByZeroError, shown);
    expect_failure(driver, "5", "/", "-0", FailureKind::DivideByZeroError, shown);
    expect_failure(driver, "0", "/", "0.0", FailureKind::DivideByZeroError, shown);
    expect_value(driver, "0", "/", "5", "0");
}

/// Verifies calculation errors
pub fn verify_calculation_errors<D: CalculatorDriver>(driver: &mut D) {
    expect_failure(
        driver,
        "3",
        "%",
        "4",
        FailureKind::CalculationError,
        "Calculation Error: Unknown operator: %",
    );
    expect_failure(
        driver,
        "3",
        " +",
        "4",
        FailureKind::CalculationError,
        "Calculation Error: Unknown operator:  +",
    );
    expect_failure(
        driver,
        "9007199254740991",
        "/",
        "1e-320",
        FailureKind::CalculationError,
        "Calculation Error: Calculation resulted in invalid number",
    );
}

/// Verifies that identical inputs give identical results
pub fn verify_idempotence<D: CalculatorDriver>(driver: &mut D) {
    for (a, op, b) in [("7", "/", "2"), ("x", "+", "1"), ("1", "/", "0")] {
        let first = (driver.calculate(a, op, b), driver.result_text());
        let second = (driver.calculate(a, op, b), driver.result_text());
        assert_eq!(first, second);
        driver.reset();
    }
}

/// Complete verification suite - runs all specifications
pub fn run_full_specification<D: CalculatorDriver>(driver: &mut D) {
    verify_basic_arithmetic(driver);
    verify_number_formats(driver);
    verify_input_validation(driver);
    verify_division_by_zero(driver);
    verify_calculation_errors(driver);
    verify_idempotence(driver);
}
