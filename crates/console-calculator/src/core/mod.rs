//! Calculator engine: validation, arithmetic and failure classification
//!
//! Every calculation is a pure function of two operand texts and an operator
//! symbol. Failures are classified into three kinds so the caller can decide
//! how to present them.

mod engine;
pub mod number;
mod operations;

pub use engine::{evaluate, CalculationRequest};
pub use number::{format_number, parse_number, MAX_SAFE_INTEGER};
pub use operations::Operation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a single calculation: a finite value or a classified failure
pub type CalculationOutcome = Result<f64, CalcError>;

/// Why user input was rejected before any arithmetic ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputProblem {
    /// One or both operand fields were empty
    #[error("Both number fields are required")]
    MissingOperand,
    /// An operand did not convert to a number
    #[error("Please enter valid numbers only")]
    NotANumber,
    /// An operand exceeded the safe-integer magnitude
    #[error("Numbers are too large for safe calculation")]
    TooLarge,
}

/// Calculator failures. `Display` is the bare message shown after the label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Malformed or out-of-range input
    #[error(transparent)]
    Input(#[from] InputProblem),
    /// Second operand of a division was zero
    #[error("Division by zero is not allowed")]
    DivideByZero,
    /// Operator symbol is not one of `+ - * /`
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    /// Arithmetic produced an infinite or NaN value
    #[error("Calculation resulted in invalid number")]
    NonFiniteResult,
}

impl CalcError {
    /// Returns the failure kind used for presentation
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Input(_) => FailureKind::InputError,
            Self::DivideByZero => FailureKind::DivideByZeroError,
            Self::UnknownOperator(_) | Self::NonFiniteResult => FailureKind::CalculationError,
        }
    }

    /// Returns the kind-prefixed text shown to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("{}: {self}", self.kind().label())
    }
}

/// The three failure kinds a calculation can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Input rejected before arithmetic
    InputError,
    /// Division by zero
    DivideByZeroError,
    /// Unknown operator or non-finite result
    CalculationError,
}

impl FailureKind {
    /// Label prefixed to the failure message
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InputError => "Input Error",
            Self::DivideByZeroError => "Division Error",
            Self::CalculationError => "Calculation Error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InputError => "InputError",
            Self::DivideByZeroError => "DivideByZeroError",
            Self::CalculationError => "CalculationError",
        };
        f.write_str(name)
    }
}
