//! Validation pipeline from raw form text to a calculation outcome

use crate::core::number::{parse_number, trim_number_text, MAX_SAFE_INTEGER};
use crate::core::{CalcError, CalculationOutcome, InputProblem, Operation};
use serde::{Deserialize, Serialize};

/// Raw form input for one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// First operand as typed
    pub first: String,
    /// Second operand as typed
    pub second: String,
    /// Operator symbol as selected
    pub operator: String,
}

impl CalculationRequest {
    /// Creates a request from raw texts
    #[must_use]
    pub fn new(first: &str, second: &str, operator: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            operator: operator.to_string(),
        }
    }

    /// Evaluates the request
    pub fn evaluate(&self) -> CalculationOutcome {
        evaluate(&self.first, &self.second, &self.operator)
    }
}

/// Validates both operands, applies the operator and checks the result
///
/// Each step fails fast:
/// 1. empty operand (after trimming) is an input error
/// 2. not-a-number operand is an input error
/// 3. operand magnitude above [`MAX_SAFE_INTEGER`] is an input error
/// 4. unknown operator or division by zero
/// 5. non-finite result is a calculation error
pub fn evaluate(raw_a: &str, raw_b: &str, operator: &str) -> CalculationOutcome {
    let a = trim_number_text(raw_a);
    let b = trim_number_text(raw_b);

    if a.is_empty() || b.is_empty() {
        return Err(InputProblem::MissingOperand.into());
    }

    let (num_a, num_b) = match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(InputProblem::NotANumber.into()),
    };

    // Also rejects infinite operands
    if num_a.abs() > MAX_SAFE_INTEGER || num_b.abs() > MAX_SAFE_INTEGER {
        return Err(InputProblem::TooLarge.into());
    }

    let op: Operation = operator.parse()?;
    let result = op.apply(num_a, num_b)?;

    if !result.is_finite() {
        return Err(CalcError::NonFiniteResult);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FailureKind;

    // ===== Successful calculations =====

    #[test]
    fn test_add() {
        assert_eq!(evaluate("2", "3", "+"), Ok(5.0));
    }

    #[test]
    fn test_subtract_first_minus_second() {
        assert_eq!(evaluate("3", "10", "-"), Ok(-7.0));
    }

    #[test]
    fn test_multiply() {
        assert_eq!(evaluate("6", "7", "*"), Ok(42.0));
    }

    #[test]
    fn test_divide() {
        assert_eq!(evaluate("7", "2", "/"), Ok(3.5));
    }

    #[test]
    fn test_zero_times_zero() {
        assert_eq!(evaluate("0", "0", "*"), Ok(0.0));
    }

    #[test]
    fn test_operands_are_trimmed() {
        assert_eq!(evaluate("  4 ", "\t5\n", "+"), Ok(9.0));
    }

    #[test]
    fn test_decimal_and_hex_operands() {
        assert_eq!(evaluate("0.5", "0x10", "*"), Ok(8.0));
    }

    #[test]
    fn test_safe_integer_boundary_accepted() {
        assert_eq!(
            evaluate("9007199254740991", "0", "+"),
            Ok(MAX_SAFE_INTEGER)
        );
    }

    // ===== Input errors =====

    #[test]
    fn test_empty_first_operand() {
        assert_eq!(
            evaluate("", "3", "+"),
            Err(CalcError::Input(InputProblem::MissingOperand))
        );
    }

    #[test]
    fn test_empty_second_operand() {
        assert_eq!(
            evaluate("3", "", "+"),
            Err(CalcError::Input(InputProblem::MissingOperand))
        );
    }

    #[test]
    fn test_whitespace_only_operand_is_empty() {
        assert_eq!(
            evaluate("   ", "3", "+"),
            Err(CalcError::Input(InputProblem::MissingOperand))
        );
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(
            evaluate("abc", "3", "+"),
            Err(CalcError::Input(InputProblem::NotANumber))
        );
        assert_eq!(
            evaluate("3", "4x", "+"),
            Err(CalcError::Input(InputProblem::NotANumber))
        );
    }

    #[test]
    fn test_large_exact_integer_rejected() {
        let big = format!("{}", 2u64.pow(60));
        assert_eq!(
            evaluate(&big, "1", "+"),
            Err(CalcError::Input(InputProblem::TooLarge))
        );
    }

    #[test]
    fn test_just_above_safe_integer_rejected() {
        assert_eq!(
            evaluate("3", "-9007199254740993", "+"),
            Err(CalcError::Input(InputProblem::TooLarge))
        );
    }

    #[test]
    fn test_infinite_operand_rejected_as_too_large() {
        assert_eq!(
            evaluate("Infinity", "1", "+"),
            Err(CalcError::Input(InputProblem::TooLarge))
        );
        assert_eq!(
            evaluate("1", "1e400", "*"),
            Err(CalcError::Input(InputProblem::TooLarge))
        );
    }

    #[test]
    fn test_missing_checked_before_nan() {
        assert_eq!(
            evaluate("abc", "", "+"),
            Err(CalcError::Input(InputProblem::MissingOperand))
        );
    }

    #[test]
    fn test_input_checked_before_operator() {
        assert_eq!(
            evaluate("abc", "1", "%"),
            Err(CalcError::Input(InputProblem::NotANumber))
        );
    }

    // ===== Operator and arithmetic errors =====

    #[test]
    fn test_divide_by_zero() {
        let err = evaluate("5", "0", "/").unwrap_err();
        assert_eq!(err, CalcError::DivideByZero);
        assert_eq!(err.kind(), FailureKind::DivideByZeroError);
    }

    #[test]
    fn test_divide_by_negative_zero_text() {
        assert_eq!(evaluate("5", "-0", "/"), Err(CalcError::DivideByZero));
    }

    #[test]
    fn test_unknown_operator() {
        let err = evaluate("3", "4", "%").unwrap_err();
        assert_eq!(err.kind(), FailureKind::CalculationError);
        assert!(err.to_string().contains('%'));
    }

    #[test]
    fn test_operator_not_trimmed() {
        assert_eq!(
            evaluate("3", "4", " + "),
            Err(CalcError::UnknownOperator(" + ".into()))
        );
    }

    #[test]
    fn test_overflowing_quotient_is_calculation_error() {
        // subnormal divisor passes the magnitude guard
        assert_eq!(
            evaluate("9007199254740991", "1e-320", "/"),
            Err(CalcError::NonFiniteResult)
        );
    }

    // ===== Request wrapper =====

    #[test]
    fn test_request_evaluate() {
        let request = CalculationRequest::new("8", "2", "/");
        assert_eq!(request.evaluate(), Ok(4.0));
    }

    #[test]
    fn test_request_idempotent() {
        let request = CalculationRequest::new("1", "0", "/");
        assert_eq!(request.evaluate(), request.evaluate());
    }
}
