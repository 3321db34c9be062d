//! Arithmetic over string-encoded numbers

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{EvaluationError, SyntaxError};
use crate::evaluator::{FallibleFunction, FunctionRegistry};

/// Parse `parameters` as numbers and fold them left to right with `op`.
///
/// Every argument that does not parse is reported in a single
/// `InvalidArguments` error. At least one number is required.
///
/// ```
/// use stencil::reduce_numbers;
///
/// let args = vec!["1".to_string(), "2".to_string(), "3".to_string()];
/// let sum = reduce_numbers::<i64, _>("sum", &args, |a, b| Ok(a + b));
/// assert_eq!(sum.unwrap(), "6");
/// ```
pub fn reduce_numbers<N, F>(name: &str, parameters: &[String], op: F) -> Result<String, SyntaxError>
where
    N: FromStr + Display,
    F: Fn(N, N) -> Result<N, EvaluationError>,
{
    let mut numbers = Vec::with_capacity(parameters.len());
    let mut invalid = Vec::new();
    for parameter in parameters {
        match parameter.trim().parse::<N>() {
            Ok(number) => numbers.push(number),
            Err(_) => invalid.push(parameter.clone()),
        }
    }

    if !invalid.is_empty() {
        return Err(SyntaxError::new(EvaluationError::InvalidArguments {
            description: Some(format!("`{}` expects numbers", name)),
            arguments: invalid,
        }));
    }

    let mut numbers = numbers.into_iter();
    let first = numbers.next().ok_or_else(|| {
        SyntaxError::new(EvaluationError::InvalidArguments {
            description: Some(format!("`{}` expects at least one number", name)),
            arguments: Vec::new(),
        })
    })?;

    numbers
        .try_fold(first, op)
        .map(|result| result.to_string())
        .map_err(SyntaxError::new)
}

fn nonzero_divisor(lhs: f64, rhs: f64, operation: &str) -> Result<(), EvaluationError> {
    if rhs == 0.0 {
        return Err(EvaluationError::InvalidValues {
            description: Some(format!("{} by zero", operation)),
            values: vec![lhs.to_string(), rhs.to_string()],
        });
    }
    Ok(())
}

/// `plus`, `minus`, `multiply`, `divide` and `modulo`, all variadic over `f64`.
pub fn math_functions() -> FunctionRegistry {
    FunctionRegistry::new()
        .with(
            "plus",
            FallibleFunction::new(|params: &[String]| {
                reduce_numbers("plus", params, |a: f64, b| Ok(a + b))
            }),
        )
        .with(
            "minus",
            FallibleFunction::new(|params: &[String]| {
                reduce_numbers("minus", params, |a: f64, b| Ok(a - b))
            }),
        )
        .with(
            "multiply",
            FallibleFunction::new(|params: &[String]| {
                reduce_numbers("multiply", params, |a: f64, b| Ok(a * b))
            }),
        )
        .with(
            "divide",
            FallibleFunction::new(|params: &[String]| {
                reduce_numbers("divide", params, |a: f64, b| {
                    nonzero_divisor(a, b, "division")?;
                    Ok(a / b)
                })
            }),
        )
        .with(
            "modulo",
            FallibleFunction::new(|params: &[String]| {
                reduce_numbers("modulo", params, |a: f64, b| {
                    nonzero_divisor(a, b, "modulo")?;
                    Ok(a % b)
                })
            }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn add(a: f64, b: f64) -> Result<f64, EvaluationError> {
        Ok(a + b)
    }

    #[test]
    fn test_reduce_left_to_right() {
        let result = reduce_numbers("minus", &args(&["10", "3", "2"]), |a: f64, b| Ok(a - b));
        assert_eq!(result.unwrap(), "5");
    }

    #[test]
    fn test_single_argument_is_identity() {
        assert_eq!(reduce_numbers("plus", &args(&["2.5"]), add).unwrap(), "2.5");
    }

    #[test]
    fn test_arguments_are_trimmed() {
        let result = reduce_numbers("plus", &args(&[" 1 ", "2\n"]), add);
        assert_eq!(result.unwrap(), "3");
    }

    #[test]
    fn test_invalid_arguments_are_all_reported() {
        let err = reduce_numbers("plus", &args(&["1", "x", "2", "y"]), add).unwrap_err();
        assert_eq!(
            err.description,
            EvaluationError::InvalidArguments {
                description: Some("`plus` expects numbers".to_string()),
                arguments: args(&["x", "y"]),
            }
        );
    }

    #[test]
    fn test_no_arguments() {
        let err = reduce_numbers("plus", &[], add).unwrap_err();
        assert!(matches!(
            err.description,
            EvaluationError::InvalidArguments { ref arguments, .. } if arguments.is_empty()
        ));
    }

    #[test]
    fn test_integer_representation() {
        let result = reduce_numbers::<i64, _>("modulo", &args(&["17", "5"]), |a, b| Ok(a % b));
        assert_eq!(result.unwrap(), "2");
        assert!(reduce_numbers::<i64, _>("plus", &args(&["1.5"]), |a, b| Ok(a + b)).is_err());
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let err = nonzero_divisor(4.0, 0.0, "division").unwrap_err();
        assert_eq!(
            err,
            EvaluationError::InvalidValues {
                description: Some("division by zero".to_string()),
                values: args(&["4", "0"]),
            }
        );
        assert!(nonzero_divisor(4.0, 2.0, "division").is_ok());
    }
}
