//! Variables, conditionals and counters

use crate::ast::SyntaxNode;
use crate::context::{Context, StateValue};
use crate::error::{EvaluationError, SyntaxError};
use crate::evaluator::{Evaluator, FunctionRegistry, FunctionWithAst, FunctionWithContext};

const COUNTER_PREFIX: &str = "counter:";

/// Whether `value` counts as true for `if`.
///
/// Everything except the empty string, `false` and `0` is true.
pub fn is_truthy(value: &str) -> bool {
    !matches!(value.trim(), "" | "false" | "0")
}

fn invalid_arguments(description: &str, arguments: Vec<String>) -> SyntaxError {
    SyntaxError::new(EvaluationError::InvalidArguments {
        description: Some(description.to_string()),
        arguments,
    })
}

fn set(args: &[String], context: &mut Context) -> Result<String, SyntaxError> {
    match args {
        [name, value] => {
            context.set_variable(name.as_str(), value.as_str());
            Ok(String::new())
        }
        _ => Err(invalid_arguments("`set` expects a name and a value", args.to_vec())),
    }
}

fn conditional(
    evaluator: &dyn Evaluator,
    parameters: &[SyntaxNode],
    context: &mut Context,
) -> Result<String, SyntaxError> {
    let (condition, then, otherwise) = match parameters {
        [condition, then] => (condition, then, None),
        [condition, then, otherwise] => (condition, then, Some(otherwise)),
        _ => {
            return Err(invalid_arguments(
                "`if` expects a condition, a value and an optional alternative",
                parameters.iter().map(ToString::to_string).collect(),
            ))
        }
    };

    if is_truthy(&evaluator.evaluate(condition, context)?) {
        evaluator.evaluate(then, context)
    } else {
        match otherwise {
            Some(node) => evaluator.evaluate(node, context),
            None => Ok(String::new()),
        }
    }
}

fn counter(args: &[String], context: &mut Context) -> Result<String, SyntaxError> {
    let [name] = args else {
        return Err(invalid_arguments("`counter` expects a name", args.to_vec()));
    };

    let key = format!("{}{}", COUNTER_PREFIX, name);
    let next = match context.get_state(&key) {
        None => Some(1),
        Some(StateValue::Integer(n)) => n.checked_add(1),
        Some(other) => {
            return Err(SyntaxError::new(EvaluationError::InvalidValues {
                description: Some(format!("counter `{}` holds a non-integer", name)),
                values: vec![other.to_string()],
            }))
        }
    };
    let next = next.ok_or_else(|| {
        SyntaxError::new(EvaluationError::InvalidValues {
            description: Some(format!("counter `{}` overflowed", name)),
            values: vec![i64::MAX.to_string()],
        })
    })?;
    context.set_state(key, next);
    Ok(next.to_string())
}

/// `set(name, value)`, lazy `if(condition, then[, else])` and `counter(name)`.
pub fn control_functions() -> FunctionRegistry {
    FunctionRegistry::new()
        .with("set", FunctionWithContext::new(set))
        .with("if", FunctionWithAst::new(conditional))
        .with("counter", FunctionWithContext::new(counter))
}
