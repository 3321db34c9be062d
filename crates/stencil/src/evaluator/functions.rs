//! Adapters from plain closures to [`Function`]

use super::{Evaluator, Function};
use crate::ast::SyntaxNode;
use crate::context::Context;
use crate::error::SyntaxError;

/// Evaluate every parameter, left to right, stopping at the first failure.
pub fn resolve_params(
    evaluator: &dyn Evaluator,
    parameters: &[SyntaxNode],
    context: &mut Context,
) -> Result<Vec<String>, SyntaxError> {
    parameters
        .iter()
        .map(|parameter| evaluator.evaluate(parameter, context))
        .collect()
}

/// A function of its evaluated arguments that cannot fail.
///
/// ```
/// use stencil::{compile_template_from_string, FunctionRegistry, SimpleFunction};
///
/// let registry = FunctionRegistry::new()
///     .with("shout", SimpleFunction::new(|args: &[String]| args.join(" ").to_uppercase()));
///
/// let output = compile_template_from_string("{{ shout(\"hi\", \"there\") }}!", registry).unwrap();
/// assert_eq!(output, "HI THERE!");
/// ```
pub struct SimpleFunction<F> {
    function: F,
}

impl<F> SimpleFunction<F>
where
    F: Fn(&[String]) -> String + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(function: F) -> Box<Self> {
        Box::new(Self { function })
    }
}

impl<F> Function for SimpleFunction<F>
where
    F: Fn(&[String]) -> String + Send + Sync,
{
    fn evaluate(
        &self,
        evaluator: &dyn Evaluator,
        parameters: &[SyntaxNode],
        context: &mut Context,
    ) -> Result<String, SyntaxError> {
        let arguments = resolve_params(evaluator, parameters, context)?;
        Ok((self.function)(&arguments))
    }
}

/// A function of its evaluated arguments that may fail.
pub struct FallibleFunction<F> {
    function: F,
}

impl<F> FallibleFunction<F>
where
    F: Fn(&[String]) -> Result<String, SyntaxError> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(function: F) -> Box<Self> {
        Box::new(Self { function })
    }
}

impl<F> Function for FallibleFunction<F>
where
    F: Fn(&[String]) -> Result<String, SyntaxError> + Send + Sync,
{
    fn evaluate(
        &self,
        evaluator: &dyn Evaluator,
        parameters: &[SyntaxNode],
        context: &mut Context,
    ) -> Result<String, SyntaxError> {
        let arguments = resolve_params(evaluator, parameters, context)?;
        (self.function)(&arguments)
    }
}

/// A function of its evaluated arguments and the live context.
///
/// Changes made to the context are visible to everything evaluated later
/// in the same compilation.
pub struct FunctionWithContext<F> {
    function: F,
}

impl<F> FunctionWithContext<F>
where
    F: Fn(&[String], &mut Context) -> Result<String, SyntaxError> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(function: F) -> Box<Self> {
        Box::new(Self { function })
    }
}

impl<F> Function for FunctionWithContext<F>
where
    F: Fn(&[String], &mut Context) -> Result<String, SyntaxError> + Send + Sync,
{
    fn evaluate(
        &self,
        evaluator: &dyn Evaluator,
        parameters: &[SyntaxNode],
        context: &mut Context,
    ) -> Result<String, SyntaxError> {
        let arguments = resolve_params(evaluator, parameters, context)?;
        (self.function)(&arguments, context)
    }
}

/// A function of its unevaluated arguments.
///
/// The closure gets the evaluator and decides which children to evaluate,
/// which is how short-circuiting constructs are built.
pub struct FunctionWithAst<F> {
    function: F,
}

impl<F> FunctionWithAst<F>
where
    F: Fn(&dyn Evaluator, &[SyntaxNode], &mut Context) -> Result<String, SyntaxError>
        + Send
        + Sync,
{
    /// Wrap a closure.
    pub fn new(function: F) -> Box<Self> {
        Box::new(Self { function })
    }
}

impl<F> Function for FunctionWithAst<F>
where
    F: Fn(&dyn Evaluator, &[SyntaxNode], &mut Context) -> Result<String, SyntaxError>
        + Send
        + Sync,
{
    fn evaluate(
        &self,
        evaluator: &dyn Evaluator,
        parameters: &[SyntaxNode],
        context: &mut Context,
    ) -> Result<String, SyntaxError> {
        (self.function)(evaluator, parameters, context)
    }
}
