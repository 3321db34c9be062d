//! Evaluation of syntax trees against a registry of functions
//!
//! An [`Evaluator`] turns a [`SyntaxNode`] into text. Named nodes are
//! dispatched to a [`Function`] looked up by identifier; every function
//! receives its children unevaluated and decides for itself whether and
//! in which order to evaluate them. The wrappers in this module cover the
//! usual cases:
//!
//! - [`SimpleFunction`]: evaluates all arguments, then maps them to text
//! - [`FallibleFunction`]: same, but may fail
//! - [`FunctionWithContext`]: same, with access to the live [`Context`]
//! - [`FunctionWithAst`]: receives the raw children (lazy arguments)

mod engine;
mod functions;

pub use engine::EvaluationEngine;
pub use functions::{
    resolve_params, FallibleFunction, FunctionWithAst, FunctionWithContext, SimpleFunction,
};

use std::fmt;

use indexmap::IndexMap;

use crate::ast::SyntaxNode;
use crate::context::Context;
use crate::error::SyntaxError;

/// Something that can evaluate syntax nodes.
pub trait Evaluator {
    /// Evaluate `node` to its text.
    fn evaluate(&self, node: &SyntaxNode, context: &mut Context) -> Result<String, SyntaxError>;
}

/// A function callable from templates.
///
/// The registry is shared read-only between compilations, hence `Send + Sync`.
pub trait Function: Send + Sync {
    /// Invoke the function with its unevaluated arguments.
    fn evaluate(
        &self,
        evaluator: &dyn Evaluator,
        parameters: &[SyntaxNode],
        context: &mut Context,
    ) -> Result<String, SyntaxError>;
}

impl<F> Function for F
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
        self(evaluator, parameters, context)
    }
}

/// Functions available to templates, by name.
///
/// Iteration follows registration order. Registering a name again replaces
/// the earlier function in place.
///
/// # Example
///
/// ```
/// use stencil::{FunctionRegistry, SimpleFunction};
///
/// let mut registry = FunctionRegistry::new();
/// registry.register("hello", SimpleFunction::new(|_: &[String]| "Hello".to_string()));
///
/// assert!(registry.contains("hello"));
/// assert_eq!(registry.names().collect::<Vec<_>>(), vec!["hello"]);
/// ```
#[derive(Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, Box<dyn Function>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, returning the one it replaces.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        function: Box<dyn Function>,
    ) -> Option<Box<dyn Function>> {
        self.functions.insert(name.into(), function)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, function: Box<dyn Function>) -> Self {
        self.register(name, function);
        self
    }

    /// Look up a function.
    pub fn get(&self, name: &str) -> Option<&dyn Function> {
        self.functions.get(name).map(|function| function.as_ref())
    }

    /// Check if a function is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl<K: Into<String>> Extend<(K, Box<dyn Function>)> for FunctionRegistry {
    fn extend<I: IntoIterator<Item = (K, Box<dyn Function>)>>(&mut self, iter: I) {
        for (name, function) in iter {
            self.register(name, function);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Box<dyn Function>)> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = (K, Box<dyn Function>)>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl IntoIterator for FunctionRegistry {
    type Item = (String, Box<dyn Function>);
    type IntoIter = indexmap::map::IntoIter<String, Box<dyn Function>>;

    fn into_iter(self) -> Self::IntoIter {
        self.functions.into_iter()
    }
}
