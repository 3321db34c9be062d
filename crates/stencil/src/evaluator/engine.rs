//! The default evaluator

use log::trace;

use super::{Evaluator, FunctionRegistry};
use crate::ast::SyntaxNode;
use crate::context::Context;
use crate::error::{EvaluationError, SyntaxError};

/// Evaluates syntax trees against a [`FunctionRegistry`].
///
/// A named node without arguments is a variable reference when the context
/// defines that name, and a function call otherwise. Named nodes with
/// arguments are always function calls. An anonymous node evaluates to its
/// literal text, to its single child, or to the empty string when it has
/// neither.
#[derive(Debug, Default)]
pub struct EvaluationEngine {
    registry: FunctionRegistry,
}

impl EvaluationEngine {
    /// Create an engine dispatching to `registry`.
    pub fn new(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    /// The functions this engine dispatches to.
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }
}

impl From<FunctionRegistry> for EvaluationEngine {
    fn from(registry: FunctionRegistry) -> Self {
        Self::new(registry)
    }
}

impl Evaluator for EvaluationEngine {
    fn evaluate(&self, node: &SyntaxNode, context: &mut Context) -> Result<String, SyntaxError> {
        match node {
            SyntaxNode::NamedNode {
                identifier,
                starts_at,
                children,
            } => {
                if children.is_empty() {
                    if let Some(value) = context.get_variable(identifier) {
                        trace!("variable `{}` at {} = {:?}", identifier, starts_at, value);
                        return Ok(value.to_string());
                    }
                }

                let function = self.registry.get(identifier).ok_or_else(|| {
                    SyntaxError::at_position(
                        *starts_at,
                        EvaluationError::UnknownSymbol {
                            symbol: identifier.clone(),
                        },
                    )
                })?;

                trace!(
                    "invoking `{}` at {} with {} argument(s)",
                    identifier,
                    starts_at,
                    children.len()
                );
                function
                    .evaluate(self, children, context)
                    .map_err(|err| err.invoked_at(*starts_at))
            }

            SyntaxNode::AnonymousNode {
                starts_at,
                children,
                literal,
            } => match children.as_slice() {
                [] => Ok(literal.clone().unwrap_or_default()),
                [child] => self.evaluate(child, context),
                [first, rest @ ..] => Err(SyntaxError::at_position(
                    *starts_at,
                    EvaluationError::UnexpectedElements {
                        last_expected: Some(first.to_string()),
                        unexpected_elements: rest.iter().map(ToString::to_string).collect(),
                    },
                )),
            },
        }
    }
}
