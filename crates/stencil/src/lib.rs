//! # Stencil
//!
//! A small template compiler: text with embedded `{{ ... }}` code blocks
//! whose function calls are evaluated against a caller-supplied registry.
//!
//! ```
//! use stencil::{compile_template_from_string, std_functions};
//!
//! let output = compile_template_from_string("2 + 2 = {{ plus(2, 2) }}", std_functions()).unwrap();
//! assert_eq!(output, "2 + 2 = 4");
//! ```
//!
//! ## Architecture
//!
//! - **Tokenizer**: splits source into text and code slices
//! - **Parser**: turns a code slice into a [`SyntaxNode`] tree
//! - **Evaluator**: dispatches named nodes to registered [`Function`]s
//! - **Compiler**: stitches text and evaluated code back together
//!
//! Errors carry positions relative to the construct that failed and are
//! resolved to absolute character offsets in the template once they reach
//! the compiler, so a [`CompilationError`] can point at the offending line
//! and column.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod position;
pub mod std_fun;
pub mod template;

use std::path::Path;

// Re-export main types
pub use ast::SyntaxNode;
pub use compiler::{Compiler, TemplateCompiler};
pub use config::{CompilerConfig, Delimiters};
pub use context::{Context, StateValue};
pub use error::{CompilationError, ConfigError, EvaluationError, SourceLocation, SyntaxError};
pub use evaluator::{
    resolve_params, EvaluationEngine, Evaluator, FallibleFunction, Function, FunctionRegistry,
    FunctionWithAst, FunctionWithContext, SimpleFunction,
};
pub use parser::{parse_ast, parse_code};
pub use position::{char_offset, Position};
pub use std_fun::{
    control_functions, is_truthy, math_functions, reduce_numbers, std_functions, string_functions,
};
pub use template::{Template, TemplateSlice, TokenizeError, Tokenizer};

/// Stencil version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read a template file and compile it.
///
/// # Errors
///
/// `CompilationError::ReadFailed` if the file cannot be read, otherwise as
/// [`Compiler::compile`].
pub fn compile_template_from_file(
    path: impl AsRef<Path>,
    registry: FunctionRegistry,
) -> Result<String, CompilationError> {
    let path = path.as_ref();
    let template = Template::read_from(path).map_err(|source| CompilationError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    compile_template_from(&template, registry)
}

/// Compile template source text.
pub fn compile_template_from_string(
    source: &str,
    registry: FunctionRegistry,
) -> Result<String, CompilationError> {
    TemplateCompiler::new(EvaluationEngine::new(registry)).compile(source, &mut Context::empty())
}

/// Compile a template with an empty context.
pub fn compile_template_from(
    template: &Template,
    registry: FunctionRegistry,
) -> Result<String, CompilationError> {
    compile_template_with_context(template, registry, &mut Context::empty())
}

/// Compile a template with a caller-owned context.
///
/// Variables and state left behind by the template stay in `context`.
pub fn compile_template_with_context(
    template: &Template,
    registry: FunctionRegistry,
    context: &mut Context,
) -> Result<String, CompilationError> {
    TemplateCompiler::new(EvaluationEngine::new(registry)).compile_template(template, context)
}
