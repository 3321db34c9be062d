//! Whole-template compilation

use std::ops::Range;

use log::{debug, trace};

use crate::config::CompilerConfig;
use crate::context::Context;
use crate::error::{CompilationError, SyntaxError};
use crate::evaluator::Evaluator;
use crate::parser::parse_code;
use crate::position::Position;
use crate::template::{Template, TemplateSlice, Tokenizer};

/// Turns template source into output text.
///
/// [`TemplateCompiler`] implements this for every [`Evaluator`], so callers
/// can hold a `&dyn Compiler` and swap compilers the way they swap
/// evaluators.
pub trait Compiler {
    /// Compile template source text.
    ///
    /// # Errors
    ///
    /// Returns `CompilationError::EvaluationFailed` for an unterminated code
    /// block or when parsing or evaluating a block fails. The error carries
    /// the whole source and the best-known absolute position.
    fn compile(&self, source: &str, context: &mut Context) -> Result<String, CompilationError>;

    /// Compile a template.
    fn compile_template(
        &self,
        template: &Template,
        context: &mut Context,
    ) -> Result<String, CompilationError> {
        self.compile(template.as_str(), context)
    }
}

/// Compiles templates by evaluating each code block with an [`Evaluator`].
///
/// Text is copied verbatim and code blocks are replaced by their value, in
/// source order. The first failure aborts the compilation and no partial
/// output is returned.
///
/// ```
/// use stencil::{std_functions, Compiler, Context, EvaluationEngine, TemplateCompiler};
///
/// let compiler = TemplateCompiler::new(EvaluationEngine::new(std_functions()));
/// let mut context = Context::with_variables([("n", "4")]);
///
/// let output = compiler.compile("{{ n }} squared is {{ multiply(n, n) }}", &mut context).unwrap();
/// assert_eq!(output, "4 squared is 16");
/// ```
#[derive(Debug)]
pub struct TemplateCompiler<E: Evaluator> {
    engine: E,
    config: CompilerConfig,
}

impl<E: Evaluator> TemplateCompiler<E> {
    /// Create a compiler with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, CompilerConfig::default())
    }

    /// Create a compiler with a custom configuration.
    pub fn with_config(engine: E, config: CompilerConfig) -> Self {
        Self { engine, config }
    }

    /// The evaluator used for code blocks.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The active configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }
}

impl<E: Evaluator> Compiler for TemplateCompiler<E> {
    fn compile(&self, source: &str, context: &mut Context) -> Result<String, CompilationError> {
        debug!("Compiling template ({} bytes)", source.len());

        let mut output = String::with_capacity(source.len());
        let mut blocks = 0usize;
        // Characters before the current slice
        let mut offset = 0usize;
        let open_len = self.config.delimiters.open().chars().count();

        for slice in Tokenizer::new(source, &self.config.delimiters) {
            match slice {
                Ok(TemplateSlice::Text { value, .. }) => {
                    output.push_str(value);
                    offset += value.chars().count();
                }
                Ok(TemplateSlice::Code { value, start, end }) => {
                    let result = parse_code(value, &self.config)
                        .and_then(|ast| self.engine.evaluate(&ast, context));

                    match result {
                        Ok(text) => {
                            trace!("code at {}..{} -> {:?}", start, end, text);
                            output.push_str(&text);
                            offset += source[start..end].chars().count();
                            blocks += 1;
                        }
                        Err(error) => {
                            let position = error
                                .absolute_offset(offset + open_len)
                                .unwrap_or(offset);
                            return Err(failure(error, position, source, start..end));
                        }
                    }
                }
                Err(err) => {
                    // Slices tile the source, so the open block starts at `offset`
                    let code_span = err.start()..source.len();
                    let error = err.into_syntax_error(source);
                    return Err(failure(error, offset, source, code_span));
                }
            }
        }

        debug!(
            "Compiled {} code block(s) into {} bytes",
            blocks,
            output.len()
        );
        Ok(output)
    }
}

fn failure(
    error: SyntaxError,
    offset: usize,
    source: &str,
    code_span: Range<usize>,
) -> CompilationError {
    debug!("Compilation failed at character {}: {}", offset, error);
    CompilationError::EvaluationFailed {
        error,
        position: Position::Absolute(offset),
        source: source.to_string(),
        code_span,
    }
}
