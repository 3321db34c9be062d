//! Error types for tokenizing, parsing, evaluating and compiling templates

use std::fmt;
use std::io;
use std::ops::Range;
use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

/// What went wrong while evaluating (or preparing to evaluate) code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// More elements than the construct accepts, or an element that does not belong.
    #[error("unexpected {} after {}", render_list(.unexpected_elements), .last_expected.as_deref().unwrap_or("start of code"))]
    UnexpectedElements {
        /// The last element that was expected (or a description of it)
        last_expected: Option<String>,
        /// The elements that were not expected
        unexpected_elements: Vec<String>,
    },

    /// No variable or function with this name.
    #[error("unknown symbol `{symbol}`")]
    UnknownSymbol {
        /// The symbol that could not be resolved
        symbol: String,
    },

    /// Arguments a function cannot accept.
    #[error("invalid arguments {}{}", render_list(.arguments), render_description(.description))]
    InvalidArguments {
        /// Optional human-readable detail
        description: Option<String>,
        /// The offending arguments
        arguments: Vec<String>,
    },

    /// Well-formed arguments whose values cannot be used.
    #[error("invalid values {}{}", render_list(.values), render_description(.description))]
    InvalidValues {
        /// Optional human-readable detail
        description: Option<String>,
        /// The offending values
        values: Vec<String>,
    },

    /// A code region without a closing delimiter.
    #[error("unterminated code block, expected `{expected}`")]
    UnterminatedCode {
        /// The closing delimiter that was never found
        expected: String,
    },

    /// Expression nesting beyond the configured limit.
    #[error("expression nested too deeply: depth {depth} exceeds {max}")]
    NestingTooDeep {
        /// Depth that was reached
        depth: usize,
        /// Configured limit
        max: usize,
    },
}

fn render_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("`{}`", item)).collect();
    format!("[{}]", quoted.join(", "))
}

fn render_description(description: &Option<String>) -> String {
    description
        .as_ref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

/// An evaluation error tagged with where it happened.
///
/// `relative_pos` locates the problem inside the failing construct and
/// `invocation_pos` locates the invocation that was running when it failed.
/// Both are filled in while the error bubbles up; a known position is never
/// overwritten by an outer one.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{description} (at {relative_pos}, invoked at {invocation_pos})")]
pub struct SyntaxError {
    /// Position inside the failing construct
    pub relative_pos: Position,
    /// Position of the invocation that failed
    pub invocation_pos: Position,
    /// What went wrong
    pub description: EvaluationError,
}

impl SyntaxError {
    /// An error with no position information yet.
    pub fn new(description: EvaluationError) -> Self {
        Self {
            relative_pos: Position::Unknown,
            invocation_pos: Position::Unknown,
            description,
        }
    }

    /// An error at a known position.
    pub fn at_position(relative_pos: Position, description: EvaluationError) -> Self {
        Self {
            relative_pos,
            invocation_pos: Position::Unknown,
            description,
        }
    }

    /// Record the invocation position, unless one is already known.
    pub fn invoked_at(mut self, position: Position) -> Self {
        if !self.invocation_pos.is_known() {
            self.invocation_pos = position;
        }
        self
    }

    /// Best-known absolute offset, given the absolute offset of the code block.
    pub fn absolute_offset(&self, code_base: usize) -> Option<usize> {
        let invocation = self.invocation_pos.resolve(0, code_base, None);
        self.relative_pos
            .resolve(0, code_base, invocation)
            .or(invocation)
    }
}

/// 1-based line and column of a character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Locate the character at `offset` in `source`. Offsets past the end
    /// clamp to the end.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut location = Self { line: 1, column: 1 };
        for c in source.chars().take(offset) {
            if c == '\n' {
                location.line += 1;
                location.column = 1;
            } else {
                location.column += 1;
            }
        }
        location
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Failure of a whole compilation.
#[derive(Debug)]
pub enum CompilationError {
    /// Tokenizing, parsing or evaluating a code block failed.
    EvaluationFailed {
        /// The underlying error
        error: SyntaxError,
        /// Best-known absolute position of the failure, in characters
        position: Position,
        /// The entire template source
        source: String,
        /// Byte range of the offending code block, delimiters included
        code_span: Range<usize>,
    },

    /// The template file could not be read.
    ReadFailed {
        /// File that was requested
        path: PathBuf,
        /// The I/O failure
        source: io::Error,
    },
}

impl CompilationError {
    /// The underlying syntax error, if this is an evaluation failure.
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            CompilationError::EvaluationFailed { error, .. } => Some(error),
            CompilationError::ReadFailed { .. } => None,
        }
    }

    /// Line and column of the failure in the template source.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            CompilationError::EvaluationFailed {
                position, source, ..
            } => position
                .raw_value()
                .map(|offset| SourceLocation::locate(source, offset)),
            CompilationError::ReadFailed { .. } => None,
        }
    }

    /// A multi-line diagnostic pointing at the failure.
    ///
    /// ```text
    /// error: unknown symbol `nope` (at +0 from code start, invoked at unknown)
    ///  --> 2:4
    ///   |
    /// 2 | a {{nope}}
    ///   |     ^
    /// ```
    pub fn render(&self) -> String {
        let (source, location) = match (self, self.location()) {
            (CompilationError::EvaluationFailed { source, .. }, Some(location)) => {
                (source, location)
            }
            _ => return format!("error: {}", self),
        };

        let line_text = source.lines().nth(location.line - 1).unwrap_or("");
        let gutter = location.line.to_string().len();
        format!(
            "error: {message}\n{pad} --> {location}\n{pad} |\n{line} | {text}\n{pad} | {caret:>column$}",
            message = self.message(),
            pad = " ".repeat(gutter),
            location = location,
            line = location.line,
            text = line_text,
            caret = "^",
            column = location.column,
        )
    }

    fn message(&self) -> String {
        match self {
            CompilationError::EvaluationFailed { error, .. } => error.to_string(),
            CompilationError::ReadFailed { path, source } => {
                format!("cannot read template `{}`: {}", path.display(), source)
            }
        }
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationError::EvaluationFailed { position, .. } => {
                write!(f, "compilation failed at {}: {}", position, self.message())
            }
            CompilationError::ReadFailed { .. } => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for CompilationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompilationError::EvaluationFailed { error, .. } => Some(error),
            CompilationError::ReadFailed { source, .. } => Some(source),
        }
    }
}

/// Invalid compiler configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A delimiter was the empty string.
    #[error("the {which} delimiter must not be empty")]
    EmptyDelimiter {
        /// `"opening"` or `"closing"`
        which: &'static str,
    },

    /// Both delimiters were the same string.
    #[error("opening and closing delimiters must differ (both are `{0}`)")]
    IdenticalDelimiters(String),
}
