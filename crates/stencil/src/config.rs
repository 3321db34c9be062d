//! Compiler configuration

use crate::error::ConfigError;

/// The pair of strings marking the start and end of a code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: "{{".to_string(),
            close: "}}".to_string(),
        }
    }
}

impl Delimiters {
    /// Create a delimiter pair.
    ///
    /// # Errors
    ///
    /// Fails if either delimiter is empty or both are the same string.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, ConfigError> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() {
            return Err(ConfigError::EmptyDelimiter { which: "opening" });
        }
        if close.is_empty() {
            return Err(ConfigError::EmptyDelimiter { which: "closing" });
        }
        if open == close {
            return Err(ConfigError::IdenticalDelimiters(open));
        }
        Ok(Self { open, close })
    }

    /// The opening delimiter.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing delimiter.
    pub fn close(&self) -> &str {
        &self.close
    }
}

/// Configuration and limits for a compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Code block delimiters
    pub delimiters: Delimiters,

    /// Maximum expression nesting depth accepted by the parser (`None` for no limit)
    pub max_depth: Option<usize>,
}

impl CompilerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom delimiters.
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Limit expression nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
