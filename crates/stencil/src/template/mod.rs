//! Template sources and the slices they are split into

mod tokenizer;

pub use tokenizer::{TokenizeError, Tokenizer};

use std::fs;
use std::io;
use std::ops::Range;
use std::path::Path;

use crate::config::Delimiters;

/// Raw template source.
///
/// A template can be compiled any number of times, with different
/// registries or contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// The unprocessed source text
    pub raw_content: String,
}

impl Template {
    /// Create a template from source text.
    pub fn new(raw_content: impl Into<String>) -> Self {
        Self {
            raw_content: raw_content.into(),
        }
    }

    /// Read a template from a file.
    pub fn read_from(path: impl AsRef<Path>) -> io::Result<Self> {
        let raw_content = fs::read_to_string(path)?;
        Ok(Self { raw_content })
    }

    /// The source text.
    pub fn as_str(&self) -> &str {
        &self.raw_content
    }

    /// Iterate over the slices of this template.
    pub fn slices<'a>(&'a self, delimiters: &'a Delimiters) -> Tokenizer<'a> {
        Tokenizer::new(&self.raw_content, delimiters)
    }
}

impl From<String> for Template {
    fn from(raw_content: String) -> Self {
        Self { raw_content }
    }
}

impl From<&str> for Template {
    fn from(raw_content: &str) -> Self {
        Self::new(raw_content)
    }
}

/// A piece of a template: literal text or a delimited code block.
///
/// Offsets are absolute byte offsets into the template source. For code the
/// `start..end` span includes both delimiters while `value` excludes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSlice<'a> {
    /// Literal text, copied to the output verbatim.
    Text {
        /// The text
        value: &'a str,
        /// Offset of the first byte
        start: usize,
        /// Offset one past the last byte
        end: usize,
    },

    /// A code block to evaluate.
    Code {
        /// The code between the delimiters
        value: &'a str,
        /// Offset of the opening delimiter
        start: usize,
        /// Offset one past the closing delimiter
        end: usize,
    },
}

impl<'a> TemplateSlice<'a> {
    /// The text or code of this slice.
    pub fn value(&self) -> &'a str {
        match self {
            TemplateSlice::Text { value, .. } | TemplateSlice::Code { value, .. } => value,
        }
    }

    /// Byte range covered in the source.
    pub fn span(&self) -> Range<usize> {
        match self {
            TemplateSlice::Text { start, end, .. } | TemplateSlice::Code { start, end, .. } => {
                *start..*end
            }
        }
    }

    /// Whether this is a code slice.
    pub fn is_code(&self) -> bool {
        matches!(self, TemplateSlice::Code { .. })
    }

    /// The source text covered by this slice, delimiters included.
    pub fn raw<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span()]
    }
}
