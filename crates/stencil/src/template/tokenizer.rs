//! Mixed-content tokenizer splitting a template into text and code slices

use std::iter::FusedIterator;

use log::trace;
use thiserror::Error;

use super::TemplateSlice;
use crate::config::Delimiters;
use crate::error::{EvaluationError, SyntaxError};
use crate::position::{char_offset, Position};

/// Failure while splitting a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// A code block was opened and never closed.
    #[error("code block opened at byte {start} is never closed, expected `{expected}`")]
    Unterminated {
        /// Absolute offset of the opening delimiter
        start: usize,
        /// The closing delimiter
        expected: String,
    },
}

impl TokenizeError {
    /// Byte offset in the source where the failure starts.
    pub fn start(&self) -> usize {
        match self {
            TokenizeError::Unterminated { start, .. } => *start,
        }
    }

    /// Convert into a `SyntaxError` at the absolute character offset of the
    /// failure in `source`.
    pub fn into_syntax_error(self, source: &str) -> SyntaxError {
        match self {
            TokenizeError::Unterminated { start, expected } => SyntaxError::at_position(
                Position::Absolute(char_offset(source, start)),
                EvaluationError::UnterminatedCode { expected },
            ),
        }
    }
}

/// Lazy, single-pass iterator over the slices of a template source.
///
/// Slices tile the source in order: text slices are never empty, code slices
/// cover their delimiters. Nested delimiter pairs inside a code block are
/// balanced, and delimiters inside double-quoted strings are ignored.
/// After an error the iterator is exhausted.
///
/// ```
/// use stencil::{Delimiters, TemplateSlice, Tokenizer};
///
/// let delimiters = Delimiters::default();
/// let slices: Vec<_> = Tokenizer::new("Hi {{ name }}!", &delimiters)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(slices, vec![
///     TemplateSlice::Text { value: "Hi ", start: 0, end: 3 },
///     TemplateSlice::Code { value: " name ", start: 3, end: 13 },
///     TemplateSlice::Text { value: "!", start: 13, end: 14 },
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    delimiters: &'a Delimiters,
    cursor: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Start tokenizing `source` from the beginning.
    pub fn new(source: &'a str, delimiters: &'a Delimiters) -> Self {
        Self {
            source,
            delimiters,
            cursor: 0,
            finished: false,
        }
    }

    /// Emit the code block whose opening delimiter starts at the cursor.
    fn scan_code(&mut self) -> Result<TemplateSlice<'a>, TokenizeError> {
        let open = self.delimiters.open().as_bytes();
        let close = self.delimiters.close().as_bytes();
        let bytes = self.source.as_bytes();

        let start = self.cursor;
        let inner_start = start + open.len();
        let mut depth = 1usize;
        let mut in_string = false;
        let mut i = inner_start;

        while i < bytes.len() {
            if in_string {
                match bytes[i] {
                    b'\\' => i += 2,
                    b'"' => {
                        in_string = false;
                        i += 1;
                    }
                    _ => i += 1,
                }
                continue;
            }

            if bytes[i..].starts_with(close) {
                depth -= 1;
                if depth == 0 {
                    let end = i + close.len();
                    self.cursor = end;
                    return Ok(TemplateSlice::Code {
                        value: &self.source[inner_start..i],
                        start,
                        end,
                    });
                }
                i += close.len();
            } else if bytes[i..].starts_with(open) {
                depth += 1;
                i += open.len();
            } else {
                in_string = bytes[i] == b'"';
                i += 1;
            }
        }

        Err(TokenizeError::Unterminated {
            start,
            expected: self.delimiters.close().to_string(),
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<TemplateSlice<'a>, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.cursor >= self.source.len() {
            self.finished = true;
            return None;
        }

        let rest = &self.source[self.cursor..];
        let slice = match rest.find(self.delimiters.open()) {
            Some(0) => match self.scan_code() {
                Ok(slice) => slice,
                Err(err) => {
                    trace!("tokenizer: {}", err);
                    self.finished = true;
                    return Some(Err(err));
                }
            },
            Some(offset) => {
                let start = self.cursor;
                self.cursor += offset;
                TemplateSlice::Text {
                    value: &rest[..offset],
                    start,
                    end: self.cursor,
                }
            }
            None => {
                let start = self.cursor;
                self.cursor = self.source.len();
                TemplateSlice::Text {
                    value: rest,
                    start,
                    end: self.cursor,
                }
            }
        };

        trace!("tokenizer: {:?}", slice);
        Some(Ok(slice))
    }
}

impl FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize<'a>(
        source: &'a str,
        delimiters: &'a Delimiters,
    ) -> Result<Vec<TemplateSlice<'a>>, TokenizeError> {
        Tokenizer::new(source, delimiters).collect()
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let delimiters = Delimiters::default();
        assert_eq!(tokenize("", &delimiters).unwrap(), vec![]);
    }

    #[test]
    fn test_text_only() {
        let delimiters = Delimiters::default();
        assert_eq!(
            tokenize("plain", &delimiters).unwrap(),
            vec![TemplateSlice::Text {
                value: "plain",
                start: 0,
                end: 5,
            }]
        );
    }

    #[test]
    fn test_adjacent_code_blocks_have_no_empty_text() {
        let delimiters = Delimiters::default();
        assert_eq!(
            tokenize("{{a}}{{b}}", &delimiters).unwrap(),
            vec![
                TemplateSlice::Code {
                    value: "a",
                    start: 0,
                    end: 5,
                },
                TemplateSlice::Code {
                    value: "b",
                    start: 5,
                    end: 10,
                },
            ]
        );
    }

    #[test]
    fn test_nested_delimiters_are_balanced() {
        let delimiters = Delimiters::default();
        assert_eq!(
            tokenize("x{{ a {{ b }} c }}y", &delimiters).unwrap(),
            vec![
                TemplateSlice::Text {
                    value: "x",
                    start: 0,
                    end: 1,
                },
                TemplateSlice::Code {
                    value: " a {{ b }} c ",
                    start: 1,
                    end: 18,
                },
                TemplateSlice::Text {
                    value: "y",
                    start: 18,
                    end: 19,
                },
            ]
        );
    }

    #[test]
    fn test_delimiters_inside_strings_are_ignored() {
        let delimiters = Delimiters::default();
        let slices = tokenize(r#"{{ concat("}}", "\"}}") }}!"#, &delimiters).unwrap();
        assert_eq!(
            slices[0],
            TemplateSlice::Code {
                value: r#" concat("}}", "\"}}") "#,
                start: 0,
                end: 26,
            }
        );
        assert_eq!(slices.len(), 2);
    }

    #[test]
    fn test_unterminated_code_is_an_error() {
        let delimiters = Delimiters::default();
        let mut tokenizer = Tokenizer::new("a {{ b", &delimiters);
        assert!(matches!(tokenizer.next(), Some(Ok(TemplateSlice::Text { .. }))));
        assert_eq!(
            tokenizer.next(),
            Some(Err(TokenizeError::Unterminated {
                start: 2,
                expected: "}}".to_string(),
            }))
        );
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn test_unterminated_string_swallows_closing_delimiter() {
        let delimiters = Delimiters::default();
        assert!(tokenize(r#"{{ "abc }}"#, &delimiters).is_err());
    }

    #[test]
    fn test_custom_delimiters() {
        let delimiters = Delimiters::new("<%", "%>").unwrap();
        let slices: Vec<_> = Tokenizer::new("a <% b %> {{c}}", &delimiters)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            slices,
            vec![
                TemplateSlice::Text {
                    value: "a ",
                    start: 0,
                    end: 2,
                },
                TemplateSlice::Code {
                    value: " b ",
                    start: 2,
                    end: 9,
                },
                TemplateSlice::Text {
                    value: " {{c}}",
                    start: 9,
                    end: 15,
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_error_converts_to_syntax_error() {
        let source = "ñu {{ x";
        let err = TokenizeError::Unterminated {
            start: 4,
            expected: "}}".to_string(),
        };
        assert_eq!(err.start(), 4);

        let err = err.into_syntax_error(source);
        assert_eq!(err.relative_pos, Position::Absolute(3));
        assert!(matches!(err.description, EvaluationError::UnterminatedCode { .. }));
    }
}
