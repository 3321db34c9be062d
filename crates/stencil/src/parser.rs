//! Recursive-descent parser for code blocks
//!
//! A code block holds one expression:
//!
//! ```text
//! code  := arg EOF
//! arg   := call | STRING | NUMBER
//! call  := IDENT [ '(' [ arg ( ',' arg )* ] ')' ]
//! IDENT := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! Strings are double-quoted with `\"`, `\\`, `\n`, `\t` and `\r` escapes;
//! any other escaped character is kept with its backslash. Numbers are an
//! optional sign, digits and an optional fraction. Whitespace between
//! tokens is ignored.
//!
//! Every node position is `RelativeToCodeStart`, counted in characters from
//! the first character after the opening delimiter.

use log::{debug, log_enabled, trace, Level};

use crate::ast::SyntaxNode;
use crate::config::CompilerConfig;
use crate::error::{EvaluationError, SyntaxError};
use crate::position::Position;

const END_OF_CODE: &str = "end of code";

/// Parse a code block with the default configuration.
pub fn parse_ast(code: &str) -> Result<SyntaxNode, SyntaxError> {
    parse_code(code, &CompilerConfig::default())
}

/// Parse the inner text of a code block into a syntax tree.
///
/// The root is an anonymous node at offset 0 holding the single expression.
///
/// # Errors
///
/// Returns `UnexpectedElements` for empty code, malformed tokens and
/// trailing content, and `NestingTooDeep` when calls nest beyond
/// `config.max_depth`. No partial tree is ever returned.
///
/// # Example
///
/// ```
/// use stencil::{parse_ast, Position, SyntaxNode};
///
/// let root = parse_ast(" plus(1, x) ").unwrap();
/// let call = &root.children()[0];
/// assert_eq!(call.identifier(), Some("plus"));
/// assert_eq!(call.starts_at(), Position::RelativeToCodeStart(1));
/// assert_eq!(call.children()[0], SyntaxNode::literal("1", Position::RelativeToCodeStart(6)));
/// ```
pub fn parse_code(code: &str, config: &CompilerConfig) -> Result<SyntaxNode, SyntaxError> {
    debug!("Starting to parse AST of: {:?}", code);

    let mut parser = Parser {
        source: code,
        pos: 0,
        offset: 0,
        max_depth: config.max_depth,
    };
    let result = parser.parse_root();

    match &result {
        Ok(node) if log_enabled!(Level::Debug) => debug!("Parsing complete, result: {:?}", node),
        Ok(_) => {}
        Err(err) => debug!("Parsing failed: {}", err),
    }
    result
}

struct Parser<'a> {
    source: &'a str,
    /// Byte cursor into `source`, used for slicing.
    pos: usize,
    /// Character cursor, used for reported positions.
    offset: usize,
    max_depth: Option<usize>,
}

impl<'a> Parser<'a> {
    fn parse_root(&mut self) -> Result<SyntaxNode, SyntaxError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(self.unexpected("an expression"));
        }

        let expression = self.parse_arg(1)?;

        self.skip_whitespace();
        if self.peek().is_some() {
            let trailing = self.source[self.pos..].trim_end().to_string();
            return Err(SyntaxError::at_position(
                self.position(),
                EvaluationError::UnexpectedElements {
                    last_expected: Some(expression.to_string()),
                    unexpected_elements: vec![trailing],
                },
            ));
        }

        Ok(SyntaxNode::anonymous(Position::RelativeToCodeStart(0)).add_child(expression))
    }

    fn parse_arg(&mut self, depth: usize) -> Result<SyntaxNode, SyntaxError> {
        self.skip_whitespace();
        match self.peek() {
            Some('"') => self.parse_string(),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some('-' | '+') if self.digit_follows() => self.parse_number(),
            Some(c) if is_identifier_start(c) => self.parse_call(depth),
            _ => Err(self.unexpected("an argument")),
        }
    }

    fn parse_call(&mut self, depth: usize) -> Result<SyntaxNode, SyntaxError> {
        if let Some(max) = self.max_depth {
            if depth > max {
                return Err(SyntaxError::at_position(
                    self.position(),
                    EvaluationError::NestingTooDeep { depth, max },
                ));
            }
        }

        let start = self.pos;
        let starts_at = self.position();
        while self.peek().is_some_and(is_identifier_char) {
            self.bump();
        }
        let identifier = &self.source[start..self.pos];
        if log_enabled!(Level::Trace) {
            trace!(
                "{:->width$}> {} at {}",
                "",
                identifier,
                starts_at,
                width = depth
            );
        }

        let mut node = SyntaxNode::named(identifier, starts_at);

        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Ok(node);
        }
        self.bump();

        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(node);
        }

        loop {
            node = node.add_child(self.parse_arg(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected("`,` or `)`")),
            }
        }

        if log_enabled!(Level::Trace) {
            trace!("{:->width$}< {}", "", node, width = depth);
        }
        Ok(node)
    }

    fn parse_string(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let starts_at = self.position();
        self.bump();

        let mut text = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => return Ok(SyntaxNode::literal(text, starts_at)),
                '\\' => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some(escaped @ ('"' | '\\')) => text.push(escaped),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => break,
                },
                _ => text.push(c),
            }
        }

        Err(SyntaxError::at_position(
            starts_at,
            EvaluationError::UnexpectedElements {
                last_expected: Some("closing `\"`".to_string()),
                unexpected_elements: vec![END_OF_CODE.to_string()],
            },
        ))
    }

    fn parse_number(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let start = self.pos;
        let starts_at = self.position();
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        self.skip_digits();
        if self.peek() == Some('.') && self.digit_follows() {
            self.bump();
            self.skip_digits();
        }
        Ok(SyntaxNode::literal(&self.source[start..self.pos], starts_at))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cursor helpers
    // ═══════════════════════════════════════════════════════════════════

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn digit_follows(&self) -> bool {
        self.source[self.pos..]
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// Consume one character, keeping both cursors in step.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.offset += 1;
        Some(c)
    }

    fn position(&self) -> Position {
        Position::RelativeToCodeStart(self.offset)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    /// The token at the cursor, for error messages.
    fn current_token(&self) -> String {
        let rest = &self.source[self.pos..];
        match rest.chars().next() {
            None => END_OF_CODE.to_string(),
            Some(c) if is_identifier_char(c) => rest
                .chars()
                .take_while(|c| is_identifier_char(*c))
                .collect(),
            Some(c) => c.to_string(),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::at_position(
            self.position(),
            EvaluationError::UnexpectedElements {
                last_expected: Some(expected.to_string()),
                unexpected_elements: vec![self.current_token()],
            },
        )
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn init() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();
    }

    fn at(offset: usize) -> Position {
        Position::RelativeToCodeStart(offset)
    }

    #[test]
    fn test_parse_nested_calls() {
        init();

        let actual = parse_ast(" list(1, \"two\", if(a, b)) ").unwrap();
        let expected = SyntaxNode::anonymous(at(0)).add_child(
            SyntaxNode::named("list", at(1))
                .add_child(SyntaxNode::literal("1", at(6)))
                .add_child(SyntaxNode::literal("two", at(9)))
                .add_child(
                    SyntaxNode::named("if", at(16))
                        .add_child(SyntaxNode::named("a", at(19)))
                        .add_child(SyntaxNode::named("b", at(22))),
                ),
        );
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_bare_identifier_and_empty_call_are_equal() {
        let bare = parse_ast("name").unwrap();
        let call = parse_ast("name( )").unwrap();
        assert_eq!(bare, call);
    }

    #[test]
    fn test_string_escapes() {
        let root = parse_ast(r#""a\"b\\c\nd\q""#).unwrap();
        assert_eq!(root.children()[0].literal_text(), Some("a\"b\\c\nd\\q"));
    }

    #[test]
    fn test_numbers() {
        let root = parse_ast("f(-1.5, +2, 3)").unwrap();
        let texts: Vec<_> = root.children()[0]
            .children()
            .iter()
            .filter_map(SyntaxNode::literal_text)
            .collect();
        assert_eq!(texts, vec!["-1.5", "+2", "3"]);
    }

    #[test]
    fn test_empty_code_fails() {
        let err = parse_ast("   ").unwrap_err();
        assert_eq!(err.relative_pos, at(3));
        assert_eq!(
            err.description,
            EvaluationError::UnexpectedElements {
                last_expected: Some("an expression".to_string()),
                unexpected_elements: vec![END_OF_CODE.to_string()],
            }
        );
    }

    #[test]
    fn test_trailing_content_fails() {
        let err = parse_ast("a b").unwrap_err();
        assert_eq!(err.relative_pos, at(2));
        assert_eq!(
            err.description,
            EvaluationError::UnexpectedElements {
                last_expected: Some("a".to_string()),
                unexpected_elements: vec!["b".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_close_paren_fails() {
        let err = parse_ast("plus(1, 2").unwrap_err();
        assert_eq!(err.relative_pos, at(9));
        assert!(matches!(err.description, EvaluationError::UnexpectedElements { .. }));
    }

    #[test]
    fn test_trailing_comma_fails() {
        let err = parse_ast("plus(1,)").unwrap_err();
        assert_eq!(err.relative_pos, at(7));
    }

    #[test]
    fn test_invalid_character_fails() {
        let err = parse_ast("plus(1 # 2)").unwrap_err();
        assert_eq!(err.relative_pos, at(7));
        assert_eq!(
            err.description,
            EvaluationError::UnexpectedElements {
                last_expected: Some("`,` or `)`".to_string()),
                unexpected_elements: vec!["#".to_string()],
            }
        );
    }

    #[test]
    fn test_unterminated_string_fails() {
        let err = parse_ast("concat(\"abc").unwrap_err();
        assert_eq!(err.relative_pos, at(7));
    }

    #[test]
    fn test_positions_count_characters() {
        let root = parse_ast(r#"concat("é✓", x)"#).unwrap();
        let call = &root.children()[0];
        assert_eq!(call.children()[0].literal_text(), Some("é✓"));
        assert_eq!(call.children()[1], SyntaxNode::named("x", at(13)));

        let err = parse_ast("\"ü\" #").unwrap_err();
        assert_eq!(err.relative_pos, at(4));
    }

    #[test]
    fn test_identifier_cannot_start_with_digit() {
        assert!(parse_ast("1abc").is_err());
    }

    #[test]
    fn test_max_depth() {
        let config = CompilerConfig::new().with_max_depth(2);
        assert!(parse_code("f(g(1))", &config).is_ok());

        let err = parse_code("f(g(h()))", &config).unwrap_err();
        assert_eq!(
            err.description,
            EvaluationError::NestingTooDeep { depth: 3, max: 2 }
        );
        assert_eq!(err.relative_pos, at(4));
    }

    #[test]
    fn test_deep_nesting_keeps_positions() {
        let depth = 200;
        let code = format!("{}x{}", "f(".repeat(depth), ")".repeat(depth));
        let root = parse_ast(&code).unwrap();

        let mut node = &root.children()[0];
        for level in 0..depth {
            assert_eq!(node.starts_at(), at(level * 2));
            node = &node.children()[0];
        }
        assert_eq!(node.identifier(), Some("x"));
        assert_eq!(node.starts_at(), at(depth * 2));
    }
}
