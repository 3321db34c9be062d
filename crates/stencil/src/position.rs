//! Source positions of nodes and errors
//!
//! Positions are recorded relative to whatever base is cheapest to know at the
//! point where they are created (the parser only knows the code block it is
//! working on, a function only knows its own invocation) and are resolved to
//! absolute offsets at the outermost reporting boundary.
//!
//! All offsets count characters, not bytes. Template slices keep byte spans
//! for slicing, and [`char_offset`] converts between the two.

use std::fmt;

/// Position of a node or symbol in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// No exact or approximate position can be given.
    #[default]
    Unknown,

    /// Offset from the start of the current function invocation.
    RelativeToInvocation(usize),

    /// Offset from the start of the code block being evaluated
    /// (the first character after the opening delimiter).
    RelativeToCodeStart(usize),

    /// Offset from the start of the template source.
    Absolute(usize),
}

impl Position {
    /// The stored offset, whatever its base. `None` for `Unknown`.
    pub fn raw_value(&self) -> Option<usize> {
        match self {
            Position::Unknown => None,
            Position::RelativeToInvocation(pos)
            | Position::RelativeToCodeStart(pos)
            | Position::Absolute(pos) => Some(*pos),
        }
    }

    /// Whether this position carries an offset at all.
    pub fn is_known(&self) -> bool {
        !matches!(self, Position::Unknown)
    }

    /// Resolve to an absolute offset given the three possible bases.
    ///
    /// * `template` - absolute offset of the template start (usually `0`)
    /// * `code` - absolute offset of the current code block's first character
    /// * `invocation` - absolute offset of the current invocation, if known
    ///
    /// `Unknown` never resolves, and neither does `RelativeToInvocation`
    /// when the invocation base is not known.
    ///
    /// # Example
    ///
    /// ```
    /// use stencil::Position;
    ///
    /// assert_eq!(Position::Absolute(4).resolve(0, 10, None), Some(4));
    /// assert_eq!(Position::RelativeToCodeStart(4).resolve(0, 10, None), Some(14));
    /// assert_eq!(Position::RelativeToInvocation(1).resolve(0, 10, Some(12)), Some(13));
    /// assert_eq!(Position::RelativeToInvocation(1).resolve(0, 10, None), None);
    /// assert_eq!(Position::Unknown.resolve(0, 10, Some(12)), None);
    /// ```
    pub fn resolve(
        &self,
        template: usize,
        code: usize,
        invocation: Option<usize>,
    ) -> Option<usize> {
        match *self {
            Position::Unknown => None,
            Position::RelativeToInvocation(pos) => invocation.map(|base| base + pos),
            Position::RelativeToCodeStart(pos) => Some(code + pos),
            Position::Absolute(pos) => Some(template + pos),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Unknown => write!(f, "unknown"),
            Position::RelativeToInvocation(pos) => write!(f, "+{} from invocation", pos),
            Position::RelativeToCodeStart(pos) => write!(f, "+{} from code start", pos),
            Position::Absolute(pos) => write!(f, "@{}", pos),
        }
    }
}

/// Number of characters in `source` before the byte offset `byte`.
///
/// Offsets past the end clamp to the end. An offset inside a multi-byte
/// character counts the character it falls in.
pub fn char_offset(source: &str, byte: usize) -> usize {
    source
        .char_indices()
        .take_while(|(index, _)| *index < byte)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value() {
        assert_eq!(Position::Unknown.raw_value(), None);
        assert_eq!(Position::RelativeToInvocation(3).raw_value(), Some(3));
        assert_eq!(Position::RelativeToCodeStart(5).raw_value(), Some(5));
        assert_eq!(Position::Absolute(7).raw_value(), Some(7));
    }

    #[test]
    fn test_unknown_never_resolves() {
        assert!(!Position::Unknown.is_known());
        assert_eq!(Position::Unknown.resolve(0, 0, Some(0)), None);
    }

    #[test]
    fn test_absolute_uses_template_base() {
        assert_eq!(Position::Absolute(2).resolve(100, 5, Some(9)), Some(102));
    }

    #[test]
    fn test_char_offset() {
        let source = "aé✓b";
        assert_eq!(char_offset(source, 0), 0);
        assert_eq!(char_offset(source, 1), 1);
        assert_eq!(char_offset(source, 3), 2);
        assert_eq!(char_offset(source, 6), 3);
        assert_eq!(char_offset(source, 2), 2);
        assert_eq!(char_offset(source, 99), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::Unknown.to_string(), "unknown");
        assert_eq!(Position::Absolute(3).to_string(), "@3");
        assert_eq!(
            Position::RelativeToCodeStart(1).to_string(),
            "+1 from code start"
        );
    }
}
