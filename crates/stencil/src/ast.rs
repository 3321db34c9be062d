//! Syntax tree produced by the parser and consumed by evaluators
//!
//! `plus(1, multiply(2, x))` is represented as:
//!
//! ```text
//! AnonymousNode @0                      (root of the code block)
//! └─ NamedNode "plus" @0
//!    ├─ AnonymousNode @5 literal "1"
//!    └─ NamedNode "multiply" @8
//!       ├─ AnonymousNode @17 literal "2"
//!       └─ NamedNode "x" @20
//! ```
//!
//! Children are stored in evaluation order.

use std::fmt;

use crate::position::Position;

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    /// A symbol: a function invocation or a variable reference.
    NamedNode {
        /// Function or variable name
        identifier: String,
        /// Where the identifier starts
        starts_at: Position,
        /// Arguments, in evaluation order
        children: Vec<SyntaxNode>,
    },

    /// A grouping of nodes or a literal leaf.
    AnonymousNode {
        /// Where the group or literal starts
        starts_at: Position,
        /// Grouped nodes, in evaluation order
        children: Vec<SyntaxNode>,
        /// Decoded literal text, for literal leaves
        literal: Option<String>,
    },
}

impl SyntaxNode {
    /// Create a named node without children.
    pub fn named(identifier: impl Into<String>, starts_at: Position) -> Self {
        SyntaxNode::NamedNode {
            identifier: identifier.into(),
            starts_at,
            children: Vec::new(),
        }
    }

    /// Create an empty anonymous node.
    pub fn anonymous(starts_at: Position) -> Self {
        SyntaxNode::AnonymousNode {
            starts_at,
            children: Vec::new(),
            literal: None,
        }
    }

    /// Create a literal leaf.
    pub fn literal(text: impl Into<String>, starts_at: Position) -> Self {
        SyntaxNode::AnonymousNode {
            starts_at,
            children: Vec::new(),
            literal: Some(text.into()),
        }
    }

    /// Whether this node is anonymous.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, SyntaxNode::AnonymousNode { .. })
    }

    /// Where this node starts.
    pub fn starts_at(&self) -> Position {
        match self {
            SyntaxNode::NamedNode { starts_at, .. }
            | SyntaxNode::AnonymousNode { starts_at, .. } => *starts_at,
        }
    }

    /// Child nodes, in evaluation order.
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::NamedNode { children, .. } | SyntaxNode::AnonymousNode { children, .. } => {
                children
            }
        }
    }

    /// The identifier of a named node.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            SyntaxNode::NamedNode { identifier, .. } => Some(identifier),
            SyntaxNode::AnonymousNode { .. } => None,
        }
    }

    /// The literal text of a literal leaf.
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            SyntaxNode::AnonymousNode { literal, .. } => literal.as_deref(),
            SyntaxNode::NamedNode { .. } => None,
        }
    }

    /// Append a child node.
    pub fn add_child(mut self, child: SyntaxNode) -> Self {
        match &mut self {
            SyntaxNode::NamedNode { children, .. } | SyntaxNode::AnonymousNode { children, .. } => {
                children.push(child)
            }
        }
        self
    }

    /// Attach an identifier, turning an anonymous node into a named one.
    ///
    /// Children are kept; a literal payload is dropped.
    pub fn with_identifier(self, identifier: impl Into<String>, starts_at: Position) -> Self {
        let children = match self {
            SyntaxNode::NamedNode { children, .. } | SyntaxNode::AnonymousNode { children, .. } => {
                children
            }
        };
        SyntaxNode::NamedNode {
            identifier: identifier.into(),
            starts_at,
            children,
        }
    }
}

/// Renders the node back in call syntax.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNode::NamedNode {
                identifier,
                children,
                ..
            } => {
                write!(f, "{}", identifier)?;
                if !children.is_empty() {
                    write!(f, "(")?;
                    write_list(f, children)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
            SyntaxNode::AnonymousNode {
                literal: Some(text),
                ..
            } => write!(f, "{:?}", text),
            SyntaxNode::AnonymousNode { children, .. } => write_list(f, children),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[SyntaxNode]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}
