//! Evaluation context shared by all code blocks of one compilation

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

/// A value functions may keep in the context between invocations.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    /// Text
    Text(String),
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// Ordered list of values
    List(Vec<StateValue>),
}

impl StateValue {
    /// The text, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StateValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is an `Integer` value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            StateValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The number, if this is a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            StateValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The flag, if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The elements, if this is a `List` value.
    pub fn as_list(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Text(s) => write!(f, "{}", s),
            StateValue::Integer(n) => write!(f, "{}", n),
            StateValue::Float(n) => write!(f, "{}", n),
            StateValue::Bool(b) => write!(f, "{}", b),
            StateValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::Text(s.to_string())
    }
}

impl From<String> for StateValue {
    fn from(s: String) -> Self {
        StateValue::Text(s)
    }
}

impl From<i64> for StateValue {
    fn from(n: i64) -> Self {
        StateValue::Integer(n)
    }
}

impl From<f64> for StateValue {
    fn from(n: f64) -> Self {
        StateValue::Float(n)
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Bool(b)
    }
}

impl From<Vec<StateValue>> for StateValue {
    fn from(items: Vec<StateValue>) -> Self {
        StateValue::List(items)
    }
}

/// Variables and function state for one compilation.
///
/// Variables are substituted for bare identifiers during evaluation; state
/// is a side channel functions use to remember things between invocations.
/// A context may be reused for consecutive compilations that should share
/// variables.
///
/// # Example
///
/// ```
/// use stencil::{Context, StateValue};
///
/// let mut context = Context::with_variables([("name", "World")]);
/// assert_eq!(context.get_variable("name"), Some("World"));
///
/// context.set_state("visits", 3i64);
/// assert_eq!(context.get_state("visits"), Some(&StateValue::Integer(3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    variables: IndexMap<String, String>,
    state: HashMap<String, StateValue>,
}

impl Context {
    /// A context without variables or state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A context with the given variables.
    pub fn with_variables<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            variables: variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            state: HashMap::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Variables
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a variable.
    pub fn get_variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Set a variable, returning the previous value.
    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.variables.insert(name.into(), value.into())
    }

    /// Remove a variable, returning its value.
    pub fn remove_variable(&mut self, name: &str) -> Option<String> {
        self.variables.shift_remove(name)
    }

    /// All variables, in insertion order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // ═══════════════════════════════════════════════════════════════════
    // State
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a state entry.
    pub fn get_state(&self, key: &str) -> Option<&StateValue> {
        self.state.get(key)
    }

    /// Look up a state entry for modification.
    pub fn get_state_mut(&mut self, key: &str) -> Option<&mut StateValue> {
        self.state.get_mut(key)
    }

    /// Store a state entry, returning the previous one.
    pub fn set_state(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StateValue>,
    ) -> Option<StateValue> {
        self.state.insert(key.into(), value.into())
    }

    /// Remove a state entry.
    pub fn remove_state(&mut self, key: &str) -> Option<StateValue> {
        self.state.remove(key)
    }

    /// Check if a state entry exists.
    pub fn has_state(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    /// Drop all variables and state.
    pub fn clear(&mut self) {
        self.variables.clear();
        self.state.clear();
    }
}
