//! Standard functions
//!
//! Nothing here is registered implicitly; pass [`std_functions`] (or one of
//! the smaller sets) to the compiler to make these names available.

mod control;
mod math;
mod strings;

pub use control::{control_functions, is_truthy};
pub use math::{math_functions, reduce_numbers};
pub use strings::string_functions;

use crate::evaluator::FunctionRegistry;

/// All standard functions: math, strings and control.
pub fn std_functions() -> FunctionRegistry {
    let mut registry = math_functions();
    registry.extend(string_functions());
    registry.extend(control_functions());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_functions_contains_every_set() {
        let registry = std_functions();
        let expected =
            math_functions().len() + string_functions().len() + control_functions().len();
        assert_eq!(registry.len(), expected);
        for name in ["plus", "concat", "right_brackets", "if", "set", "counter"] {
            assert!(registry.contains(name), "missing `{}`", name);
        }
    }
}
