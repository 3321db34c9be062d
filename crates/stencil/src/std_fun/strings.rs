//! String helpers
//!
//! `right_brackets` and `quote` produce text that would otherwise end a
//! code block or a string literal: `{{ concat("a ", right_brackets()) }}`
//! renders `a }}`.

use crate::evaluator::{FunctionRegistry, SimpleFunction};

/// `concat`, `trim`, `upper`, `lower`, `right_brackets` and `quote`.
pub fn string_functions() -> FunctionRegistry {
    FunctionRegistry::new()
        .with(
            "concat",
            SimpleFunction::new(|args: &[String]| args.concat()),
        )
        .with(
            "trim",
            SimpleFunction::new(|args: &[String]| {
                args.iter().map(|arg| arg.trim()).collect::<String>()
            }),
        )
        .with(
            "upper",
            SimpleFunction::new(|args: &[String]| args.concat().to_uppercase()),
        )
        .with(
            "lower",
            SimpleFunction::new(|args: &[String]| args.concat().to_lowercase()),
        )
        .with(
            "right_brackets",
            SimpleFunction::new(|_: &[String]| "}}".to_string()),
        )
        .with(
            "quote",
            SimpleFunction::new(|_: &[String]| "\"".to_string()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::evaluator::{EvaluationEngine, Evaluator};
    use crate::parser::parse_ast;

    fn eval(code: &str) -> String {
        let engine = EvaluationEngine::new(string_functions());
        let ast = parse_ast(code).unwrap();
        engine.evaluate(&ast, &mut Context::empty()).unwrap()
    }

    #[test]
    fn test_concat() {
        assert_eq!(eval(r#"concat("a", "b", "c")"#), "abc");
        assert_eq!(eval("concat()"), "");
    }

    #[test]
    fn test_trim_each_argument() {
        assert_eq!(eval(r#"trim("  a ", "\tb\n")"#), "ab");
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(eval(r#"upper("Straße")"#), "STRASSE");
        assert_eq!(eval(r#"lower("MiXeD", "!")"#), "mixed!");
    }

    #[test]
    fn test_delimiter_helpers() {
        assert_eq!(eval(r#"concat(quote(), "x", quote())"#), "\"x\"");
        assert_eq!(eval("right_brackets"), "}}");
    }
}
