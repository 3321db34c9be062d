//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(version, about = "Render a stencil template", long_about = None)]
pub struct Cli {
    /// Template file to render
    pub template: PathBuf,

    /// Define a variable; repeatable, later definitions win
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
    #[arg(value_parser = parse_definition)]
    pub defines: Vec<(String, String)>,

    /// JSON object of variables, applied before any --define
    #[arg(long, value_name = "FILE")]
    pub vars: Option<PathBuf>,

    /// Opening code delimiter
    #[arg(long, default_value = "{{")]
    pub open: String,

    /// Closing code delimiter
    #[arg(long, default_value = "}}")]
    pub close: String,

    /// Maximum expression nesting depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Split `NAME=VALUE` at the first `=`.
pub fn parse_definition(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, _)) if name.trim().is_empty() => {
            Err(format!("missing variable name in `{}`", raw))
        }
        Some((name, value)) => Ok((name.trim().to_string(), value.to_string())),
        None => Err(format!("expected NAME=VALUE, got `{}`", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_definition() {
        assert_eq!(
            parse_definition("name=World"),
            Ok(("name".to_string(), "World".to_string()))
        );
        assert_eq!(
            parse_definition("eq=a=b"),
            Ok(("eq".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_definition("empty="),
            Ok(("empty".to_string(), String::new()))
        );
        assert!(parse_definition("novalue").is_err());
        assert!(parse_definition("=value").is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "stencil",
            "page.tmpl",
            "-D",
            "a=1",
            "--define",
            "b=2",
            "--open",
            "<%",
            "--close",
            "%>",
            "--max-depth",
            "4",
            "-o",
            "out.txt",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.template, PathBuf::from("page.tmpl"));
        assert_eq!(
            cli.defines,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
        assert_eq!((cli.open.as_str(), cli.close.as_str()), ("<%", "%>"));
        assert_eq!(cli.max_depth, Some(4));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["stencil", "page.tmpl"]).unwrap();
        assert_eq!((cli.open.as_str(), cli.close.as_str()), ("{{", "}}"));
        assert!(cli.defines.is_empty());
        assert!(cli.vars.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_rejects_bad_definition() {
        assert!(Cli::try_parse_from(["stencil", "page.tmpl", "-D", "oops"]).is_err());
    }
}
