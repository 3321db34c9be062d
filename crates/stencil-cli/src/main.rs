mod cli;
mod vars;

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};
use stencil::{
    std_functions, CompilationError, Compiler, CompilerConfig, Context, Delimiters,
    EvaluationEngine, Template, TemplateCompiler,
};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CompilationError>() {
                Some(compilation) => eprintln!("{}", compilation.render()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_context(cli: &Cli) -> Result<Context> {
    let mut context = Context::empty();
    if let Some(path) = &cli.vars {
        for (name, value) in vars::load_variables(path)? {
            context.set_variable(name, value);
        }
    }
    for (name, value) in &cli.defines {
        context.set_variable(name.as_str(), value.as_str());
    }
    debug!("{} variable(s) defined", context.variables().count());
    Ok(context)
}

fn run(cli: &Cli) -> Result<()> {
    let delimiters =
        Delimiters::new(cli.open.as_str(), cli.close.as_str()).context("invalid delimiters")?;
    let mut config = CompilerConfig::new().with_delimiters(delimiters);
    config.max_depth = cli.max_depth;

    let mut context = build_context(cli)?;

    info!("Rendering {}", cli.template.display());
    let template = Template::read_from(&cli.template)
        .with_context(|| format!("cannot read template `{}`", cli.template.display()))?;

    let compiler = TemplateCompiler::with_config(EvaluationEngine::new(std_functions()), config);
    let output = compiler.compile_template(&template, &mut context)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("cannot write output `{}`", path.display()))?;
            info!("Wrote {} bytes to {}", output.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("cannot write to stdout")?;
        }
    }
    Ok(())
}
