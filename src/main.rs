use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use finch::session::AstFormat;
use finch::Session;

const EXIT_USAGE: u8 = 64;

/// Tree-walk interpreter for the finch scripting language.
#[derive(Debug, Parser)]
#[command(name = "finch", version)]
struct Cli {
    /// Script to run. Starts an interactive prompt when omitted.
    script: Option<PathBuf>,

    /// Echo each parsed expression to stderr before running it
    #[arg(long, value_enum)]
    dump_ast: Option<DumpFormat>,

    /// Log filter directive, e.g. `finch=debug` (defaults to RUST_LOG, then `warn`)
    #[arg(long)]
    log_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DumpFormat {
    /// Parenthesized prefix form
    Prefix,
    /// Reverse Polish notation
    Rpn,
}

impl From<DumpFormat> for AstFormat {
    fn from(format: DumpFormat) -> AstFormat {
        match format {
            DumpFormat::Prefix => AstFormat::Prefix,
            DumpFormat::Rpn => AstFormat::Rpn,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // --help and --version are not usage errors
            let code = if error.use_stderr() { EXIT_USAGE } else { 0 };
            error.print().context("Writing usage")?;
            return Ok(ExitCode::from(code));
        }
    };

    install_tracing(cli.log_filter.as_deref());

    let dump_ast = cli.dump_ast.map(AstFormat::from);
    match &cli.script {
        Some(path) => run_file(path, dump_ast),
        None => run_prompt(dump_ast),
    }
}

fn install_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    // logs go to stderr so they never interleave with program output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn new_session<'a>(
    output: &'a mut dyn Write,
    errors: &'a mut dyn Write,
    dump_ast: Option<AstFormat>,
) -> Session<'a> {
    let session = Session::new(output, errors);
    match dump_ast {
        Some(format) => session.with_ast_dump(format),
        None => session,
    }
}

fn run_file(path: &Path, dump_ast: Option<AstFormat>) -> Result<ExitCode> {
    let contents = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;

    let mut output = io::stdout().lock();
    let mut errors = io::stderr().lock();
    let mut session = new_session(&mut output, &mut errors, dump_ast);
    let status = session.run(&contents);

    Ok(ExitCode::from(status.exit_code()))
}

fn run_prompt(dump_ast: Option<AstFormat>) -> Result<ExitCode> {
    let mut prompt = io::stdout();
    writeln!(prompt, "Welcome to the interactive prompt for the finch interpreter.\n")?;

    let mut output = io::stdout();
    let mut errors = io::stderr();
    let mut session = new_session(&mut output, &mut errors, dump_ast);

    let stdin = io::stdin();
    let mut buffer = String::new();
    loop {
        write!(prompt, "> ")?;
        prompt.flush()?;

        buffer.clear();
        if stdin.lock().read_line(&mut buffer).context("Reading stdin")? == 0 {
            break;
        }
        // globals persist across lines, error status does not
        session.run(&buffer);
    }

    writeln!(prompt)?;
    Ok(ExitCode::SUCCESS)
}
