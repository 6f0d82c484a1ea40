pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod session;
pub mod stmt;
pub mod value;

pub use environment::Environment;
pub use error::{Error, Result};
pub use session::{RunStatus, Session};

use error::SyntaxErrors;
use stmt::Stmt;

/// Scan and parse `code`, collecting scanner and parser errors together.
pub fn parse_source(code: &str) -> std::result::Result<Vec<Stmt>, SyntaxErrors> {
    let (tokens, mut errors) = scanner::scan_tokens(code);
    let (statements, parse_errors) = parser::parse_recovering(&tokens);
    errors.extend(parse_errors);

    if errors.is_empty() {
        Ok(statements)
    } else {
        Err(SyntaxErrors(errors))
    }
}

/// Run `code` against `env` without reporting anything; the first failure is returned.
pub fn execute(code: &str, env: &mut Environment) -> Result<()> {
    let statements = parse_source(code)?;
    interpreter::execute(&statements, env)?;
    Ok(())
}
