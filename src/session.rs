use std::io::Write;

use tracing::{debug, warn};

use crate::environment::Environment;
use crate::error::{RuntimeError, SyntaxErrors};
use crate::interpreter;
use crate::printer;
use crate::stmt::Stmt;

pub const EXIT_SYNTAX_ERROR: u8 = 65;
pub const EXIT_RUNTIME_ERROR: u8 = 70;

/// Outcome of running one input unit (a file or one REPL line).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatus {
    pub had_syntax_error: bool,
    pub had_runtime_error: bool,
}

impl RunStatus {
    /// Process exit code for a script run: 65 after a syntax error, 70 after a runtime error.
    pub fn exit_code(&self) -> u8 {
        if self.had_syntax_error {
            EXIT_SYNTAX_ERROR
        } else if self.had_runtime_error {
            EXIT_RUNTIME_ERROR
        } else {
            0
        }
    }
}

/// Rendering used when echoing parsed expressions for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstFormat {
    /// Parenthesized prefix form
    Prefix,
    /// Reverse Polish notation
    Rpn,
}

/// Keeps global variables alive between input units and reports errors to a separate sink.
pub struct Session<'a> {
    env: Environment<'a>,
    error_writer: &'a mut dyn Write,
    ast_dump: Option<AstFormat>,
}

impl<'a> Session<'a> {
    pub fn new(output_writer: &'a mut dyn Write, error_writer: &'a mut dyn Write) -> Session<'a> {
        Session {
            env: Environment::new(output_writer),
            error_writer,
            ast_dump: None,
        }
    }

    /// Also write every parsed expression to the error sink before executing.
    pub fn with_ast_dump(mut self, format: AstFormat) -> Session<'a> {
        self.ast_dump = Some(format);
        self
    }

    /// Scan, parse and, only if that produced no syntax errors, execute `code`.
    pub fn run(&mut self, code: &str) -> RunStatus {
        let mut status = RunStatus::default();

        match crate::parse_source(code) {
            Err(errors) => {
                status.had_syntax_error = true;
                self.report_syntax(&errors);
            }
            Ok(statements) => {
                if let Some(format) = self.ast_dump {
                    self.dump_statements(&statements, format);
                }
                if let Err(error) = interpreter::execute(&statements, &mut self.env) {
                    status.had_runtime_error = true;
                    self.report_runtime(&error);
                }
            }
        }

        debug!(?status, "finished input unit");
        status
    }

    fn dump_statements(&mut self, statements: &[Stmt], format: AstFormat) {
        for statement in statements {
            let expression = match statement {
                Stmt::Block { statements } => {
                    self.dump_statements(statements, format);
                    continue;
                }
                Stmt::Expression { expression } | Stmt::Print { expression, .. } => expression,
                Stmt::Var {
                    initializer: Some(expression),
                    ..
                } => expression,
                Stmt::Var { initializer: None, .. } => continue,
            };
            let rendered = match format {
                AstFormat::Prefix => printer::print_ast(expression),
                AstFormat::Rpn => printer::print_rpn(expression),
            };
            self.report(&rendered);
        }
    }

    fn report_syntax(&mut self, errors: &SyntaxErrors) {
        for error in errors.iter() {
            self.report(&error.to_string());
        }
    }

    fn report_runtime(&mut self, error: &RuntimeError) {
        self.report(&error.to_string());
    }

    fn report(&mut self, message: &str) {
        if let Err(error) = writeln!(self.error_writer, "{message}") {
            warn!(%error, "couldn't write to the error stream");
        }
    }
}
