use std::fmt;
use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;
pub type SyntaxResult<T> = result::Result<T, SyntaxError>;
pub type RuntimeResult<T> = result::Result<T, RuntimeError>;

/// Any failure of the scan -> parse -> execute pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxErrors),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Where in the source a syntax error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    /// Scanner errors only know the line.
    Unspecified,
    AtEnd,
    AtLexeme(String),
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => Ok(()),
            Self::AtEnd => write!(f, " at end"),
            Self::AtLexeme(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct SyntaxError {
    pub line: u32,
    pub location: ErrorLocation,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: u32, location: ErrorLocation, message: &str) -> SyntaxError {
        SyntaxError {
            line,
            location,
            message: message.to_string(),
        }
    }
}

/// Every syntax error reported for one input unit: scanner errors first, then parser errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct SyntaxErrors(pub Vec<SyntaxError>);

impl SyntaxErrors {
    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}\n[line {line}]")]
pub struct RuntimeError {
    pub line: u32,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: u32) -> RuntimeError {
        RuntimeError { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
    #[error("Operand of '{0}' must be a number.")]
    NumberOperand(&'static str),
    #[error("Operands of '{0}' must be numbers.")]
    NumberOperands(&'static str),
    #[error("Operands of '+' must be two numbers or two strings.")]
    AddOperands,
    #[error("Couldn't write program output: {0}")]
    Output(String),
}
