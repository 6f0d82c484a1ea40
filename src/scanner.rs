use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{ErrorLocation, SyntaxError};
use crate::value::Value;

static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    HashMap::from([
        ("and", TokenType::And),
        ("class", TokenType::Class),
        ("else", TokenType::Else),
        ("false", TokenType::False),
        ("for", TokenType::For),
        ("fun", TokenType::Fun),
        ("if", TokenType::If),
        ("nil", TokenType::Nil),
        ("or", TokenType::Or),
        ("print", TokenType::Print),
        ("return", TokenType::Return),
        ("super", TokenType::Super),
        ("this", TokenType::This),
        ("true", TokenType::True),
        ("var", TokenType::Var),
        ("while", TokenType::While),
    ])
});

/// Scan the whole source. The token list always ends with an `Eof` token,
/// even when errors were found.
pub fn scan_tokens(code: &str) -> (Vec<Token>, Vec<SyntaxError>) {
    let mut scanner = Scanner::new(code);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    loop {
        match scanner.next_token() {
            Ok(token) => {
                let eof = token.token_type == TokenType::Eof;
                tokens.push(token);
                if eof {
                    break;
                }
            }
            Err(error) => errors.push(error),
        }
    }

    debug!(tokens = tokens.len(), errors = errors.len(), "scanned source");
    (tokens, errors)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<Value>,
    pub line: u32,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: &str, line: u32) -> Token {
        Token {
            token_type,
            lexeme: lexeme.to_string(),
            literal: None,
            line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

#[derive(Debug)]
struct Scanner {
    chars: Vec<char>,
    cursor_begin: usize,
    cursor_end: usize,
    line: u32,
}

impl Scanner {
    fn new(code: &str) -> Scanner {
        Scanner {
            chars: code.chars().collect(),
            cursor_begin: 0,
            cursor_end: 0,
            line: 1,
        }
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        self.cursor_begin = self.cursor_end;

        let Some(current) = self.advance() else {
            return Ok(Token::new(TokenType::Eof, "", self.line));
        };

        let token_type = match current {
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '{' => TokenType::LeftBrace,
            '}' => TokenType::RightBrace,
            ',' => TokenType::Comma,
            '.' => TokenType::Dot,
            '-' => TokenType::Minus,
            '+' => TokenType::Plus,
            ';' => TokenType::Semicolon,
            '/' => TokenType::Slash,
            '*' => TokenType::Star,
            '!' => self.either('=', TokenType::BangEqual, TokenType::Bang),
            '=' => self.either('=', TokenType::EqualEqual, TokenType::Equal),
            '<' => self.either('=', TokenType::LessEqual, TokenType::Less),
            '>' => self.either('=', TokenType::GreaterEqual, TokenType::Greater),
            '"' => return self.string(),
            c if c.is_ascii_digit() => return Ok(self.number()),
            c if is_identifier_start(c) => return Ok(self.identifier()),
            _ => {
                return Err(SyntaxError::new(
                    self.line,
                    ErrorLocation::Unspecified,
                    "Unexpected character.",
                ))
            }
        };

        Ok(self.make_token(token_type))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.line += 1;
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    // comments run to the end of the line
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn string(&mut self) -> Result<Token, SyntaxError> {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.advance().is_none() {
            return Err(SyntaxError::new(
                self.line,
                ErrorLocation::Unspecified,
                "Unterminated string.",
            ));
        }

        // trim the surrounding quotes
        let value: String = self.chars[self.cursor_begin + 1..self.cursor_end - 1].iter().collect();
        let mut token = self.make_token(TokenType::String);
        token.literal = Some(Value::String(value));
        Ok(token)
    }

    fn number(&mut self) -> Token {
        self.consume_digits();

        // a trailing '.' without digits is left for the next token
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.consume_digits();
        }

        let mut token = self.make_token(TokenType::Number);
        // the lexeme only contains ascii digits and at most one '.', which always parses
        let value = token.lexeme.parse::<f64>().unwrap_or_default();
        token.literal = Some(Value::Number(value));
        token
    }

    fn identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }

        let lexeme = self.lexeme();
        let token_type = KEYWORDS
            .get(lexeme.as_str())
            .copied()
            .unwrap_or(TokenType::Identifier);
        let mut token = Token::new(token_type, &lexeme, self.line);
        token.literal = match token_type {
            TokenType::True => Some(Value::Bool(true)),
            TokenType::False => Some(Value::Bool(false)),
            TokenType::Nil => Some(Value::Nil),
            _ => None,
        };
        token
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn either(&mut self, expected: char, matched: TokenType, otherwise: TokenType) -> TokenType {
        if self.peek() == Some(expected) {
            self.advance();
            matched
        } else {
            otherwise
        }
    }

    fn advance(&mut self) -> Option<char> {
        let current = self.peek()?;
        self.cursor_end += 1;
        Some(current)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor_end).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.cursor_end + 1).copied()
    }

    fn lexeme(&self) -> String {
        self.chars[self.cursor_begin..self.cursor_end].iter().collect()
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token::new(token_type, &self.lexeme(), self.line)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
