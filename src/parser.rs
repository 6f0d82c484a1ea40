use std::collections::HashSet;

use tracing::debug;

use crate::error::{ErrorLocation, SyntaxError, SyntaxErrors, SyntaxResult};
use crate::expr::{BinaryOperator, Expr, UnaryOperator};
use crate::scanner::{Token, TokenType};
use crate::stmt::Stmt;
use crate::value::Value;

type StmtResult = SyntaxResult<Stmt>;
type ExprResult = SyntaxResult<Expr>;

const EQUALITY_OPERATORS: [(TokenType, BinaryOperator); 2] = [
    (TokenType::BangEqual, BinaryOperator::NotEqual),
    (TokenType::EqualEqual, BinaryOperator::Equal),
];

const COMPARISON_OPERATORS: [(TokenType, BinaryOperator); 4] = [
    (TokenType::Greater, BinaryOperator::Greater),
    (TokenType::GreaterEqual, BinaryOperator::GreaterEqual),
    (TokenType::Less, BinaryOperator::Less),
    (TokenType::LessEqual, BinaryOperator::LessEqual),
];

const TERM_OPERATORS: [(TokenType, BinaryOperator); 2] = [
    (TokenType::Minus, BinaryOperator::Subtract),
    (TokenType::Plus, BinaryOperator::Add),
];

const FACTOR_OPERATORS: [(TokenType, BinaryOperator); 2] = [
    (TokenType::Slash, BinaryOperator::Divide),
    (TokenType::Star, BinaryOperator::Multiply),
];

const UNARY_OPERATORS: [(TokenType, UnaryOperator); 2] = [
    (TokenType::Bang, UnaryOperator::Not),
    (TokenType::Minus, UnaryOperator::Negate),
];

/// Parse a whole token stream, failing with every syntax error found if there was at least one.
pub fn parse(tokens: &[Token]) -> Result<Vec<Stmt>, SyntaxErrors> {
    let (statements, errors) = parse_recovering(tokens);
    if errors.is_empty() {
        Ok(statements)
    } else {
        Err(SyntaxErrors(errors))
    }
}

/// Parse as much as possible. Declarations that fail to parse are skipped
/// and their errors collected.
pub fn parse_recovering(tokens: &[Token]) -> (Vec<Stmt>, Vec<SyntaxError>) {
    let mut parser = Parser::new(tokens);
    let mut statements = Vec::new();

    while !parser.cursor.at_end() {
        if let Some(statement) = parser.declaration() {
            statements.push(statement);
        }
    }

    debug!(
        statements = statements.len(),
        errors = parser.errors.len(),
        "parsed token stream"
    );
    (statements, parser.errors)
}

struct Parser<'a> {
    cursor: TokenCursor<'a>,
    // names whose initializer is being parsed right now
    initializing: HashSet<String>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser {
            cursor: TokenCursor::new(tokens),
            initializing: HashSet::new(),
            errors: Vec::new(),
        }
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.cursor.advance_if_match(TokenType::Var).is_some() {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(statement) => Some(statement),
            Err(error) => {
                debug!(%error, "skipping malformed declaration");
                self.initializing.clear();
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> StmtResult {
        let name = self.cursor.consume(TokenType::Identifier, "Expect variable name.")?;

        let initializer = if self.cursor.advance_if_match(TokenType::Equal).is_some() {
            self.initializing.insert(name.lexeme.clone());
            let initializer = self.expression();
            self.initializing.remove(&name.lexeme);
            Some(initializer?)
        } else {
            None
        };

        self.cursor
            .consume(TokenType::Semicolon, "Expect ';' after variable declaration.")?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> StmtResult {
        if let Some(keyword) = self.cursor.advance_if_match(TokenType::Print) {
            self.print_statement(keyword.line)
        } else if self.cursor.advance_if_match(TokenType::LeftBrace).is_some() {
            self.block_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self, line: u32) -> StmtResult {
        let expression = self.expression()?;
        self.cursor.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { expression, line })
    }

    fn expression_statement(&mut self) -> StmtResult {
        let expression = self.expression()?;
        self.cursor.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression { expression })
    }

    fn block_statement(&mut self) -> StmtResult {
        let mut statements = Vec::new();
        while !self.cursor.check(TokenType::RightBrace) && !self.cursor.at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }
        self.cursor.consume(TokenType::RightBrace, "Expect '}' after block.")?;
        Ok(Stmt::Block { statements })
    }

    fn expression(&mut self) -> ExprResult {
        self.assignment()
    }

    fn assignment(&mut self) -> ExprResult {
        let expr = self.equality()?;

        if let Some(equals) = self.cursor.advance_if_match(TokenType::Equal) {
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name } => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                // reported, but the parse carries on with the left hand side
                expr => {
                    self.errors.push(error_at(&equals, "Invalid assignment target."));
                    Ok(expr)
                }
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ExprResult {
        self.binary_left_associative(Self::comparison, &EQUALITY_OPERATORS)
    }

    fn comparison(&mut self) -> ExprResult {
        self.binary_left_associative(Self::term, &COMPARISON_OPERATORS)
    }

    fn term(&mut self) -> ExprResult {
        self.binary_left_associative(Self::factor, &TERM_OPERATORS)
    }

    fn factor(&mut self) -> ExprResult {
        self.binary_left_associative(Self::unary, &FACTOR_OPERATORS)
    }

    // Parse a binary left associative expression as long as the current token
    // matches one of the given operators
    fn binary_left_associative(
        &mut self,
        higher_precedence: fn(&mut Self) -> ExprResult,
        operators: &[(TokenType, BinaryOperator)],
    ) -> ExprResult {
        let mut expr = higher_precedence(self)?;

        while let Some((operator, line)) = self.cursor.advance_if_operator(operators) {
            let right = higher_precedence(self)?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                line,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    // a single prefix operator only, the operand is a primary
    fn unary(&mut self) -> ExprResult {
        if let Some((operator, line)) = self.cursor.advance_if_operator(&UNARY_OPERATORS) {
            let right = self.primary()?;
            return Ok(Expr::Unary {
                operator,
                line,
                right: Box::new(right),
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> ExprResult {
        let current = self.cursor.peek().clone();

        let value = match current.token_type {
            TokenType::False => Value::Bool(false),
            TokenType::True => Value::Bool(true),
            TokenType::Nil => Value::Nil,
            TokenType::Number | TokenType::String => match &current.literal {
                Some(value) => value.clone(),
                None => return Err(error_at(&current, "Expect expression.")),
            },
            TokenType::Identifier => {
                self.cursor.advance();
                if self.initializing.contains(&current.lexeme) {
                    let message = format!(
                        "Can't read variable '{}' in its own initializer.",
                        current.lexeme
                    );
                    return Err(error_at(&current, &message));
                }
                return Ok(Expr::Variable { name: current });
            }
            TokenType::LeftParen => {
                self.cursor.advance();
                let expr = self.expression()?;
                self.cursor
                    .consume(TokenType::RightParen, "Expect ')' after expression.")?;
                return Ok(Expr::Grouping {
                    expression: Box::new(expr),
                });
            }
            _ => return Err(error_at(&current, "Expect expression.")),
        };

        self.cursor.advance();
        Ok(Expr::Literal { value })
    }

    // Discard tokens until the start of what is probably the next statement
    fn synchronize(&mut self) {
        self.cursor.advance();

        while !self.cursor.at_end() {
            if self
                .cursor
                .previous()
                .is_some_and(|token| token.token_type == TokenType::Semicolon)
            {
                return;
            }

            match self.cursor.peek().token_type {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => self.cursor.advance(),
            }
        }
    }
}

fn error_at(token: &Token, message: &str) -> SyntaxError {
    let location = if token.token_type == TokenType::Eof {
        ErrorLocation::AtEnd
    } else {
        ErrorLocation::AtLexeme(token.lexeme.clone())
    };
    SyntaxError::new(token.line, location, message)
}

struct TokenCursor<'a> {
    tokens: &'a [Token],
    index: usize,
    // stands in for a missing end marker
    end: Token,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: &'a [Token]) -> TokenCursor<'a> {
        let line = tokens.last().map_or(1, |token| token.line);
        TokenCursor {
            tokens,
            index: 0,
            end: Token::new(TokenType::Eof, "", line),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.index).unwrap_or(&self.end)
    }

    fn previous(&self) -> Option<&Token> {
        self.index.checked_sub(1).and_then(|index| self.tokens.get(index))
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.index += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn advance_if_match(&mut self, token_type: TokenType) -> Option<Token> {
        if self.check(token_type) && !self.at_end() {
            let token = self.peek().clone();
            self.advance();
            Some(token)
        } else {
            None
        }
    }

    fn advance_if_operator<T: Copy>(&mut self, operators: &[(TokenType, T)]) -> Option<(T, u32)> {
        let token = self.peek();
        let (_, operator) = operators
            .iter()
            .find(|(token_type, _)| *token_type == token.token_type)?;
        let found = (*operator, token.line);
        self.advance();
        Some(found)
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> SyntaxResult<Token> {
        self.advance_if_match(token_type)
            .ok_or_else(|| error_at(self.peek(), message))
    }
}
