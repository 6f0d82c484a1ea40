use std::io::Write;

use tracing::debug;

use crate::environment::Environment;
use crate::error::{RuntimeError, RuntimeErrorKind, RuntimeResult};
use crate::expr::{BinaryOperator, Expr, ExprVisitor, UnaryOperator};
use crate::scanner::Token;
use crate::stmt::{Stmt, StmtVisitor};
use crate::value::Value;

type ValueResult = RuntimeResult<Value>;
type StatementResult = RuntimeResult<()>;

/// Run statements in order, stopping at the first runtime error. Effects of
/// statements that already ran are kept.
pub fn execute(statements: &[Stmt], env: &mut Environment) -> StatementResult {
    let mut interpreter = Interpreter { env };
    for statement in statements {
        if let Err(error) = statement.accept(&mut interpreter) {
            debug!(line = error.line, %error.kind, "runtime error");
            return Err(error);
        }
    }
    Ok(())
}

struct Interpreter<'e, 'w> {
    env: &'e mut Environment<'w>,
}

impl StmtVisitor for Interpreter<'_, '_> {
    type Output = StatementResult;

    fn visit_block(&mut self, statements: &[Stmt]) -> StatementResult {
        self.env.push();
        let result = statements
            .iter()
            .try_for_each(|statement| statement.accept(&mut *self));
        // make sure to restore the scope chain even after an error
        self.env.pop();
        result
    }

    fn visit_expression(&mut self, expression: &Expr) -> StatementResult {
        expression.accept(self)?;
        Ok(())
    }

    fn visit_print(&mut self, expression: &Expr, line: u32) -> StatementResult {
        let value = expression.accept(self)?;
        writeln!(self.env.output_writer, "{value}")
            .map_err(|error| RuntimeError::new(RuntimeErrorKind::Output(error.to_string()), line))
    }

    fn visit_var(&mut self, name: &Token, initializer: Option<&Expr>) -> StatementResult {
        // uninitialized variables default to nil
        let value = match initializer {
            Some(initializer) => initializer.accept(self)?,
            None => Value::Nil,
        };
        self.env.define(&name.lexeme, value);
        Ok(())
    }
}

impl ExprVisitor for Interpreter<'_, '_> {
    type Output = ValueResult;

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> ValueResult {
        let value = value.accept(self)?;
        if self.env.assign(&name.lexeme, value.clone()) {
            Ok(value)
        } else {
            Err(undefined_variable(name))
        }
    }

    fn visit_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOperator,
        line: u32,
        right: &Expr,
    ) -> ValueResult {
        let left = left.accept(self)?;
        let right = right.accept(self)?;

        let evaluated = match operator {
            BinaryOperator::Equal => Value::Bool(left.is_equal(&right)),
            BinaryOperator::NotEqual => Value::Bool(!left.is_equal(&right)),
            BinaryOperator::Add => match (left, right) {
                (Value::Number(left), Value::Number(right)) => Value::Number(left + right),
                (Value::String(left), Value::String(right)) => Value::String(left + &right),
                _ => return Err(RuntimeError::new(RuntimeErrorKind::AddOperands, line)),
            },
            BinaryOperator::Subtract => {
                numeric(operator, line, &left, &right, |l, r| Value::Number(l - r))?
            }
            BinaryOperator::Multiply => {
                numeric(operator, line, &left, &right, |l, r| Value::Number(l * r))?
            }
            BinaryOperator::Divide => {
                numeric(operator, line, &left, &right, |l, r| Value::Number(l / r))?
            }
            BinaryOperator::Greater => {
                numeric(operator, line, &left, &right, |l, r| Value::Bool(l > r))?
            }
            BinaryOperator::GreaterEqual => {
                numeric(operator, line, &left, &right, |l, r| Value::Bool(l >= r))?
            }
            BinaryOperator::Less => {
                numeric(operator, line, &left, &right, |l, r| Value::Bool(l < r))?
            }
            BinaryOperator::LessEqual => {
                numeric(operator, line, &left, &right, |l, r| Value::Bool(l <= r))?
            }
        };

        Ok(evaluated)
    }

    fn visit_grouping(&mut self, expression: &Expr) -> ValueResult {
        expression.accept(self)
    }

    fn visit_literal(&mut self, value: &Value) -> ValueResult {
        Ok(value.clone())
    }

    fn visit_unary(&mut self, operator: UnaryOperator, line: u32, right: &Expr) -> ValueResult {
        let operand = right.accept(self)?;
        match operator {
            UnaryOperator::Not => Ok(Value::Bool(!operand.is_truthy())),
            UnaryOperator::Negate => operand
                .as_number()
                .map(|number| Value::Number(-number))
                .ok_or_else(|| {
                    RuntimeError::new(RuntimeErrorKind::NumberOperand(operator.symbol()), line)
                }),
        }
    }

    fn visit_variable(&mut self, name: &Token) -> ValueResult {
        self.env
            .get(&name.lexeme)
            .cloned()
            .ok_or_else(|| undefined_variable(name))
    }
}

// apply an operator that is only defined for two numbers
fn numeric(
    operator: BinaryOperator,
    line: u32,
    left: &Value,
    right: &Value,
    apply: fn(f64, f64) -> Value,
) -> ValueResult {
    match (left.as_number(), right.as_number()) {
        (Some(left), Some(right)) => Ok(apply(left, right)),
        _ => Err(RuntimeError::new(
            RuntimeErrorKind::NumberOperands(operator.symbol()),
            line,
        )),
    }
}

fn undefined_variable(name: &Token) -> RuntimeError {
    RuntimeError::new(RuntimeErrorKind::UndefinedVariable(name.lexeme.clone()), name.line)
}
