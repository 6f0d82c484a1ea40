//! Read-only renderings of expression trees, used to inspect parser output.

use crate::expr::{BinaryOperator, Expr, ExprVisitor, UnaryOperator};
use crate::scanner::Token;
use crate::value::Value;

/// Fully parenthesized prefix form, e.g. `(+ 1 (* 2 3))`.
pub fn print_ast(root: &Expr) -> String {
    root.accept(&mut AstPrinter)
}

/// Postfix form, e.g. `1 2 3 * +`.
pub fn print_rpn(root: &Expr) -> String {
    root.accept(&mut RpnPrinter)
}

/// Infix source text that parses back into the same tree.
pub fn print_source(root: &Expr) -> String {
    root.accept(&mut SourcePrinter)
}

pub struct AstPrinter;

impl AstPrinter {
    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut printed = String::new();
        printed.push('(');
        printed.push_str(name);
        for expr in exprs {
            printed.push(' ');
            printed.push_str(&expr.accept(self));
        }
        printed.push(')');
        printed
    }
}

impl ExprVisitor for AstPrinter {
    type Output = String;

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> String {
        let value = value.accept(self);
        format!("(= {} {value})", name.lexeme)
    }

    fn visit_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOperator,
        _line: u32,
        right: &Expr,
    ) -> String {
        self.parenthesize(operator.symbol(), &[left, right])
    }

    fn visit_grouping(&mut self, expression: &Expr) -> String {
        self.parenthesize("group", &[expression])
    }

    fn visit_literal(&mut self, value: &Value) -> String {
        quoted(value)
    }

    fn visit_unary(&mut self, operator: UnaryOperator, _line: u32, right: &Expr) -> String {
        self.parenthesize(operator.symbol(), &[right])
    }

    fn visit_variable(&mut self, name: &Token) -> String {
        name.lexeme.clone()
    }
}

pub struct RpnPrinter;

impl ExprVisitor for RpnPrinter {
    type Output = String;

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> String {
        format!("{} {} =", value.accept(self), name.lexeme)
    }

    fn visit_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOperator,
        _line: u32,
        right: &Expr,
    ) -> String {
        format!("{} {} {}", left.accept(self), right.accept(self), operator.symbol())
    }

    fn visit_grouping(&mut self, expression: &Expr) -> String {
        expression.accept(self)
    }

    fn visit_literal(&mut self, value: &Value) -> String {
        quoted(value)
    }

    fn visit_unary(&mut self, operator: UnaryOperator, _line: u32, right: &Expr) -> String {
        // '~' keeps negation apart from subtraction
        let symbol = match operator {
            UnaryOperator::Negate => "~",
            UnaryOperator::Not => "!",
        };
        format!("{} {symbol}", right.accept(self))
    }

    fn visit_variable(&mut self, name: &Token) -> String {
        name.lexeme.clone()
    }
}

/// Parentheses are only emitted for grouping nodes. Parsed trees already encode
/// precedence, so this is enough for the text to parse back identically.
pub struct SourcePrinter;

impl ExprVisitor for SourcePrinter {
    type Output = String;

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> String {
        format!("{} = {}", name.lexeme, value.accept(self))
    }

    fn visit_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOperator,
        _line: u32,
        right: &Expr,
    ) -> String {
        format!("{} {} {}", left.accept(self), operator.symbol(), right.accept(self))
    }

    fn visit_grouping(&mut self, expression: &Expr) -> String {
        format!("({})", expression.accept(self))
    }

    fn visit_literal(&mut self, value: &Value) -> String {
        match value {
            // a literal too large for f64; these digits overflow to infinity again when scanned
            Value::Number(number) if number.is_infinite() => format!("1{}", "0".repeat(309)),
            _ => quoted(value),
        }
    }

    fn visit_unary(&mut self, operator: UnaryOperator, _line: u32, right: &Expr) -> String {
        format!("{}{}", operator.symbol(), right.accept(self))
    }

    fn visit_variable(&mut self, name: &Token) -> String {
        name.lexeme.clone()
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(string) => format!("\"{string}\""),
        _ => value.to_string(),
    }
}
