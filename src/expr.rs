use crate::scanner::Token;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOperator,
        line: u32,
        right: Box<Expr>,
    },
    Grouping {
        expression: Box<Expr>,
    },
    Literal {
        value: Value,
    },
    Unary {
        operator: UnaryOperator,
        line: u32,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
}

impl Expr {
    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_expr(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
        }
    }
}

/// One method per expression kind. `visit_expr` does the dispatch, so a new
/// kind won't compile until every visitor handles it.
pub trait ExprVisitor {
    type Output;

    fn visit_expr(&mut self, expr: &Expr) -> Self::Output {
        match expr {
            Expr::Assign { name, value } => self.visit_assign(name, value),
            Expr::Binary {
                left,
                operator,
                line,
                right,
            } => self.visit_binary(left, *operator, *line, right),
            Expr::Grouping { expression } => self.visit_grouping(expression),
            Expr::Literal { value } => self.visit_literal(value),
            Expr::Unary { operator, line, right } => self.visit_unary(*operator, *line, right),
            Expr::Variable { name } => self.visit_variable(name),
        }
    }

    fn visit_assign(&mut self, name: &Token, value: &Expr) -> Self::Output;
    fn visit_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOperator,
        line: u32,
        right: &Expr,
    ) -> Self::Output;
    fn visit_grouping(&mut self, expression: &Expr) -> Self::Output;
    fn visit_literal(&mut self, value: &Value) -> Self::Output;
    fn visit_unary(&mut self, operator: UnaryOperator, line: u32, right: &Expr) -> Self::Output;
    fn visit_variable(&mut self, name: &Token) -> Self::Output;
}
