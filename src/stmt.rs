use crate::expr::Expr;
use crate::scanner::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block {
        statements: Vec<Stmt>,
    },
    Expression {
        expression: Expr,
    },
    Print {
        expression: Expr,
        line: u32,
    },
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
}

impl Stmt {
    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_stmt(self)
    }
}

pub trait StmtVisitor {
    type Output;

    fn visit_stmt(&mut self, stmt: &Stmt) -> Self::Output {
        match stmt {
            Stmt::Block { statements } => self.visit_block(statements),
            Stmt::Expression { expression } => self.visit_expression(expression),
            Stmt::Print { expression, line } => self.visit_print(expression, *line),
            Stmt::Var { name, initializer } => self.visit_var(name, initializer.as_ref()),
        }
    }

    fn visit_block(&mut self, statements: &[Stmt]) -> Self::Output;
    fn visit_expression(&mut self, expression: &Expr) -> Self::Output;
    fn visit_print(&mut self, expression: &Expr, line: u32) -> Self::Output;
    fn visit_var(&mut self, name: &Token, initializer: Option<&Expr>) -> Self::Output;
}
