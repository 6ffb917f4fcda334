//! Recursive-descent parser for NaC.
//!
//! One method per precedence tier, statement dispatch on the current token.
//! The parser never aborts: a failed expectation is reported through
//! [`Diagnostics`] and the cursor moves one token so parsing can
//! resynchronize.

use crate::ast::{
    ArrayAccess, ArrayAlloc, ArrayAssignment, Assignment, BinaryExpr, BinaryOp, Block, Call,
    Expression, FnDef, ForLoop, HttpRequest, Ident, If, Input, Statement, UnaryExpr, UnaryOp,
    WhileLoop,
};
use crate::diagnostics::Diagnostics;
use crate::lexer::{Lexer, Position, TokenKind};
use crate::limits::MAX_PARAMS;

#[derive(Debug, Clone)]
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(source: &str, diagnostics: &mut Diagnostics) -> Self {
        Self {
            lexer: Lexer::new(source, diagnostics),
        }
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.lexer.current().kind, TokenKind::Eof)
    }

    fn kind(&self) -> &TokenKind {
        &self.lexer.current().kind
    }

    fn position(&self) -> Position {
        self.lexer.current().position
    }

    fn advance(&mut self, diagnostics: &mut Diagnostics) {
        self.lexer.advance(diagnostics);
    }

    /// Consume the current token. If it is not of the expected kind, report
    /// and consume it anyway.
    fn expect(&mut self, expected: &TokenKind, diagnostics: &mut Diagnostics) {
        let current = self.lexer.current();
        if !current.kind.same_kind(expected) {
            diagnostics.report(
                current.position,
                format!("Expected {expected}, found {found}", found = current.kind),
            );
        }
        self.advance(diagnostics);
    }

    /// Parse one top-level statement. `None` means an empty statement or a
    /// statement swallowed by error recovery.
    pub fn parse_statement(&mut self, diagnostics: &mut Diagnostics) -> Option<Statement> {
        match self.kind().clone() {
            TokenKind::Fn => self.parse_fn_def(diagnostics),
            TokenKind::Rn => {
                self.advance(diagnostics);
                let value = self.parse_expression(diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Return(value))
            }
            TokenKind::Break => {
                self.advance(diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Break)
            }
            TokenKind::Continue => {
                self.advance(diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Continue)
            }
            TokenKind::Out => {
                self.advance(diagnostics);
                self.expect(&TokenKind::LParen, diagnostics);
                let value = self.parse_expression(diagnostics);
                self.expect(&TokenKind::RParen, diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Out(value))
            }
            TokenKind::In => self.parse_in(diagnostics),
            TokenKind::If => self.parse_if(diagnostics),
            TokenKind::For => self.parse_for(diagnostics),
            TokenKind::While => self.parse_while(diagnostics),
            TokenKind::Http => self.parse_http(diagnostics),
            TokenKind::Ident(name) => self.parse_ident_statement(name, diagnostics),
            TokenKind::Semicolon => {
                self.advance(diagnostics);
                None
            }
            _ => {
                diagnostics.report(self.position(), "Invalid statement");
                self.advance(diagnostics);
                None
            }
        }
    }

    fn parse_fn_def(&mut self, diagnostics: &mut Diagnostics) -> Option<Statement> {
        self.advance(diagnostics);

        let TokenKind::Ident(name) = self.kind().clone() else {
            diagnostics.report(self.position(), "Expected function name");
            return None;
        };
        let ident = Ident {
            value: name,
            position: self.position(),
        };
        self.advance(diagnostics);

        self.expect(&TokenKind::LParen, diagnostics);

        let mut params = vec![];
        if !matches!(self.kind(), TokenKind::RParen) {
            loop {
                let TokenKind::Ident(param) = self.kind().clone() else {
                    diagnostics.report(self.position(), "Expected parameter name");
                    break;
                };
                params.push(param);
                self.advance(diagnostics);

                if matches!(self.kind(), TokenKind::Comma) {
                    self.advance(diagnostics);
                } else {
                    break;
                }
            }
        }

        if params.len() > MAX_PARAMS {
            diagnostics.report(
                ident.position,
                format!(
                    "Function '{}' has more than {MAX_PARAMS} parameters",
                    ident.value
                ),
            );
            params.truncate(MAX_PARAMS);
        }

        self.expect(&TokenKind::RParen, diagnostics);
        let body = self.parse_block(diagnostics);
        self.expect(&TokenKind::Semicolon, diagnostics);

        Some(Statement::FnDef(FnDef {
            ident,
            params,
            body,
        }))
    }

    fn parse_in(&mut self, diagnostics: &mut Diagnostics) -> Option<Statement> {
        self.advance(diagnostics);
        self.expect(&TokenKind::LParen, diagnostics);

        let TokenKind::Ident(name) = self.kind().clone() else {
            diagnostics.report(self.position(), "Expected variable name for input");
            return None;
        };
        let ident = Ident {
            value: name,
            position: self.position(),
        };
        self.advance(diagnostics);

        let input = if matches!(self.kind(), TokenKind::LBracket) {
            self.advance(diagnostics);
            let index = self.parse_expression(diagnostics);
            self.expect(&TokenKind::RBracket, diagnostics);
            Input::Element {
                ident,
                index: Box::new(index),
            }
        } else {
            Input::Variable(ident)
        };

        self.expect(&TokenKind::RParen, diagnostics);
        self.expect(&TokenKind::Semicolon, diagnostics);
        Some(Statement::In(input))
    }

    fn parse_if(&mut self, diagnostics: &mut Diagnostics) -> Option<Statement> {
        self.advance(diagnostics);
        self.expect(&TokenKind::LParen, diagnostics);
        let condition = self.parse_expression(diagnostics);
        self.expect(&TokenKind::RParen, diagnostics);

        let then_block = self.parse_block(diagnostics);

        let else_block = if matches!(self.kind(), TokenKind::Colon) {
            self.advance(diagnostics);
            Some(self.parse_block(diagnostics))
        } else {
            None
        };

        self.expect(&TokenKind::Semicolon, diagnostics);
        Some(Statement::If(If {
            condition,
            then_block,
            else_block,
        }))
    }

    fn parse_for(&mut self, diagnostics: &mut Diagnostics) -> Option<Statement> {
        self.advance(diagnostics);
        self.expect(&TokenKind::LParen, diagnostics);

        let init = self.parse_for_init(diagnostics);
        self.expect(&TokenKind::Semicolon, diagnostics);

        let condition = self.parse_expression(diagnostics);
        self.expect(&TokenKind::Semicolon, diagnostics);

        let step = self.parse_for_step(diagnostics);
        self.expect(&TokenKind::RParen, diagnostics);

        let body = self.parse_block(diagnostics);
        self.expect(&TokenKind::Semicolon, diagnostics);

        Some(Statement::For(ForLoop {
            init,
            condition,
            step,
            body,
        }))
    }

    fn parse_for_init(&mut self, diagnostics: &mut Diagnostics) -> Option<Box<Statement>> {
        let TokenKind::Ident(name) = self.kind().clone() else {
            return None;
        };
        let ident = Ident {
            value: name,
            position: self.position(),
        };
        self.advance(diagnostics);

        if matches!(self.kind(), TokenKind::Assign) {
            self.advance(diagnostics);
            let value = self.parse_expression(diagnostics);
            Some(Box::new(Statement::Assignment(Assignment { ident, value })))
        } else {
            // identifier without `=`: the clause is treated as absent
            None
        }
    }

    fn parse_for_step(&mut self, diagnostics: &mut Diagnostics) -> Option<Box<Statement>> {
        let TokenKind::Ident(name) = self.kind().clone() else {
            return None;
        };
        let ident = Ident {
            value: name,
            position: self.position(),
        };
        self.advance(diagnostics);

        match self.kind().clone() {
            TokenKind::PlusPlus => {
                self.advance(diagnostics);
                Some(Box::new(Statement::Increment(ident)))
            }
            TokenKind::MinusMinus => {
                self.advance(diagnostics);
                Some(Box::new(Statement::Decrement(ident)))
            }
            TokenKind::Assign => {
                self.advance(diagnostics);
                let value = self.parse_expression(diagnostics);
                Some(Box::new(Statement::Assignment(Assignment { ident, value })))
            }
            _ => None,
        }
    }

    fn parse_while(&mut self, diagnostics: &mut Diagnostics) -> Option<Statement> {
        self.advance(diagnostics);
        self.expect(&TokenKind::LParen, diagnostics);
        let condition = self.parse_expression(diagnostics);
        self.expect(&TokenKind::RParen, diagnostics);
        let body = self.parse_block(diagnostics);
        self.expect(&TokenKind::Semicolon, diagnostics);

        Some(Statement::While(WhileLoop { condition, body }))
    }

    fn parse_http(&mut self, diagnostics: &mut Diagnostics) -> Option<Statement> {
        let position = self.position();
        self.advance(diagnostics);
        self.expect(&TokenKind::LParen, diagnostics);

        let method = self.parse_expression(diagnostics);
        self.expect(&TokenKind::Comma, diagnostics);
        let url = self.parse_expression(diagnostics);

        let body = if matches!(self.kind(), TokenKind::Comma) {
            self.advance(diagnostics);
            Some(self.parse_expression(diagnostics))
        } else {
            None
        };

        self.expect(&TokenKind::RParen, diagnostics);
        self.expect(&TokenKind::Semicolon, diagnostics);
        Some(Statement::Http(HttpRequest {
            method,
            url,
            body,
            position,
        }))
    }

    fn parse_ident_statement(
        &mut self,
        name: String,
        diagnostics: &mut Diagnostics,
    ) -> Option<Statement> {
        let ident = Ident {
            value: name,
            position: self.position(),
        };
        self.advance(diagnostics);

        match self.kind().clone() {
            TokenKind::LBracket => {
                self.advance(diagnostics);
                let index = self.parse_expression(diagnostics);
                self.expect(&TokenKind::RBracket, diagnostics);
                self.expect(&TokenKind::Assign, diagnostics);
                let value = self.parse_expression(diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::ArrayAssignment(ArrayAssignment {
                    position: ident.position,
                    ident,
                    index,
                    value,
                }))
            }
            TokenKind::PlusPlus => {
                self.advance(diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Increment(ident))
            }
            TokenKind::MinusMinus => {
                self.advance(diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Decrement(ident))
            }
            TokenKind::Assign => {
                self.advance(diagnostics);
                let value = self.parse_expression(diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Assignment(Assignment { ident, value }))
            }
            TokenKind::LParen => {
                let call = self.parse_call(ident, diagnostics);
                self.expect(&TokenKind::Semicolon, diagnostics);
                Some(Statement::Call(call))
            }
            TokenKind::Semicolon => {
                // a bare identifier counts as an empty statement
                self.advance(diagnostics);
                None
            }
            _ => {
                diagnostics.report(self.position(), "Invalid statement");
                self.advance(diagnostics);
                None
            }
        }
    }

    fn parse_block(&mut self, diagnostics: &mut Diagnostics) -> Block {
        self.expect(&TokenKind::LBrace, diagnostics);

        let mut statements = vec![];
        while !matches!(self.kind(), TokenKind::RBrace | TokenKind::Eof) {
            if let Some(statement) = self.parse_statement(diagnostics) {
                statements.push(statement);
            }
        }

        self.expect(&TokenKind::RBrace, diagnostics);
        Block { statements }
    }

    pub fn parse_expression(&mut self, diagnostics: &mut Diagnostics) -> Expression {
        self.parse_logical(diagnostics)
    }

    fn parse_logical(&mut self, diagnostics: &mut Diagnostics) -> Expression {
        let mut left = self.parse_comparison(diagnostics);

        loop {
            let op = match self.kind() {
                TokenKind::AndAnd => BinaryOp::And,
                TokenKind::OrOr => BinaryOp::Or,
                _ => break,
            };
            left = self.parse_binary_rhs(left, op, Self::parse_comparison, diagnostics);
        }

        left
    }

    fn parse_comparison(&mut self, diagnostics: &mut Diagnostics) -> Expression {
        let mut left = self.parse_additive(diagnostics);

        loop {
            let op = match self.kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            left = self.parse_binary_rhs(left, op, Self::parse_additive, diagnostics);
        }

        left
    }

    fn parse_additive(&mut self, diagnostics: &mut Diagnostics) -> Expression {
        let mut left = self.parse_multiplicative(diagnostics);

        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            left = self.parse_binary_rhs(left, op, Self::parse_multiplicative, diagnostics);
        }

        left
    }

    fn parse_multiplicative(&mut self, diagnostics: &mut Diagnostics) -> Expression {
        let mut left = self.parse_primary(diagnostics);

        loop {
            let op = match self.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            left = self.parse_binary_rhs(left, op, Self::parse_primary, diagnostics);
        }

        left
    }

    fn parse_binary_rhs(
        &mut self,
        lhs: Expression,
        op: BinaryOp,
        next_tier: fn(&mut Self, &mut Diagnostics) -> Expression,
        diagnostics: &mut Diagnostics,
    ) -> Expression {
        let position = self.position();
        self.advance(diagnostics);
        let rhs = next_tier(self, diagnostics);
        Expression::Binary(Box::new(BinaryExpr {
            op,
            lhs,
            rhs,
            position,
        }))
    }

    fn parse_primary(&mut self, diagnostics: &mut Diagnostics) -> Expression {
        let position = self.position();

        match self.kind().clone() {
            TokenKind::Int(value) => {
                self.advance(diagnostics);
                Expression::IntLiteral(value)
            }
            TokenKind::Float(value) => {
                self.advance(diagnostics);
                Expression::FloatLiteral(value)
            }
            TokenKind::Str(value) => {
                self.advance(diagnostics);
                Expression::StringLiteral(value)
            }
            TokenKind::Ident(name) => {
                let ident = Ident {
                    value: name,
                    position,
                };
                self.advance(diagnostics);

                match self.kind() {
                    TokenKind::LBracket => {
                        self.advance(diagnostics);
                        let index = self.parse_expression(diagnostics);
                        self.expect(&TokenKind::RBracket, diagnostics);
                        Expression::ArrayAccess(ArrayAccess {
                            position: ident.position,
                            ident,
                            index: Box::new(index),
                        })
                    }
                    TokenKind::LParen => Expression::Call(self.parse_call(ident, diagnostics)),
                    _ => Expression::Variable(ident),
                }
            }
            TokenKind::Time => {
                self.advance(diagnostics);
                self.expect(&TokenKind::LParen, diagnostics);
                self.expect(&TokenKind::RParen, diagnostics);
                Expression::Time
            }
            TokenKind::Array => {
                self.advance(diagnostics);
                self.expect(&TokenKind::LParen, diagnostics);
                let size = self.parse_expression(diagnostics);
                self.expect(&TokenKind::RParen, diagnostics);
                Expression::ArrayAlloc(ArrayAlloc {
                    size: Box::new(size),
                    position,
                })
            }
            TokenKind::LBracket => {
                self.advance(diagnostics);

                let mut elements = vec![];
                if !matches!(self.kind(), TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expression(diagnostics));
                        if matches!(self.kind(), TokenKind::Comma) {
                            self.advance(diagnostics);
                        } else {
                            break;
                        }
                        if matches!(self.kind(), TokenKind::RBracket | TokenKind::Eof) {
                            break;
                        }
                    }
                }

                self.expect(&TokenKind::RBracket, diagnostics);
                Expression::ArrayLiteral(elements)
            }
            TokenKind::LParen => {
                self.advance(diagnostics);
                let inner = self.parse_expression(diagnostics);
                self.expect(&TokenKind::RParen, diagnostics);
                inner
            }
            TokenKind::Minus => {
                self.advance(diagnostics);
                Expression::Unary(UnaryExpr {
                    op: UnaryOp::Neg,
                    operand: Box::new(self.parse_primary(diagnostics)),
                })
            }
            TokenKind::Not => {
                self.advance(diagnostics);
                Expression::Unary(UnaryExpr {
                    op: UnaryOp::Not,
                    operand: Box::new(self.parse_primary(diagnostics)),
                })
            }
            _ => {
                // The offending token stays put; the caller resynchronizes.
                diagnostics.report(position, "Expected expression");
                Expression::IntLiteral(0)
            }
        }
    }

    fn parse_call(&mut self, ident: Ident, diagnostics: &mut Diagnostics) -> Call {
        let position = ident.position;
        self.expect(&TokenKind::LParen, diagnostics);

        let mut args = vec![];
        if !matches!(self.kind(), TokenKind::RParen) {
            loop {
                args.push(self.parse_expression(diagnostics));
                if matches!(self.kind(), TokenKind::Comma) {
                    self.advance(diagnostics);
                } else {
                    break;
                }
                if matches!(self.kind(), TokenKind::RParen | TokenKind::Eof) {
                    break;
                }
            }
        }

        self.expect(&TokenKind::RParen, diagnostics);
        Call {
            ident,
            args,
            position,
        }
    }
}
