use super::{ArrayAccess, ArrayAlloc, BinaryExpr, Call, Ident, UnaryExpr};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntLiteral(i32),
    FloatLiteral(f64),
    StringLiteral(String),
    Variable(Ident),
    ArrayAccess(ArrayAccess),
    ArrayLiteral(Vec<Expression>),
    ArrayAlloc(ArrayAlloc),
    Binary(Box<BinaryExpr>),
    Unary(UnaryExpr),
    Call(Call),
    Time,
}
