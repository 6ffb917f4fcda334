use super::{
    ArrayAssignment, Assignment, Call, Expression, FnDef, ForLoop, HttpRequest, Ident, If, Input,
    WhileLoop,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    FnDef(FnDef),
    Return(Expression),
    Break,
    Continue,
    Out(Expression),
    In(Input),
    If(If),
    For(ForLoop),
    While(WhileLoop),
    Http(HttpRequest),
    Assignment(Assignment),
    ArrayAssignment(ArrayAssignment),
    Increment(Ident),
    Decrement(Ident),
    Call(Call),
}
