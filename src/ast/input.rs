use super::{Expression, Ident};

/// Target of `in(…)`: a plain variable or an array element.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Variable(Ident),
    Element {
        ident: Ident,
        index: Box<Expression>,
    },
}
