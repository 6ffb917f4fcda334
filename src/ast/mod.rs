//! Internal representation of NaC programs (i.e., the AST).
//!
//! Each node owns its children; an AST is a tree with no sharing. Nodes
//! that can produce a runtime diagnostic carry the source position they
//! were parsed at.

mod array;
mod assignment;
mod binary;
mod call;
mod expression;
mod fn_def;
mod for_loop;
mod http;
mod ident;
mod if_statement;
mod input;
mod statement;
mod unary;
mod while_loop;

pub use self::array::*;
pub use self::assignment::*;
pub use self::binary::*;
pub use self::call::*;
pub use self::expression::*;
pub use self::fn_def::*;
pub use self::for_loop::*;
pub use self::http::*;
pub use self::ident::*;
pub use self::if_statement::*;
pub use self::input::*;
pub use self::statement::*;
pub use self::unary::*;
pub use self::while_loop::*;

/// A brace-enclosed sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
}
