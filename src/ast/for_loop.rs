use super::{Block, Expression, Statement};

/// `for (init; condition; step) { … };`
///
/// Init is restricted to an assignment, step to an assignment or an
/// increment/decrement; both are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub init: Option<Box<Statement>>,
    pub condition: Expression,
    pub step: Option<Box<Statement>>,
    pub body: Block,
}
