use super::{Block, Ident};

/// `fn name(params…) { … };`
///
/// Evaluating the statement registers the function; a call ahead of the
/// definition in execution order is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDef {
    pub ident: Ident,
    pub params: Vec<String>,
    pub body: Block,
}
