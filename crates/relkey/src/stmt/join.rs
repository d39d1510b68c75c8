use super::{Expr, TableReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

/// A join of a table reference onto the query, constrained by a predicate.
#[derive(Debug, Clone)]
pub struct Join {
    /// The table reference being joined
    pub table: TableReference,

    pub join_type: JoinType,

    /// The join condition
    pub constraint: Expr,
}

impl JoinType {
    /// Whether rows of the joined side may be absent from the result.
    pub fn is_outer(self) -> bool {
        !matches!(self, JoinType::Inner)
    }
}
