use super::{ExprAnd, ExprBinaryOp, ExprColumn, Value};
use std::fmt;

#[derive(Clone, PartialEq)]
pub enum Expr {
    /// AND a set of binary expressions
    And(ExprAnd),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// Reference a column of a table reference
    Column(ExprColumn),

    /// A constant value
    Value(Value),
}

impl Expr {
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    pub fn as_and(&self) -> Option<&ExprAnd> {
        match self {
            Self::And(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_binary_op(&self) -> Option<&ExprBinaryOp> {
        match self {
            Self::BinaryOp(expr) => Some(expr),
            _ => None,
        }
    }

    /// Returns the top-level operands of the predicate: the operands of an
    /// `And`, or the expression itself.
    pub fn conjuncts(&self) -> &[Expr] {
        match self {
            Self::And(and) => &and.operands,
            expr => std::slice::from_ref(expr),
        }
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(and) => {
                for (i, operand) in and.operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
            Expr::BinaryOp(expr) => write!(f, "{} {} {}", expr.lhs, expr.op, expr.rhs),
            Expr::Column(column) => write!(f, "{}.{}", column.table_ref, column.name),
            Expr::Value(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(e) => e.fmt(f),
            Self::BinaryOp(e) => e.fmt(f),
            Self::Column(e) => e.fmt(f),
            Self::Value(e) => e.fmt(f),
        }
    }
}
