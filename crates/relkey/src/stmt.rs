//! Query-side building blocks produced by the mapping model: join predicates,
//! SQL selections and fetch descriptors.

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_column;
pub use expr_column::ExprColumn;

mod fetch;
pub use fetch::{DomainResult, Fetch, SqlSelection, SqlSelections};

mod join;
pub use join::{Join, JoinType};

mod op_binary;
pub use op_binary::BinaryOp;

mod table_group;
pub use table_group::TableGroup;

mod table_ref;
pub use table_ref::TableReference;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
