use super::{ForeignKeyDirection, Side};
use crate::{
    schema::{db, NavigableRole},
    stmt::{Expr, ExprColumn, Join, JoinType, TableGroup, TableReference},
    Error, Result,
};

use std::fmt;

/// A resolved foreign key: a referring side holding the key columns and a
/// target side holding the columns they reference.
///
/// Both sides always have the same number of columns. Foreign keys are
/// immutable once constructed and shared by every key part resolved to them.
#[derive(Debug)]
pub struct ForeignKey {
    pub id: ForeignKeyId,

    kind: ForeignKeyKind,

    referring: Side,

    target: Side,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForeignKeyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyKind {
    /// One column per side
    Basic,

    /// The same number of columns, more than one, per side
    Composite,
}

impl ForeignKey {
    /// Creates a basic key when both sides have a single column and a
    /// composite key otherwise.
    pub fn new(id: ForeignKeyId, referring: Side, target: Side) -> Result<ForeignKey> {
        if target.column_count() == 1 {
            Self::basic(id, referring, target)
        } else {
            Self::composite(id, referring, target)
        }
    }

    pub fn basic(id: ForeignKeyId, referring: Side, target: Side) -> Result<ForeignKey> {
        for side in [&referring, &target] {
            if side.column_count() != 1 {
                return Err(Error::mapping_model_creation(
                    &side.role,
                    format!(
                        "basic foreign key requires exactly one column, found {}",
                        side.column_count()
                    ),
                ));
            }
        }

        Ok(Self::bind(id, ForeignKeyKind::Basic, referring, target))
    }

    /// Creates a composite key. Both sides must have the same number of
    /// columns, more than one.
    pub fn composite(id: ForeignKeyId, referring: Side, target: Side) -> Result<ForeignKey> {
        if referring.column_count() != target.column_count() {
            return Err(Error::column_mismatch(
                &referring.role,
                referring.column_count(),
                &target.role,
                target.column_count(),
            ));
        }

        if referring.column_count() <= 1 {
            return Err(Error::mapping_model_creation(
                &referring.role,
                format!(
                    "composite foreign key requires more than one column, found {}",
                    referring.column_count()
                ),
            ));
        }

        Ok(Self::bind(id, ForeignKeyKind::Composite, referring, target))
    }

    /// Checks that `referring_count` columns can refer to `target` before the
    /// referring columns are created. A single-column target calls for a
    /// basic key.
    pub fn verify_column_count(
        referring_role: &NavigableRole,
        referring_count: usize,
        target: &Side,
    ) -> Result<()> {
        if referring_count == target.column_count() {
            return Ok(());
        }

        if target.column_count() == 1 {
            return Err(Error::mapping_model_creation(
                referring_role,
                format!(
                    "basic foreign key requires exactly one column, found {referring_count}"
                ),
            ));
        }

        Err(Error::column_mismatch(
            referring_role,
            referring_count,
            &target.role,
            target.column_count(),
        ))
    }

    fn bind(id: ForeignKeyId, kind: ForeignKeyKind, mut referring: Side, mut target: Side) -> Self {
        referring.bind(id);
        target.bind(id);

        Self {
            id,
            kind,
            referring,
            target,
        }
    }

    pub fn kind(&self) -> ForeignKeyKind {
        self.kind
    }

    pub fn is_basic(&self) -> bool {
        self.kind == ForeignKeyKind::Basic
    }

    pub fn is_composite(&self) -> bool {
        self.kind == ForeignKeyKind::Composite
    }

    pub fn referring_side(&self) -> &Side {
        &self.referring
    }

    pub fn target_side(&self) -> &Side {
        &self.target
    }

    pub fn side(&self, direction: ForeignKeyDirection) -> &Side {
        match direction {
            ForeignKeyDirection::Referring => &self.referring,
            ForeignKeyDirection::Target => &self.target,
        }
    }

    pub fn column_count(&self) -> usize {
        self.referring.column_count()
    }

    /// True when the key refers to its own table.
    pub fn is_self_referencing(&self) -> bool {
        self.referring.table == self.target.table
    }

    /// Calls `visitor` with the (table, column, storage type) of each referring
    /// column.
    pub fn visit_referring_columns(&self, visitor: impl FnMut(&str, &str, &db::Type)) {
        self.referring.visit_columns(visitor);
    }

    /// Calls `visitor` with the (table, column, storage type) of each target
    /// column.
    pub fn visit_target_columns(&self, visitor: impl FnMut(&str, &str, &db::Type)) {
        self.target.visit_columns(visitor);
    }

    /// Builds the predicate joining `lhs` and `rhs`, where `lhs` holds the
    /// `lhs_side` of the key: one equality per column pair, in column order.
    ///
    /// When the key refers to its own table, the referring side is read from
    /// its own group's reference and the target side from the other's, so the
    /// two sides never collapse into one alias.
    pub fn generate_join_predicate(
        &self,
        lhs: &TableGroup,
        rhs: &TableGroup,
        lhs_side: ForeignKeyDirection,
    ) -> Result<Expr> {
        let lhs_key = self.side(lhs_side);
        let rhs_key = self.side(lhs_side.opposite());

        let (lhs_ref, rhs_ref) = if self.is_self_referencing() {
            let lhs_ref = lhs_key.table_reference(lhs)?;
            let rhs_ref = rhs_key.table_reference(rhs)?;

            if lhs_ref.alias == rhs_ref.alias {
                return Err(Error::mapping_model_creation(
                    &self.referring.role,
                    format!(
                        "self-referencing join resolved both sides to `{}`",
                        lhs_ref.alias
                    ),
                ));
            }

            (lhs_ref, rhs_ref)
        } else {
            (
                table_reference(lhs_key, lhs, rhs)?,
                table_reference(rhs_key, rhs, lhs)?,
            )
        };

        let operands = lhs_key
            .columns
            .iter()
            .zip(&rhs_key.columns)
            .map(|(lhs_column, rhs_column)| {
                Expr::eq(
                    ExprColumn::new(lhs_ref, lhs_column.id, &lhs_column.name),
                    ExprColumn::new(rhs_ref, rhs_column.id, &rhs_column.name),
                )
            })
            .collect();

        Ok(Expr::and_from_vec(operands))
    }

    /// Joins the primary table of `rhs` using
    /// [`ForeignKey::generate_join_predicate`].
    pub fn generate_join(
        &self,
        lhs: &TableGroup,
        rhs: &TableGroup,
        lhs_side: ForeignKeyDirection,
        join_type: JoinType,
    ) -> Result<Join> {
        let constraint = self.generate_join_predicate(lhs, rhs, lhs_side)?;

        Ok(Join {
            table: rhs.primary().clone(),
            join_type,
            constraint,
        })
    }
}

/// A side's reference in its expected group, or in the other group when the
/// key's columns live on the far side of the association.
fn table_reference<'a>(
    side: &Side,
    preferred: &'a TableGroup,
    other: &'a TableGroup,
) -> Result<&'a TableReference> {
    match preferred.table_reference(side.table) {
        Some(table_ref) => Ok(table_ref),
        None => side.table_reference(other),
    }
}

impl ForeignKeyId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl fmt::Debug for ForeignKeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ForeignKeyId({})", self.0)
    }
}
