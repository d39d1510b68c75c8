use super::ExprColumn;
use crate::schema::{db, NavigableRole};

/// A column expression placed in the SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlSelection {
    /// Position in the SELECT list
    pub position: usize,

    pub expr: ExprColumn,

    /// Storage type the value is read as
    pub ty: db::Type,
}

/// The SELECT list under construction.
///
/// Resolving the same column through the same table reference twice yields
/// the same selection.
#[derive(Debug, Default)]
pub struct SqlSelections {
    items: Vec<SqlSelection>,
}

/// Describes how to read a model part's value out of the SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Basic {
        name: String,
        position: usize,
        ty: db::Type,
    },
    Composite {
        name: String,
        fetches: Vec<Fetch>,
    },
}

/// Top-level result of a key, as requested by a query's SELECT clause.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainResult {
    /// The key the result reads
    pub role: NavigableRole,

    pub fetch: Fetch,
}

impl SqlSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position of `expr` in the SELECT list, adding it if needed.
    pub fn resolve(&mut self, expr: ExprColumn, ty: &db::Type) -> usize {
        if let Some(existing) = self.items.iter().find(|item| item.expr == expr) {
            return existing.position;
        }

        let position = self.items.len();
        self.items.push(SqlSelection {
            position,
            expr,
            ty: ty.clone(),
        });
        position
    }

    pub fn get(&self, position: usize) -> Option<&SqlSelection> {
        self.items.get(position)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &SqlSelection> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Fetch {
    pub fn name(&self) -> &str {
        match self {
            Fetch::Basic { name, .. } | Fetch::Composite { name, .. } => name,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Fetch::Composite { .. })
    }

    /// SELECT list positions read by this fetch, in leaf order.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = vec![];
        self.collect_positions(&mut positions);
        positions
    }

    fn collect_positions(&self, out: &mut Vec<usize>) {
        match self {
            Fetch::Basic { position, .. } => out.push(*position),
            Fetch::Composite { fetches, .. } => {
                for fetch in fetches {
                    fetch.collect_positions(out);
                }
            }
        }
    }
}
