//! Join kinds and the join record attached to statement state.

use crate::value::Compilable;
use std::fmt;
use std::sync::Arc;

/// The kind of JOIN operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    FullOuter,
    Cross,
}

impl JoinKind {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::FullOuter => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// What a JOIN attaches to: a plain table name or a correlated subquery.
#[derive(Clone)]
pub enum JoinContainer {
    Table(String),
    Subquery(Arc<dyn Compilable>),
}

/// A single JOIN record. `constraint` is `None` only for [`JoinKind::Cross`].
#[derive(Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub container: JoinContainer,
    pub alias: Option<String>,
    /// The already-composed `ON ...` condition text (bindings, if any, were
    /// already appended to the collector at the time this was built).
    pub constraint: Option<String>,
}
