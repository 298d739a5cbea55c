//! Statement State (C3) — plain value records per statement kind, holding
//! everything a fluent builder accumulated before compilation.

use crate::collector::BindingCollector;
use crate::join::Join;
use crate::value::{Compilable, Expression, Value};
use std::sync::Arc;

/// Sort direction for an ORDER BY entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderByEntry {
    pub column: String,
    pub direction: Direction,
}

/// The FROM target of a SELECT, or the JOIN target in [`crate::join::Join`]:
/// either a plain table name (optionally aliased) or a correlated subquery.
#[derive(Clone)]
pub enum Source {
    Table { name: String, alias: Option<String> },
    Subquery { query: Arc<dyn Compilable>, alias: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    Union,
    UnionAll,
}

impl UnionKind {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            UnionKind::Union => "UNION",
            UnionKind::UnionAll => "UNION ALL",
        }
    }
}

/// One CTE entry. Modeled as a single ordered list with a per-entry
/// `recursive` flag — the final `WITH RECURSIVE` header only needs to know
/// whether *any* entry is recursive, and entries must render together in a
/// single insertion order
/// regardless of which flavor they were (see `DESIGN.md`).
#[derive(Clone)]
pub struct Cte {
    pub name: String,
    pub query: Arc<dyn Compilable>,
    pub recursive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnit {
    Rows,
    Range,
}

impl FrameUnit {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            FrameUnit::Rows => "ROWS",
            FrameUnit::Range => "RANGE",
        }
    }
}

/// Window Spec (C13): PARTITION BY list, ORDER BY list, optional frame.
#[derive(Debug, Clone, Default)]
pub struct WindowSpec {
    pub partitions: Vec<String>,
    pub orders: Vec<OrderByEntry>,
    pub frame: Option<(FrameUnit, String, String)>,
}

/// A window function use, inline or referencing a named window.
#[derive(Clone)]
pub enum WindowItem {
    Inline {
        /// The function call text, e.g. `ROW_NUMBER()` or `RANK()`.
        call: String,
        spec: WindowSpec,
        alias: String,
    },
    Reference {
        call: String,
        window_name: String,
        alias: String,
    },
}

/// A value assignable to a column in `SET`/`VALUES` position: either a
/// bound value or a raw [`Expression`] that renders literally.
#[derive(Clone)]
pub enum SetValue {
    Bound(Value),
    Raw(Expression),
}

impl From<Value> for SetValue {
    fn from(v: Value) -> Self {
        SetValue::Bound(v)
    }
}
impl From<Expression> for SetValue {
    fn from(e: Expression) -> Self {
        SetValue::Raw(e)
    }
}

// =============================================================================
// SelectState
// =============================================================================

#[derive(Clone)]
pub struct SelectState {
    pub fields: String,
    pub distinct: bool,
    pub source: Option<Source>,
    pub joins: Vec<Join>,
    pub collector: BindingCollector,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderByEntry>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unions: Vec<(UnionKind, Arc<dyn Compilable>)>,
    pub ctes: Vec<Cte>,
    pub select_subqueries: Vec<(String, Arc<dyn Compilable>)>,
    pub window_items: Vec<WindowItem>,
    pub named_windows: Vec<(String, WindowSpec)>,
}

impl Default for SelectState {
    fn default() -> Self {
        Self {
            fields: "*".to_string(),
            distinct: false,
            source: None,
            joins: Vec::new(),
            collector: BindingCollector::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            unions: Vec::new(),
            ctes: Vec::new(),
            select_subqueries: Vec::new(),
            window_items: Vec::new(),
            named_windows: Vec::new(),
        }
    }
}

// =============================================================================
// InsertState
// =============================================================================

#[derive(Default, Clone)]
pub struct InsertState {
    pub table: Option<String>,
    pub fields: Vec<String>,
    pub value_rows: Vec<Vec<Value>>,
    pub select_query: Option<Arc<dyn Compilable>>,
    pub or_ignore: bool,
    pub replace: bool,
    pub on_duplicate_key_update: Vec<(String, SetValue)>,
    pub on_conflict_columns: Vec<String>,
    pub do_update_fields: Vec<(String, SetValue)>,
    pub do_nothing: bool,
}

// =============================================================================
// UpdateState
// =============================================================================

#[derive(Default, Clone)]
pub struct UpdateState {
    pub table: Option<String>,
    pub alias: Option<String>,
    pub set_data: Vec<(String, SetValue)>,
    pub joins: Vec<Join>,
    pub collector: BindingCollector,
    pub order_by: Vec<OrderByEntry>,
    pub limit: Option<u64>,
    pub ignore: bool,
}

// =============================================================================
// DeleteState
// =============================================================================

#[derive(Default, Clone)]
pub struct DeleteState {
    pub table: Option<String>,
    pub alias: Option<String>,
    pub joins: Vec<Join>,
    pub collector: BindingCollector,
    pub order_by: Vec<OrderByEntry>,
    pub limit: Option<u64>,
}
