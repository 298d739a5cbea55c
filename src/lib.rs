//! `fluentsql` — a dialect-aware, fluent SQL query builder.
//!
//! Build a statement with [`select::Select`], [`insert::Insert`],
//! [`update::Update`], or [`delete::Delete`], then call `.to_sql(dialect,
//! prepared, version)` to render it for MySQL/MariaDB, PostgreSQL, or
//! SQLite, either as a prepared `{sql, bindings}` pair or as a raw,
//! injection-validated, fully-inlined SQL string.

mod condition_ext;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use update::Update;
pub use select::Select;

pub use fluentsql_core::dialect::Dialect;
pub use fluentsql_core::error::{FluentSqlError, Result};
pub use fluentsql_core::join::JoinKind;
pub use fluentsql_core::state::{Direction, FrameUnit, WindowSpec};
pub use fluentsql_core::value::{Compilable, Expression, Prepared, Value};

pub mod prelude {
    pub use crate::{Delete, Dialect, Direction, Expression, FluentSqlError, Insert, JoinKind, Select, Update, Value};
}
