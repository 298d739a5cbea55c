//! Engine crate for the `fluentsql` query builder: dialect strategies,
//! statement state, the condition DSL continuation machinery, clause
//! rendering, and the final statement compiler.
//!
//! The public builder surface (`Select`, `Insert`, `Update`, `Delete`) lives
//! in the `fluentsql` crate; this crate exists so those builders can hold
//! subqueries of their own type (via [`value::Compilable`]) without a
//! circular crate dependency.

pub mod clause;
pub mod collector;
pub mod compiler;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod format;
pub mod join;
pub mod json;
pub mod registry;
pub mod state;
pub mod validator;
pub mod value;

pub mod prelude {
    pub use crate::collector::{BindingCollector, ConditionFragment};
    pub use crate::condition::{commit_exists, expression, ConditionInit, Operand, Target};
    pub use crate::dialect::{Dialect, DialectStrategy};
    pub use crate::error::{FluentSqlError, Result};
    pub use crate::join::{Join, JoinContainer, JoinKind};
    pub use crate::state::{
        Cte, DeleteState, Direction, FrameUnit, InsertState, OrderByEntry, SelectState, SetValue,
        Source, UnionKind, UpdateState, WindowItem, WindowSpec,
    };
    pub use crate::value::{Compilable, Expression, Prepared, Value};
}
