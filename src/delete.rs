//! The `DELETE` statement builder.

use crate::condition_ext::{Condition, HasCollector};
use compact_str::CompactString;
use fluentsql_core::compiler;
use fluentsql_core::prelude::*;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Delete {
    pub(crate) state: DeleteState,
}

impl HasCollector for Delete {
    fn collector_mut(&mut self) -> &mut BindingCollector {
        &mut self.state.collector
    }
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(&mut self, table: impl Into<String>, alias: Option<&str>) -> &mut Self {
        self.state.table = Some(table.into());
        self.state.alias = alias.map(str::to_string);
        self
    }

    pub fn inner_join(&mut self, table: impl Into<String>, alias: Option<&str>, on: &str) -> &mut Self {
        self.state.joins.push(Join {
            kind: JoinKind::Inner,
            container: JoinContainer::Table(table.into()),
            alias: alias.map(str::to_string),
            constraint: Some(on.to_string()),
        });
        self
    }

    pub fn left_join(&mut self, table: impl Into<String>, alias: Option<&str>, on: &str) -> &mut Self {
        self.state.joins.push(Join {
            kind: JoinKind::Left,
            container: JoinContainer::Table(table.into()),
            alias: alias.map(str::to_string),
            constraint: Some(on.to_string()),
        });
        self
    }

    pub fn where_(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.where_bracket(column, "")
    }

    /// Like `.where_`, but opens a bracket group before the column — paired
    /// with `.closing(")")` on the terminal operator call.
    pub fn where_bracket(&mut self, column: impl Into<String>, open_bracket: &str) -> Condition<'_, Self> {
        let prefix = ConditionInit::where_prefix(&self.state.collector, open_bracket);
        Condition::new(self, ConditionInit::new_where(prefix, column))
    }

    pub fn and(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.and_bracket(column, "")
    }

    pub fn and_bracket(&mut self, column: impl Into<String>, open_bracket: &str) -> Condition<'_, Self> {
        let prefix = ConditionInit::where_prefix(&self.state.collector, open_bracket);
        Condition::new(self, ConditionInit::new_where(prefix, column))
    }

    pub fn or(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.or_bracket(column, "")
    }

    pub fn or_bracket(&mut self, column: impl Into<String>, open_bracket: &str) -> Condition<'_, Self> {
        let prefix = ConditionInit::or_prefix(&self.state.collector, open_bracket);
        Condition::new(self, ConditionInit::new_where(prefix, column))
    }

    pub fn where_json(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.where_(column)
    }

    pub fn and_json(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.and(column)
    }

    pub fn or_json(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.or(column)
    }

    pub fn exists(&mut self, sub: Arc<dyn Compilable>) -> &mut Self {
        let prefix = ConditionInit::where_prefix(&self.state.collector, "");
        fluentsql_core::condition::commit_exists(
            &mut self.state.collector,
            fluentsql_core::condition::Target::Where,
            prefix,
            false,
            sub,
            None,
        );
        self
    }

    pub fn not_exists(&mut self, sub: Arc<dyn Compilable>) -> &mut Self {
        let prefix = ConditionInit::where_prefix(&self.state.collector, "");
        fluentsql_core::condition::commit_exists(
            &mut self.state.collector,
            fluentsql_core::condition::Target::Where,
            prefix,
            true,
            sub,
            None,
        );
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, direction: Direction) -> &mut Self {
        self.state.order_by.push(OrderByEntry {
            column: column.into(),
            direction,
        });
        self
    }

    /// Sets `LIMIT rows`. `DeleteState` has no offset field at all — DELETE
    /// never emits OFFSET.
    pub fn limit(&mut self, rows: u64) -> &mut Self {
        self.state.limit = Some(rows);
        self
    }

    /// Rejects a builder with no target table.
    fn validate(&self) -> Result<()> {
        if self.state.table.is_none() {
            return Err(FluentSqlError::InvalidConfig(CompactString::from(
                "DELETE requires a target table",
            )));
        }
        Ok(())
    }

    pub fn to_sql(&self, dialect: &str, prepared: bool, _version: Option<&str>) -> Result<Prepared> {
        self.validate()?;
        let dialect = Dialect::parse(dialect)?;
        compiler::compile_delete(&self.state, dialect, prepared)
    }
}
