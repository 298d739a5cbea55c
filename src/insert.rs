//! The `INSERT` statement builder.

use crate::select::Select;
use compact_str::CompactString;
use fluentsql_core::compiler;
use fluentsql_core::prelude::*;

#[derive(Clone, Default)]
pub struct Insert {
    state: InsertState,
}

impl Insert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into(&mut self, table: impl Into<String>) -> &mut Self {
        self.state.table = Some(table.into());
        self
    }

    pub fn fields<T: Into<String>>(&mut self, fields: Vec<T>) -> &mut Self {
        self.state.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one row of values. Caller is responsible for matching the
    /// declared `fields` arity — nothing here checks it.
    pub fn values<T: Into<Value>>(&mut self, row: Vec<T>) -> &mut Self {
        self.state.value_rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_select(&mut self, select: Select) -> &mut Self {
        self.state.select_query = Some(select.into_subquery());
        self
    }

    /// `INSERT IGNORE` (MySQL-family only — silently a no-op elsewhere).
    pub fn or_ignore(&mut self) -> &mut Self {
        self.state.or_ignore = true;
        self
    }

    /// `REPLACE INTO` (MySQL-family only).
    pub fn replace(&mut self) -> &mut Self {
        self.state.replace = true;
        self
    }

    pub fn on_conflict<T: Into<String>>(&mut self, columns: Vec<T>) -> &mut Self {
        self.state.on_conflict_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn do_nothing(&mut self) -> &mut Self {
        self.state.do_nothing = true;
        self
    }

    pub fn do_update(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.state
            .do_update_fields
            .push((column.into(), SetValue::Bound(value.into())));
        self
    }

    pub fn on_duplicate_key_update(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.state
            .on_duplicate_key_update
            .push((column.into(), SetValue::Bound(value.into())));
        self
    }

    /// Rejects a builder with both `doUpdate` and `doNothing` set — they are
    /// mutually exclusive upsert tails — a missing target table, or a
    /// `.values()` row whose arity doesn't match the declared `fields`.
    fn validate(&self) -> Result<()> {
        if self.state.do_nothing && !self.state.do_update_fields.is_empty() {
            return Err(FluentSqlError::InvalidConfig(CompactString::from(
                "INSERT cannot set both doUpdate and doNothing",
            )));
        }
        if self.state.table.is_none() {
            return Err(FluentSqlError::InvalidConfig(CompactString::from(
                "INSERT requires a target table",
            )));
        }
        if !self.state.fields.is_empty() {
            for (i, row) in self.state.value_rows.iter().enumerate() {
                if row.len() != self.state.fields.len() {
                    return Err(FluentSqlError::InvalidConfig(CompactString::from(format!(
                        "INSERT values row {i} has {} value(s), expected {} to match declared fields",
                        row.len(),
                        self.state.fields.len()
                    ))));
                }
            }
        }
        Ok(())
    }

    pub fn to_sql(&self, dialect: &str, prepared: bool, _version: Option<&str>) -> Result<Prepared> {
        self.validate()?;
        let dialect = Dialect::parse(dialect)?;
        compiler::compile_insert(&self.state, dialect, prepared)
    }
}
