//! The `SELECT` statement builder.

use crate::condition_ext::{Condition, HasCollector};
use fluentsql_core::compiler;
use fluentsql_core::prelude::*;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Select {
    pub(crate) state: SelectState,
}

impl HasCollector for Select {
    fn collector_mut(&mut self) -> &mut BindingCollector {
        &mut self.state.collector
    }
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps this builder for use as a subquery (FROM, JOIN, CTE body,
    /// UNION branch, `.in`/`.exists` operand, select-subquery, INSERT
    /// `fromSelect`).
    pub fn into_subquery(self) -> Arc<dyn Compilable> {
        Arc::new(self)
    }

    pub fn select(&mut self, fields: impl Into<String>) -> &mut Self {
        self.state.fields = fields.into();
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.state.distinct = true;
        self
    }

    pub fn from(&mut self, table: impl Into<String>, alias: Option<&str>) -> &mut Self {
        self.state.source = Some(Source::Table {
            name: table.into(),
            alias: alias.map(str::to_string),
        });
        self
    }

    pub fn from_subquery(&mut self, sub: Select, alias: impl Into<String>) -> &mut Self {
        self.state.source = Some(Source::Subquery {
            query: sub.into_subquery(),
            alias: alias.into(),
        });
        self
    }

    fn push_join(&mut self, kind: JoinKind, container: JoinContainer, alias: Option<&str>, on: Option<&str>) -> &mut Self {
        self.state.joins.push(Join {
            kind,
            container,
            alias: alias.map(str::to_string),
            constraint: on.map(str::to_string),
        });
        self
    }

    pub fn inner_join(&mut self, table: impl Into<String>, alias: Option<&str>, on: &str) -> &mut Self {
        self.push_join(JoinKind::Inner, JoinContainer::Table(table.into()), alias, Some(on))
    }

    pub fn left_join(&mut self, table: impl Into<String>, alias: Option<&str>, on: &str) -> &mut Self {
        self.push_join(JoinKind::Left, JoinContainer::Table(table.into()), alias, Some(on))
    }

    pub fn right_join(&mut self, table: impl Into<String>, alias: Option<&str>, on: &str) -> &mut Self {
        self.push_join(JoinKind::Right, JoinContainer::Table(table.into()), alias, Some(on))
    }

    pub fn full_join(&mut self, table: impl Into<String>, alias: Option<&str>, on: &str) -> &mut Self {
        self.push_join(JoinKind::FullOuter, JoinContainer::Table(table.into()), alias, Some(on))
    }

    pub fn cross_join(&mut self, table: impl Into<String>, alias: Option<&str>) -> &mut Self {
        self.push_join(JoinKind::Cross, JoinContainer::Table(table.into()), alias, None)
    }

    pub fn join_subquery(&mut self, kind: JoinKind, sub: Select, alias: &str, on: Option<&str>) -> &mut Self {
        self.push_join(kind, JoinContainer::Subquery(sub.into_subquery()), Some(alias), on)
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
        if self.state.collector.has_having() {
            let prefix = ConditionInit::and_having_prefix(&self.state.collector, open_bracket);
            Condition::new(self, ConditionInit::new_having(prefix, column))
        } else {
            let prefix = ConditionInit::where_prefix(&self.state.collector, open_bracket);
            Condition::new(self, ConditionInit::new_where(prefix, column))
        }
    }

    pub fn or(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.or_bracket(column, "")
    }

    pub fn or_bracket(&mut self, column: impl Into<String>, open_bracket: &str) -> Condition<'_, Self> {
        if self.state.collector.has_having() {
            let prefix = ConditionInit::or_having_prefix(&self.state.collector, open_bracket);
            Condition::new(self, ConditionInit::new_having(prefix, column))
        } else {
            let prefix = ConditionInit::or_prefix(&self.state.collector, open_bracket);
            Condition::new(self, ConditionInit::new_where(prefix, column))
        }
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

    /// Begins a HAVING condition. The first HAVING fragment on this builder
    /// carries no `" HAVING "` prefix of its own — the SELECT clause
    /// renderer prepends it exactly once.
    pub fn having(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.having_bracket(column, "")
    }

    pub fn having_bracket(&mut self, column: impl Into<String>, open_bracket: &str) -> Condition<'_, Self> {
        let prefix = ConditionInit::having_prefix(open_bracket);
        Condition::new(self, ConditionInit::new_having(prefix, column))
    }

    pub fn having_json(&mut self, column: impl Into<String>) -> Condition<'_, Self> {
        self.having(column)
    }

    pub fn exists(&mut self, sub: Arc<dyn Compilable>) -> &mut Self {
        let prefix = ConditionInit::where_prefix(&self.state.collector, "");
        commit_exists(&mut self.state.collector, Target::Where, prefix, false, sub, None);
        self
    }

    pub fn not_exists(&mut self, sub: Arc<dyn Compilable>) -> &mut Self {
        let prefix = ConditionInit::where_prefix(&self.state.collector, "");
        commit_exists(&mut self.state.collector, Target::Where, prefix, true, sub, None);
        self
    }

    pub fn having_exists(&mut self, sub: Arc<dyn Compilable>) -> &mut Self {
        let prefix = ConditionInit::having_prefix("");
        commit_exists(&mut self.state.collector, Target::Having, prefix, false, sub, None);
        self
    }

    pub fn having_not_exists(&mut self, sub: Arc<dyn Compilable>) -> &mut Self {
        let prefix = ConditionInit::having_prefix("");
        commit_exists(&mut self.state.collector, Target::Having, prefix, true, sub, None);
        self
    }

    pub fn group_by(&mut self, columns: Vec<impl Into<String>>) -> &mut Self {
        self.state.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, direction: Direction) -> &mut Self {
        self.state.order_by.push(OrderByEntry {
            column: column.into(),
            direction,
        });
        self
    }

    /// Sets `LIMIT rows[ OFFSET offset]`. `offset` is only emitted when
    /// `Some(n)` with `n > 0`.
    pub fn limit(&mut self, rows: u64, offset: Option<u64>) -> &mut Self {
        self.state.limit = Some(rows);
        self.state.offset = offset;
        self
    }

    pub fn union(&mut self, branch: Select) -> &mut Self {
        self.state.unions.push((UnionKind::Union, branch.into_subquery()));
        self
    }

    pub fn union_all(&mut self, branch: Select) -> &mut Self {
        self.state.unions.push((UnionKind::UnionAll, branch.into_subquery()));
        self
    }

    pub fn with(&mut self, name: impl Into<String>, sub: Select) -> &mut Self {
        self.state.ctes.push(Cte {
            name: name.into(),
            query: sub.into_subquery(),
            recursive: false,
        });
        self
    }

    pub fn with_recursive(&mut self, name: impl Into<String>, sub: Select) -> &mut Self {
        self.state.ctes.push(Cte {
            name: name.into(),
            query: sub.into_subquery(),
            recursive: true,
        });
        self
    }

    pub fn select_subquery(&mut self, alias: impl Into<String>, sub: Select) -> &mut Self {
        self.state.select_subqueries.push((alias.into(), sub.into_subquery()));
        self
    }

    pub fn window(&mut self, call: impl Into<String>, spec: WindowSpec, alias: impl Into<String>) -> &mut Self {
        self.state.window_items.push(WindowItem::Inline {
            call: call.into(),
            spec,
            alias: alias.into(),
        });
        self
    }

    pub fn window_ref(&mut self, call: impl Into<String>, window_name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.state.window_items.push(WindowItem::Reference {
            call: call.into(),
            window_name: window_name.into(),
            alias: alias.into(),
        });
        self
    }

    pub fn named_window(&mut self, name: impl Into<String>, spec: WindowSpec) -> &mut Self {
        self.state.named_windows.push((name.into(), spec));
        self
    }

    /// Compiles this statement. `version` is accepted and silently ignored
    /// beyond registry-override resolution — no version overrides are
    /// registered by this crate today.
    pub fn to_sql(&self, dialect: &str, prepared: bool, _version: Option<&str>) -> Result<Prepared> {
        let dialect = Dialect::parse(dialect)?;
        compiler::compile_select(&self.state, dialect, prepared)
    }
}

impl Compilable for Select {
    fn compile_prepared(&self, dialect: Dialect) -> Result<Prepared> {
        compiler::compile_select(&self.state, dialect, true)
    }

    fn compile_raw(&self, dialect: Dialect) -> Result<String> {
        compiler::compile_select(&self.state, dialect, false).map(|p| p.sql)
    }
}
