//! Statement Compiler (C10) — orchestrates the clause builders in a fixed
//! order, runs the Bracket Validator first, and produces either a
//! [`crate::value::Prepared`] query or a raw (fully-inlined) SQL string.

use crate::clause;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::format;
use crate::join::Join;
use crate::state::{DeleteState, InsertState, SelectState, SetValue, UpdateState};
use crate::validator::bracket;
use crate::value::{Prepared, Value};

/// Collapses runs of ASCII whitespace into a single space and trims the
/// ends, matching the teacher's habit of assembling clause text with
/// liberal leading spaces and normalizing once at the end.
fn collapse_whitespace(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut last_was_space = false;
    for ch in sql.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

fn finish(sql: String, bindings: Vec<Value>, dialect: Dialect, prepared: bool) -> Result<Prepared> {
    let collapsed = collapse_whitespace(&sql);
    if prepared {
        let (spliced_sql, spliced_bindings) =
            format::splice_subqueries_prepared(&collapsed, bindings, dialect)?;
        Ok(Prepared {
            sql: spliced_sql,
            bindings: spliced_bindings,
            dialect,
        })
    } else {
        let raw = format::replace_all_raw(&collapsed, &bindings, dialect)?;
        Ok(Prepared {
            sql: raw,
            bindings: Vec::new(),
            dialect,
        })
    }
}

fn render_mutation_joins(joins: &[Join], dialect: Dialect, prepared: bool) -> Result<(String, Vec<Value>)> {
    if !joins.is_empty() && dialect.strategy().supports_order_limit_join_in_mutations() {
        clause::render_joins(joins, dialect, prepared)
    } else {
        Ok((String::new(), Vec::new()))
    }
}

fn render_mutation_order_limit(order_by: &[crate::state::OrderByEntry], limit: Option<u64>, dialect: Dialect) -> String {
    if dialect.strategy().supports_order_limit_join_in_mutations() {
        let mut s = clause::render_order_by(order_by);
        s.push_str(&clause::render_limit_offset(limit, None));
        s
    } else {
        String::new()
    }
}

/// Compiles a SELECT statement's components in the order: CTEs,
/// SELECT+select-subqueries, FROM(+subquery), JOIN(+subqueries), WHERE,
/// HAVING, UNION branches, WINDOW, ORDER BY, LIMIT/OFFSET.
pub fn compile_select(state: &SelectState, dialect: Dialect, prepared: bool) -> Result<Prepared> {
    let span = tracing::debug_span!("fluentsql.compile_select", %dialect, prepared);
    let _enter = span.enter();

    if let Err(e) = bracket::validate(&state.collector.where_conditions, &state.collector.having_conditions) {
        tracing::warn!(error = %e, "fluentsql.bracket_validation_failed");
        return Err(e);
    }

    let mut sql = String::new();
    let mut bindings = Vec::new();

    let (cte_sql, cte_bindings) = clause::render_ctes(&state.ctes, dialect, prepared)?;
    sql.push_str(&cte_sql);
    bindings.extend(cte_bindings);

    let (window_projection, _) = clause::render_window_items(&state.window_items);
    sql.push_str(&clause::render_select_clause(&state.fields, state.distinct));
    sql.push_str(&window_projection);

    let (sub_sql, sub_bindings) =
        clause::render_select_subqueries(&state.select_subqueries, dialect, prepared)?;
    sql.push_str(&sub_sql);
    bindings.extend(sub_bindings);

    if let Some(source) = &state.source {
        let (from_sql, from_bindings) = clause::render_from(source, dialect, prepared)?;
        sql.push_str(&from_sql);
        bindings.extend(from_bindings);
    }

    let (join_sql, join_bindings) = clause::render_joins(&state.joins, dialect, prepared)?;
    sql.push_str(&join_sql);
    bindings.extend(join_bindings);

    let (where_sql, where_bindings) = clause::render_condition_list(
        &state.collector.where_conditions,
        &state.collector.where_bindings,
        dialect,
        prepared,
    )?;
    sql.push_str(&where_sql);
    bindings.extend(where_bindings);

    sql.push_str(&clause::render_group_by(&state.group_by));

    let (having_sql, having_bindings) = clause::render_condition_list(
        &state.collector.having_conditions,
        &state.collector.having_bindings,
        dialect,
        prepared,
    )?;
    sql.push_str(&clause::render_having_prefix(&having_sql));
    bindings.extend(having_bindings);

    let (union_sql, union_bindings) = clause::render_unions(&state.unions, dialect, prepared)?;
    sql.push_str(&union_sql);
    bindings.extend(union_bindings);

    sql.push_str(&clause::render_named_windows(&state.named_windows));
    sql.push_str(&clause::render_order_by(&state.order_by));
    sql.push_str(&clause::render_limit_offset(state.limit, state.offset));

    let result = finish(sql, bindings, dialect, prepared);
    if let Ok(prepared_result) = &result {
        tracing::debug!(bindings = prepared_result.bindings.len(), "fluentsql.compiled");
    }
    result
}

fn render_set_value(value: &SetValue, bindings: &mut Vec<Value>) -> String {
    match value {
        SetValue::Bound(v) => {
            bindings.push(v.clone());
            "?".to_string()
        }
        SetValue::Raw(e) => e.as_str().to_string(),
    }
}

/// Compiles an INSERT statement: `INSERT [IGNORE|OR IGNORE]/REPLACE INTO
/// table (fields) VALUES (...), (...) | SELECT ...`, plus MySQL's
/// `ON DUPLICATE KEY UPDATE` or Postgres/SQLite's `ON CONFLICT (...) DO
/// UPDATE/DO NOTHING` upsert tail, whichever the dialect supports.
pub fn compile_insert(state: &InsertState, dialect: Dialect, prepared: bool) -> Result<Prepared> {
    let span = tracing::debug_span!("fluentsql.compile_insert", %dialect, prepared);
    let _enter = span.enter();

    let table = state.table.as_deref().unwrap_or_default();
    let mut sql = String::from("INSERT ");
    let mysql_family = dialect.strategy().supports_update_ignore();

    if state.replace && mysql_family {
        sql = String::from("REPLACE ");
    } else if state.or_ignore {
        if mysql_family {
            sql.push_str("IGNORE ");
        }
    }
    sql.push_str("INTO ");
    sql.push_str(&dialect.strategy().quote_identifier(table));

    let mut bindings = Vec::new();

    if !state.fields.is_empty() {
        sql.push_str(&format!(" ({})", state.fields.join(", ")));
    }

    if let Some(select) = &state.select_query {
        sql.push(' ');
        if prepared {
            let p = select.compile_prepared(dialect)?;
            sql.push_str(&p.sql);
            bindings.extend(p.bindings);
        } else {
            sql.push_str(&select.compile_raw(dialect)?);
        }
    } else {
        sql.push_str(" VALUES ");
        let rows: Vec<String> = state
            .value_rows
            .iter()
            .map(|row| {
                let placeholders: Vec<&str> = row.iter().map(|_| "?").collect();
                bindings.extend(row.iter().cloned());
                format!("({})", placeholders.join(", "))
            })
            .collect();
        sql.push_str(&rows.join(", "));
    }

    if !mysql_family && !state.on_conflict_columns.is_empty() {
        sql.push_str(&format!(" ON CONFLICT ({})", state.on_conflict_columns.join(", ")));
        if state.do_nothing {
            sql.push_str(" DO NOTHING");
        } else if !state.do_update_fields.is_empty() {
            sql.push_str(" DO UPDATE SET ");
            let assignments: Vec<String> = state
                .do_update_fields
                .iter()
                .map(|(col, val)| format!("{col} = {}", render_set_value(val, &mut bindings)))
                .collect();
            sql.push_str(&assignments.join(", "));
        }
    } else if mysql_family && !state.on_duplicate_key_update.is_empty() {
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        let assignments: Vec<String> = state
            .on_duplicate_key_update
            .iter()
            .map(|(col, val)| format!("{col} = {}", render_set_value(val, &mut bindings)))
            .collect();
        sql.push_str(&assignments.join(", "));
    }

    let result = finish(sql, bindings, dialect, prepared);
    if let Ok(prepared_result) = &result {
        tracing::debug!(bindings = prepared_result.bindings.len(), "fluentsql.compiled");
    }
    result
}

/// Compiles an UPDATE statement. ORDER BY/LIMIT/JOIN are only emitted for
/// MySQL-family dialects; `IGNORE` likewise.
pub fn compile_update(state: &UpdateState, dialect: Dialect, prepared: bool) -> Result<Prepared> {
    let span = tracing::debug_span!("fluentsql.compile_update", %dialect, prepared);
    let _enter = span.enter();

    if let Err(e) = bracket::validate(&state.collector.where_conditions, &state.collector.having_conditions) {
        tracing::warn!(error = %e, "fluentsql.bracket_validation_failed");
        return Err(e);
    }

    let table = state.table.as_deref().unwrap_or_default();
    let mut sql = String::from("UPDATE ");
    if state.ignore && dialect.strategy().supports_update_ignore() {
        sql.push_str("IGNORE ");
    }
    sql.push_str(&dialect.strategy().quote_identifier(table));
    if let Some(alias) = &state.alias {
        sql.push(' ');
        sql.push_str(alias);
    }

    let mut bindings = Vec::new();

    let (join_sql, join_bindings) = render_mutation_joins(&state.joins, dialect, prepared)?;
    sql.push_str(&join_sql);
    bindings.extend(join_bindings);

    sql.push_str(" SET ");
    let assignments: Vec<String> = state
        .set_data
        .iter()
        .map(|(col, val)| format!("{col} = {}", render_set_value(val, &mut bindings)))
        .collect();
    sql.push_str(&assignments.join(", "));

    let (where_sql, where_bindings) = clause::render_condition_list(
        &state.collector.where_conditions,
        &state.collector.where_bindings,
        dialect,
        prepared,
    )?;
    sql.push_str(&where_sql);
    bindings.extend(where_bindings);

    sql.push_str(&render_mutation_order_limit(&state.order_by, state.limit, dialect));

    let result = finish(sql, bindings, dialect, prepared);
    if let Ok(prepared_result) = &result {
        tracing::debug!(bindings = prepared_result.bindings.len(), "fluentsql.compiled");
    }
    result
}

/// Compiles a DELETE statement. Never emits OFFSET — `DeleteState` has no
/// offset field at all.
pub fn compile_delete(state: &DeleteState, dialect: Dialect, prepared: bool) -> Result<Prepared> {
    let span = tracing::debug_span!("fluentsql.compile_delete", %dialect, prepared);
    let _enter = span.enter();

    if let Err(e) = bracket::validate(&state.collector.where_conditions, &state.collector.having_conditions) {
        tracing::warn!(error = %e, "fluentsql.bracket_validation_failed");
        return Err(e);
    }

    let table = state.table.as_deref().unwrap_or_default();
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&dialect.strategy().quote_identifier(table));
    if let Some(alias) = &state.alias {
        sql.push(' ');
        sql.push_str(alias);
    }

    let mut bindings = Vec::new();

    let (join_sql, join_bindings) = render_mutation_joins(&state.joins, dialect, prepared)?;
    sql.push_str(&join_sql);
    bindings.extend(join_bindings);

    let (where_sql, where_bindings) = clause::render_condition_list(
        &state.collector.where_conditions,
        &state.collector.where_bindings,
        dialect,
        prepared,
    )?;
    sql.push_str(&where_sql);
    bindings.extend(where_bindings);

    sql.push_str(&render_mutation_order_limit(&state.order_by, state.limit, dialect));

    let result = finish(sql, bindings, dialect, prepared);
    if let Ok(prepared_result) = &result {
        tracing::debug!(bindings = prepared_result.bindings.len(), "fluentsql.compiled");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionInit, Operand};
    use crate::state::Source;

    #[test]
    fn select_compiles_select_star_from_with_where() {
        let mut state = SelectState::default();
        state.source = Some(Source::Table {
            name: "users".into(),
            alias: None,
        });
        let init = ConditionInit::new_where(
            ConditionInit::where_prefix(&state.collector, ""),
            "status",
        );
        init.commit_binary(&mut state.collector, "=", Operand::from("active"), None);

        let prepared = compile_select(&state, Dialect::MySql, true).unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM `users` WHERE status = ?");
        assert_eq!(prepared.bindings, vec![Value::Text("active".into())]);
    }

    #[test]
    fn select_raw_mode_inlines_literal() {
        let mut state = SelectState::default();
        state.source = Some(Source::Table {
            name: "users".into(),
            alias: None,
        });
        let init = ConditionInit::new_where(
            ConditionInit::where_prefix(&state.collector, ""),
            "id",
        );
        init.commit_binary(&mut state.collector, "=", Operand::from(7i64), None);

        let prepared = compile_select(&state, Dialect::PostgreSql, false).unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM \"users\" WHERE id = 7");
        assert!(prepared.bindings.is_empty());
    }

    #[test]
    fn delete_never_emits_offset_even_when_limit_present() {
        let mut state = DeleteState::default();
        state.table = Some("sessions".into());
        state.limit = Some(5);
        let prepared = compile_delete(&state, Dialect::MySql, true).unwrap();
        assert_eq!(prepared.sql, "DELETE FROM `sessions` LIMIT 5");
    }

    #[test]
    fn update_suppresses_order_limit_for_postgres() {
        let mut state = UpdateState::default();
        state.table = Some("accounts".into());
        state.set_data = vec![("balance".to_string(), SetValue::Bound(Value::Int(0)))];
        state.limit = Some(1);
        let prepared = compile_update(&state, Dialect::PostgreSql, true).unwrap();
        assert_eq!(prepared.sql, "UPDATE \"accounts\" SET balance = ?");
    }

    #[test]
    fn insert_with_postgres_on_conflict_do_update() {
        let mut state = InsertState::default();
        state.table = Some("users".into());
        state.fields = vec!["id".to_string(), "email".to_string()];
        state.value_rows = vec![vec![Value::Int(1), Value::Text("a@example.com".into())]];
        state.on_conflict_columns = vec!["id".to_string()];
        state.do_update_fields = vec![("email".to_string(), SetValue::Bound(Value::Text("a@example.com".into())))];

        let prepared = compile_insert(&state, Dialect::PostgreSql, true).unwrap();
        assert_eq!(
            prepared.sql,
            "INSERT INTO \"users\" (id, email) VALUES (?, ?) ON CONFLICT (id) DO UPDATE SET email = ?"
        );
        assert_eq!(prepared.bindings.len(), 3);
    }
}
