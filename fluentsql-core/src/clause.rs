//! Clause Builders (C7) — stateless renderers for each SQL clause. Each
//! function returns the clause's SQL text (with `?` placeholders for any
//! bound values it introduces, regardless of final prepared/raw mode) plus
//! the bindings it introduced, in left-to-right order.

use crate::collector::ConditionFragment;
use crate::dialect::Dialect;
use crate::error::{FluentSqlError, Result};
use crate::join::{Join, JoinContainer};
use crate::json;
use crate::state::{Cte, OrderByEntry, Source, UnionKind, WindowItem, WindowSpec};
use crate::value::Value;
use compact_str::CompactString;
use std::sync::Arc;

use crate::value::Compilable;

fn quote(dialect: Dialect, ident: &str) -> String {
    dialect.strategy().quote_identifier(ident)
}

/// Renders `name[ alias]`, quoting `name`.
fn table_ref(dialect: Dialect, name: &str, alias: Option<&str>) -> String {
    let mut s = quote(dialect, name);
    if let Some(a) = alias {
        s.push(' ');
        s.push_str(a);
    }
    s
}

// =============================================================================
// SELECT / projection
// =============================================================================

pub fn render_select_clause(fields: &str, distinct: bool) -> String {
    if distinct {
        format!("SELECT DISTINCT {fields}")
    } else {
        format!("SELECT {fields}")
    }
}

/// Renders `, (sub) AS alias` for each select-subquery, in insertion order.
pub fn render_select_subqueries(
    select_subqueries: &[(String, Arc<dyn Compilable>)],
    dialect: Dialect,
    prepared: bool,
) -> Result<(String, Vec<Value>)> {
    let mut sql = String::new();
    let mut bindings = Vec::new();
    for (alias, sub) in select_subqueries {
        sql.push_str(", (");
        if prepared {
            let p = sub.compile_prepared(dialect)?;
            sql.push_str(&p.sql);
            bindings.extend(p.bindings);
        } else {
            sql.push_str(&sub.compile_raw(dialect)?);
        }
        sql.push_str(") AS ");
        sql.push_str(alias);
    }
    Ok((sql, bindings))
}

// =============================================================================
// FROM
// =============================================================================

pub fn render_from(source: &Source, dialect: Dialect, prepared: bool) -> Result<(String, Vec<Value>)> {
    match source {
        Source::Table { name, alias } => Ok((
            format!(" FROM {}", table_ref(dialect, name, alias.as_deref())),
            Vec::new(),
        )),
        Source::Subquery { query, alias } => {
            if prepared {
                let p = query.compile_prepared(dialect)?;
                Ok((format!(" FROM ({}) AS {alias}", p.sql), p.bindings))
            } else {
                let rendered = query.compile_raw(dialect)?;
                Ok((format!(" FROM ({rendered}) AS {alias}"), Vec::new()))
            }
        }
    }
}

// =============================================================================
// JOIN
// =============================================================================

pub fn render_joins(joins: &[Join], dialect: Dialect, prepared: bool) -> Result<(String, Vec<Value>)> {
    let strategy = dialect.strategy();
    let mut sql = String::new();
    let mut bindings = Vec::new();

    // PostgreSQL/SQLite suppress joins entirely for DELETE/UPDATE; callers
    // only invoke `render_joins` for SELECT or for MySQL-family mutations,
    // so no suppression check happens here — the statement compiler decides
    // whether to call this function at all.
    for join in joins {
        if strategy.should_skip_join_kind(join.kind) {
            continue;
        }
        sql.push(' ');
        sql.push_str(join.kind.as_sql());
        sql.push(' ');
        match &join.container {
            JoinContainer::Table(name) => {
                sql.push_str(&table_ref(dialect, name, join.alias.as_deref()));
            }
            JoinContainer::Subquery(sub) => {
                if prepared {
                    let p = sub.compile_prepared(dialect)?;
                    sql.push('(');
                    sql.push_str(&p.sql);
                    sql.push(')');
                    bindings.extend(p.bindings);
                } else {
                    sql.push('(');
                    sql.push_str(&sub.compile_raw(dialect)?);
                    sql.push(')');
                }
                if let Some(alias) = &join.alias {
                    sql.push_str(" AS ");
                    sql.push_str(alias);
                }
            }
        }
        if let Some(constraint) = &join.constraint {
            sql.push_str(" ON ");
            sql.push_str(constraint);
        }
    }
    Ok((sql, bindings))
}

// =============================================================================
// WHERE / HAVING (condition list rendering, shared)
// =============================================================================

/// Walks a condition fragment list in insertion order, rewriting JSON
/// sentinels, consuming exactly as many entries from `bindings` as each
/// `Text` fragment's `?` count demands, and inlining any `Exists` fragment's
/// subquery.
pub fn render_condition_list(
    fragments: &[ConditionFragment],
    bindings: &[Value],
    dialect: Dialect,
    prepared: bool,
) -> Result<(String, Vec<Value>)> {
    let strategy = dialect.strategy();
    let mut sql = String::new();
    let mut binding_cursor = 0usize;
    let mut out_bindings = Vec::new();

    for fragment in fragments {
        match fragment {
            ConditionFragment::Text(text) => {
                let rewritten = json::rewrite(text, strategy);
                let needed = rewritten.matches('?').count();
                let available = bindings.len().saturating_sub(binding_cursor);
                if needed > available {
                    return Err(FluentSqlError::InvalidStructure(CompactString::from(
                        "fragment references more placeholders than bindings recorded",
                    )));
                }
                out_bindings.extend_from_slice(&bindings[binding_cursor..binding_cursor + needed]);
                binding_cursor += needed;
                sql.push_str(&rewritten);
            }
            ConditionFragment::Exists {
                prefix,
                negated,
                subquery,
                close_bracket,
            } => {
                sql.push_str(prefix);
                sql.push_str(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
                if prepared {
                    let p = subquery.compile_prepared(dialect)?;
                    sql.push_str(&p.sql);
                    out_bindings.extend(p.bindings);
                } else {
                    sql.push_str(&subquery.compile_raw(dialect)?);
                }
                sql.push(')');
                if let Some(cb) = close_bracket {
                    sql.push_str(cb);
                }
            }
        }
    }
    Ok((sql, out_bindings))
}

pub fn render_having_prefix(having_sql: &str) -> String {
    if having_sql.is_empty() {
        String::new()
    } else {
        format!(" HAVING {having_sql}")
    }
}

// =============================================================================
// GROUP BY / ORDER BY / LIMIT / OFFSET
// =============================================================================

pub fn render_group_by(columns: &[String]) -> String {
    if columns.is_empty() {
        String::new()
    } else {
        format!(" GROUP BY {}", columns.join(", "))
    }
}

pub fn render_order_by(entries: &[OrderByEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = entries
        .iter()
        .map(|e| format!("{} {}", e.column, e.direction.as_sql()))
        .collect();
    format!(" ORDER BY {}", rendered.join(", "))
}

fn render_order_by_bare(entries: &[OrderByEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}", e.column, e.direction.as_sql()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Emits ` LIMIT n` and, only when `offset` is `Some(n)` with `n > 0`,
/// ` OFFSET n` — offset is never emitted otherwise.
pub fn render_limit_offset(limit: Option<u64>, offset: Option<u64>) -> String {
    let mut out = String::new();
    if let Some(n) = limit {
        out.push_str(&format!(" LIMIT {n}"));
    }
    if let Some(n) = offset
        && n > 0
    {
        out.push_str(&format!(" OFFSET {n}"));
    }
    out
}

// =============================================================================
// UNION
// =============================================================================

pub fn render_unions(
    unions: &[(UnionKind, Arc<dyn Compilable>)],
    dialect: Dialect,
    prepared: bool,
) -> Result<(String, Vec<Value>)> {
    let mut sql = String::new();
    let mut bindings = Vec::new();
    for (kind, branch) in unions {
        sql.push(' ');
        sql.push_str(kind.as_sql());
        sql.push(' ');
        if prepared {
            let p = branch.compile_prepared(dialect)?;
            sql.push_str(&p.sql);
            bindings.extend(p.bindings);
        } else {
            sql.push_str(&branch.compile_raw(dialect)?);
        }
    }
    Ok((sql, bindings))
}

// =============================================================================
// CTE
// =============================================================================

pub fn render_ctes(ctes: &[Cte], dialect: Dialect, prepared: bool) -> Result<(String, Vec<Value>)> {
    if ctes.is_empty() {
        return Ok((String::new(), Vec::new()));
    }
    let recursive = ctes.iter().any(|c| c.recursive);
    let mut sql = String::from("WITH ");
    if recursive {
        sql.push_str("RECURSIVE ");
    }
    let mut bindings = Vec::new();
    let mut parts = Vec::with_capacity(ctes.len());
    for cte in ctes {
        if prepared {
            let p = cte.query.compile_prepared(dialect)?;
            bindings.extend(p.bindings);
            parts.push(format!("{} AS ({})", quote(dialect, &cte.name), p.sql));
        } else {
            let rendered = cte.query.compile_raw(dialect)?;
            parts.push(format!("{} AS ({rendered})", quote(dialect, &cte.name)));
        }
    }
    sql.push_str(&parts.join(", "));
    sql.push(' ');
    Ok((sql, bindings))
}

// =============================================================================
// WINDOW
// =============================================================================

fn render_window_spec(spec: &WindowSpec) -> String {
    let mut parts = Vec::new();
    if !spec.partitions.is_empty() {
        parts.push(format!("PARTITION BY {}", spec.partitions.join(", ")));
    }
    if !spec.orders.is_empty() {
        parts.push(format!("ORDER BY {}", render_order_by_bare(&spec.orders)));
    }
    if let Some((unit, start, end)) = &spec.frame {
        parts.push(format!("{} BETWEEN {start} AND {end}", unit.as_sql()));
    }
    parts.join(" ")
}

/// Renders inline window-function uses appended to the SELECT projection
/// (each `fn(args) OVER (...) AS alias`) and the trailing standalone
/// `WINDOW name AS (...)` clause for named windows.
pub fn render_window_items(items: &[WindowItem]) -> (String, String) {
    let mut projection_extra = String::new();
    for item in items {
        projection_extra.push_str(", ");
        match item {
            WindowItem::Inline { call, spec, alias } => {
                projection_extra.push_str(&format!(
                    "{call} OVER ({}) AS {alias}",
                    render_window_spec(spec)
                ));
            }
            WindowItem::Reference {
                call,
                window_name,
                alias,
            } => {
                projection_extra.push_str(&format!("{call} OVER {window_name} AS {alias}"));
            }
        }
    }
    (projection_extra, String::new())
}

pub fn render_named_windows(named: &[(String, WindowSpec)]) -> String {
    if named.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = named
        .iter()
        .map(|(name, spec)| format!("{name} AS ({})", render_window_spec(spec)))
        .collect();
    format!(" WINDOW {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Direction, FrameUnit};
    use crate::value::Prepared;

    struct FakeSub {
        sql: &'static str,
        bindings: Vec<Value>,
    }

    impl Compilable for FakeSub {
        fn compile_prepared(&self, dialect: Dialect) -> Result<Prepared> {
            Ok(Prepared {
                sql: self.sql.to_string(),
                bindings: self.bindings.clone(),
                dialect,
            })
        }
        fn compile_raw(&self, _dialect: Dialect) -> Result<String> {
            Ok(self.sql.to_string())
        }
    }

    #[test]
    fn select_clause_with_and_without_distinct() {
        assert_eq!(render_select_clause("id, name", false), "SELECT id, name");
        assert_eq!(render_select_clause("id", true), "SELECT DISTINCT id");
    }

    #[test]
    fn from_quotes_table_and_appends_alias() {
        let source = Source::Table {
            name: "users".into(),
            alias: Some("u".into()),
        };
        let (sql, bindings) = render_from(&source, Dialect::MySql, true).unwrap();
        assert_eq!(sql, " FROM `users` u");
        assert!(bindings.is_empty());
    }

    #[test]
    fn from_subquery_inlines_prepared_bindings() {
        let sub = Arc::new(FakeSub {
            sql: "SELECT id FROM a WHERE x = ?",
            bindings: vec![Value::Int(5)],
        });
        let source = Source::Subquery {
            query: sub,
            alias: "sub".into(),
        };
        let (sql, bindings) = render_from(&source, Dialect::MySql, true).unwrap();
        assert_eq!(sql, " FROM (SELECT id FROM a WHERE x = ?) AS sub");
        assert_eq!(bindings, vec![Value::Int(5)]);
    }

    #[test]
    fn group_by_order_by_and_limit_offset() {
        assert_eq!(render_group_by(&[]), "");
        assert_eq!(
            render_group_by(&["dept".to_string(), "role".to_string()]),
            " GROUP BY dept, role"
        );
        let orders = vec![
            OrderByEntry {
                column: "created_at".into(),
                direction: Direction::Desc,
            },
            OrderByEntry {
                column: "id".into(),
                direction: Direction::Asc,
            },
        ];
        assert_eq!(render_order_by(&orders), " ORDER BY created_at DESC, id ASC");
        assert_eq!(render_limit_offset(Some(10), Some(20)), " LIMIT 10 OFFSET 20");
        assert_eq!(render_limit_offset(Some(10), Some(0)), " LIMIT 10");
        assert_eq!(render_limit_offset(Some(10), None), " LIMIT 10");
        assert_eq!(render_limit_offset(None, None), "");
    }

    #[test]
    fn condition_list_consumes_bindings_in_order_around_exists() {
        let sub = Arc::new(FakeSub {
            sql: "SELECT 1 FROM orders WHERE orders.user_id = users.id",
            bindings: Vec::new(),
        });
        let fragments = vec![
            ConditionFragment::Text(" WHERE status = ?".to_string()),
            ConditionFragment::Exists {
                prefix: " AND ".to_string(),
                negated: false,
                subquery: sub,
                close_bracket: None,
            },
            ConditionFragment::Text(" AND age > ?".to_string()),
        ];
        let bindings = vec![Value::Text("active".into()), Value::Int(30)];
        let (sql, out_bindings) =
            render_condition_list(&fragments, &bindings, Dialect::MySql, true).unwrap();
        assert_eq!(
            sql,
            " WHERE status = ? AND EXISTS (SELECT 1 FROM orders WHERE orders.user_id = users.id) AND age > ?"
        );
        assert_eq!(out_bindings, vec![Value::Text("active".into()), Value::Int(30)]);
    }

    #[test]
    fn ctes_render_with_recursive_when_any_entry_is_recursive() {
        let base = Arc::new(FakeSub {
            sql: "SELECT 1",
            bindings: Vec::new(),
        });
        let ctes = vec![
            Cte {
                name: "plain".into(),
                query: base.clone(),
                recursive: false,
            },
            Cte {
                name: "tree".into(),
                query: base,
                recursive: true,
            },
        ];
        let (sql, bindings) = render_ctes(&ctes, Dialect::PostgreSql, true).unwrap();
        assert!(sql.starts_with("WITH RECURSIVE "));
        assert!(sql.contains("\"plain\" AS (SELECT 1)"));
        assert!(sql.contains("\"tree\" AS (SELECT 1)"));
        assert!(bindings.is_empty());
    }

    #[test]
    fn window_spec_renders_partition_order_and_frame() {
        let spec = WindowSpec {
            partitions: vec!["dept".to_string()],
            orders: vec![OrderByEntry {
                column: "salary".into(),
                direction: Direction::Desc,
            }],
            frame: Some((FrameUnit::Rows, "UNBOUNDED PRECEDING".into(), "CURRENT ROW".into())),
        };
        let rendered = render_window_spec(&spec);
        assert_eq!(
            rendered,
            "PARTITION BY dept ORDER BY salary DESC ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW"
        );
    }
}
