//! Dialect identification and the per-dialect rendering strategy.

use crate::error::{FluentSqlError, Result};
use crate::join::JoinKind;
use compact_str::CompactString;
use std::fmt;

/// SQL dialect family. MariaDB is a recognized input string but is always
/// rendered identically to MySQL — there is no `Dialect::MariaDb` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    PostgreSql,
    Sqlite,
}

impl Dialect {
    /// Parses a dialect name, case-insensitively. `mariadb` maps to
    /// [`Dialect::MySql`] since MariaDB is rendered identically to MySQL.
    pub fn parse(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("mysql") || name.eq_ignore_ascii_case("mariadb") {
            Ok(Dialect::MySql)
        } else if name.eq_ignore_ascii_case("postgres") || name.eq_ignore_ascii_case("postgresql")
        {
            Ok(Dialect::PostgreSql)
        } else if name.eq_ignore_ascii_case("sqlite") {
            Ok(Dialect::Sqlite)
        } else {
            Err(FluentSqlError::InvalidConfig(CompactString::from(format!(
                "unknown dialect: {name}"
            ))))
        }
    }

    /// The default recognized version string for this dialect.
    pub const fn default_version(&self) -> &'static str {
        match self {
            Dialect::MySql => "8.0",
            Dialect::PostgreSql => "16",
            Dialect::Sqlite => "3.45",
        }
    }

    /// The closed set of versions this crate recognizes for the purpose of
    /// registry override resolution. Unknown versions are accepted silently
    /// by the public API — this list only gates whether a version-qualified
    /// override can exist, not whether compilation fails.
    pub const fn known_versions(&self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &["5.7", "8.0", "8.4"],
            Dialect::PostgreSql => &["13", "14", "15", "16"],
            Dialect::Sqlite => &["3.35", "3.45"],
        }
    }

    /// Returns the stateless rendering strategy for this dialect.
    pub fn strategy(&self) -> &'static dyn DialectStrategy {
        match self {
            Dialect::MySql => &MySqlStrategy,
            Dialect::PostgreSql => &PostgresStrategy,
            Dialect::Sqlite => &SqliteStrategy,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgres",
            Dialect::Sqlite => "sqlite",
        };
        f.write_str(s)
    }
}

/// Per-dialect rendering policy: identifier quoting, boolean literal shape,
/// JSON function translation, and clause suppression for UPDATE/DELETE.
///
/// Implementations are zero-sized and `'static`; callers obtain one via
/// [`Dialect::strategy`] rather than constructing it directly.
pub trait DialectStrategy: Send + Sync {
    /// Quotes a raw identifier, doubling any embedded quote characters.
    /// Idempotent: quoting an already-escaped identifier re-escapes rather
    /// than replacing the escape.
    fn quote_identifier(&self, raw: &str) -> String;

    /// Renders a boolean literal for the given SQL clause context.
    fn format_boolean(&self, value: bool) -> &'static str;

    /// Whether a join of this kind is unsupported and must be silently
    /// omitted for this dialect.
    fn should_skip_join_kind(&self, kind: JoinKind) -> bool;

    /// `col->'k1'->>'k2'` / `JSON_EXTRACT(col, 'path')` / `json_extract(col, 'path')`.
    fn json_extract(&self, column: &str, path: &str) -> String;

    /// `JSON_CONTAINS(...)` / `col @> to_jsonb(?)` / `col LIKE '%' || ? || '%'`.
    /// `value_placeholder` is the already-rendered `?` (or literal, in raw
    /// mode) token for the bound value.
    fn json_contains(&self, column: &str, value_placeholder: &str, path: Option<&str>) -> String;

    /// Default: `NOT ( json_contains(...) )`. Dialects may override with a
    /// more idiomatic negation.
    fn json_not_contains(
        &self,
        column: &str,
        value_placeholder: &str,
        path: Option<&str>,
    ) -> String {
        format!(
            "NOT ({})",
            self.json_contains(column, value_placeholder, path)
        )
    }

    /// `JSON_LENGTH(col[, 'path'])` / `jsonb_array_length(...)` / `json_array_length(...)`.
    fn json_length(&self, column: &str, path: Option<&str>) -> String;

    /// Whether DELETE/UPDATE for this dialect render ORDER BY, LIMIT, and
    /// JOIN clauses at all — only MySQL-family dialects do.
    fn supports_order_limit_join_in_mutations(&self) -> bool;

    /// `true` for MySQL-family, where `UPDATE IGNORE` is valid syntax.
    fn supports_update_ignore(&self) -> bool {
        self.supports_order_limit_join_in_mutations()
    }
}

fn double_quote_escape(raw: &str, quote: char) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push(quote);
    for ch in raw.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

/// Strips a leading `$` or `$.` from a JSON path and returns the remaining
/// dot-separated segments. An empty/`$`-only path yields no segments.
fn json_path_segments(path: &str) -> Vec<&str> {
    let stripped = path.strip_prefix('$').unwrap_or(path);
    let stripped = stripped.strip_prefix('.').unwrap_or(stripped);
    if stripped.is_empty() {
        Vec::new()
    } else {
        stripped.split('.').collect()
    }
}

/// Ensures a path has a leading `$` segment, defaulting a bare key to `$.key`.
fn dollar_path(path: &str) -> String {
    if path.starts_with('$') {
        path.to_string()
    } else {
        format!("$.{path}")
    }
}

// =============================================================================
// MySQL / MariaDB
// =============================================================================

pub struct MySqlStrategy;

impl DialectStrategy for MySqlStrategy {
    fn quote_identifier(&self, raw: &str) -> String {
        double_quote_escape(raw, '`')
    }

    fn format_boolean(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn should_skip_join_kind(&self, kind: JoinKind) -> bool {
        matches!(kind, JoinKind::FullOuter)
    }

    fn json_extract(&self, column: &str, path: &str) -> String {
        let col = self.quote_identifier(column);
        format!("JSON_EXTRACT({col}, '{}')", dollar_path(path))
    }

    fn json_contains(&self, column: &str, value_placeholder: &str, path: Option<&str>) -> String {
        let col = self.quote_identifier(column);
        match path {
            Some(p) => format!(
                "JSON_CONTAINS({col}, CAST({value_placeholder} AS JSON), '{}')",
                dollar_path(p)
            ),
            None => format!("JSON_CONTAINS({col}, CAST({value_placeholder} AS JSON))"),
        }
    }

    fn json_length(&self, column: &str, path: Option<&str>) -> String {
        let col = self.quote_identifier(column);
        match path {
            Some(p) => format!("JSON_LENGTH({col}, '{}')", dollar_path(p)),
            None => format!("JSON_LENGTH({col})"),
        }
    }

    fn supports_order_limit_join_in_mutations(&self) -> bool {
        true
    }
}

// =============================================================================
// PostgreSQL
// =============================================================================

pub struct PostgresStrategy;

impl DialectStrategy for PostgresStrategy {
    fn quote_identifier(&self, raw: &str) -> String {
        double_quote_escape(raw, '"')
    }

    fn format_boolean(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn should_skip_join_kind(&self, _kind: JoinKind) -> bool {
        // PostgreSQL supports every join kind in SELECT; the wholesale
        // suppression for DELETE/UPDATE is handled by
        // `supports_order_limit_join_in_mutations`, not per-kind here.
        false
    }

    fn json_extract(&self, column: &str, path: &str) -> String {
        let segments = json_path_segments(path);
        let Some((last, init)) = segments.split_last() else {
            return format!("\"{column}\"");
        };
        let mut expr = format!("\"{column}\"");
        for seg in init {
            expr.push_str(&format!("->'{seg}'"));
        }
        expr.push_str(&format!("->>'{last}'"));
        expr
    }

    fn json_contains(&self, column: &str, value_placeholder: &str, path: Option<&str>) -> String {
        let base = json_path_access(column, path);
        format!("{base} @> to_jsonb({value_placeholder})")
    }

    fn json_length(&self, column: &str, path: Option<&str>) -> String {
        let base = json_path_access(column, path);
        format!("jsonb_array_length({base})")
    }

    fn supports_order_limit_join_in_mutations(&self) -> bool {
        false
    }
}

/// `"col"` or `"col"->'a'->'b'` — the path-navigation prefix shared by
/// `json_contains`/`json_length` (which do not take the final `->>` text
/// extraction step that `json_extract` does).
fn json_path_access(column: &str, path: Option<&str>) -> String {
    let mut expr = format!("\"{column}\"");
    if let Some(p) = path {
        for seg in json_path_segments(p) {
            expr.push_str(&format!("->'{seg}'"));
        }
    }
    expr
}

// =============================================================================
// SQLite
// =============================================================================

pub struct SqliteStrategy;

impl DialectStrategy for SqliteStrategy {
    fn quote_identifier(&self, raw: &str) -> String {
        double_quote_escape(raw, '`')
    }

    fn format_boolean(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn should_skip_join_kind(&self, kind: JoinKind) -> bool {
        matches!(kind, JoinKind::FullOuter | JoinKind::Right)
    }

    fn json_extract(&self, column: &str, path: &str) -> String {
        let col = self.quote_identifier(column);
        format!("json_extract({col}, '{}')", dollar_path(path))
    }

    fn json_contains(&self, column: &str, value_placeholder: &str, path: Option<&str>) -> String {
        let col = self.quote_identifier(column);
        match path {
            Some(p) => format!(
                "json_extract({col}, '{}') LIKE '%' || {value_placeholder} || '%'",
                dollar_path(p)
            ),
            None => format!("{col} LIKE '%' || {value_placeholder} || '%'"),
        }
    }

    fn json_length(&self, column: &str, path: Option<&str>) -> String {
        let col = self.quote_identifier(column);
        match path {
            Some(p) => format!("json_array_length({col}, '{}')", dollar_path(p)),
            None => format!("json_array_length({col})"),
        }
    }

    fn supports_order_limit_join_in_mutations(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_folds_mariadb() {
        assert_eq!(Dialect::parse("MySQL").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::parse("mariadb").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::parse("MariaDB").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::parse("postgres").unwrap(), Dialect::PostgreSql);
        assert_eq!(Dialect::parse("PostgreSQL").unwrap(), Dialect::PostgreSql);
        assert_eq!(Dialect::parse("sqlite").unwrap(), Dialect::Sqlite);
        assert!(Dialect::parse("oracle").is_err());
    }

    #[test]
    fn identifier_quoting_is_idempotent_on_embedded_quote() {
        let mysql = Dialect::MySql.strategy();
        assert_eq!(mysql.quote_identifier("order"), "`order`");
        assert_eq!(mysql.quote_identifier("weird`col"), "`weird``col`");

        let pg = Dialect::PostgreSql.strategy();
        assert_eq!(pg.quote_identifier("weird\"col"), "\"weird\"\"col\"");
    }

    #[test]
    fn join_suppression_matches_table() {
        let mysql = Dialect::MySql.strategy();
        assert!(mysql.should_skip_join_kind(JoinKind::FullOuter));
        assert!(!mysql.should_skip_join_kind(JoinKind::Left));

        let sqlite = Dialect::Sqlite.strategy();
        assert!(sqlite.should_skip_join_kind(JoinKind::FullOuter));
        assert!(sqlite.should_skip_join_kind(JoinKind::Right));
        assert!(!sqlite.should_skip_join_kind(JoinKind::Left));
    }

    #[test]
    fn postgres_json_extract_strips_dollar_and_chains() {
        let pg = Dialect::PostgreSql.strategy();
        assert_eq!(
            pg.json_extract("metadata", "$.user.name"),
            r#""metadata"->'user'->>'name'"#
        );
    }

    #[test]
    fn mysql_json_extract_keeps_dollar() {
        let mysql = Dialect::MySql.strategy();
        assert_eq!(
            mysql.json_extract("metadata", "$.user.name"),
            "JSON_EXTRACT(`metadata`, '$.user.name')"
        );
    }

    #[test]
    fn sqlite_json_contains_without_path() {
        let sqlite = Dialect::Sqlite.strategy();
        assert_eq!(
            sqlite.json_contains("preferences", "?", None),
            "`preferences` LIKE '%' || ? || '%'"
        );
    }
}
