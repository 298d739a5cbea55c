//! Value Formatter & Placeholder Replacer (C6).

use crate::dialect::Dialect;
use crate::error::{FluentSqlError, Result};
use crate::validator::injection;
use crate::value::Value;
use compact_str::CompactString;

/// Formats one binding as a dialect-safe literal for non-prepared output.
/// Strings are injection-validated before escaping.
pub fn format_literal(value: &Value, dialect: Dialect) -> Result<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(dialect.strategy().format_boolean(*b).to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Text(s) => {
            injection::validate(s)?;
            Ok(format!("'{}'", escape_string(s)))
        }
        Value::Subquery(sub) => {
            let rendered = sub.compile_raw(dialect)?;
            Ok(format!("({rendered})"))
        }
    }
}

fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("''"),
            other => out.push(other),
        }
    }
    out
}

/// Replaces each `?` in `sql`, left to right, with the literal rendering of
/// the corresponding binding. Fails with [`FluentSqlError::BindingNotFound`]
/// if a `?` has no corresponding binding.
pub fn replace_all_raw(sql: &str, bindings: &[Value], dialect: Dialect) -> Result<String> {
    let mut out = String::with_capacity(sql.len() + bindings.len() * 4);
    let mut index = 0usize;
    for ch in sql.chars() {
        if ch == '?' {
            let value = bindings.get(index).ok_or(FluentSqlError::BindingNotFound(index))?;
            out.push_str(&format_literal(value, dialect)?);
            index += 1;
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}

/// Splices subquery-typed bindings into prepared SQL: each `?` whose
/// binding is [`Value::Subquery`] is replaced in-place by `(sub_sql)`, and
/// the subquery's own bindings are spliced into the output vector at that
/// position; every other binding passes through unchanged.
pub fn splice_subqueries_prepared(sql: &str, bindings: Vec<Value>, dialect: Dialect) -> Result<(String, Vec<Value>)> {
    let mut out_sql = String::with_capacity(sql.len());
    let mut out_bindings = Vec::with_capacity(bindings.len());
    let mut bindings = bindings.into_iter();
    let mut index = 0usize;

    for ch in sql.chars() {
        if ch == '?' {
            let value = bindings
                .next()
                .ok_or(FluentSqlError::BindingNotFound(index))?;
            match value {
                Value::Subquery(sub) => {
                    let prepared = sub.compile_prepared(dialect)?;
                    out_sql.push('(');
                    out_sql.push_str(&prepared.sql);
                    out_sql.push(')');
                    out_bindings.extend(prepared.bindings);
                }
                other => {
                    out_sql.push('?');
                    out_bindings.push(other);
                }
            }
            index += 1;
        } else {
            out_sql.push(ch);
        }
    }

    if bindings.next().is_some() {
        return Err(FluentSqlError::InvalidStructure(CompactString::from(
            "more bindings than placeholders",
        )));
    }

    Ok((out_sql, out_bindings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Compilable, Prepared};
    use std::sync::Arc;

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
    fn escapes_quotes_and_backslashes() {
        let v = Value::Text("O'Reilly\\path".into());
        assert_eq!(
            format_literal(&v, Dialect::MySql).unwrap(),
            "'O''Reilly\\\\path'"
        );
    }

    #[test]
    fn replace_all_raw_walks_left_to_right() {
        let sql = "status = ? AND age > ?";
        let bindings = vec![Value::Text("active".into()), Value::Int(27)];
        assert_eq!(
            replace_all_raw(sql, &bindings, Dialect::MySql).unwrap(),
            "status = 'active' AND age > 27"
        );
    }

    #[test]
    fn missing_binding_is_an_error() {
        let sql = "status = ?";
        assert!(replace_all_raw(sql, &[], Dialect::MySql).is_err());
    }

    #[test]
    fn splices_subquery_bindings_in_place() {
        let sub = Arc::new(FakeSub {
            sql: "SELECT id FROM a WHERE x = ?",
            bindings: vec![Value::Int(1)],
        });
        let sql = "id IN (?)";
        let bindings = vec![Value::Subquery(sub)];
        let (out_sql, out_bindings) =
            splice_subqueries_prepared(sql, bindings, Dialect::MySql).unwrap();
        assert_eq!(out_sql, "id IN ((SELECT id FROM a WHERE x = ?))");
        assert_eq!(out_bindings, vec![Value::Int(1)]);
    }
}
