//! Condition DSL scaffolding (C2) — the commit-one-fragment machinery
//! behind `.where_`/`.and`/`.or`/`.having` and their JSON variants. The
//! fluent method *names* live on `fluentsql`'s builders; this module is the
//! neutral continuation-typestate strategy behind them: each initializer
//! returns a value that only exposes operator methods, and calling one
//! commits exactly one fragment.

use crate::collector::{BindingCollector, ConditionFragment};
use crate::error::Result;
use crate::value::{Compilable, Expression, Value};
use std::sync::Arc;

/// Which condition list an in-flight fragment will commit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Where,
    Having,
}

/// A comparand passed to an operator method: either a bound value, a raw
/// [`Expression`] (inlined, not bound), or a subquery (bound as a `Value`,
/// later spliced by [`crate::format::splice_subqueries_prepared`]).
pub enum Operand {
    Value(Value),
    Expression(Expression),
    Subquery(Arc<dyn Compilable>),
}

impl<T: Into<Value>> From<T> for Operand {
    fn from(v: T) -> Self {
        Operand::Value(v.into())
    }
}

impl From<Expression> for Operand {
    fn from(e: Expression) -> Self {
        Operand::Expression(e)
    }
}

impl Operand {
    /// Renders this operand as SQL text, appending any binding it carries
    /// to `bindings`. A bare value or subquery yields exactly one `?`; an
    /// `Expression` yields its literal text and binds nothing.
    fn render(self, bindings: &mut Vec<Value>) -> String {
        match self {
            Operand::Value(v) => {
                bindings.push(v);
                "?".to_string()
            }
            Operand::Expression(e) => e.as_str().to_string(),
            Operand::Subquery(sub) => {
                bindings.push(Value::Subquery(sub));
                "?".to_string()
            }
        }
    }
}

/// A fragment being composed: the prefix text plus a column name (for plain
/// comparisons) or a JSON-sentinel-carrying column (for JSON conditions),
/// together with the bindings accumulated so far. Exactly one operator call
/// commits it.
pub struct ConditionInit {
    target: Target,
    prefix: String,
    column: String,
    bindings: Vec<Value>,
}

impl ConditionInit {
    /// Computes the `" WHERE "`/`" AND "` prefix for a `.where_`/`.and`
    /// initializer.
    pub fn where_prefix(collector: &BindingCollector, open_bracket: &str) -> String {
        if collector.has_where() {
            format!(" AND {open_bracket}")
        } else {
            format!(" WHERE {open_bracket}")
        }
    }

    /// Computes the `" WHERE "`/`" OR "` prefix for a `.or` initializer.
    pub fn or_prefix(collector: &BindingCollector, open_bracket: &str) -> String {
        if collector.has_where() {
            format!(" OR {open_bracket}")
        } else {
            format!(" WHERE {open_bracket}")
        }
    }

    /// Computes the `" AND "`/`" HAVING "` prefix for an `.and` call made
    /// while a HAVING clause is already active on a SELECT: it behaves like
    /// `.where_` once a HAVING condition exists, prefixing with ` AND `
    /// instead of starting a new ` HAVING `.
    pub fn and_having_prefix(collector: &BindingCollector, open_bracket: &str) -> String {
        if collector.has_having() {
            format!(" AND {open_bracket}")
        } else {
            format!(" HAVING {open_bracket}")
        }
    }

    pub fn or_having_prefix(collector: &BindingCollector, open_bracket: &str) -> String {
        if collector.has_having() {
            format!(" OR {open_bracket}")
        } else {
            format!(" HAVING {open_bracket}")
        }
    }

    /// The first HAVING fragment on a builder carries no `" HAVING "`
    /// prefix of its own — the SELECT clause builder prepends it exactly
    /// once, only if non-empty.
    pub fn having_prefix(open_bracket: &str) -> String {
        open_bracket.to_string()
    }

    pub fn new_where(prefix: String, column: impl Into<String>) -> Self {
        ConditionInit {
            target: Target::Where,
            prefix,
            column: column.into(),
            bindings: Vec::new(),
        }
    }

    pub fn new_having(prefix: String, column: impl Into<String>) -> Self {
        ConditionInit {
            target: Target::Having,
            prefix,
            column: column.into(),
            bindings: Vec::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Appends a binary comparison (`=`, `<>`, `>`, `>=`, `<`, `<=`, `LIKE`,
    /// ...) and commits the fragment.
    pub fn commit_binary(
        mut self,
        collector: &mut BindingCollector,
        operator: &str,
        operand: Operand,
        close_bracket: Option<&str>,
    ) {
        let rendered = operand.render(&mut self.bindings);
        let mut text = format!("{}{} {operator} {rendered}", self.prefix, self.column);
        if let Some(cb) = close_bracket {
            text.push_str(cb);
        }
        self.commit_text(collector, text);
    }

    /// Appends `IS NULL` / `IS NOT NULL` and commits.
    pub fn commit_unary(
        self,
        collector: &mut BindingCollector,
        keyword: &str,
        close_bracket: Option<&str>,
    ) {
        let mut text = format!("{}{} {keyword}", self.prefix, self.column);
        if let Some(cb) = close_bracket {
            text.push_str(cb);
        }
        self.commit_text(collector, text);
    }

    /// Appends `BETWEEN ? AND ?` and commits.
    pub fn commit_between(
        mut self,
        collector: &mut BindingCollector,
        negated: bool,
        low: Operand,
        high: Operand,
        close_bracket: Option<&str>,
    ) {
        let low_ph = low.render(&mut self.bindings);
        let high_ph = high.render(&mut self.bindings);
        let keyword = if negated { "NOT BETWEEN" } else { "BETWEEN" };
        let mut text = format!("{}{} {keyword} {low_ph} AND {high_ph}", self.prefix, self.column);
        if let Some(cb) = close_bracket {
            text.push_str(cb);
        }
        self.commit_text(collector, text);
    }

    /// Appends `IN (?, ?, ...)` / `NOT IN (...)` for a scalar list, or
    /// `IN (?)` for a single subquery operand.
    pub fn commit_in(
        mut self,
        collector: &mut BindingCollector,
        negated: bool,
        operands: Vec<Operand>,
        close_bracket: Option<&str>,
    ) {
        let keyword = if negated { "NOT IN" } else { "IN" };
        let rendered: Vec<String> = operands
            .into_iter()
            .map(|op| op.render(&mut self.bindings))
            .collect();
        let mut text = format!(
            "{}{} {keyword} ({})",
            self.prefix,
            self.column,
            rendered.join(", ")
        );
        if let Some(cb) = close_bracket {
            text.push_str(cb);
        }
        self.commit_text(collector, text);
    }

    /// Appends a raw JSON sentinel (`.extract`/`.length`) to the in-flight
    /// column text so the caller can chain a comparison afterward. Returns
    /// `self` to allow chaining.
    pub fn append_json_sentinel(mut self, sentinel: &str) -> Self {
        self.column.push_str(sentinel);
        self
    }

    /// `.contains`/`.notContains`: binds `value`, appends a sentinel
    /// carrying a generated (non-positional) parameter name and the
    /// structural path, then commits the fragment.
    pub fn commit_json_contains(
        mut self,
        collector: &mut BindingCollector,
        negated: bool,
        value: Value,
        path: Option<&str>,
        param_name: &str,
        close_bracket: Option<&str>,
    ) {
        self.bindings.push(value);
        let kind = if negated {
            "JSON_NOT_CONTAINS"
        } else {
            "JSON_CONTAINS"
        };
        let sentinel = match path {
            Some(p) => format!("{{{{{kind}::{param_name}::{p}}}}}"),
            None => format!("{{{{{kind}::{param_name}}}}}"),
        };
        let mut text = format!("{}{}{}", self.prefix, self.column, sentinel);
        if let Some(cb) = close_bracket {
            text.push_str(cb);
        }
        self.commit_text(collector, text);
    }

    fn commit_text(self, collector: &mut BindingCollector, text: String) {
        match self.target {
            Target::Where => collector.push_where(ConditionFragment::Text(text), self.bindings),
            Target::Having => collector.push_having(ConditionFragment::Text(text), self.bindings),
        }
    }
}

/// Commits a structured `EXISTS`/`NOT EXISTS` fragment directly (no
/// `ConditionInit` needed — it carries no comparison operator).
pub fn commit_exists(
    collector: &mut BindingCollector,
    target: Target,
    prefix: String,
    negated: bool,
    subquery: Arc<dyn Compilable>,
    close_bracket: Option<String>,
) {
    let fragment = ConditionFragment::Exists {
        prefix,
        negated,
        subquery,
        close_bracket,
    };
    match target {
        Target::Where => collector.push_where(fragment, Vec::new()),
        Target::Having => collector.push_having(fragment, Vec::new()),
    }
}

/// Validates a raw `Expression` payload at construction time (re-exported
/// here since the condition DSL is the most common place one is built from
/// a string literal).
pub fn expression(text: impl Into<String>) -> Result<Expression> {
    Expression::new(text)
}
