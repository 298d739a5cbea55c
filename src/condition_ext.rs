//! Shared condition-chaining continuation used by every statement builder's
//! `.where_`/`.and`/`.or`/`.having` (+ JSON variants) methods.
//!
//! Each initializer returns a [`Condition`] borrowing the owning builder; it
//! exposes only comparison-operator methods, and calling exactly one of them
//! commits the fragment and hands the `&mut` borrow back to the caller so
//! the fluent chain can continue. The condition builder is modeled as a
//! consuming state machine: `.where_` returns a typed continuation that
//! exposes only the operator methods, so a half-built condition can never
//! be left dangling.

use fluentsql_core::prelude::*;
use std::sync::Arc;

/// Implemented by every statement builder that owns a [`BindingCollector`].
pub trait HasCollector {
    fn collector_mut(&mut self) -> &mut BindingCollector;
}

/// A single in-flight condition, borrowing its owning builder for the
/// duration of exactly one operator call. `close_bracket`, when set via
/// [`Condition::closing`], is appended after whichever operator method
/// finally commits the fragment.
pub struct Condition<'a, B> {
    builder: &'a mut B,
    inner: ConditionInit,
    close_bracket: Option<String>,
}

impl<'a, B: HasCollector> Condition<'a, B> {
    pub(crate) fn new(builder: &'a mut B, inner: ConditionInit) -> Self {
        Condition {
            builder,
            inner,
            close_bracket: None,
        }
    }

    fn split(self) -> (&'a mut B, ConditionInit, Option<String>) {
        (self.builder, self.inner, self.close_bracket)
    }

    /// Marks a closing bracket to append once this condition commits, for
    /// grouped conditions opened via `.where_bracket`/`.and_bracket`/
    /// `.or_bracket`.
    pub fn closing(mut self, bracket: impl Into<String>) -> Self {
        self.close_bracket = Some(bracket.into());
        self
    }

    /// `column = value`.
    pub fn equals(self, value: impl Into<Operand>) -> &'a mut B {
        self.binary("=", value)
    }

    /// `column <> value`.
    pub fn not_equals(self, value: impl Into<Operand>) -> &'a mut B {
        self.binary("<>", value)
    }

    pub fn greater(self, value: impl Into<Operand>) -> &'a mut B {
        self.binary(">", value)
    }

    pub fn greater_or_equal(self, value: impl Into<Operand>) -> &'a mut B {
        self.binary(">=", value)
    }

    pub fn less(self, value: impl Into<Operand>) -> &'a mut B {
        self.binary("<", value)
    }

    pub fn less_or_equal(self, value: impl Into<Operand>) -> &'a mut B {
        self.binary("<=", value)
    }

    pub fn like(self, pattern: impl Into<Operand>) -> &'a mut B {
        self.binary("LIKE", pattern)
    }

    pub fn not_like(self, pattern: impl Into<Operand>) -> &'a mut B {
        self.binary("NOT LIKE", pattern)
    }

    fn binary(self, operator: &str, value: impl Into<Operand>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        inner.commit_binary(builder.collector_mut(), operator, value.into(), close_bracket.as_deref());
        builder
    }

    pub fn is_null(self) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        inner.commit_unary(builder.collector_mut(), "IS NULL", close_bracket.as_deref());
        builder
    }

    pub fn is_not_null(self) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        inner.commit_unary(builder.collector_mut(), "IS NOT NULL", close_bracket.as_deref());
        builder
    }

    pub fn between(self, low: impl Into<Operand>, high: impl Into<Operand>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        inner.commit_between(builder.collector_mut(), false, low.into(), high.into(), close_bracket.as_deref());
        builder
    }

    pub fn not_between(self, low: impl Into<Operand>, high: impl Into<Operand>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        inner.commit_between(builder.collector_mut(), true, low.into(), high.into(), close_bracket.as_deref());
        builder
    }

    /// `IN (...)` over a scalar list.
    pub fn in_list<T: Into<Operand>>(self, values: Vec<T>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        let operands = values.into_iter().map(Into::into).collect();
        inner.commit_in(builder.collector_mut(), false, operands, close_bracket.as_deref());
        builder
    }

    pub fn not_in_list<T: Into<Operand>>(self, values: Vec<T>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        let operands = values.into_iter().map(Into::into).collect();
        inner.commit_in(builder.collector_mut(), true, operands, close_bracket.as_deref());
        builder
    }

    /// `IN (<subquery>)` — a single subquery operand.
    pub fn in_subquery(self, sub: Arc<dyn Compilable>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        inner.commit_in(builder.collector_mut(), false, vec![Operand::from(sub)], close_bracket.as_deref());
        builder
    }

    pub fn not_in_subquery(self, sub: Arc<dyn Compilable>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        inner.commit_in(builder.collector_mut(), true, vec![Operand::from(sub)], close_bracket.as_deref());
        builder
    }

    // ---- JSON chain ----

    /// `.extract(path)` — appends a JSON-extract sentinel and returns a new
    /// continuation so the caller can chain a comparison operator.
    pub fn extract(self, path: &str) -> Condition<'a, B> {
        let (builder, inner, close_bracket) = self.split();
        let sentinel = format!("{{{{JSON_EXTRACT::{path}}}}}");
        Condition {
            builder,
            inner: inner.append_json_sentinel(&sentinel),
            close_bracket,
        }
    }

    /// `.length(path?)` — appends a JSON-length sentinel; chain a comparison
    /// operator (typically `.greater`/`.equals`) afterward.
    pub fn length(self, path: Option<&str>) -> Condition<'a, B> {
        let (builder, inner, close_bracket) = self.split();
        let sentinel = match path {
            Some(p) => format!("{{{{JSON_LENGTH::{p}}}}}"),
            None => "{{JSON_LENGTH}}".to_string(),
        };
        Condition {
            builder,
            inner: inner.append_json_sentinel(&sentinel),
            close_bracket,
        }
    }

    pub fn contains(self, value: impl Into<Value>, path: Option<&str>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        let name = builder.collector_mut().next_json_param_name();
        inner.commit_json_contains(builder.collector_mut(), false, value.into(), path, &name, close_bracket.as_deref());
        builder
    }

    pub fn not_contains(self, value: impl Into<Value>, path: Option<&str>) -> &'a mut B {
        let (builder, inner, close_bracket) = self.split();
        let name = builder.collector_mut().next_json_param_name();
        inner.commit_json_contains(builder.collector_mut(), true, value.into(), path, &name, close_bracket.as_deref());
        builder
    }
}
