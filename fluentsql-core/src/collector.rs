//! Binding Collector (C1) — the append-only ordered vector of bound values
//! and the ordered list of accumulated condition fragments.

use crate::value::{Compilable, Value};
use smallvec::SmallVec;
use std::sync::Arc;

/// One element of a WHERE/HAVING condition list: either composed SQL text
/// (possibly carrying `?`s and JSON sentinels), or a structured EXISTS/NOT
/// EXISTS record.
#[derive(Clone)]
pub enum ConditionFragment {
    Text(String),
    Exists {
        /// The `" WHERE "` / `" AND "` / `" OR "` (or empty, for the first
        /// HAVING fragment) prefix this EXISTS condition was initialized
        /// with — the same prefix rule `.where_`/`.and`/`.or` apply to any
        /// other condition.
        prefix: String,
        negated: bool,
        subquery: Arc<dyn Compilable>,
        /// Brackets closing the caller's own grouping, e.g. the `)` in
        /// `.where_("(").exists(sub, ")")`. The subquery's own parens are
        /// self-balanced and are not counted here.
        close_bracket: Option<String>,
    },
}

impl ConditionFragment {
    /// Counts the bindings the fragment itself consumes: literal `?`s, plus
    /// one per `JSON_CONTAINS`/`JSON_NOT_CONTAINS` sentinel (each holds a
    /// bound value but doesn't carry its own `?` until the JSON rewrite pass
    /// runs). An `Exists` fragment carries none of its own — its subquery
    /// renders (and binds) independently.
    fn placeholder_count(&self) -> usize {
        match self {
            ConditionFragment::Text(s) => {
                s.matches('?').count()
                    + s.matches("{{JSON_CONTAINS::").count()
                    + s.matches("{{JSON_NOT_CONTAINS::").count()
            }
            ConditionFragment::Exists { .. } => 0,
        }
    }
}

/// Append-only store of fragments and bindings for one statement builder.
/// A statement owns exactly one collector for its lifetime.
///
/// WHERE and HAVING each keep their own binding vector, separate from the
/// fragment list, so that the clause renderer can walk fragments in
/// insertion order and pull exactly as many bindings as each fragment's `?`
/// count demands — this is what lets an `EXISTS` fragment (which commits no
/// binding of its own) sit between two bound comparisons without disturbing
/// alignment.
#[derive(Clone, Default)]
pub struct BindingCollector {
    pub where_conditions: SmallVec<[ConditionFragment; 4]>,
    pub having_conditions: SmallVec<[ConditionFragment; 4]>,
    pub where_bindings: SmallVec<[Value; 4]>,
    pub having_bindings: SmallVec<[Value; 4]>,
    /// Monotonically increasing counter used to mint unique JSON sentinel
    /// parameter names — these names are structural bookkeeping, not
    /// positional placeholders.
    json_param_seq: u32,
}

impl BindingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_json_param_name(&mut self) -> String {
        self.json_param_seq += 1;
        format!("json_param_{}", self.json_param_seq)
    }

    /// Appends one fragment and the bindings its own `?`s consumed. Debug
    /// builds assert the fragment's placeholder count matches the bindings
    /// handed in, since a mismatch here would silently desync every
    /// placeholder after it once the clause renderer walks the list.
    pub fn push_where(&mut self, fragment: ConditionFragment, bindings: Vec<Value>) {
        debug_assert_eq!(fragment.placeholder_count(), bindings.len());
        self.where_conditions.push(fragment);
        self.where_bindings.extend(bindings);
    }

    pub fn push_having(&mut self, fragment: ConditionFragment, bindings: Vec<Value>) {
        debug_assert_eq!(fragment.placeholder_count(), bindings.len());
        self.having_conditions.push(fragment);
        self.having_bindings.extend(bindings);
    }

    pub fn has_where(&self) -> bool {
        !self.where_conditions.is_empty()
    }

    pub fn has_having(&self) -> bool {
        !self.having_conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_count_matches_literal_question_marks() {
        let frag = ConditionFragment::Text("status = ? AND age > ?".to_string());
        assert_eq!(frag.placeholder_count(), 2);
    }

    #[test]
    fn placeholder_count_credits_json_contains_sentinels() {
        let frag = ConditionFragment::Text("metadata{{JSON_CONTAINS::json_param_1}}".to_string());
        assert_eq!(frag.placeholder_count(), 1);

        let frag = ConditionFragment::Text(
            "metadata{{JSON_NOT_CONTAINS::json_param_1::$.tags}}".to_string(),
        );
        assert_eq!(frag.placeholder_count(), 1);
    }

    #[test]
    fn placeholder_count_ignores_extract_and_length_sentinels() {
        let frag = ConditionFragment::Text("metadata{{JSON_EXTRACT::$.name}} = ?".to_string());
        assert_eq!(frag.placeholder_count(), 1);
    }

    #[test]
    fn exists_fragment_carries_no_placeholders_of_its_own() {
        struct NoopSub;
        impl Compilable for NoopSub {
            fn compile_prepared(&self, dialect: crate::dialect::Dialect) -> crate::error::Result<crate::value::Prepared> {
                Ok(crate::value::Prepared {
                    sql: "SELECT 1".to_string(),
                    bindings: Vec::new(),
                    dialect,
                })
            }
            fn compile_raw(&self, _dialect: crate::dialect::Dialect) -> crate::error::Result<String> {
                Ok("SELECT 1".to_string())
            }
        }
        let frag = ConditionFragment::Exists {
            prefix: " AND ".to_string(),
            negated: false,
            subquery: Arc::new(NoopSub),
            close_bracket: None,
        };
        assert_eq!(frag.placeholder_count(), 0);
    }

    #[test]
    fn push_where_accepts_matching_binding_count() {
        let mut collector = BindingCollector::new();
        collector.push_where(
            ConditionFragment::Text("status = ?".to_string()),
            vec![Value::Text("active".into())],
        );
        assert_eq!(collector.where_bindings.len(), 1);
    }

    #[test]
    #[should_panic]
    fn push_where_panics_on_mismatched_binding_count_in_debug() {
        let mut collector = BindingCollector::new();
        collector.push_where(ConditionFragment::Text("status = ?".to_string()), Vec::new());
    }
}
