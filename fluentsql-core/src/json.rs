//! JSON Placeholder Processor (C8) — rewrites `{{...}}` sentinel tokens left
//! by the JSON condition DSL into dialect-specific expressions, once a
//! dialect is finally known at clause-building time.
//!
//! Sentinels, with the bare identifier immediately to their left taken as
//! the column:
//! - `{{JSON_EXTRACT::<path>}}`
//! - `{{JSON_CONTAINS::<valueName>[::<path>]}}`
//! - `{{JSON_NOT_CONTAINS::<valueName>[::<path>]}}`
//! - `{{JSON_LENGTH[::<path>]}}`
//!
//! `<valueName>` is a bookkeeping token from the generated-name counter; it
//! plays no role in the rewrite beyond having been present when the fragment
//! was composed, since the actual bound value sits at its ordinal `?`
//! position in the surrounding text already.

use crate::dialect::DialectStrategy;
use regex::Regex;
use std::sync::LazyLock;

static SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\{\{JSON_(EXTRACT|NOT_CONTAINS|CONTAINS|LENGTH)(?:::([^}]*))?\}\}")
        .unwrap()
});

/// Rewrites every JSON sentinel in `text` using `strategy`. Idempotent: text
/// with no sentinels is returned unchanged.
pub fn rewrite(text: &str, strategy: &dyn DialectStrategy) -> String {
    SENTINEL
        .replace_all(text, |caps: &regex::Captures| {
            let column = &caps[1];
            let kind = &caps[2];
            let payload = caps.get(3).map(|m| m.as_str());

            match kind {
                "EXTRACT" => {
                    let path = payload.unwrap_or("");
                    strategy.json_extract(column, path)
                }
                "CONTAINS" => {
                    let path = payload.and_then(split_value_and_path);
                    strategy.json_contains(column, "?", path)
                }
                "NOT_CONTAINS" => {
                    let path = payload.and_then(split_value_and_path);
                    strategy.json_not_contains(column, "?", path)
                }
                "LENGTH" => strategy.json_length(column, payload),
                _ => unreachable!("regex only matches known sentinel kinds"),
            }
        })
        .into_owned()
}

/// `<valueName>[::<path>]` -> the path half, if present.
fn split_value_and_path(payload: &str) -> Option<&str> {
    payload.split_once("::").map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    #[test]
    fn extract_rewrites_for_each_dialect() {
        let text = "metadata{{JSON_EXTRACT::$.user.name}} = ?";
        assert_eq!(
            rewrite(text, Dialect::PostgreSql.strategy()),
            r#""metadata"->'user'->>'name' = ?"#
        );
        assert_eq!(
            rewrite(text, Dialect::MySql.strategy()),
            "JSON_EXTRACT(`metadata`, '$.user.name') = ?"
        );
        assert_eq!(
            rewrite(text, Dialect::Sqlite.strategy()),
            "json_extract(`metadata`, '$.user.name') = ?"
        );
    }

    #[test]
    fn contains_without_path_rewrites() {
        let text = "preferences{{JSON_CONTAINS::json_param_1}}";
        assert_eq!(
            rewrite(text, Dialect::Sqlite.strategy()),
            "`preferences` LIKE '%' || ? || '%'"
        );
    }

    #[test]
    fn contains_with_path_rewrites() {
        let text = "metadata{{JSON_CONTAINS::json_param_1::$.tags}}";
        assert_eq!(
            rewrite(text, Dialect::MySql.strategy()),
            "JSON_CONTAINS(`metadata`, CAST(? AS JSON), '$.tags')"
        );
    }

    #[test]
    fn not_contains_defaults_to_negated_contains() {
        let text = "metadata{{JSON_NOT_CONTAINS::json_param_1}}";
        assert_eq!(
            rewrite(text, Dialect::Sqlite.strategy()),
            "NOT (`metadata` LIKE '%' || ? || '%')"
        );
    }

    #[test]
    fn length_with_and_without_path() {
        assert_eq!(
            rewrite("tags{{JSON_LENGTH}}", Dialect::PostgreSql.strategy()),
            "jsonb_array_length(\"tags\")"
        );
        assert_eq!(
            rewrite(
                "metadata{{JSON_LENGTH::$.tags}}",
                Dialect::PostgreSql.strategy()
            ),
            "jsonb_array_length(\"metadata\"->'tags')"
        );
    }
}
