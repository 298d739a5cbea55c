//! Injection Validator (C4) — conservative, regex-based rejection of unsafe
//! literal substrings. Gatekeeper for every value that will be inlined in
//! non-prepared mode, and for every [`crate::value::Expression`] payload.

use crate::error::{FluentSqlError, Result};
use compact_str::CompactString;
use regex::Regex;
use std::sync::LazyLock;

/// One rejection rule: a compiled pattern plus the reason surfaced in the
/// error message when it matches.
struct Rule {
    pattern: Regex,
    reason: &'static str,
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule {
            pattern: Regex::new(r"(?i)--\s").unwrap(),
            reason: "line comment",
        },
        Rule {
            pattern: Regex::new(r"(?is)/\*.*?\*/").unwrap(),
            reason: "block comment",
        },
        Rule {
            pattern: Regex::new(r"#.").unwrap(),
            reason: "hash comment",
        },
        Rule {
            pattern: Regex::new(r"(?i)\bLOAD_FILE\b").unwrap(),
            reason: "file read function",
        },
        Rule {
            pattern: Regex::new(r"(?i)\bINTO\s+OUTFILE\b").unwrap(),
            reason: "file write clause",
        },
        Rule {
            pattern: Regex::new(r"(?i)\bINTO\s+DUMPFILE\b").unwrap(),
            reason: "file write clause",
        },
        Rule {
            pattern: Regex::new(
                r"(?i);\s*(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|GRANT|REVOKE|TRUNCATE)\b",
            )
            .unwrap(),
            reason: "multiple statements",
        },
        Rule {
            pattern: Regex::new(
                r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|TRUNCATE|EXEC|EXECUTE|UNION)\b",
            )
            .unwrap(),
            reason: "dangerous keyword",
        },
        Rule {
            pattern: Regex::new(r"(?i)\b(GRANT|REVOKE)\b").unwrap(),
            reason: "permission statement",
        },
        Rule {
            pattern: Regex::new(r"(?i)\b(SLEEP|BENCHMARK|WAITFOR|PG_SLEEP)\b").unwrap(),
            reason: "time-based payload",
        },
        Rule {
            pattern: Regex::new(r"(?i)\b(INFORMATION_SCHEMA|MYSQL\.USER|PG_CATALOG|SYS\.)").unwrap(),
            reason: "schema access",
        },
        Rule {
            pattern: Regex::new(r"(?i)0x[0-9A-F]{2,}").unwrap(),
            reason: "hex literal",
        },
    ]
});

/// Rejects `text` if it matches any unsafe pattern. Conservative by design —
/// the rules err toward rejection.
pub fn validate(text: &str) -> Result<()> {
    for rule in RULES.iter() {
        if rule.pattern.is_match(text) {
            tracing::warn!(reason = rule.reason, text = %text, "fluentsql.injection_rejected");
            return Err(FluentSqlError::UnsafeValue(CompactString::from(format!(
                "rejected ({}): {text}",
                rule.reason
            ))));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_known_payloads() {
        assert!(validate("admin'-- ").is_err());
        assert!(validate("1; DROP TABLE users").is_err());
        assert!(validate("LOAD_FILE('/etc/passwd')").is_err());
        assert!(validate("0x48656c6c6f").is_err());
        assert!(validate("1 UNION SELECT password FROM users").is_err());
        assert!(validate("SLEEP(5)").is_err());
        assert!(validate("' OR 1=1 -- ").is_err());
    }

    #[test]
    fn accepts_benign_values() {
        assert!(validate("O'Reilly").is_ok());
        assert!(validate("Café München").is_ok());
        assert!(validate("50% discount").is_ok());
        assert!(validate("active").is_ok());
        assert!(validate("user@example.com").is_ok());
    }
}
