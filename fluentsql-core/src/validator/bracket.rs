//! Bracket Validator (C5) — cross-fragment paren balance check.

use crate::collector::ConditionFragment;
use crate::error::{FluentSqlError, Result};
use compact_str::CompactString;

/// Sums `(`/`)` across all WHERE and HAVING fragments. For `Text` fragments
/// every paren counts; for `Exists` fragments only `close_bracket` counts —
/// the subquery's own parens are self-balanced and excluded. Fails with
/// [`FluentSqlError::InvalidStructure`] unless the running difference
/// returns to exactly zero.
pub fn validate(where_conditions: &[ConditionFragment], having_conditions: &[ConditionFragment]) -> Result<()> {
    let mut balance: i64 = 0;
    for fragment in where_conditions.iter().chain(having_conditions.iter()) {
        match fragment {
            ConditionFragment::Text(text) => {
                for ch in text.chars() {
                    match ch {
                        '(' => balance += 1,
                        ')' => balance -= 1,
                        _ => {}
                    }
                }
            }
            ConditionFragment::Exists { close_bracket, .. } => {
                if let Some(closing) = close_bracket {
                    for ch in closing.chars() {
                        match ch {
                            '(' => balance += 1,
                            ')' => balance -= 1,
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    if balance != 0 {
        return Err(FluentSqlError::InvalidStructure(CompactString::from(
            format!("unbalanced parentheses across WHERE/HAVING (net {balance})"),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_chain_succeeds() {
        let frags = vec![
            ConditionFragment::Text(" WHERE (status = ?".into()),
            ConditionFragment::Text(" AND age > ?)".into()),
        ];
        assert!(validate(&frags, &[]).is_ok());
    }

    #[test]
    fn unbalanced_chain_fails() {
        let frags = vec![ConditionFragment::Text(" WHERE (status = ?".into())];
        assert!(validate(&frags, &[]).is_err());
    }

    #[test]
    fn having_counts_independently_but_sums_with_where() {
        let where_frags = vec![ConditionFragment::Text(" WHERE (a = ?)".into())];
        let having_frags = vec![ConditionFragment::Text("(COUNT(*) > ?".into())];
        assert!(validate(&where_frags, &having_frags).is_err());
    }
}
