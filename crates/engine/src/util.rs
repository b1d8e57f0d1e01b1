//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidInput(format!("invalid {label} id")))
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn ensure_non_negative(amount: MoneyCents) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidInput("amount must be >= 0".to_string()));
    }
    Ok(())
}

/// Reject a stale `expected_revision` before touching the row.
pub(crate) fn ensure_revision(
    label: &str,
    stored: i64,
    expected: Option<i64>,
) -> ResultEngine<()> {
    match expected {
        Some(expected) if expected != stored => Err(EngineError::Conflict(format!(
            "{label} was modified concurrently (expected revision {expected}, found {stored})"
        ))),
        _ => Ok(()),
    }
}

/// Collapse a bulk id list into distinct storage keys.
pub(crate) fn distinct_ids(ids: &[Uuid]) -> ResultEngine<Vec<String>> {
    if ids.is_empty() {
        return Err(EngineError::InvalidInput("no ids provided".to_string()));
    }
    Ok(ids
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(Uuid::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(
            normalize_required_text("  Fuel ", "description"),
            Ok("Fuel".to_string())
        );
        assert_eq!(
            normalize_required_text("   ", "category"),
            Err(EngineError::InvalidInput(
                "category must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn stale_revision_is_a_conflict() {
        assert!(ensure_revision("income", 3, None).is_ok());
        assert!(ensure_revision("income", 3, Some(3)).is_ok());
        assert!(matches!(
            ensure_revision("income", 3, Some(2)),
            Err(EngineError::Conflict(_))
        ));
    }

    #[test]
    fn distinct_ids_rejects_empty_and_dedups() {
        assert_eq!(
            distinct_ids(&[]),
            Err(EngineError::InvalidInput("no ids provided".to_string()))
        );
        let id = Uuid::new_v4();
        assert_eq!(distinct_ids(&[id, id]).unwrap(), vec![id.to_string()]);
    }
}
