//! Builder Registry (C11) — process-wide cache keyed by (builder type,
//! dialect, optional name) so repeated construction of an identical
//! query shape can reuse a previously built template.
//!
//! Grounded in the teacher's generated static caches
//! (`procmacros/src/*/schema.rs`) and its `std::sync::LazyLock<Mutex<_>>`
//! idiom for process-wide mutable state.

use crate::dialect::Dialect;
use compact_str::CompactString;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

type RegistryKey = (TypeId, Dialect, Option<CompactString>);

static REGISTRY: LazyLock<Mutex<HashMap<RegistryKey, Box<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Looks up a previously registered builder template of type `T` for
/// `(dialect, name)`, cloning it out if present.
pub fn get<T>(dialect: Dialect, name: Option<&str>) -> Option<T>
where
    T: Any + Clone + Send + Sync,
{
    let key = (TypeId::of::<T>(), dialect, name.map(CompactString::from));
    let guard = REGISTRY.lock().expect("registry mutex poisoned");
    guard.get(&key).and_then(|boxed| boxed.downcast_ref::<T>()).cloned()
}

/// Stores `value` under `(dialect, name)`, overwriting any prior entry.
pub fn put<T>(dialect: Dialect, name: Option<&str>, value: T)
where
    T: Any + Clone + Send + Sync,
{
    let key = (TypeId::of::<T>(), dialect, name.map(CompactString::from));
    let mut guard = REGISTRY.lock().expect("registry mutex poisoned");
    guard.insert(key, Box::new(value));
}

/// Removes every registered entry. Primarily for test isolation, since the
/// registry is process-wide and test binaries share it within one process.
pub fn clear() {
    let mut guard = REGISTRY.lock().expect("registry mutex poisoned");
    guard.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Template(String);

    #[test]
    fn put_then_get_round_trips_by_dialect_and_name() {
        clear();
        put(Dialect::MySql, Some("users_by_id"), Template("A".into()));
        put(Dialect::PostgreSql, Some("users_by_id"), Template("B".into()));

        assert_eq!(
            get::<Template>(Dialect::MySql, Some("users_by_id")),
            Some(Template("A".into()))
        );
        assert_eq!(
            get::<Template>(Dialect::PostgreSql, Some("users_by_id")),
            Some(Template("B".into()))
        );
        assert_eq!(get::<Template>(Dialect::Sqlite, Some("users_by_id")), None);
    }

    #[test]
    fn unnamed_entries_are_keyed_separately_from_named_ones() {
        clear();
        put(Dialect::MySql, None, Template("anon".into()));
        put(Dialect::MySql, Some("named"), Template("named".into()));
        assert_eq!(get::<Template>(Dialect::MySql, None), Some(Template("anon".into())));
        assert_eq!(
            get::<Template>(Dialect::MySql, Some("named")),
            Some(Template("named".into()))
        );
    }

    #[test]
    fn clear_empties_all_entries() {
        clear();
        put(Dialect::MySql, Some("x"), Template("x".into()));
        clear();
        assert_eq!(get::<Template>(Dialect::MySql, Some("x")), None);
    }
}
