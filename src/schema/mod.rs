pub mod catalog;
pub mod inspect;

pub use catalog::{COLLECTIONS, CollectionSpec, Direction, INDEXES, IndexSpec, PartialFilter};
pub use inspect::{IndexInfo, list_collections, list_indexes, snapshot};

use crate::error::{AppError, AppResult};
use inspect::normalize_predicate;
use sea_orm::ConnectionTrait;
use std::collections::HashMap;

/// Check the store against the declared shape of `revision`.
///
/// A missing collection or index is reported as such. An index that exists under the
/// declared name but with different keys, uniqueness or partial filter is an
/// [`AppError::IndexConflict`]: `CREATE INDEX IF NOT EXISTS` would have skipped it
/// silently, leaving the uniqueness guarantee broken.
pub async fn verify<C: ConnectionTrait>(db: &C, revision: usize) -> AppResult<()> {
    let existing = list_collections(db).await?;
    for collection in catalog::collections_at(revision) {
        if !existing.iter().any(|name| name == collection.name) {
            return Err(AppError::MissingCollection(collection.name.to_string()));
        }
    }

    let mut found: HashMap<&str, Vec<IndexInfo>> = HashMap::new();
    let mut checked = 0usize;
    for spec in catalog::indexes_at(revision) {
        if !found.contains_key(spec.collection) {
            let indexes = list_indexes(db, spec.collection).await?;
            found.insert(spec.collection, indexes);
        }
        let name = spec.name();
        let actual = found[spec.collection]
            .iter()
            .find(|info| info.name == name)
            .ok_or_else(|| AppError::MissingIndex {
                collection: spec.collection.to_string(),
                name: name.clone(),
            })?;

        if let Some(detail) = mismatch(spec, actual) {
            log::error!("Index {name} on {} conflicts: {detail}", spec.collection);
            return Err(AppError::IndexConflict {
                collection: spec.collection.to_string(),
                name,
                detail,
            });
        }
        checked += 1;
    }

    log::info!("Schema revision {revision} verified ({checked} indexes)");
    Ok(())
}

/// Describes how an existing index differs from its declaration.
pub fn mismatch(spec: &IndexSpec, actual: &IndexInfo) -> Option<String> {
    let declared_keys: Vec<(String, Direction)> = spec
        .keys
        .iter()
        .map(|(field, direction)| (field.to_string(), *direction))
        .collect();
    if actual.keys != declared_keys {
        return Some(format!(
            "keys {:?}, declared {:?}",
            actual.keys, declared_keys
        ));
    }
    if actual.unique != spec.unique {
        return Some(format!(
            "unique = {}, declared unique = {}",
            actual.unique, spec.unique
        ));
    }
    let declared_predicate = spec.partial.map(|p| normalize_predicate(&p.predicate()));
    if actual.normalized_predicate() != declared_predicate {
        return Some(format!(
            "partial filter {:?}, declared {:?}",
            actual.predicate,
            spec.partial.map(|p| p.predicate())
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_conversation_index() -> &'static IndexSpec {
        INDEXES
            .iter()
            .find(|i| i.partial.is_some())
            .expect("partial index declared")
    }

    fn info(keys: &[(&str, Direction)], unique: bool, predicate: Option<&str>) -> IndexInfo {
        IndexInfo {
            name: "idx".to_string(),
            keys: keys.iter().map(|(f, d)| (f.to_string(), *d)).collect(),
            unique,
            predicate: predicate.map(str::to_string),
        }
    }

    #[test]
    fn test_matching_index_has_no_mismatch() {
        let actual = info(
            &[("user_id", Direction::Asc), ("status", Direction::Asc)],
            true,
            Some("((status)::text = 'active'::text)"),
        );
        assert_eq!(mismatch(active_conversation_index(), &actual), None);
    }

    #[test]
    fn test_missing_partial_filter_is_a_conflict() {
        let actual = info(
            &[("user_id", Direction::Asc), ("status", Direction::Asc)],
            true,
            None,
        );
        let detail = mismatch(active_conversation_index(), &actual).unwrap();
        assert!(detail.contains("partial filter"));
    }

    #[test]
    fn test_non_unique_or_reordered_index_is_a_conflict() {
        let spec = active_conversation_index();
        let not_unique = info(
            &[("user_id", Direction::Asc), ("status", Direction::Asc)],
            false,
            Some("status = 'active'"),
        );
        assert!(mismatch(spec, &not_unique).unwrap().contains("unique"));

        let reordered = info(
            &[("status", Direction::Asc), ("user_id", Direction::Asc)],
            true,
            Some("status = 'active'"),
        );
        assert!(mismatch(spec, &reordered).unwrap().contains("keys"));
    }
}
