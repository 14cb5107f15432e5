//! Declared collections and indexes for every schema revision.
//!
//! This is the contract the rest of the bot relies on. Migrations create the
//! structure; [`super::verify`] checks the store against this table.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

use Direction::{Asc, Desc};

/// One component of a key pattern, e.g. `("last_message_at", Desc)`
pub type KeyField = (&'static str, Direction);

/// Restricts an index to rows where `field = 'equals'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialFilter {
    pub field: &'static str,
    pub equals: &'static str,
}

impl PartialFilter {
    pub fn predicate(&self) -> String {
        format!("{} = '{}'", self.field, self.equals)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: &'static str,
    /// First revision that has this collection
    pub since: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub keys: &'static [KeyField],
    pub unique: bool,
    pub partial: Option<PartialFilter>,
    pub since: usize,
}

impl IndexSpec {
    /// Name implied by the key pattern: `idx_<collection>_<field>[_desc]...`
    pub fn name(&self) -> String {
        let mut name = format!("idx_{}", self.collection);
        for (field, direction) in self.keys {
            name.push('_');
            name.push_str(field);
            if *direction == Desc {
                name.push_str("_desc");
            }
        }
        name
    }
}

const fn index(collection: &'static str, keys: &'static [KeyField], since: usize) -> IndexSpec {
    IndexSpec {
        collection,
        keys,
        unique: false,
        partial: None,
        since,
    }
}

const fn unique(collection: &'static str, keys: &'static [KeyField], since: usize) -> IndexSpec {
    IndexSpec {
        collection,
        keys,
        unique: true,
        partial: None,
        since,
    }
}

pub const COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec { name: "users", since: 1 },
    CollectionSpec { name: "cards", since: 1 },
    CollectionSpec { name: "transactions", since: 1 },
    CollectionSpec { name: "blacklist", since: 1 },
    CollectionSpec { name: "countries", since: 2 },
    CollectionSpec { name: "orders", since: 3 },
    CollectionSpec { name: "notifications", since: 3 },
    CollectionSpec { name: "black_websites", since: 4 },
    CollectionSpec { name: "support_conversations", since: 5 },
    CollectionSpec { name: "support_stats", since: 5 },
];

pub const INDEXES: &[IndexSpec] = &[
    unique("users", &[("user_id", Asc)], 1),
    index("users", &[("username", Asc)], 1),
    unique("cards", &[("card_id", Asc)], 1),
    index("transactions", &[("user_id", Asc)], 1),
    index("transactions", &[("timestamp", Asc)], 1),
    unique("blacklist", &[("user_id", Asc)], 1),
    unique("countries", &[("code", Asc)], 2),
    index("cards", &[("country_code", Asc)], 2),
    index("cards", &[("is_available", Asc)], 2),
    index("orders", &[("user_id", Asc)], 3),
    index("orders", &[("status", Asc)], 3),
    index("orders", &[("created_at", Asc)], 3),
    unique("notifications", &[("notification_id", Asc)], 3),
    index("notifications", &[("status", Asc)], 3),
    index("notifications", &[("type", Asc)], 3),
    index("notifications", &[("created_at", Asc)], 3),
    unique("black_websites", &[("website_id", Asc)], 4),
    index("black_websites", &[("is_available", Asc)], 4),
    index("black_websites", &[("is_deleted", Asc)], 4),
    index("black_websites", &[("name", Asc)], 4),
    index("support_conversations", &[("user_id", Asc)], 5),
    index("support_conversations", &[("status", Asc)], 5),
    index("support_conversations", &[("created_at", Asc)], 5),
    index("support_conversations", &[("last_message_at", Asc)], 5),
    IndexSpec {
        collection: "support_conversations",
        keys: &[("user_id", Asc), ("status", Asc)],
        unique: true,
        partial: Some(PartialFilter {
            field: "status",
            equals: "active",
        }),
        since: 5,
    },
    index(
        "support_conversations",
        &[("status", Asc), ("last_message_at", Desc)],
        5,
    ),
    unique("support_stats", &[("date", Asc)], 5),
];

pub fn collections_at(revision: usize) -> impl Iterator<Item = &'static CollectionSpec> {
    COLLECTIONS.iter().filter(move |c| c.since <= revision)
}

pub fn indexes_at(revision: usize) -> impl Iterator<Item = &'static IndexSpec> {
    INDEXES.iter().filter(move |i| i.since <= revision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_index_names_follow_key_pattern() {
        let names: Vec<String> = indexes_at(5).map(IndexSpec::name).collect();
        assert!(names.contains(&"idx_users_user_id".to_string()));
        assert!(names.contains(&"idx_support_conversations_user_id_status".to_string()));
        assert!(
            names.contains(&"idx_support_conversations_status_last_message_at_desc".to_string())
        );
    }

    #[test]
    fn test_index_names_are_unique() {
        let names: HashSet<String> = INDEXES.iter().map(IndexSpec::name).collect();
        assert_eq!(names.len(), INDEXES.len());
    }

    #[test]
    fn test_revisions_grow_monotonically() {
        let counts: Vec<usize> = (1..=5).map(|r| collections_at(r).count()).collect();
        assert_eq!(counts, vec![4, 5, 7, 8, 10]);
        assert_eq!(indexes_at(1).count(), 6);
        assert_eq!(indexes_at(5).count(), INDEXES.len());
    }

    #[test]
    fn test_indexes_belong_to_declared_collections() {
        for spec in INDEXES {
            let collection = COLLECTIONS
                .iter()
                .find(|c| c.name == spec.collection)
                .expect("index on undeclared collection");
            assert!(collection.since <= spec.since, "{}", spec.name());
        }
    }

    #[test]
    fn test_only_active_conversations_are_unique_per_user() {
        let partial: Vec<&IndexSpec> = INDEXES.iter().filter(|i| i.partial.is_some()).collect();
        assert_eq!(partial.len(), 1);
        assert!(partial[0].unique);
        assert_eq!(
            partial[0].partial.map(|p| p.predicate()),
            Some("status = 'active'".to_string())
        );
    }
}
