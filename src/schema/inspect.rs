//! Reads the collections and indexes that actually exist in the store.

use super::catalog::Direction;
use crate::error::{AppError, AppResult};
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use std::collections::BTreeMap;

/// Bookkeeping table owned by the migrator.
pub const MIGRATIONS_TABLE: &str = "seaql_migrations";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    pub keys: Vec<(String, Direction)>,
    pub unique: bool,
    /// Partial filter as stored by the backend, if any
    pub predicate: Option<String>,
}

impl IndexInfo {
    pub fn normalized_predicate(&self) -> Option<String> {
        self.predicate.as_deref().map(normalize_predicate)
    }
}

/// Strips casts, quoting, parentheses and whitespace so that PostgreSQL's
/// `((status)::text = 'active'::text)` and SQLite's `status = 'active'` compare equal.
pub fn normalize_predicate(predicate: &str) -> String {
    predicate
        .to_ascii_lowercase()
        .replace("::character varying", "")
        .replace("::text", "")
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '"'))
        .collect()
}

/// Collection names, sorted, without the migrator's own table.
pub async fn list_collections<C: ConnectionTrait>(db: &C) -> AppResult<Vec<String>> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DbBackend::Sqlite => {
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
        }
        DbBackend::Postgres => {
            "SELECT table_name::text AS name FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
             ORDER BY table_name"
        }
        other => return Err(unsupported(other)),
    };

    let rows = db
        .query_all(Statement::from_string(backend, sql.to_string()))
        .await?;
    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get("", "name")?;
        if name != MIGRATIONS_TABLE {
            names.push(name);
        }
    }
    Ok(names)
}

/// Secondary indexes of one collection, sorted by name. Primary keys are left out.
pub async fn list_indexes<C: ConnectionTrait>(db: &C, collection: &str) -> AppResult<Vec<IndexInfo>> {
    match db.get_database_backend() {
        DbBackend::Sqlite => sqlite_indexes(db, collection).await,
        DbBackend::Postgres => postgres_indexes(db, collection).await,
        other => Err(unsupported(other)),
    }
}

/// Every collection with its indexes; two equal snapshots mean the same structure.
pub async fn snapshot<C: ConnectionTrait>(db: &C) -> AppResult<BTreeMap<String, Vec<IndexInfo>>> {
    let mut out = BTreeMap::new();
    for collection in list_collections(db).await? {
        let indexes = list_indexes(db, &collection).await?;
        out.insert(collection, indexes);
    }
    Ok(out)
}

async fn sqlite_indexes<C: ConnectionTrait>(db: &C, collection: &str) -> AppResult<Vec<IndexInfo>> {
    let list = db
        .query_all(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "SELECT name, \"unique\" AS is_unique, origin FROM pragma_index_list(?)",
            [collection.into()],
        ))
        .await?;

    let mut indexes = Vec::new();
    for row in list {
        let origin: String = row.try_get("", "origin")?;
        // "pk" and "u" are implicit indexes backing table constraints
        if origin != "c" {
            continue;
        }
        let name: String = row.try_get("", "name")?;
        let unique: i32 = row.try_get("", "is_unique")?;

        let columns = db
            .query_all(Statement::from_sql_and_values(
                DbBackend::Sqlite,
                "SELECT name, \"desc\" AS is_desc FROM pragma_index_xinfo(?) \
                 WHERE key = 1 ORDER BY seqno",
                [name.clone().into()],
            ))
            .await?;
        let mut keys = Vec::with_capacity(columns.len());
        for column in columns {
            // expression keys have no column name
            let field: Option<String> = column.try_get("", "name")?;
            let is_desc: i32 = column.try_get("", "is_desc")?;
            keys.push((field.unwrap_or_default(), direction(is_desc != 0)));
        }

        let sql = db
            .query_one(Statement::from_sql_and_values(
                DbBackend::Sqlite,
                "SELECT sql FROM sqlite_master WHERE type = 'index' AND name = ?",
                [name.clone().into()],
            ))
            .await?;
        let sql: Option<String> = match sql {
            Some(row) => row.try_get("", "sql")?,
            None => None,
        };

        indexes.push(IndexInfo {
            name,
            keys,
            unique: unique != 0,
            predicate: sql.as_deref().and_then(sqlite_where_clause),
        });
    }

    indexes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(indexes)
}

/// Text after the `WHERE` keyword of a stored `CREATE INDEX`, whatever whitespace surrounds it.
fn sqlite_where_clause(create_sql: &str) -> Option<String> {
    const KEYWORD: &str = "WHERE";
    // ASCII uppercasing keeps byte offsets aligned with the original text
    let upper = create_sql.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    upper
        .match_indices(KEYWORD)
        .map(|(pos, _)| pos)
        .find(|&pos| {
            let before = pos.checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(pos + KEYWORD.len()).copied();
            matches!(before, Some(b) if b.is_ascii_whitespace() || b == b')')
                && matches!(after, Some(b) if b.is_ascii_whitespace() || b == b'(')
        })
        .map(|pos| create_sql[pos + KEYWORD.len()..].trim().to_string())
}

const POSTGRES_INDEXES_SQL: &str = r#"
SELECT i.relname::text AS index_name,
       ix.indisunique AS is_unique,
       pg_get_expr(ix.indpred, ix.indrelid) AS predicate,
       a.attname::text AS column_name,
       (ix.indoption[k.ord::int - 1] & 1) = 1 AS is_desc
FROM pg_index ix
JOIN pg_class i ON i.oid = ix.indexrelid
JOIN pg_class t ON t.oid = ix.indrelid
JOIN pg_namespace n ON n.oid = t.relnamespace
CROSS JOIN LATERAL unnest(ix.indkey) WITH ORDINALITY AS k(attnum, ord)
JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
WHERE t.relname = $1
  AND n.nspname = current_schema()
  AND NOT ix.indisprimary
ORDER BY i.relname, k.ord
"#;

async fn postgres_indexes<C: ConnectionTrait>(db: &C, collection: &str) -> AppResult<Vec<IndexInfo>> {
    let rows = db
        .query_all(Statement::from_sql_and_values(
            DbBackend::Postgres,
            POSTGRES_INDEXES_SQL,
            [collection.into()],
        ))
        .await?;

    // one row per key column, already ordered by index name then position
    let mut indexes: Vec<IndexInfo> = Vec::new();
    for row in rows {
        let name: String = row.try_get("", "index_name")?;
        let column: String = row.try_get("", "column_name")?;
        let is_desc: bool = row.try_get("", "is_desc")?;

        match indexes.last_mut() {
            Some(last) if last.name == name => last.keys.push((column, direction(is_desc))),
            _ => indexes.push(IndexInfo {
                name,
                keys: vec![(column, direction(is_desc))],
                unique: row.try_get("", "is_unique")?,
                predicate: row.try_get("", "predicate")?,
            }),
        }
    }
    Ok(indexes)
}

fn direction(is_desc: bool) -> Direction {
    if is_desc { Direction::Desc } else { Direction::Asc }
}

fn unsupported(backend: DbBackend) -> AppError {
    AppError::ConfigError(format!("unsupported database backend: {backend:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_from_both_backends_normalize_alike() {
        let expected = normalize_predicate("status = 'active'");
        assert_eq!(expected, "status='active'");
        assert_eq!(normalize_predicate("((status)::text = 'active'::text)"), expected);
        assert_eq!(
            normalize_predicate("((status)::character varying = 'active'::character varying)"),
            expected
        );
        assert_eq!(normalize_predicate("\"status\" = 'active'"), expected);
        assert_ne!(normalize_predicate("status = 'closed'"), expected);
    }

    #[test]
    fn test_sqlite_where_clause() {
        let sql = "CREATE UNIQUE INDEX idx_x ON support_conversations (user_id, status) \
                   where status = 'active'";
        assert_eq!(sqlite_where_clause(sql), Some("status = 'active'".to_string()));
        assert_eq!(sqlite_where_clause("CREATE INDEX idx_y ON users (username)"), None);
    }

    #[test]
    fn test_sqlite_where_clause_after_any_whitespace() {
        let expected = Some("status = 'active'".to_string());
        let newline = "CREATE UNIQUE INDEX idx_x ON support_conversations (user_id, status)\n\
                       WHERE status = 'active'";
        assert_eq!(sqlite_where_clause(newline), expected);
        let tab = "CREATE UNIQUE INDEX idx_x ON support_conversations (user_id, status)\tWHERE\tstatus = 'active'";
        assert_eq!(sqlite_where_clause(tab), expected);
        let tight = "CREATE UNIQUE INDEX idx_x ON support_conversations(user_id,status)WHERE(status = 'active')";
        assert_eq!(sqlite_where_clause(tight), Some("(status = 'active')".to_string()));
        // identifiers that merely contain the keyword are not a filter
        assert_eq!(sqlite_where_clause("CREATE INDEX idx_z ON t (somewhere_id)"), None);
    }
}
