//! Durable namespaced key-value entries.
//!
//! Backs small string mappings that must survive restarts, such as the
//! redirect table.

use super::connection::CacheDb;
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Get the value stored under `key` in `namespace`.
    pub async fn kv_get(&self, namespace: &str, key: &str) -> Result<Option<String>, Error> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row(
                    "SELECT value FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                    params![namespace, key],
                    |row| row.get(0),
                );

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Set `key` to `value` in `namespace`, overwriting any previous value.
    pub async fn kv_set(&self, namespace: &str, key: &str, value: &str) -> Result<(), Error> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        let value = value.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_entries (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(namespace, key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![namespace, key, value, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// All `(key, value)` pairs in `namespace`, ordered by key.
    pub async fn kv_list(&self, namespace: &str) -> Result<Vec<(String, String)>, Error> {
        let namespace = namespace.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<(String, String)>, Error> {
                let mut stmt = conn.prepare("SELECT key, value FROM kv_entries WHERE namespace = ?1 ORDER BY key")?;
                let pairs = stmt
                    .query_map(params![namespace], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(pairs)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.kv_set("redirects", "a", "b").await.unwrap();
        assert_eq!(db.kv_get("redirects", "a").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.kv_get("redirects", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.kv_set("redirects", "a", "b").await.unwrap();
        db.kv_set("redirects", "a", "c").await.unwrap();
        assert_eq!(db.kv_get("redirects", "a").await.unwrap().as_deref(), Some("c"));
        assert_eq!(db.kv_list("redirects").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_namespaces_are_separate() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.kv_set("redirects", "a", "b").await.unwrap();
        db.kv_set("other", "a", "z").await.unwrap();
        assert_eq!(db.kv_list("redirects").await.unwrap(), vec![("a".to_string(), "b".to_string())]);
        assert_eq!(db.kv_get("other", "a").await.unwrap().as_deref(), Some("z"));
    }
}
