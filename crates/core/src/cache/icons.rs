//! Namespaced icon entry storage.
//!
//! [`IconStore`] is a keyed blob store: exact-match get, put, delete and a
//! key snapshot. It performs no content validation; callers decide what is
//! admitted.

use super::connection::CacheDb;
use super::hash::compute_entry_id;
use crate::{Error, HeaderFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached icon response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Vec<u8>,
    pub headers: HeaderFields,
    pub status: u16,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.content_type()
    }
}

/// Icon entries scoped to one namespace of the cache database.
#[derive(Clone, Debug)]
pub struct IconStore {
    db: CacheDb,
    namespace: String,
}

impl CacheDb {
    /// Open a view of the icon table restricted to `namespace`.
    pub fn icon_store(&self, namespace: impl Into<String>) -> IconStore {
        IconStore { db: self.clone(), namespace: namespace.into() }
    }
}

impl IconStore {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the entry stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        let id = compute_entry_id(&self.namespace, key);
        self.db
            .conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, payload, headers_json, status_code, stored_at
                     FROM icon_entries WHERE key_hash = ?1",
                )?;

                let row = stmt.query_row(params![id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, u16>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                });

                let (key, payload, headers_json, status, stored_at) = match row {
                    Ok(r) => r,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e.into()),
                };

                let headers: HeaderFields = serde_json::from_str(&headers_json)?;
                let stored_at = DateTime::parse_from_rfc3339(&stored_at)
                    .map_err(|e| Error::Corrupt(format!("stored_at: {e}")))?
                    .with_timezone(&Utc);

                Ok(Some(CacheEntry { key, payload, headers, status, stored_at }))
            })
            .await
            .map_err(Error::from)
    }

    /// Store `entry` under `key`, replacing any previous entry.
    pub async fn put(&self, key: &str, entry: &CacheEntry) -> Result<(), Error> {
        let id = compute_entry_id(&self.namespace, key);
        let namespace = self.namespace.clone();
        let key = key.to_string();
        let headers_json = serde_json::to_string(&entry.headers)?;
        let content_type = entry.content_type().map(str::to_string);
        let payload = entry.payload.clone();
        let status = entry.status;
        let stored_at = entry.stored_at.to_rfc3339();

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO icon_entries (
                        key_hash, namespace, key, status_code, content_type,
                        headers_json, payload, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        status_code = excluded.status_code,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        payload = excluded.payload,
                        stored_at = excluded.stored_at",
                    params![id, namespace, key, status, content_type, headers_json, payload, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the entry stored under `key`.
    ///
    /// Returns whether an entry was removed.
    pub async fn delete(&self, key: &str) -> Result<bool, Error> {
        let id = compute_entry_id(&self.namespace, key);
        self.db
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM icon_entries WHERE key_hash = ?1", params![id])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Snapshot of every key in this namespace at call time.
    pub async fn list_keys(&self) -> Result<Vec<String>, Error> {
        let namespace = self.namespace.clone();
        self.db
            .conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT key FROM icon_entries WHERE namespace = ?1 ORDER BY key")?;
                let keys = stmt
                    .query_map(params![namespace], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }
}
