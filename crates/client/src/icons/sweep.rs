//! Activation-time cleanup of expired icon entries.

use chrono::{DateTime, Utc};
use favcache_core::freshness::is_expired;
use favcache_core::{Error, IconStore};

/// Delete every entry in `store` that is expired at `now`.
///
/// Works on a key snapshot; entries that fail to load are skipped so one bad
/// row never aborts the sweep. Returns the number of deleted entries.
pub async fn sweep_expired(store: &IconStore, now: DateTime<Utc>) -> Result<u64, Error> {
    let keys = store.list_keys().await?;
    let mut deleted = 0u64;

    for key in &keys {
        let entry = match store.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "skipping unreadable entry during sweep");
                continue;
            }
        };

        if !is_expired(entry.as_ref(), now) {
            continue;
        }

        match store.delete(key).await {
            Ok(true) => deleted += 1,
            Ok(false) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "failed to delete expired entry"),
        }
    }

    tracing::info!(namespace = store.namespace(), scanned = keys.len(), deleted, "sweep finished");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use favcache_core::{CacheDb, CacheEntry, HeaderFields};

    fn entry(key: &str, date: DateTime<Utc>) -> CacheEntry {
        let headers: HeaderFields =
            [("content-type", "image/png".to_string()), ("date", date.to_rfc2822())].into_iter().collect();
        CacheEntry { key: key.to_string(), payload: vec![1, 2, 3], headers, status: 200, stored_at: date }
    }

    #[tokio::test]
    async fn test_sweep_deletes_only_expired() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let store = db.icon_store("favicons-v1");
        let now = Utc::now();

        let fresh = entry("https://a.test/fresh.ico", now - TimeDelta::days(2));
        let old = entry("https://a.test/old.ico", now - TimeDelta::days(31));
        store.put(&fresh.key, &fresh).await.unwrap();
        store.put(&old.key, &old).await.unwrap();

        let deleted = sweep_expired(&store, now).await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(store.list_keys().await.unwrap(), vec![fresh.key.clone()]);
    }

    #[tokio::test]
    async fn test_sweep_removes_entries_without_timestamp() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let store = db.icon_store("favicons-v1");
        let mut undated = entry("https://a.test/undated.ico", Utc::now());
        undated.headers = [("content-type", "image/png")].into_iter().collect();
        store.put(&undated.key, &undated).await.unwrap();

        assert_eq!(sweep_expired(&store, Utc::now()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sweep_leaves_other_namespaces() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let current = db.icon_store("favicons-v2");
        let previous = db.icon_store("favicons-v1");
        let old = entry("https://a.test/old.ico", Utc::now() - TimeDelta::days(40));
        previous.put(&old.key, &old).await.unwrap();

        assert_eq!(sweep_expired(&current, Utc::now()).await.unwrap(), 0);
        assert!(previous.get(&old.key).await.unwrap().is_some());
    }
}
