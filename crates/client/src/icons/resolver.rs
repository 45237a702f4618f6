//! Replays previously observed redirects.
//!
//! Mappings live in the durable key-value table under
//! [`REDIRECT_NAMESPACE`]. Lookups are single-level: a stored chain
//! `a -> b -> c` resolves `a` to `b`, never to `c`.

use favcache_core::{CacheDb, Error};

/// Key-value namespace holding `original -> final` URL mappings.
pub const REDIRECT_NAMESPACE: &str = "redirects";

/// Persistent original-URL to final-URL mapping.
#[derive(Clone, Debug)]
pub struct RedirectResolver {
    db: CacheDb,
}

impl RedirectResolver {
    pub fn new(db: CacheDb) -> Self {
        Self { db }
    }

    /// Cache key for `original`: its recorded final URL, or itself.
    pub async fn resolve(&self, original: &str) -> String {
        match self.db.kv_get(REDIRECT_NAMESPACE, original).await {
            Ok(Some(target)) => {
                tracing::debug!(original, target = %target, "redirect replayed");
                target
            }
            Ok(None) => original.to_string(),
            Err(e) => {
                tracing::warn!(original, error = %e, "redirect lookup failed");
                original.to_string()
            }
        }
    }

    /// Remember that `original` ended up at `final_url`.
    ///
    /// Self-mappings are ignored. Persistence failures are logged only.
    pub async fn record(&self, original: &str, final_url: &str) {
        if original == final_url {
            return;
        }

        if let Err(e) = self.db.kv_set(REDIRECT_NAMESPACE, original, final_url).await {
            tracing::warn!(original, final_url, error = %e, "failed to persist redirect mapping");
        }
    }

    /// Every recorded mapping, ordered by original URL.
    pub async fn mappings(&self) -> Result<Vec<(String, String)>, Error> {
        self.db.kv_list(REDIRECT_NAMESPACE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_url_resolves_to_itself() {
        let resolver = RedirectResolver::new(CacheDb::open_in_memory().await.unwrap());
        assert_eq!(resolver.resolve("https://a.test/i.ico").await, "https://a.test/i.ico");
    }

    #[tokio::test]
    async fn test_record_then_resolve() {
        let resolver = RedirectResolver::new(CacheDb::open_in_memory().await.unwrap());
        resolver.record("https://a.test/i.ico", "https://cdn.a.test/i.ico").await;
        assert_eq!(resolver.resolve("https://a.test/i.ico").await, "https://cdn.a.test/i.ico");
    }

    #[tokio::test]
    async fn test_self_mapping_is_not_stored() {
        let resolver = RedirectResolver::new(CacheDb::open_in_memory().await.unwrap());
        resolver.record("https://a.test/i.ico", "https://a.test/i.ico").await;
        assert!(resolver.mappings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let resolver = RedirectResolver::new(CacheDb::open_in_memory().await.unwrap());
        resolver.record("https://a.test/i.ico", "https://b.test/i.ico").await;
        resolver.record("https://a.test/i.ico", "https://c.test/i.ico").await;
        assert_eq!(resolver.resolve("https://a.test/i.ico").await, "https://c.test/i.ico");
    }

    #[tokio::test]
    async fn test_no_transitive_resolution() {
        let resolver = RedirectResolver::new(CacheDb::open_in_memory().await.unwrap());
        resolver.record("https://a.test/", "https://b.test/").await;
        resolver.record("https://b.test/", "https://c.test/").await;
        assert_eq!(resolver.resolve("https://a.test/").await, "https://b.test/");
    }

    #[tokio::test]
    async fn test_persistence_failures_are_swallowed() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let resolver = RedirectResolver::new(db.clone());
        db.close().await.unwrap();

        resolver.record("https://a.test/i.ico", "https://cdn.a.test/i.ico").await;

        assert_eq!(resolver.resolve("https://a.test/i.ico").await, "https://a.test/i.ico");
        assert!(resolver.mappings().await.is_err());
    }
}
