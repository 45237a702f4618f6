//! Decides which requests belong to the icon cache.

use std::sync::Arc;

use favcache_core::AllowList;

/// Allow-list membership test with bundled-asset exclusion.
#[derive(Clone)]
pub struct Classifier {
    allow_list: Arc<dyn AllowList>,
    local_prefixes: Vec<String>,
}

impl Classifier {
    pub fn new(allow_list: Arc<dyn AllowList>, local_prefixes: Vec<String>) -> Self {
        let local_prefixes = local_prefixes.into_iter().filter(|p| !p.is_empty()).collect();
        Self { allow_list, local_prefixes }
    }

    /// Whether `url` points at a bundled asset that must never be cached.
    pub fn is_local_asset(&self, url: &str) -> bool {
        self.local_prefixes.iter().any(|prefix| url.starts_with(prefix.as_str()))
    }

    /// Whether `url` should go through the icon cache.
    ///
    /// A failing allow-list read counts as "not cacheable".
    pub async fn is_cacheable(&self, url: &str) -> bool {
        if self.is_local_asset(url) {
            return false;
        }

        match self.allow_list.contains(url).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(url, error = %e, "allow-list lookup failed, treating as not cacheable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use favcache_core::{CacheDb, Error};

    struct BrokenAllowList;

    #[async_trait]
    impl AllowList for BrokenAllowList {
        async fn contains(&self, _url: &str) -> Result<bool, Error> {
            Err(Error::Classification("store unavailable".into()))
        }
    }

    fn prefixes() -> Vec<String> {
        vec!["/assets/".into(), "chrome-extension://".into(), String::new()]
    }

    #[tokio::test]
    async fn test_allow_listed_url_is_cacheable() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.allow("https://example.com/favicon.ico").await.unwrap();
        let classifier = Classifier::new(Arc::new(db), prefixes());

        assert!(classifier.is_cacheable("https://example.com/favicon.ico").await);
        assert!(!classifier.is_cacheable("https://example.com/other.ico").await);
    }

    #[tokio::test]
    async fn test_local_assets_never_cacheable() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.allow("/assets/logo.png").await.unwrap();
        let classifier = Classifier::new(Arc::new(db), prefixes());

        assert!(classifier.is_local_asset("chrome-extension://abc/icon.png"));
        assert!(!classifier.is_cacheable("/assets/logo.png").await);
    }

    #[tokio::test]
    async fn test_empty_prefix_does_not_match_everything() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let classifier = Classifier::new(Arc::new(db), prefixes());
        assert!(!classifier.is_local_asset("https://example.com/favicon.ico"));
    }

    #[tokio::test]
    async fn test_allow_list_error_fails_closed() {
        let classifier = Classifier::new(Arc::new(BrokenAllowList), prefixes());
        assert!(!classifier.is_cacheable("https://example.com/favicon.ico").await);
    }
}
