//! Icon cache fetch orchestration.
//!
//! For every request [`IconService::handle`] runs:
//!
//! 1. Classify: URLs outside the allow-list pass straight to the network.
//! 2. Resolve the cache key through the redirect table.
//! 3. Serve a fresh cached entry if there is one.
//! 4. Otherwise fetch the original URL, following redirects.
//! 5. Record redirects, admit image responses in [200, 400) to the store,
//!    and return whatever the origin answered.
//! 6. On transport failure serve a stale entry, else a transparent PNG.
//!
//! `handle` never fails; storage problems are logged and skipped.

pub mod classifier;
pub mod placeholder;
pub mod resolver;
pub mod sweep;

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use favcache_core::freshness::{TIMESTAMP_HEADER, is_expired};
use favcache_core::{AppConfig, CacheDb, CacheEntry, Error, HeaderFields, IconStore, ImageKind};
use serde::{Deserialize, Serialize};

pub use classifier::Classifier;
pub use placeholder::{PLACEHOLDER_CONTENT_TYPE, PLACEHOLDER_PNG};
pub use resolver::{REDIRECT_NAMESPACE, RedirectResolver};
pub use sweep::sweep_expired;

use crate::fetch::{FetchResponse, Fetcher};

/// Where an [`IconResponse`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IconSource {
    /// Fresh entry from the icon store.
    Cache,
    /// Network response for a cacheable URL.
    Network,
    /// Network response for a URL outside the allow-list.
    Passthrough,
    /// Expired entry served because the network was unreachable.
    Stale,
    /// Built-in transparent image; nothing else was available.
    Placeholder,
    /// Passthrough fetch failed before any response arrived.
    BadGateway,
}

/// Response returned to the caller of [`IconService::handle`].
#[derive(Debug, Clone)]
pub struct IconResponse {
    pub url: String,
    pub status: u16,
    pub headers: HeaderFields,
    pub body: Bytes,
    pub source: IconSource,
}

impl IconResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.content_type()
    }

    fn from_entry(entry: CacheEntry, source: IconSource) -> Self {
        Self { url: entry.key, status: entry.status, headers: entry.headers, body: Bytes::from(entry.payload), source }
    }

    fn from_fetch(response: FetchResponse, source: IconSource) -> Self {
        Self {
            url: response.final_url.to_string(),
            status: response.status.as_u16(),
            headers: response.headers,
            body: response.bytes,
            source,
        }
    }

    fn placeholder(url: &str) -> Self {
        let headers: HeaderFields = [("content-type", PLACEHOLDER_CONTENT_TYPE)].into_iter().collect();
        Self {
            url: url.to_string(),
            status: 200,
            headers,
            body: Bytes::from_static(PLACEHOLDER_PNG),
            source: IconSource::Placeholder,
        }
    }

    fn bad_gateway(url: &str) -> Self {
        Self {
            url: url.to_string(),
            status: 502,
            headers: HeaderFields::new(),
            body: Bytes::new(),
            source: IconSource::BadGateway,
        }
    }
}

/// Host lifecycle signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Install,
    Activate,
}

/// The icon cache: classifier, redirect resolver, store and fetcher.
#[derive(Clone)]
pub struct IconService {
    classifier: Classifier,
    resolver: RedirectResolver,
    store: IconStore,
    fetcher: Arc<dyn Fetcher>,
}

impl IconService {
    /// Build the service on top of `db`, using it as allow-list as well.
    pub fn new(db: &CacheDb, config: &AppConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let classifier = Classifier::new(Arc::new(db.clone()), config.local_asset_prefixes.clone());
        Self::from_parts(classifier, RedirectResolver::new(db.clone()), db.icon_store(&config.cache_namespace), fetcher)
    }

    pub fn from_parts(
        classifier: Classifier, resolver: RedirectResolver, store: IconStore, fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self { classifier, resolver, store, fetcher }
    }

    pub fn store(&self) -> &IconStore {
        &self.store
    }

    pub fn resolver(&self) -> &RedirectResolver {
        &self.resolver
    }

    /// Serve `url`, from cache when possible.
    pub async fn handle(&self, url: &str) -> IconResponse {
        self.handle_at(url, Utc::now()).await
    }

    /// [`handle`](Self::handle) with an explicit clock.
    pub async fn handle_at(&self, url: &str, now: DateTime<Utc>) -> IconResponse {
        if !self.classifier.is_cacheable(url).await {
            return self.pass_through(url).await;
        }

        let key = self.resolver.resolve(url).await;

        let mut stale = false;
        match self.store.get(&key).await {
            Ok(Some(entry)) if !is_expired(Some(&entry), now) => {
                tracing::debug!(url, key = %key, "icon cache hit");
                return IconResponse::from_entry(entry, IconSource::Cache);
            }
            Ok(Some(_)) => {
                tracing::debug!(url, key = %key, "icon cache entry expired");
                stale = true;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(url, key = %key, error = %e, "icon cache read failed"),
        }

        let response = match self.fetcher.fetch(url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "icon fetch failed, falling back");
                return self.fallback(url, &key).await;
            }
        };

        let effective_key = if response.redirected() {
            let final_url = response.final_url.to_string();
            self.resolver.record(url, &final_url).await;
            final_url
        } else {
            key.clone()
        };

        let admitted = match admit(&response) {
            Ok(kind) => {
                let entry = entry_from_response(&effective_key, &response, now);
                match self.store.put(&effective_key, &entry).await {
                    Ok(()) => tracing::debug!(url, key = %effective_key, kind = kind.mime(), "icon stored"),
                    Err(e) => tracing::warn!(url, key = %effective_key, error = %e, "failed to store icon"),
                }
                true
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "response not admitted to icon cache");
                false
            }
        };

        if stale
            && (!admitted || effective_key != key)
            && let Err(e) = self.store.delete(&key).await
        {
            tracing::warn!(key = %key, error = %e, "failed to evict expired icon");
        }

        if !response.status.is_success() {
            tracing::warn!(url, status = response.status.as_u16(), "icon origin returned non-success status");
        }

        IconResponse::from_fetch(response, IconSource::Network)
    }

    /// Remove every expired entry. Failures are logged, never returned.
    pub async fn activate(&self) -> u64 {
        match sweep_expired(&self.store, Utc::now()).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(error = %e, "activation sweep failed");
                0
            }
        }
    }

    /// React to a host lifecycle signal.
    pub async fn on_lifecycle(&self, event: Lifecycle) {
        match event {
            Lifecycle::Install => tracing::info!("installed"),
            Lifecycle::Activate => {
                let deleted = self.activate().await;
                tracing::info!(deleted, "activated");
            }
        }
    }

    async fn pass_through(&self, url: &str) -> IconResponse {
        match self.fetcher.fetch(url).await {
            Ok(response) => IconResponse::from_fetch(response, IconSource::Passthrough),
            Err(e) => {
                tracing::warn!(url, error = %e, "passthrough fetch failed");
                IconResponse::bad_gateway(url)
            }
        }
    }

    async fn fallback(&self, url: &str, key: &str) -> IconResponse {
        let mut candidates = vec![key];
        if url != key {
            candidates.push(url);
        }

        for candidate in candidates {
            match self.store.get(candidate).await {
                Ok(Some(entry)) => {
                    tracing::info!(url, key = candidate, "serving stale icon");
                    return IconResponse::from_entry(entry, IconSource::Stale);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(url, key = candidate, error = %e, "stale lookup failed"),
            }
        }

        IconResponse::placeholder(url)
    }
}

/// Admission gate for the icon store: a status in [200, 400) and an image content-type.
fn admit(response: &FetchResponse) -> Result<ImageKind, Error> {
    let status = response.status.as_u16();
    if !(200..400).contains(&status) {
        return Err(Error::Validation(format!("status {status} is not cacheable")));
    }

    response
        .content_type
        .as_deref()
        .and_then(ImageKind::from_content_type)
        .ok_or_else(|| {
            Error::Validation(format!(
                "content-type {} is not an image",
                response.content_type.as_deref().unwrap_or("(none)")
            ))
        })
}

/// Build the stored entry. A missing timestamp header is stamped with `now`
/// at full precision so the age never rounds up.
fn entry_from_response(key: &str, response: &FetchResponse, now: DateTime<Utc>) -> CacheEntry {
    let mut headers = response.headers.clone();
    if !headers.contains(TIMESTAMP_HEADER) {
        headers.insert(TIMESTAMP_HEADER, now.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    }

    CacheEntry {
        key: key.to_string(),
        payload: response.bytes.to_vec(),
        headers,
        status: response.status.as_u16(),
        stored_at: now,
    }
}
