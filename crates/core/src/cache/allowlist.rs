//! Allow-list of URLs that may be treated as cacheable icons.
//!
//! The set is populated by whoever manages saved icons; the fetch path only
//! ever asks [`AllowList::contains`].

use super::connection::CacheDb;
use crate::Error;
use async_trait::async_trait;
use tokio_rusqlite::params;

/// Read-only membership test over the allow-list.
#[async_trait]
pub trait AllowList: Send + Sync {
    async fn contains(&self, url: &str) -> Result<bool, Error>;
}

#[async_trait]
impl AllowList for CacheDb {
    async fn contains(&self, url: &str) -> Result<bool, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let found: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM allowlist WHERE url = ?1)",
                    params![url],
                    |row| row.get(0),
                )?;
                Ok(found)
            })
            .await
            .map_err(|e| Error::Classification(Error::from(e).to_string()))
    }
}

impl CacheDb {
    /// Add `url` to the allow-list. Adding an existing URL is a no-op.
    pub async fn allow(&self, url: &str) -> Result<(), Error> {
        let url = url.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO allowlist (url, added_at) VALUES (?1, ?2) ON CONFLICT(url) DO NOTHING",
                    params![url, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Remove `url` from the allow-list.
    ///
    /// Returns whether the URL was present.
    pub async fn disallow(&self, url: &str) -> Result<bool, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM allowlist WHERE url = ?1", params![url])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Every allow-listed URL, ordered.
    pub async fn allowed_urls(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM allowlist ORDER BY url")?;
                let urls = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(urls)
            })
            .await
            .map_err(Error::from)
    }
}
