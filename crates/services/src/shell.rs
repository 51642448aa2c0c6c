//! Offline app-shell policy for static hosting.
//!
//! Some static hosts serve TypeScript sources with the wrong MIME type. The
//! policy rewrites same-origin `.ts` / `.tsx` responses to JavaScript,
//! precaches a fixed asset list and serves requests network-first or
//! cache-first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::ShellError;

pub const JAVASCRIPT_MIME: &str = "application/javascript";

/// Assets fetched and cached by [`ShellPolicy::precache`].
pub const APP_SHELL: &[&str] = &[
    "/",
    "/index.html",
    "/index.tsx",
    "/App.tsx",
    "/manifest.json",
    "/icon-192.png",
    "/icon-512.png",
];

const SCRIPT_EXTENSIONS: [&str; 2] = [".ts", ".tsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    #[must_use]
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait AssetNetwork: Send + Sync {
    /// # Errors
    ///
    /// Returns `ShellError::Offline` when the request cannot be made.
    async fn fetch(&self, url: &Url) -> Result<AssetResponse, ShellError>;
}

#[async_trait]
pub trait AssetCache: Send + Sync {
    async fn get(&self, url: &Url) -> Option<AssetResponse>;
    async fn put(&self, url: &Url, response: AssetResponse);
}

#[derive(Clone, Default)]
pub struct InMemoryAssetCache {
    entries: Arc<Mutex<HashMap<String, AssetResponse>>>,
}

impl InMemoryAssetCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetCache for InMemoryAssetCache {
    async fn get(&self, url: &Url) -> Option<AssetResponse> {
        match self.entries.lock() {
            Ok(entries) => entries.get(url.as_str()).cloned(),
            Err(_) => {
                warn!("asset cache lock poisoned");
                None
            }
        }
    }

    async fn put(&self, url: &Url, response: AssetResponse) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(url.as_str().to_string(), response);
            }
            Err(_) => warn!("asset cache lock poisoned"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Try the network, fall back to the cache when offline.
    NetworkFirst,
    /// Serve from cache, fetching and storing on a miss.
    CacheFirst,
}

fn same_origin(origin: &Url, url: &Url) -> bool {
    origin.scheme() == url.scheme()
        && origin.host_str() == url.host_str()
        && origin.port_or_known_default() == url.port_or_known_default()
}

/// Rewrite the content type of same-origin TypeScript sources.
#[must_use]
pub fn fix_content_type(origin: &Url, url: &Url, mut response: AssetResponse) -> AssetResponse {
    let is_script = SCRIPT_EXTENSIONS
        .iter()
        .any(|ext| url.path().ends_with(ext));
    if is_script && same_origin(origin, url) {
        response.content_type = Some(JAVASCRIPT_MIME.to_string());
    }
    response
}

pub struct ShellPolicy {
    origin: Url,
    strategy: FetchStrategy,
    network: Arc<dyn AssetNetwork>,
    cache: Arc<dyn AssetCache>,
}

impl ShellPolicy {
    #[must_use]
    pub fn new(
        origin: Url,
        strategy: FetchStrategy,
        network: Arc<dyn AssetNetwork>,
        cache: Arc<dyn AssetCache>,
    ) -> Self {
        Self {
            origin,
            strategy,
            network,
            cache,
        }
    }

    /// Fetch and store every app-shell asset. Returns how many were cached.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Offline` if any asset cannot be fetched.
    pub async fn precache(&self) -> Result<usize, ShellError> {
        let mut cached = 0;
        for path in APP_SHELL {
            let url = self
                .origin
                .join(path)
                .map_err(|_| ShellError::Offline((*path).to_string()))?;
            let response = self.network.fetch(&url).await?;
            if response.is_success() {
                self.cache.put(&url, self.fix(&url, response)).await;
                cached += 1;
            }
        }
        debug!(cached, "app shell precached");
        Ok(cached)
    }

    /// Answer a request according to the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Offline` when the network is unavailable and the
    /// asset is not cached.
    pub async fn handle(&self, url: &Url) -> Result<AssetResponse, ShellError> {
        match self.strategy {
            FetchStrategy::NetworkFirst => match self.network.fetch(url).await {
                Ok(response) => Ok(self.store(url, response).await),
                Err(err) => {
                    debug!(url = %url, "network failed; trying cache");
                    self.cache.get(url).await.ok_or(err)
                }
            },
            FetchStrategy::CacheFirst => {
                if let Some(hit) = self.cache.get(url).await {
                    return Ok(hit);
                }
                let response = self.network.fetch(url).await?;
                Ok(self.store(url, response).await)
            }
        }
    }

    async fn store(&self, url: &Url, response: AssetResponse) -> AssetResponse {
        let response = self.fix(url, response);
        if response.is_success() && same_origin(&self.origin, url) {
            self.cache.put(url, response.clone()).await;
        }
        response
    }

    fn fix(&self, url: &Url, response: AssetResponse) -> AssetResponse {
        fix_content_type(&self.origin, url, response)
    }
}
