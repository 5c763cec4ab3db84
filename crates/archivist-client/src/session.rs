//! Transport session for the archive.
//!
//! The [`Session`] owns one underlying HTTP client plus two throttle lanes
//! (GET and POST) built on [`dispatch_throttled`]. Every request in the
//! process funnels through one shared `Session`, so cookies persist across
//! calls and the throttle interval is a true global rate limit. Share it by
//! constructing it once in the composition root and handing out `Arc`
//! clones.

use crate::document::Document;
use crate::throttle::{dispatch_throttled, Throttled};
use archivist_core::{ArchiveError, ClientConfig, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// Source of fetched pages, as seen by the entity layer.
///
/// Implemented by [`Session`]; tests substitute an in-memory fake.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `url` (absolute or relative to the base origin) as a parsed
    /// document, with optional query parameters.
    async fn fetch_document(
        &self,
        url: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Document>;
}

struct PageRequest {
    url: Url,
    params: Vec<(String, String)>,
}

struct FormRequest {
    url: Url,
    form: Vec<(String, String)>,
}

/// The session's two throttle lanes. Dropping them shuts both workers down.
struct Lanes {
    get: Throttled<PageRequest, Result<String>>,
    post: Throttled<FormRequest, Result<String>>,
}

/// Transport session holding the shared HTTP client and throttle lanes.
///
/// All outbound traffic is serialized per lane with a minimum interval
/// between requests (one second by default). Callers from any number of
/// tasks may fetch concurrently; each blocks only until its own request
/// completes, in strict FIFO order.
pub struct Session {
    base_url: Url,
    authenticated: AtomicBool,
    lanes: RwLock<Option<Lanes>>,
}

impl Session {
    /// Build a session from the given configuration.
    ///
    /// The underlying client keeps a persistent cookie store, presents a
    /// browser-like identity to keep the anti-bot layer quiet, and binds to
    /// IPv4 when configured (the archive has no IPv6 endpoint).
    ///
    /// Must be called from within a tokio runtime; the throttle workers are
    /// spawned here and live until [`Session::close`] or drop.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.network.base_url).map_err(|e| {
            ArchiveError::Validation(format!(
                "invalid base URL '{}': {e}",
                config.network.base_url
            ))
        })?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let mut builder = reqwest::Client::builder()
            .user_agent(config.network.user_agent.as_str())
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.network.timeout_secs));

        if config.network.ipv4_only {
            builder = builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        }

        let http = builder.build().map_err(net_error)?;
        let interval = Duration::from_millis(config.throttle.interval_ms);

        let get_http = http.clone();
        let get = dispatch_throttled(interval, move |request: PageRequest| {
            let http = get_http.clone();
            async move {
                debug!(url = %request.url, "GET");
                let mut builder = http.get(request.url);
                if !request.params.is_empty() {
                    builder = builder.query(&request.params);
                }
                let response = builder.send().await.map_err(net_error)?;
                response.text().await.map_err(net_error)
            }
        });

        let post_http = http;
        let post = dispatch_throttled(interval, move |request: FormRequest| {
            let http = post_http.clone();
            async move {
                debug!(url = %request.url, "POST");
                let response = http
                    .post(request.url)
                    .form(&request.form)
                    .send()
                    .await
                    .map_err(net_error)?;
                response.text().await.map_err(net_error)
            }
        });

        debug!(
            base_url = %base_url,
            interval_ms = config.throttle.interval_ms,
            "session constructed"
        );

        Ok(Self {
            base_url,
            authenticated: AtomicBool::new(false),
            lanes: RwLock::new(Some(Lanes { get, post })),
        })
    }

    /// Resolve a URL against the base origin.
    ///
    /// Absolute `http(s)` URLs pass through unchanged; anything else is
    /// joined onto the configured base.
    ///
    /// # Errors
    /// Returns [`ArchiveError::Validation`] for unparseable input.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Url::parse(url)
                .map_err(|e| ArchiveError::Validation(format!("invalid URL '{url}': {e}")))
        } else {
            self.base_url
                .join(url)
                .map_err(|e| ArchiveError::Validation(format!("invalid path '{url}': {e}")))
        }
    }

    /// Fetch a page as raw body text.
    ///
    /// The request goes through the throttled GET lane; the response is
    /// classified exactly once (sign-in prompt, not-found page) before the
    /// body is returned.
    ///
    /// # Errors
    /// [`ArchiveError::Authorization`] for pages restricted to registered
    /// users, [`ArchiveError::NotFound`] for the archive's 404 page,
    /// [`ArchiveError::Network`] for transport failures, and
    /// [`ArchiveError::SessionClosed`] after [`Session::close`].
    pub async fn fetch(&self, url: &str, params: Option<&[(&str, &str)]>) -> Result<String> {
        let request = PageRequest {
            url: self.resolve(url)?,
            params: owned_pairs(params),
        };

        let lane = {
            let lanes = self.lanes.read().await;
            lanes
                .as_ref()
                .ok_or(ArchiveError::SessionClosed)?
                .get
                .clone()
        };

        let body = lane
            .call(request)
            .await
            .map_err(|e| ArchiveError::Dispatch(e.to_string()))??;

        classify(&body)?;
        Ok(body)
    }

    /// Fetch a page as a parsed [`Document`].
    ///
    /// Same contract as [`Session::fetch`].
    pub async fn fetch_document(
        &self,
        url: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Document> {
        Ok(Document::new(self.fetch(url, params).await?))
    }

    /// Post a URL-encoded form and return the response body text.
    ///
    /// Same classification and error contract as [`Session::fetch`], via
    /// the throttled POST lane.
    pub async fn post(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        let request = FormRequest {
            url: self.resolve(url)?,
            form: owned_pairs(Some(form)),
        };

        let lane = {
            let lanes = self.lanes.read().await;
            lanes
                .as_ref()
                .ok_or(ArchiveError::SessionClosed)?
                .post
                .clone()
        };

        let body = lane
            .call(request)
            .await
            .map_err(|e| ArchiveError::Dispatch(e.to_string()))??;

        classify(&body)?;
        Ok(body)
    }

    /// Post a URL-encoded form and return the response as a [`Document`].
    pub async fn post_document(&self, url: &str, form: &[(&str, &str)]) -> Result<Document> {
        Ok(Document::new(self.post(url, form).await?))
    }

    /// Whether the session holds authenticated credentials.
    ///
    /// The login flow itself is not implemented yet, so this is currently
    /// always `false`.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Relaxed)
    }

    /// Close the session, releasing the transport and both throttle workers.
    ///
    /// In-flight requests finish; later calls fail with
    /// [`ArchiveError::SessionClosed`]. Calling `close` twice is a no-op.
    pub async fn close(&self) {
        let mut lanes = self.lanes.write().await;
        if lanes.take().is_some() {
            debug!("session closed; throttle lanes released");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource for Session {
    async fn fetch_document(
        &self,
        url: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Document> {
        Session::fetch_document(self, url, params).await
    }
}

fn net_error(err: reqwest::Error) -> ArchiveError {
    ArchiveError::Network(err.to_string())
}

fn owned_pairs(pairs: Option<&[(&str, &str)]>) -> Vec<(String, String)> {
    pairs
        .unwrap_or_default()
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Classify a successful HTTP-level response by its content.
///
/// The archive answers restricted and missing pages with HTTP 200 and an
/// explanatory page, so status codes alone say nothing. A sign-in prompt
/// marks a restricted page; the canonical `Error 404` heading marks a
/// missing one.
fn classify(body: &str) -> Result<()> {
    let document = Html::parse_document(body);

    let signin = Selector::parse("div#signin").expect("static selector");
    if document.select(&signin).next().is_some() {
        return Err(ArchiveError::Authorization(
            "this page is restricted to registered users".to_string(),
        ));
    }

    let heading = Selector::parse("h2.heading").expect("static selector");
    if let Some(h2) = document.select(&heading).next() {
        let text = h2.text().collect::<String>();
        if text.trim() == "Error 404" {
            return Err(ArchiveError::NotFound(
                "the archive returned its Error 404 page".to_string(),
            ));
        }
    }

    Ok(())
}
