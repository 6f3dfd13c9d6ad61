//! Server-side fetch of job posting pages.
//!
//! Only public http(s) hosts are fetched. Redirects are followed here rather
//! than by the client so every hop passes the same address check, and bodies
//! are read under a hard size cap.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use reqwest::{header::LOCATION, redirect, Client, Response, StatusCode, Url};
use thiserror::Error;

pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;
pub const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("refusing to fetch non-public address {0}")]
    Blocked(IpAddr),

    #[error("could not resolve host {0}")]
    Unresolved(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("page is larger than {limit} bytes")]
    TooLarge { limit: usize },
}

impl FetchError {
    /// The caller named something that may not be fetched, as opposed to the
    /// page being unavailable.
    pub fn is_refused(&self) -> bool {
        matches!(self, FetchError::InvalidUrl(_) | FetchError::Blocked(_))
    }
}

/// Client for page fetches. Redirects are disabled; `fetch_page` follows them.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .redirect(redirect::Policy::none())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetches `url` as text, following at most `MAX_REDIRECTS` redirects.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let mut target = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    for _ in 0..=MAX_REDIRECTS {
        ensure_public(&target).await?;

        let response = client.get(target.clone()).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or(FetchError::Status(status))?;
            target = target
                .join(location)
                .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
            continue;
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = read_capped(response, MAX_PAGE_BYTES).await?;
        return Ok(String::from_utf8_lossy(&body).into_owned());
    }

    Err(FetchError::TooManyRedirects)
}

/// Reads the body, giving up as soon as it exceeds `limit` bytes.
pub async fn read_capped(mut response: Response, limit: usize) -> Result<Vec<u8>, FetchError> {
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(FetchError::TooLarge { limit });
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(FetchError::TooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Accepts http(s) URLs whose host resolves only to public addresses.
pub async fn ensure_public(url: &Url) -> Result<(), FetchError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "unsupported scheme `{}`",
            url.scheme()
        )));
    }
    let host = url
        .host_str()
        .ok_or_else(|| FetchError::InvalidUrl("missing host".to_string()))?;
    // IPv6 literals come back bracketed.
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = url.port_or_known_default().unwrap_or(80);

    let addrs: Vec<_> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|_| FetchError::Unresolved(host.to_string()))?
        .collect();
    if addrs.is_empty() {
        return Err(FetchError::Unresolved(host.to_string()));
    }
    match addrs.iter().map(|addr| addr.ip()).find(|ip| !is_public(*ip)) {
        Some(ip) => Err(FetchError::Blocked(ip)),
        None => Ok(()),
    }
}

pub fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_v4(v4),
            None => is_public_v6(v6),
        },
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    let shared = a == 100 && (64..128).contains(&b);
    !(ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_multicast()
        || ip.is_documentation()
        || a == 0
        || shared)
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    let unique_local = first & 0xfe00 == 0xfc00;
    let link_local = first & 0xffc0 == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() || unique_local || link_local)
}
