use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::schema::{BookmarkListResponse, ChapterInfosResponse, NotebooksResponse};
use crate::config::Config;
use crate::error::{EmptyReason, FetchOutcome, SyncError};
use crate::models::{Book, Bookmark, ChapterMap};
use crate::sync::ReadingSource;

const SERVICE: &str = "weread";

/// Splits a browser cookie string (`a=1; b=2`) into name/value pairs.
pub fn parse_cookie_string(cookie: &str) -> Result<Vec<(String, String)>, SyncError> {
    let mut pairs = Vec::new();

    for part in cookie.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (name, value) = part
            .split_once('=')
            .ok_or_else(|| SyncError::InvalidCookie(format!("'{}' has no '='", part)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SyncError::InvalidCookie(format!(
                "'{}' has an empty name",
                part
            )));
        }
        pairs.push((name.to_string(), value.trim().to_string()));
    }

    if pairs.is_empty() {
        return Err(SyncError::InvalidCookie("no cookies found".to_string()));
    }

    Ok(pairs)
}

/// Cookie-authenticated client for the WeRead web API.
#[derive(Debug)]
pub struct WeReadClient {
    http: reqwest::Client,
    base_url: String,
    home_url: Url,
}

impl WeReadClient {
    /// Creates a client whose cookie jar holds `cookie`, scoped to the domain
    /// of the configured home page so API subdomains receive it too.
    pub fn new(cookie: &str, config: &Config) -> Result<Self, SyncError> {
        let home_url = Url::parse(&config.weread_home_url.value)
            .map_err(|_| SyncError::InvalidUrl(config.weread_home_url.value.clone()))?;
        let domain = home_url
            .host_str()
            .ok_or_else(|| SyncError::InvalidUrl(config.weread_home_url.value.clone()))?
            .to_string();

        let jar = Jar::default();
        for (name, value) in parse_cookie_string(cookie)? {
            jar.add_cookie_str(
                &format!("{}={}; Domain={}; Path=/", name, value, domain),
                &home_url,
            );
        }

        let http = reqwest::Client::builder()
            .cookie_provider(Arc::new(jar))
            .user_agent(concat!("weread-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.weread_base_url.value.trim_end_matches('/').to_string(),
            home_url,
        })
    }

    /// Visits the home page once so the session picks up refreshed cookies.
    pub async fn warm_up(&self) -> Result<(), SyncError> {
        let response = self.http.get(self.home_url.clone()).send().await?;
        tracing::debug!("WeRead home page returned {}", response.status());
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decodes a response whose failure should degrade rather than abort.
async fn fetch_tolerant<T: DeserializeOwned>(
    result: Result<reqwest::Response, reqwest::Error>,
) -> FetchOutcome<T> {
    let response = match result {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Empty(EmptyReason::Transport(e.to_string())),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::Empty(EmptyReason::Status(status.as_u16()));
    }

    match response.json::<T>().await {
        Ok(body) => FetchOutcome::Fetched(body),
        Err(e) => FetchOutcome::Empty(EmptyReason::Malformed(e.to_string())),
    }
}

impl ReadingSource for WeReadClient {
    async fn list_notebooks(&self) -> Result<Vec<Book>, SyncError> {
        let response = self.http.get(self.url("/user/notebooks")).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::Auth {
                service: SERVICE,
                message: format!("status {}", status),
            });
        }
        if !status.is_success() {
            return Err(SyncError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: NotebooksResponse = response.json().await.map_err(|e| SyncError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })?;
        body.into_books()
    }

    async fn list_bookmarks(&self, book_id: &str) -> FetchOutcome<Vec<Bookmark>> {
        let result = self
            .http
            .get(self.url("/book/bookmarklist"))
            .query(&[("bookId", book_id)])
            .send()
            .await;

        fetch_tolerant::<BookmarkListResponse>(result)
            .await
            .and_then(|body| body.into_bookmarks(book_id))
    }

    async fn chapter_info(&self, book_id: &str) -> FetchOutcome<ChapterMap> {
        let result = self
            .http
            .post(self.url("/book/chapterInfos"))
            .json(&serde_json::json!({
                "bookIds": [book_id],
                "synckeys": [0],
                "teenmode": 0
            }))
            .send()
            .await;

        fetch_tolerant::<ChapterInfosResponse>(result)
            .await
            .and_then(|body| match body.into_chapter_map() {
                Some(chapters) => FetchOutcome::Fetched(chapters),
                None => FetchOutcome::Empty(EmptyReason::Malformed(
                    "expected chapter infos for exactly one book".to_string(),
                )),
            })
    }
}
