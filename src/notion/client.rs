use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::schema::{self, QueryResponse};
use crate::config::Config;
use crate::error::SyncError;
use crate::models::{Book, ContentBlock};
use crate::sync::{DocumentStore, PageRef};

const SERVICE: &str = "notion";

/// Token-authenticated client bound to one Notion database.
#[derive(Debug)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    version: String,
    token: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(token: &str, database_id: &str, config: &Config) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("weread-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.notion_base_url.value.trim_end_matches('/').to_string(),
            version: config.notion_version.value.clone(),
            token: token.to_string(),
            database_id: database_id.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SyncError> {
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SyncError::Auth {
                service: SERVICE,
                message: response.text().await.unwrap_or_default(),
            });
        }
        if !status.is_success() {
            return Err(SyncError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response.json().await.map_err(|e| SyncError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })
    }

    async fn query(&self, body: &Value) -> Result<QueryResponse, SyncError> {
        let path = format!("/databases/{}/query", self.database_id);
        self.send(self.request(Method::POST, &path).json(body)).await
    }
}

impl DocumentStore for NotionClient {
    async fn query_pages_by_book_id(&self, book_id: &str) -> Result<Vec<PageRef>, SyncError> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({"filter": schema::book_id_filter(book_id)});
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let (batch, next) = self.query(&body).await?.into_page_refs();
            pages.extend(batch);

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(pages)
    }

    async fn delete_page(&self, page_id: &str) -> Result<(), SyncError> {
        let _: Value = self
            .send(self.request(Method::DELETE, &format!("/blocks/{}", page_id)))
            .await?;
        Ok(())
    }

    async fn query_latest_sync_date(&self) -> Result<Option<DateTime<Utc>>, SyncError> {
        let response = self.query(&schema::latest_date_query()).await?;

        let Some(page) = response.results.first() else {
            return Ok(None);
        };
        let Some(start) = page.date_start() else {
            return Ok(None);
        };

        match schema::parse_sync_date(start) {
            Some(date) => Ok(Some(date)),
            None => Err(SyncError::Decode {
                service: SERVICE,
                message: format!("unparseable Date '{}' on page {}", start, page.id),
            }),
        }
    }

    async fn create_page(
        &self,
        book: &Book,
        children: &[ContentBlock],
    ) -> Result<String, SyncError> {
        let body = schema::page_body(&self.database_id, book, children);
        let page: schema::PageObject = self
            .send(self.request(Method::POST, "/pages").json(&body))
            .await?;
        Ok(page.id)
    }

    async fn append_children(
        &self,
        page_id: &str,
        children: &[ContentBlock],
    ) -> Result<(), SyncError> {
        let body = json!({"children": schema::blocks_json(children)});
        let _: Value = self
            .send(
                self.request(Method::PATCH, &format!("/blocks/{}/children", page_id))
                    .json(&body),
            )
            .await?;
        Ok(())
    }
}
