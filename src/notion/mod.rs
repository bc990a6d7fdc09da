//! Client for the Notion API (the document store).

mod client;
mod schema;

pub use client::NotionClient;
