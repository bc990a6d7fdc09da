//! Client for the WeRead web API (the reading source).
//!
//! Only the three read endpoints the sync needs are wrapped: the notebook
//! listing, a book's bookmark list and its chapter infos.

mod client;
mod schema;

pub use client::WeReadClient;
