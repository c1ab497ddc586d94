//! Blocking client for the amoCRM REST API.
//!
//! # Overview
//! `AmoClient` wraps one amoCRM account (`https://<subdomain>.amocrm.ru`)
//! and exposes the v4 endpoints as methods, plus the older v2 endpoints
//! through [`AmoClient::v2`]. Request and response bodies are plain
//! `serde_json::Value`s; the client only decides paths, query strings,
//! authentication and how a raw response becomes a payload or an error.
//!
//! # Design
//! - Three ways to authenticate ([`Auth`]): OAuth token pairs that refresh
//!   on 401, a long-lived token, or the legacy login + API hash session.
//! - All network I/O goes through the [`Transport`] trait. The default
//!   [`UreqTransport`] is blocking; tests plug in a scripted transport.
//! - Every failure is an [`AmoError`] carrying the decoded error body and a
//!   status code. Transport failures and undecodable bodies use 500.
//! - The library logs through `tracing` and never installs a subscriber.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod legacy;
pub mod query;
pub mod transport;

#[cfg(test)]
mod testing;

pub use api::{
    AccountWith, EntityType, NewPipeline, NewUnsorted, PipelineUpdate, StatusUpdate,
    UnsortedCategory, UserWith,
};
pub use auth::Auth;
pub use client::AmoClient;
pub use config::{ClientConfig, ConfigError};
pub use credentials::{LegacyCredentials, OAuthCredentials, TokenPair};
pub use error::{AmoError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use legacy::{
    IncomingLeadsQuery, LegacyAccountWith, LegacyApi, LegacyEntity, LegacyQuery, NoteTarget,
};
pub use query::{Filter, ListParams, Query, SortOrder};
pub use transport::{Transport, UreqTransport};
