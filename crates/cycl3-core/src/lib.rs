//! Core library for cycl3, a terminal Bluesky client.
//!
//! - `api`: XRPC client and its `AtpClient` seam
//! - `auth`: Session store, keychain credentials, identifier normalization
//! - `gateway`: Session-checked operations returning `GatewayResult`
//! - `feed`: Timeline, compose and search state for the feed view
//! - `nav`: Routes and the authentication gate
//! - `models`: Posts, actors, profiles
//! - `config`: Persisted settings

pub mod api;
pub mod auth;
pub mod config;
pub mod feed;
pub mod gateway;
pub mod models;
pub mod nav;
pub mod utils;

#[cfg(test)]
mod testing;

pub use api::{ApiError, AtpClient, XrpcClient};
pub use auth::{CredentialStore, Session, SessionStore};
pub use config::Config;
pub use feed::{Feed, FeedStatus};
pub use gateway::{Gateway, GatewayError, GatewayResult};
pub use nav::{gate, AuthStatus, Gate, Route};
