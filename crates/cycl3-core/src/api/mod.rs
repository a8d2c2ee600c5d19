//! XRPC API client module for Bluesky services.
//!
//! This module provides the `AtpClient` seam and the `XrpcClient` used to
//! talk to a PDS: session creation, the home timeline, posting, actor
//! search, profiles and follows.
//!
//! Authenticated calls use the session's access JWT as a bearer token.

pub mod client;
pub mod error;

pub use client::{AtpClient, XrpcClient, DEFAULT_SERVICE_URL};
pub use error::ApiError;
