//! Data models for Bluesky entities.
//!
//! This module contains the data structures used to represent
//! network data:
//!
//! - `Post`, `PostImage`: Timeline entries and their image attachments
//! - `ActorSummary`, `Profile`: Account search results and profile details
//! - `RecordRef`: Reference to a record created in the user's repository
//!
//! The `*Response` / `*View` types mirror the XRPC JSON shapes and are
//! converted into the domain types by the API client.

pub mod actor;
pub mod post;

pub use actor::{ActorSummary, Profile, RecordRef, SearchActorsResponse, ViewerState};
pub use post::{FeedViewPost, Post, PostImage, TimelineResponse};
