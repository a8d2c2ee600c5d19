//! View-specific content rendering.

pub mod feed;
pub mod functions;
pub mod messages;
