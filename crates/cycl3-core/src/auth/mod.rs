//! Authentication module for managing the user session and credentials.
//!
//! This module provides:
//! - `SessionStore`: The single active session, persisted to disk
//! - `CredentialStore`: Secure OS-level password storage via keyring
//! - `format_identifier`: Login identifier normalization
//!
//! Sessions never expire locally; a restored session is trusted until logout.

pub mod credentials;
pub mod identifier;
pub mod session;

pub use credentials::CredentialStore;
pub use identifier::format_identifier;
pub use session::{Session, SessionStore};
