//! Timeline state for the feed view.
//!
//! `Feed` holds the last fetched timeline, the compose draft and the search
//! term. The transition methods (`begin_load`, `apply_timeline`,
//! `take_submission`, `apply_post_result`) are synchronous so a UI can run
//! the network calls elsewhere and feed the results back in; `refresh` and
//! `submit` chain them against a `Gateway` directly.

use tracing::{debug, warn};

use crate::api::AtpClient;
use crate::gateway::{Gateway, GatewayResult};
use crate::models::{Post, RecordRef};

pub const LOAD_ERROR: &str = "Failed to load posts";
pub const POST_ERROR: &str = "Failed to create post";
pub const NO_POSTS: &str = "No posts available";
pub const NO_MATCHES: &str = "No posts found matching your search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone)]
pub struct Feed {
    pub status: FeedStatus,
    posts: Vec<Post>,
    pub draft: String,
    pub search_term: String,
    pub error: Option<String>,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

impl Feed {
    /// A feed that has not fetched yet starts out loading.
    pub fn new() -> Self {
        Self {
            status: FeedStatus::Loading,
            posts: Vec::new(),
            draft: String::new(),
            search_term: String::new(),
            error: None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }

    pub fn begin_load(&mut self) {
        self.status = FeedStatus::Loading;
    }

    /// Apply the outcome of a timeline fetch. The sequence is replaced
    /// wholesale on success; on failure the previous posts stay visible.
    pub fn apply_timeline(&mut self, result: GatewayResult<Vec<Post>>) {
        match result {
            Ok(posts) => {
                debug!(count = posts.len(), "Timeline loaded");
                self.posts = posts;
                self.status = FeedStatus::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Timeline load failed");
                self.error = Some(LOAD_ERROR.to_string());
                self.status = FeedStatus::Error;
            }
        }
    }

    /// Text to post, or `None` when the draft is blank.
    /// The draft itself is left untouched until the post succeeds.
    pub fn take_submission(&self) -> Option<String> {
        if self.draft.trim().is_empty() {
            None
        } else {
            Some(self.draft.clone())
        }
    }

    /// Apply the outcome of a post. Returns true when the timeline must be
    /// fetched again.
    pub fn apply_post_result(&mut self, result: GatewayResult<RecordRef>) -> bool {
        match result {
            Ok(record) => {
                debug!(uri = %record.uri, "Post created");
                self.draft.clear();
                true
            }
            Err(e) => {
                warn!(error = %e, "Post creation failed");
                self.error = Some(POST_ERROR.to_string());
                false
            }
        }
    }

    /// Posts matching the search term, in timeline order.
    pub fn filtered(&self) -> Vec<&Post> {
        let term = self.search_term.as_str();
        self.posts.iter().filter(|p| p.matches_search(term)).collect()
    }

    /// What to show when `filtered()` is empty
    pub fn empty_message(&self) -> &'static str {
        if self.search_term.is_empty() {
            NO_POSTS
        } else {
            NO_MATCHES
        }
    }

    /// Fetch the timeline through the gateway.
    pub async fn refresh<C: AtpClient>(&mut self, gateway: &Gateway<C>) {
        self.begin_load();
        let result = gateway.get_timeline().await;
        self.apply_timeline(result);
    }

    /// Post the draft, then reload the timeline once on success.
    /// Returns false if nothing was posted.
    pub async fn submit<C: AtpClient>(&mut self, gateway: &Gateway<C>) -> bool {
        let Some(text) = self.take_submission() else {
            return false;
        };
        let result = gateway.create_post(&text).await;
        if self.apply_post_result(result) {
            self.refresh(gateway).await;
            true
        } else {
            false
        }
    }
}
