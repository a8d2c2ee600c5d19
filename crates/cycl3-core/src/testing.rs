//! In-memory `AtpClient` for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use crate::api::{ApiError, AtpClient};
use crate::auth::Session;
use crate::models::{ActorSummary, Post, Profile, RecordRef, ViewerState};

pub fn sample_post(text: &str, author: &str) -> Post {
    Post {
        uri: format!("at://did:plc:{}/app.bsky.feed.post/{}", author, text.len()),
        author_handle: author.to_string(),
        author_display_name: None,
        text: text.to_string(),
        created_at: None,
        indexed_at: Utc::now(),
        images: Vec::new(),
    }
}

#[derive(Default)]
pub struct FakeClient {
    timeline: Mutex<Vec<Post>>,
    login_error: Mutex<Option<(u16, String)>>,
    last_identifier: Mutex<Option<String>>,
    posted: Mutex<Vec<String>>,
    last_search: Mutex<Option<(String, u8)>>,
    followed: Mutex<Vec<String>>,
    fail_timeline: AtomicBool,
    fail_post: AtomicBool,
    timeline_calls: AtomicUsize,
    other_calls: AtomicUsize,
}

impl FakeClient {
    pub fn set_timeline(&self, posts: Vec<Post>) {
        *self.timeline.lock().unwrap() = posts;
    }

    pub fn fail_login(&self, status: u16, body: &str) {
        *self.login_error.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn fail_timeline(&self, fail: bool) {
        self.fail_timeline.store(fail, Ordering::SeqCst);
    }

    pub fn fail_post(&self, fail: bool) {
        self.fail_post.store(fail, Ordering::SeqCst);
    }

    pub fn last_identifier(&self) -> Option<String> {
        self.last_identifier.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }

    /// Term and limit of the most recent actor search
    pub fn last_search(&self) -> Option<(String, u8)> {
        self.last_search.lock().unwrap().clone()
    }

    pub fn followed(&self) -> Vec<String> {
        self.followed.lock().unwrap().clone()
    }

    pub fn timeline_calls(&self) -> usize {
        self.timeline_calls.load(Ordering::SeqCst)
    }

    /// Authenticated calls of any kind
    pub fn total_calls(&self) -> usize {
        self.timeline_calls() + self.other_calls.load(Ordering::SeqCst) + self.posted().len()
    }
}

fn record(collection: &str) -> RecordRef {
    RecordRef {
        uri: format!("at://did:plc:me/{}/1", collection),
        cid: "bafytest".to_string(),
    }
}

#[async_trait]
impl AtpClient for FakeClient {
    async fn create_session(&self, identifier: &str, _password: &str) -> Result<Session, ApiError> {
        *self.last_identifier.lock().unwrap() = Some(identifier.to_string());
        if let Some((status, body)) = self.login_error.lock().unwrap().clone() {
            let status = StatusCode::from_u16(status).unwrap();
            return Err(ApiError::from_status(status, &body));
        }
        Ok(Session {
            did: format!("did:plc:{}", identifier.split('.').next().unwrap_or(identifier)),
            handle: identifier.to_string(),
            email: None,
            access_jwt: "access".to_string(),
            refresh_jwt: "refresh".to_string(),
            created_at: Utc::now(),
        })
    }

    async fn get_timeline(&self, _session: &Session) -> Result<Vec<Post>, ApiError> {
        self.timeline_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_timeline.load(Ordering::SeqCst) {
            return Err(ApiError::ServerError("upstream unavailable".to_string()));
        }
        Ok(self.timeline.lock().unwrap().clone())
    }

    async fn create_post(
        &self,
        _session: &Session,
        text: &str,
        _created_at: DateTime<Utc>,
    ) -> Result<RecordRef, ApiError> {
        if self.fail_post.load(Ordering::SeqCst) {
            self.other_calls.fetch_add(1, Ordering::SeqCst);
            return Err(ApiError::BadRequest("Record/text too long".to_string()));
        }
        self.posted.lock().unwrap().push(text.to_string());
        Ok(record("app.bsky.feed.post"))
    }

    async fn search_actors(
        &self,
        _session: &Session,
        term: &str,
        limit: u8,
    ) -> Result<Vec<ActorSummary>, ApiError> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search.lock().unwrap() = Some((term.to_string(), limit));
        Ok((0..limit.min(2))
            .map(|i| ActorSummary {
                did: format!("did:plc:{}{}", term, i),
                handle: format!("{}{}.bsky.social", term, i),
                display_name: None,
                description: None,
            })
            .collect())
    }

    async fn get_profile(&self, _session: &Session, actor: &str) -> Result<Profile, ApiError> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Profile {
            did: format!("did:plc:{}", actor),
            handle: actor.to_string(),
            display_name: None,
            description: None,
            followers_count: 1,
            follows_count: 2,
            posts_count: 3,
            viewer: ViewerState::default(),
        })
    }

    async fn follow(
        &self,
        _session: &Session,
        subject_did: &str,
        _created_at: DateTime<Utc>,
    ) -> Result<RecordRef, ApiError> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        self.followed.lock().unwrap().push(subject_did.to_string());
        Ok(record("app.bsky.graph.follow"))
    }
}
