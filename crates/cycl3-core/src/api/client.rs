//! XRPC client for communicating with a Bluesky PDS.
//!
//! This module provides the `AtpClient` trait, the network seam the gateway
//! talks to, and `XrpcClient`, its HTTPS implementation. The client keeps no
//! session state: every authenticated call is handed the session to use.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::Session;
use crate::models::{ActorSummary, Post, Profile, RecordRef, SearchActorsResponse, TimelineResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default PDS entryway
pub const DEFAULT_SERVICE_URL: &str = "https://bsky.social";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const POST_COLLECTION: &str = "app.bsky.feed.post";
const FOLLOW_COLLECTION: &str = "app.bsky.graph.follow";

// ============================================================================
// Client seam
// ============================================================================

/// Operations the app needs from the network.
#[async_trait]
pub trait AtpClient: Send + Sync {
    async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, ApiError>;

    async fn get_timeline(&self, session: &Session) -> Result<Vec<Post>, ApiError>;

    async fn create_post(
        &self,
        session: &Session,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<RecordRef, ApiError>;

    async fn search_actors(
        &self,
        session: &Session,
        term: &str,
        limit: u8,
    ) -> Result<Vec<ActorSummary>, ApiError>;

    async fn get_profile(&self, session: &Session, actor: &str) -> Result<Profile, ApiError>;

    async fn follow(
        &self,
        session: &Session,
        subject_did: &str,
        created_at: DateTime<Utc>,
    ) -> Result<RecordRef, ApiError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    did: String,
    handle: String,
    email: Option<String>,
    #[serde(rename = "accessJwt")]
    access_jwt: String,
    #[serde(rename = "refreshJwt")]
    refresh_jwt: String,
}

#[derive(Debug, Serialize)]
struct CreateRecordRequest<'a, R: Serialize> {
    repo: &'a str,
    collection: &'a str,
    record: R,
}

#[derive(Debug, Serialize)]
struct PostRecordBody<'a> {
    #[serde(rename = "$type")]
    kind: &'a str,
    text: &'a str,
    #[serde(rename = "createdAt")]
    created_at: String,
}

#[derive(Debug, Serialize)]
struct FollowRecordBody<'a> {
    #[serde(rename = "$type")]
    kind: &'a str,
    subject: &'a str,
    #[serde(rename = "createdAt")]
    created_at: String,
}

fn record_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// XRPC implementation
// ============================================================================

/// XRPC over HTTPS.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct XrpcClient {
    client: Client,
    service_url: String,
}

impl XrpcClient {
    /// Create a client for the given PDS, e.g. `https://bsky.social`
    pub fn new(service_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            service_url: service_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.service_url, method)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response, method: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", method, e)))
    }

    /// XRPC query (GET)
    async fn query<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        debug!(method, "XRPC query");
        let response = self
            .client
            .get(self.xrpc_url(method))
            .bearer_auth(&session.access_jwt)
            .header(header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse(response, method).await
    }

    /// XRPC procedure (POST)
    async fn procedure<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        session: Option<&Session>,
        method: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(method, "XRPC procedure");
        let mut request = self
            .client
            .post(self.xrpc_url(method))
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(session) = session {
            request = request.bearer_auth(&session.access_jwt);
        }

        let response = Self::check_response(request.send().await?).await?;
        Self::parse(response, method).await
    }

    async fn create_record<R: Serialize + Send + Sync>(
        &self,
        session: &Session,
        collection: &str,
        record: R,
    ) -> Result<RecordRef, ApiError> {
        let body = CreateRecordRequest {
            repo: &session.did,
            collection,
            record,
        };
        self.procedure(Some(session), "com.atproto.repo.createRecord", &body)
            .await
    }
}

#[async_trait]
impl AtpClient for XrpcClient {
    async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, ApiError> {
        let body = CreateSessionRequest { identifier, password };
        let resp: CreateSessionResponse = self
            .procedure(None, "com.atproto.server.createSession", &body)
            .await?;

        Ok(Session {
            did: resp.did,
            handle: resp.handle,
            email: resp.email,
            access_jwt: resp.access_jwt,
            refresh_jwt: resp.refresh_jwt,
            created_at: Utc::now(),
        })
    }

    async fn get_timeline(&self, session: &Session) -> Result<Vec<Post>, ApiError> {
        let resp: TimelineResponse = self.query(session, "app.bsky.feed.getTimeline", &[]).await?;
        debug!(count = resp.feed.len(), has_cursor = resp.cursor.is_some(), "Timeline page received");
        Ok(resp.feed.iter().map(|item| item.to_post()).collect())
    }

    async fn create_post(
        &self,
        session: &Session,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<RecordRef, ApiError> {
        let record = PostRecordBody {
            kind: POST_COLLECTION,
            text,
            created_at: record_timestamp(created_at),
        };
        self.create_record(session, POST_COLLECTION, record).await
    }

    async fn search_actors(
        &self,
        session: &Session,
        term: &str,
        limit: u8,
    ) -> Result<Vec<ActorSummary>, ApiError> {
        let limit = limit.to_string();
        let resp: SearchActorsResponse = self
            .query(
                session,
                "app.bsky.actor.searchActors",
                &[("q", term), ("limit", limit.as_str())],
            )
            .await?;
        Ok(resp.actors)
    }

    async fn get_profile(&self, session: &Session, actor: &str) -> Result<Profile, ApiError> {
        self.query(session, "app.bsky.actor.getProfile", &[("actor", actor)])
            .await
    }

    async fn follow(
        &self,
        session: &Session,
        subject_did: &str,
        created_at: DateTime<Utc>,
    ) -> Result<RecordRef, ApiError> {
        let record = FollowRecordBody {
            kind: FOLLOW_COLLECTION,
            subject: subject_did,
            created_at: record_timestamp(created_at),
        };
        self.create_record(session, FOLLOW_COLLECTION, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{body_partial_json, header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Session {
        Session {
            did: "did:plc:me".to_string(),
            handle: "me.bsky.social".to_string(),
            email: None,
            access_jwt: "access-token".to_string(),
            refresh_jwt: "refresh-token".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_session_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.server.createSession"))
            .and(body_partial_json(serde_json::json!({
                "identifier": "alice.bsky.social",
                "password": "app-pass"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "did": "did:plc:alice",
                "handle": "alice.bsky.social",
                "email": "alice@example.com",
                "accessJwt": "aaa",
                "refreshJwt": "rrr"
            })))
            .mount(&server)
            .await;

        let client = XrpcClient::new(&server.uri()).expect("client");
        let session = client
            .create_session("alice.bsky.social", "app-pass")
            .await
            .expect("login succeeds");

        assert_eq!(session.handle, "alice.bsky.social");
        assert_eq!(session.did, "did:plc:alice");
        assert_eq!(session.email.as_deref(), Some("alice@example.com"));
        assert_eq!(session.access_jwt, "aaa");
        assert_eq!(session.refresh_jwt, "rrr");
    }

    #[tokio::test]
    async fn test_create_session_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.server.createSession"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "AuthenticationRequired",
                "message": "Invalid identifier or password"
            })))
            .mount(&server)
            .await;

        let client = XrpcClient::new(&server.uri()).expect("client");
        let err = client
            .create_session("alice.bsky.social", "wrong")
            .await
            .expect_err("login fails");
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_get_timeline_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.feed.getTimeline"))
            .and(header_eq("authorization", "Bearer access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "feed": [{"post": {
                    "uri": "at://did:plc:bob/app.bsky.feed.post/1",
                    "author": {"did": "did:plc:bob", "handle": "bob.bsky.social"},
                    "record": {"text": "hi there", "createdAt": "2024-05-01T12:00:00.000Z"},
                    "indexedAt": "2024-05-01T12:00:00.000Z"
                }}]
            })))
            .mount(&server)
            .await;

        let client = XrpcClient::new(&server.uri()).expect("client");
        let posts = client.get_timeline(&session()).await.expect("timeline");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text, "hi there");
        assert_eq!(posts[0].author_handle, "bob.bsky.social");
    }

    #[tokio::test]
    async fn test_get_timeline_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.feed.getTimeline"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = XrpcClient::new(&server.uri()).expect("client");
        let err = client.get_timeline(&session()).await.expect_err("bad body");
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_create_post_record_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.repo.createRecord"))
            .and(body_partial_json(serde_json::json!({
                "repo": "did:plc:me",
                "collection": "app.bsky.feed.post",
                "record": {
                    "$type": "app.bsky.feed.post",
                    "text": "first post",
                    "createdAt": "2024-05-01T12:30:00.000Z"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uri": "at://did:plc:me/app.bsky.feed.post/abc",
                "cid": "bafyabc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = XrpcClient::new(&server.uri()).expect("client");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let record = client
            .create_post(&session(), "first post", at)
            .await
            .expect("post created");
        assert_eq!(record.cid, "bafyabc");
    }

    #[tokio::test]
    async fn test_search_actors_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.actor.searchActors"))
            .and(query_param("q", "ali"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "actors": [{"did": "did:plc:alice", "handle": "alice.bsky.social", "displayName": "Alice"}]
            })))
            .mount(&server)
            .await;

        let client = XrpcClient::new(&server.uri()).expect("client");
        let actors = client.search_actors(&session(), "ali", 10).await.expect("search");
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].display_name(), "Alice");
    }

    #[tokio::test]
    async fn test_follow_record_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.repo.createRecord"))
            .and(body_partial_json(serde_json::json!({
                "collection": "app.bsky.graph.follow",
                "record": {"$type": "app.bsky.graph.follow", "subject": "did:plc:alice"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uri": "at://did:plc:me/app.bsky.graph.follow/xyz",
                "cid": "bafyxyz"
            })))
            .mount(&server)
            .await;

        let client = XrpcClient::new(&server.uri()).expect("client");
        let record = client
            .follow(&session(), "did:plc:alice", Utc::now())
            .await
            .expect("followed");
        assert_eq!(record.uri, "at://did:plc:me/app.bsky.graph.follow/xyz");
    }

    #[test]
    fn test_service_url_trailing_slash() {
        let client = XrpcClient::new("https://bsky.social/").expect("client");
        assert_eq!(client.xrpc_url("a.b.c"), "https://bsky.social/xrpc/a.b.c");
    }
}
