//! Application state management for cycl3.
//!
//! This module contains the core `App` struct that manages all application state,
//! including the active route, the feed, the login form and background task
//! coordination.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use cycl3_core::api::XrpcClient;
use cycl3_core::auth::{CredentialStore, SessionStore};
use cycl3_core::config::Config;
use cycl3_core::models::{ActorSummary, Post, Profile, RecordRef};
use cycl3_core::nav::{gate, AuthStatus, Gate, Route};
use cycl3_core::{Feed, Gateway, GatewayResult};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for identifier input.
/// Handles are capped at 253 characters by the protocol.
const MAX_IDENTIFIER_LENGTH: usize = 253;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the actor search query
const MAX_QUERY_LENGTH: usize = 100;

/// Server-side post length limit, shown next to the compose box
pub const POST_LENGTH_LIMIT: usize = 300;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

pub const IDENTIFIER_ENV_VAR: &str = "CYCL3_IDENTIFIER";
pub const PASSWORD_ENV_VAR: &str = "CYCL3_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    /// Typing into the feed search box
    Searching,
    /// Typing into the compose box
    Composing,
    /// Typing into the actor search box on the functions view
    FindingActors,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Identifier,
    Password,
    Button,
}

/// State of the functions view: actor search, profile and follow.
#[derive(Debug, Default)]
pub struct FunctionsState {
    pub query: String,
    pub actors: Vec<ActorSummary>,
    pub selection: usize,
    /// Profile of the selected actor, once loaded
    pub profile: Option<Profile>,
    pub busy: bool,
    pub error: Option<String>,
}

impl FunctionsState {
    pub fn selected_actor(&self) -> Option<&ActorSummary> {
        self.actors.get(self.selection)
    }

    /// Move the selection. A loaded profile only belongs to the actor it was
    /// loaded for, so it is dropped when the selection changes.
    pub fn select(&mut self, index: usize) {
        let index = index.min(self.actors.len().saturating_sub(1));
        if index != self.selection {
            self.selection = index;
            self.profile = None;
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned network tasks.
enum BackgroundResult {
    Timeline(GatewayResult<Vec<Post>>),
    PostCreated(GatewayResult<RecordRef>),
    Actors(GatewayResult<Vec<ActorSummary>>),
    Profile(GatewayResult<Profile>),
    Followed(String, GatewayResult<RecordRef>),
}

/// Epochs current when a task was spawned.
///
/// `session` moves on every login and logout; `feed` moves whenever the feed
/// view is mounted again. Results from an older epoch are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Epoch {
    session: u64,
    feed: u64,
}

impl BackgroundResult {
    fn is_feed_result(&self) -> bool {
        matches!(self, BackgroundResult::Timeline(_) | BackgroundResult::PostCreated(_))
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub gateway: Gateway<XrpcClient>,

    // Navigation
    pub auth: AuthStatus,
    pub route: Route,
    /// View currently mounted, if any has been rendered yet
    mounted: Option<Route>,
    pub state: AppState,

    // Views
    pub feed: Feed,
    pub feed_selection: usize,
    pub posting: bool,
    pub functions: FunctionsState,

    // Login form state
    pub login_identifier: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Background task channel
    epoch: Epoch,
    result_rx: mpsc::Receiver<(Epoch, BackgroundResult)>,
    result_tx: mpsc::Sender<(Epoch, BackgroundResult)>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance. The session is not looked up yet.
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(service = %config.service_url, "Config loaded");

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let client = XrpcClient::new(&config.service_url)?;
        let gateway = Gateway::new(client, SessionStore::new(cache_dir));

        Ok(Self::with_gateway(config, gateway))
    }

    /// Build the app around an existing gateway
    pub fn with_gateway(config: Config, gateway: Gateway<XrpcClient>) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Env vars win over the remembered identifier
        let login_identifier = std::env::var(IDENTIFIER_ENV_VAR)
            .ok()
            .or_else(|| config.last_identifier.clone())
            .unwrap_or_default();

        let login_password = std::env::var(PASSWORD_ENV_VAR)
            .ok()
            .or_else(|| CredentialStore::remembered_password(&login_identifier))
            .unwrap_or_default();

        Self {
            config,
            gateway,

            auth: AuthStatus::Unresolved,
            route: Route::Feed,
            mounted: None,
            state: AppState::Normal,

            feed: Feed::new(),
            feed_selection: 0,
            posting: false,
            functions: FunctionsState::default(),

            login_identifier,
            login_password,
            login_focus: LoginFocus::Identifier,
            login_error: None,

            epoch: Epoch { session: 0, feed: 0 },
            result_rx: rx,
            result_tx: tx,

            status_message: None,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Look up the persisted session and settle the auth status
    pub fn resolve_session(&mut self) {
        let restored = self.gateway.restore();
        self.auth = AuthStatus::from_authenticated(restored);
        info!(authenticated = restored, "Session resolved");
    }

    /// Current gate decision for the active route
    pub fn gate(&self) -> Gate {
        gate(self.route, self.auth)
    }

    /// Go to a route, following any redirect the gate asks for.
    /// A view is mounted the first time it renders after another view (or nothing) was shown.
    pub fn navigate(&mut self, route: Route) {
        match gate(route, self.auth) {
            Gate::Loading => {
                self.route = route;
                self.mounted = None;
            }
            Gate::Redirect(target) => self.navigate(target),
            Gate::Render(target) => {
                self.route = target;
                if self.mounted == Some(target) {
                    return;
                }
                self.mounted = Some(target);
                match target {
                    Route::Feed => self.mount_feed(),
                    Route::Login => self.start_login(),
                    Route::Messages | Route::Functions => {}
                }
            }
        }
    }

    /// Handle of the signed-in user
    pub fn handle(&self) -> Option<&str> {
        self.gateway.session().map(|s| s.handle.as_str())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Show the login form
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_identifier.is_empty() {
            LoginFocus::Identifier
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let identifier = self.login_identifier.trim().to_string();
        let password = self.login_password.clone();

        if identifier.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login_error = None;

        match self.gateway.login(&identifier, &password).await {
            Ok(session) => {
                if let Err(e) = CredentialStore::store(&identifier, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_identifier = Some(identifier);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.auth = AuthStatus::Authenticated;
                self.epoch.session += 1;
                self.state = AppState::Normal;
                self.status_message = Some(format!("Signed in as @{}", session.handle));
                self.navigate(Route::Feed);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Drop the session and return to the login form.
    /// Anything still in flight from the old session is ignored when it lands.
    pub fn logout(&mut self) {
        if let Err(e) = self.gateway.logout() {
            warn!(error = %e, "Failed to remove session file");
        }
        if let Some(ref identifier) = self.config.last_identifier {
            if let Err(e) = CredentialStore::forget(identifier) {
                warn!(error = %e, "Failed to remove stored password");
            }
        }
        self.login_password.clear();
        self.auth = AuthStatus::Anonymous;
        self.epoch.session += 1;
        self.feed = Feed::new();
        self.feed_selection = 0;
        self.posting = false;
        self.functions = FunctionsState::default();
        self.status_message = None;
        self.navigate(Route::Feed);
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    /// Run a request off the UI task; its result comes back tagged with the
    /// current epoch.
    fn spawn_request<F>(&self, request: F)
    where
        F: Future<Output = BackgroundResult> + Send + 'static,
    {
        let tx = self.result_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let result = request.await;
            if tx.send((epoch, result)).await.is_err() {
                error!("Failed to send background result - channel closed");
            }
        });
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok((epoch, result)) = self.result_rx.try_recv() {
            self.accept_result(epoch, result);
        }
    }

    fn accept_result(&mut self, epoch: Epoch, result: BackgroundResult) {
        let stale = epoch.session != self.epoch.session
            || (result.is_feed_result() && epoch.feed != self.epoch.feed);
        if stale {
            debug!(?epoch, current = ?self.epoch, "Dropping stale background result");
            return;
        }
        self.process_result(result);
    }

    // =========================================================================
    // Feed
    // =========================================================================

    /// Entering the feed view starts from a fresh feed and fetches once.
    fn mount_feed(&mut self) {
        self.epoch.feed += 1;
        self.feed = Feed::new();
        self.feed_selection = 0;
        self.posting = false;
        self.load_feed();
    }

    /// Spawn a timeline fetch
    pub fn load_feed(&mut self) {
        self.feed.begin_load();
        let gateway = self.gateway.clone();
        self.spawn_request(async move { BackgroundResult::Timeline(gateway.get_timeline().await) });
    }

    /// Post the draft. Blank drafts and double submits are ignored.
    pub fn submit_post(&mut self) {
        if self.posting {
            return;
        }
        let Some(text) = self.feed.take_submission() else {
            return;
        };
        self.posting = true;
        self.status_message = Some("Posting...".to_string());

        let gateway = self.gateway.clone();
        self.spawn_request(async move {
            BackgroundResult::PostCreated(gateway.create_post(&text).await)
        });
    }

    /// Posts currently visible in the feed view
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.feed.filtered()
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.visible_posts().get(self.feed_selection).copied()
    }

    /// Open the selected post's first image, full size, in the browser
    pub fn open_selected_image(&mut self) {
        let url = match self.selected_post().and_then(|p| p.images.first()) {
            Some(image) => image.proxied_fullsize(),
            None => {
                self.status_message = Some("Selected post has no images".to_string());
                return;
            }
        };

        match webbrowser::open(&url) {
            Ok(_) => self.status_message = Some("Opened image in your browser".to_string()),
            Err(e) => {
                warn!(error = %e, url = %url, "Failed to open browser");
                self.status_message = Some(format!("Could not open browser: {}", url));
            }
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Spawn an actor search for the current query
    pub fn search_actors(&mut self) {
        let term = self.functions.query.trim().to_string();
        if term.is_empty() {
            return;
        }
        self.functions.busy = true;
        self.functions.error = None;

        let gateway = self.gateway.clone();
        self.spawn_request(async move { BackgroundResult::Actors(gateway.search_users(&term).await) });
    }

    /// Spawn a profile fetch for the selected actor
    pub fn load_selected_profile(&mut self) {
        let Some(handle) = self.functions.selected_actor().map(|a| a.handle.clone()) else {
            return;
        };
        self.functions.busy = true;

        let gateway = self.gateway.clone();
        self.spawn_request(async move { BackgroundResult::Profile(gateway.get_profile(&handle).await) });
    }

    /// Spawn a follow of the selected actor
    pub fn follow_selected(&mut self) {
        let Some(actor) = self.functions.selected_actor().cloned() else {
            return;
        };
        if self
            .functions
            .profile
            .as_ref()
            .is_some_and(|p| p.did == actor.did && p.is_followed())
        {
            self.status_message = Some(format!("Already following @{}", actor.handle));
            return;
        }
        self.functions.busy = true;

        let gateway = self.gateway.clone();
        self.spawn_request(async move {
            let result = gateway.follow_user(&actor.did).await;
            BackgroundResult::Followed(actor.handle, result)
        });
    }

    // =========================================================================
    // Result handling
    // =========================================================================

    fn process_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Timeline(result) => {
                self.feed.apply_timeline(result);
                let len = self.visible_posts().len();
                if self.feed_selection >= len {
                    self.feed_selection = len.saturating_sub(1);
                }
            }
            BackgroundResult::PostCreated(result) => {
                self.posting = false;
                if self.feed.apply_post_result(result) {
                    self.status_message = Some("Posted".to_string());
                    self.load_feed();
                } else {
                    self.status_message = None;
                }
            }
            BackgroundResult::Actors(result) => {
                self.functions.busy = false;
                match result {
                    Ok(actors) => {
                        self.functions.actors = actors;
                        self.functions.selection = 0;
                        self.functions.profile = None;
                    }
                    Err(e) => self.functions.error = Some(e.to_string()),
                }
            }
            BackgroundResult::Profile(result) => {
                self.functions.busy = false;
                match result {
                    // Only keep it if it still matches the selection
                    Ok(profile) => {
                        if self.functions.selected_actor().is_some_and(|a| a.did == profile.did) {
                            self.functions.profile = Some(profile);
                        }
                        self.functions.error = None;
                    }
                    Err(e) => self.functions.error = Some(e.to_string()),
                }
            }
            BackgroundResult::Followed(handle, result) => {
                self.functions.busy = false;
                match result {
                    Ok(_) => {
                        self.functions.error = None;
                        self.status_message = Some(format!("Followed @{}", handle));
                        self.load_selected_profile();
                    }
                    Err(e) => self.functions.error = Some(e.to_string()),
                }
            }
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for single-line input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an identifier character should be accepted
pub fn can_add_identifier_char(current_len: usize, c: char) -> bool {
    current_len < MAX_IDENTIFIER_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if an actor query character should be accepted
pub fn can_add_query_char(current_len: usize, c: char) -> bool {
    current_len < MAX_QUERY_LENGTH && is_valid_input_char(c)
}

/// Compose box accepts newlines but no other control characters
pub fn can_add_draft_char(c: char) -> bool {
    c == '\n' || is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cycl3_core::FeedStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMELINE: &str = "/xrpc/app.bsky.feed.getTimeline";
    const CREATE_RECORD: &str = "/xrpc/com.atproto.repo.createRecord";

    fn actor(name: &str) -> ActorSummary {
        ActorSummary {
            did: format!("did:plc:{}", name),
            handle: format!("{}.bsky.social", name),
            display_name: None,
            description: None,
        }
    }

    fn profile_of(actor: &ActorSummary) -> Profile {
        Profile {
            did: actor.did.clone(),
            handle: actor.handle.clone(),
            display_name: None,
            description: None,
            followers_count: 0,
            follows_count: 0,
            posts_count: 0,
            viewer: Default::default(),
        }
    }

    fn timeline_body(texts: &[&str]) -> serde_json::Value {
        let feed: Vec<serde_json::Value> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                serde_json::json!({"post": {
                    "uri": format!("at://did:plc:bob/app.bsky.feed.post/{}", i),
                    "author": {"did": "did:plc:bob", "handle": "bob.bsky.social"},
                    "record": {"text": text, "createdAt": "2024-05-01T12:00:00.000Z"},
                    "indexedAt": "2024-05-01T12:00:01.000Z"
                }})
            })
            .collect();
        serde_json::json!({ "feed": feed })
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.server.createSession"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "did": "did:plc:alice",
                "handle": "alice.bsky.social",
                "accessJwt": "aaa",
                "refreshJwt": "rrr"
            })))
            .mount(server)
            .await;
    }

    fn gateway_for(server_uri: &str, dir: &tempfile::TempDir) -> Gateway<XrpcClient> {
        let client = XrpcClient::new(server_uri).expect("client");
        Gateway::new(client, SessionStore::new(dir.path().to_path_buf()))
    }

    /// App whose session was saved by an earlier run
    async fn returning_user(server: &MockServer, dir: &tempfile::TempDir) -> App {
        mount_login(server).await;
        let mut earlier = gateway_for(&server.uri(), dir);
        earlier.login("alice", "pw").await.expect("earlier login");

        let mut app = App::with_gateway(Config::default(), gateway_for(&server.uri(), dir));
        app.resolve_session();
        app
    }

    /// App that never talks to a server
    fn offline_app(dir: &tempfile::TempDir) -> App {
        App::with_gateway(Config::default(), gateway_for("http://127.0.0.1:9", dir))
    }

    impl App {
        /// Wait for `count` background results and apply them as the UI loop would
        async fn settle(&mut self, count: usize) {
            for _ in 0..count {
                let (epoch, result) = self.result_rx.recv().await.expect("result");
                self.accept_result(epoch, result);
            }
            self.check_background_tasks();
        }
    }

    #[tokio::test]
    async fn test_startup_with_saved_session_fetches_timeline_once() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        Mock::given(method("GET"))
            .and(path(TIMELINE))
            .respond_with(ResponseTemplate::new(200).set_body_json(timeline_body(&["hello", "world"])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = returning_user(&server, &dir).await;
        assert_eq!(app.auth, AuthStatus::Authenticated);

        app.navigate(Route::Feed);
        assert!(app.feed.is_loading());
        app.settle(1).await;

        assert_eq!(app.route, Route::Feed);
        assert_eq!(app.feed.status, FeedStatus::Ready);
        assert_eq!(app.feed.posts().len(), 2);

        // Staying on the feed does not fetch again
        app.navigate(Route::Feed);
        assert!(!app.feed.is_loading());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_startup_without_session_shows_login() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = offline_app(&dir);

        app.navigate(Route::Feed);
        assert_eq!(app.gate(), Gate::Loading);

        app.resolve_session();
        app.navigate(Route::Functions);
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.state, AppState::LoggingIn);
    }

    #[tokio::test]
    async fn test_post_refetches_once_and_ignores_double_submit() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        Mock::given(method("GET"))
            .and(path(TIMELINE))
            .respond_with(ResponseTemplate::new(200).set_body_json(timeline_body(&["older"])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CREATE_RECORD))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uri": "at://did:plc:alice/app.bsky.feed.post/1",
                "cid": "bafy"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = returning_user(&server, &dir).await;
        app.navigate(Route::Feed);
        app.settle(1).await;

        app.feed.draft = "hello from the terminal".to_string();
        app.submit_post();
        app.submit_post();
        assert!(app.posting);

        // The post, then the one refetch it triggers
        app.settle(2).await;

        assert!(!app.posting);
        assert!(app.feed.draft.is_empty());
        assert_eq!(app.feed.status, FeedStatus::Ready);
        assert_eq!(app.status_message.as_deref(), Some("Posted"));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_failed_post_keeps_draft_and_skips_refetch() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        Mock::given(method("GET"))
            .and(path(TIMELINE))
            .respond_with(ResponseTemplate::new(200).set_body_json(timeline_body(&[])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CREATE_RECORD))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "InvalidRequest",
                "message": "Record/text must not be longer than 300 graphemes"
            })))
            .mount(&server)
            .await;

        let mut app = returning_user(&server, &dir).await;
        app.navigate(Route::Feed);
        app.settle(1).await;

        app.feed.draft = "x".repeat(400);
        app.submit_post();
        app.settle(1).await;

        assert!(!app.posting);
        assert_eq!(app.feed.draft.len(), 400);
        assert_eq!(app.feed.error.as_deref(), Some(cycl3_core::feed::POST_ERROR));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_blank_draft_is_not_posted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = offline_app(&dir);

        app.feed.draft = "   ".to_string();
        app.submit_post();

        assert!(!app.posting);
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_logout_resets_state_and_drops_late_results() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        Mock::given(method("GET"))
            .and(path(TIMELINE))
            .respond_with(ResponseTemplate::new(200).set_body_json(timeline_body(&["secret"])))
            .mount(&server)
            .await;

        let mut app = returning_user(&server, &dir).await;
        app.navigate(Route::Feed);
        app.functions.actors.push(actor("carol"));

        // The mount fetch is still in flight
        app.logout();
        app.settle(1).await;

        assert_eq!(app.auth, AuthStatus::Anonymous);
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(app.feed.posts().is_empty());
        assert!(app.functions.actors.is_empty());
        assert!(app.handle().is_none());
    }

    #[tokio::test]
    async fn test_remount_drops_previous_timeline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = offline_app(&dir);
        app.auth = AuthStatus::Authenticated;
        app.navigate(Route::Feed);

        let old = app.epoch;
        app.navigate(Route::Messages);
        app.navigate(Route::Feed);
        assert_ne!(app.epoch.feed, old.feed);

        app.accept_result(old, BackgroundResult::Timeline(Ok(Vec::new())));
        assert!(app.feed.is_loading());
    }

    #[tokio::test]
    async fn test_selection_change_clears_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = offline_app(&dir);
        let (alice, bob) = (actor("alice"), actor("bob"));
        app.functions.actors = vec![alice.clone(), bob.clone()];
        app.functions.profile = Some(profile_of(&alice));

        app.functions.select(1);
        assert!(app.functions.profile.is_none());
        assert_eq!(app.functions.selected_actor(), Some(&bob));

        // Clamped to the list
        app.functions.select(5);
        assert_eq!(app.functions.selection, 1);
    }

    #[tokio::test]
    async fn test_profile_result_clears_error_and_ignores_other_actor() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = offline_app(&dir);
        let (alice, bob) = (actor("alice"), actor("bob"));
        app.functions.actors = vec![alice.clone(), bob.clone()];
        app.functions.error = Some("Profile not found".to_string());

        app.process_result(BackgroundResult::Profile(Ok(profile_of(&alice))));
        assert!(app.functions.error.is_none());
        assert_eq!(app.functions.profile.as_ref().map(|p| p.did.as_str()), Some("did:plc:alice"));

        // Selection moved on before the response landed
        app.functions.select(1);
        app.process_result(BackgroundResult::Profile(Ok(profile_of(&alice))));
        assert!(app.functions.profile.is_none());
        assert_eq!(app.functions.actors.len(), 2);
    }

    #[test]
    fn test_can_add_identifier_char() {
        assert!(can_add_identifier_char(0, 'a'));
        assert!(can_add_identifier_char(0, '@'));
        assert!(can_add_identifier_char(252, 'z'));
        assert!(!can_add_identifier_char(253, 'a'));
        assert!(!can_add_identifier_char(0, ' '));
        assert!(!can_add_identifier_char(0, '\x00'));
        assert!(!can_add_identifier_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(can_add_password_char(0, ' '));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_query_char() {
        assert!(can_add_query_char(0, 'a'));
        assert!(!can_add_query_char(100, 'a'));
        assert!(!can_add_query_char(0, '\x1b'));
    }

    #[test]
    fn test_can_add_draft_char() {
        assert!(can_add_draft_char('a'));
        assert!(can_add_draft_char('\n'));
        assert!(can_add_draft_char('🦋'));
        assert!(!can_add_draft_char('\x07'));
    }
}
