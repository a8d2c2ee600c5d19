//! Routes and the authentication gate in front of them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Feed,
    Messages,
    Functions,
}

impl Route {
    /// Resolve a path. Unknown paths fall back to the feed.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/login" => Route::Login,
            "/messages" => Route::Messages,
            "/functions" => Route::Functions,
            _ => Route::Feed,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Feed => "/",
            Route::Messages => "/messages",
            Route::Functions => "/functions",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Feed => "Feed",
            Route::Messages => "Messages",
            Route::Functions => "Functions",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Next protected view (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Route::Feed => Route::Messages,
            Route::Messages => Route::Functions,
            Route::Functions | Route::Login => Route::Feed,
        }
    }

    /// Previous protected view (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Route::Feed | Route::Login => Route::Functions,
            Route::Messages => Route::Feed,
            Route::Functions => Route::Messages,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Session not yet looked up
    Unresolved,
    Anonymous,
    Authenticated,
}

impl AuthStatus {
    pub fn from_authenticated(authenticated: bool) -> Self {
        if authenticated {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }
}

/// What to show for a requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Loading,
    Redirect(Route),
    Render(Route),
}

pub fn gate(route: Route, auth: AuthStatus) -> Gate {
    match (auth, route) {
        (AuthStatus::Unresolved, _) => Gate::Loading,
        (AuthStatus::Anonymous, r) if r.is_protected() => Gate::Redirect(Route::Login),
        (AuthStatus::Authenticated, Route::Login) => Gate::Redirect(Route::Feed),
        (_, r) => Gate::Render(r),
    }
}
