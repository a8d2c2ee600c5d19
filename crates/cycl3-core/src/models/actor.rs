use serde::{Deserialize, Serialize};

/// Search result entry from app.bsky.actor.searchActors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSummary {
    pub did: String,
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl ActorSummary {
    /// Display name when set, otherwise the handle
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.handle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerState {
    /// URI of the viewer's follow record, if already following
    pub following: Option<String>,
    #[serde(rename = "followedBy")]
    pub followed_by: Option<String>,
}

/// Detailed profile from app.bsky.actor.getProfile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub did: String,
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "followersCount", default)]
    pub followers_count: u64,
    #[serde(rename = "followsCount", default)]
    pub follows_count: u64,
    #[serde(rename = "postsCount", default)]
    pub posts_count: u64,
    #[serde(default)]
    pub viewer: ViewerState,
}

impl Profile {
    pub fn is_followed(&self) -> bool {
        self.viewer.following.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchActorsResponse {
    #[serde(default)]
    pub actors: Vec<ActorSummary>,
}

/// Reference to a record created in the user's repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRef {
    pub uri: String,
    pub cid: String,
}
