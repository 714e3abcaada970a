use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// Feed annotations. The backend omits them on detail responses.
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comment_count: i64,
}

/// A post joined with the name of the community it was filed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithCommunity {
    #[serde(flatten)]
    pub post: Post,
    pub community_name: String,
}
