use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<i64>,
}

/// Returned by the storage upload endpoint; the URL goes into
/// `CreatePostRequest::image_url`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub public_url: String,
}
