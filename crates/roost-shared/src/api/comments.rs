use serde::{Deserialize, Serialize};

/// The post id rides in the request path; the author identity is taken from
/// the bearer token, with the display name stored denormalized on the row.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<i64>,
    pub author: String,
}
