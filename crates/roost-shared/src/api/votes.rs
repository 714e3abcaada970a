use serde::{Deserialize, Serialize};

/// One atomic toggle per user action. The store evaluates the toggle rule
/// (insert / remove / switch) transactionally against the caller's existing
/// vote and responds with the post's refreshed vote list.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleVoteRequest {
    pub value: i32,
}
