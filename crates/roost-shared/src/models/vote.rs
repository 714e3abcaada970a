use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single vote row. `value` is +1 or -1; at most one row is expected per
/// (post, user) pair, kept that way by the store's toggle operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Uuid,
    pub value: i32,
}
