use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The current identity as reported by the auth provider. Content rows carry
/// backend-assigned integer ids; user identity is a provider UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
