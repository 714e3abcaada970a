pub mod api;
pub mod models;
pub mod thread;
pub mod voting;

pub use models::*;
pub use thread::{CommentNode, CommentThread};
pub use voting::VoteTally;
