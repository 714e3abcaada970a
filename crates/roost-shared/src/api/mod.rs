mod auth;
mod comments;
mod communities;
mod posts;
mod votes;

pub use auth::*;
pub use comments::*;
pub use communities::*;
pub use posts::*;
pub use votes::*;
