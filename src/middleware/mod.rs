pub mod auth;
pub mod guard;

pub use auth::{bearer_auth_middleware, AuthUser};
pub use guard::{ensure_owner, Deny};
