use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Status returned on an ownership mismatch. The surface is inconsistent on
/// purpose: blog endpoints deny with 403 while the wishlist listing denies
/// with 401, and both are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deny {
    Forbidden,
    Unauthorized,
}

/// Ownership predicate shared by every protected handler: the verified
/// identity's email must equal the resource-owning email, else fail closed.
/// Callers pass the owner email however their endpoint carries it (path
/// segment, body field, or stored resource field).
pub fn ensure_owner(auth: &AuthUser, owner_email: &str, deny: Deny) -> Result<(), ApiError> {
    if auth.email == owner_email {
        return Ok(());
    }

    match deny {
        Deny::Forbidden => Err(ApiError::forbidden("Forbidden access")),
        Deny::Unauthorized => Err(ApiError::unauthorized("Forbidden access")),
    }
}
