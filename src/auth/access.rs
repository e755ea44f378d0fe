use crate::{auth::claims::Claims, error::AppError};

/// Self-or-admin: the caller owns the resource or holds the admin flag.
pub fn is_authorized(caller: &Claims, owner_email: &str) -> bool {
    caller.is_admin || caller.email == owner_email
}

/// Gate for operations over every account; owning one of them is not enough.
pub fn require_admin(caller: &Claims) -> Result<(), AppError> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
