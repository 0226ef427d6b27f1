use std::fmt;

use thiserror::Error;

/// Account field guarded by a uniqueness invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Id,
    Email,
    Phone,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Id => "id",
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a login was refused. Kept for diagnostics only; both render the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    UnknownId,
    PasswordMismatch,
}

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials(CredentialFailure),
    #[error("{0} already exists")]
    Duplicate(UniqueField),
    /// Raised by a repository when an insert would break a uniqueness invariant.
    #[error("conflict on {0}")]
    Conflict(UniqueField),
    #[error("invalid or expired token")]
    Unauthorized,
    #[error("account not found")]
    AccountNotFound,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::InvalidCredentials(_) => 1002,
            AuthError::Duplicate(_) => 1003,
            AuthError::Conflict(_) => 1004,
            AuthError::Unauthorized => 1005,
            AuthError::AccountNotFound => 1006,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }

    /// Failures caused by the process or its collaborators rather than the caller.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_share_one_message() {
        let unknown = AuthError::InvalidCredentials(CredentialFailure::UnknownId);
        let mismatch = AuthError::InvalidCredentials(CredentialFailure::PasswordMismatch);
        assert_eq!(unknown.to_string(), mismatch.to_string());
        assert_eq!(unknown.code(), mismatch.code());
    }

    #[test]
    fn duplicate_names_the_field() {
        let err = AuthError::Duplicate(UniqueField::Email);
        assert_eq!(err.to_string(), "email already exists");
        assert!(!err.is_internal());
        assert!(AuthError::Repository("down".into()).is_internal());
    }
}
