use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Login ids are plain ASCII letters and digits.
pub static ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("static regex"));

/// Login input
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginInput {
    #[validate(length(min = 5, max = 20), regex(path = *ALPHANUMERIC))]
    pub id: String,
    #[validate(length(min = 5, max = 20))]
    pub password: String,
}

/// Registration input
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterInput {
    #[validate(length(min = 5, max = 20), regex(path = *ALPHANUMERIC))]
    pub id: String,
    #[validate(length(min = 8, max = 20))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email, custom(function = "dotted_domain"))]
    pub email: String,
    #[validate(length(equal = 11))]
    pub phone: String,
}

/// Rejects addresses whose domain has a single label, such as `alice@localhost`.
fn dotted_domain(email: &str) -> Result<(), ValidationError> {
    let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
    match domain.rsplit_once('.') {
        Some((head, tld)) if !head.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(ValidationError::new("email_domain")),
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput").field("id", &self.id).finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

/// Stored account (business view)
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub user_code: i64,
    pub id: String,
    pub password_digest: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub credit: i64,
    pub electricity: i64,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("user_code", &self.user_code)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("credit", &self.credit)
            .field("electricity", &self.electricity)
            .finish_non_exhaustive()
    }
}

/// Account about to be created. `user_code` is assigned by the store.
#[derive(Clone)]
pub struct NewAccount {
    pub id: String,
    pub password_digest: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Unique key an account can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    Id(&'a str),
    Email(&'a str),
    Phone(&'a str),
    UserCode(i64),
}

/// Public profile projection returned by user info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub credit: i64,
    pub electricity: i64,
}

impl From<Account> for UserProfile {
    fn from(a: Account) -> Self {
        Self { name: a.name, email: a.email, phone: a.phone, credit: a.credit, electricity: a.electricity }
    }
}

/// Claims carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_code: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
}

/// Registration result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub user_code: i64,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(id: &str, password: &str, name: &str, email: &str, phone: &str) -> RegisterInput {
        RegisterInput { id: id.into(), password: password.into(), name: name.into(), email: email.into(), phone: phone.into() }
    }

    #[test]
    fn login_shape_rules() {
        let ok = LoginInput { id: "alice1".into(), password: "12345".into() };
        assert!(ok.validate().is_ok());
        let short_id = LoginInput { id: "abcd".into(), password: "password".into() };
        assert!(short_id.validate().is_err());
        let symbol_id = LoginInput { id: "alice_1".into(), password: "password".into() };
        assert!(symbol_id.validate().is_err());
        let long_pw = LoginInput { id: "alice1".into(), password: "x".repeat(21) };
        assert!(long_pw.validate().is_err());
    }

    #[test]
    fn register_shape_rules() {
        assert!(register("alice1", "password123", "Alice", "a@x.com", "01012345678").validate().is_ok());
        // login accepts 5-char passwords, registration needs 8
        assert!(register("alice1", "pass5", "Alice", "a@x.com", "01012345678").validate().is_err());
        assert!(register("alice1", "password123", "", "a@x.com", "01012345678").validate().is_err());
        assert!(register("alice1", "password123", "Alice", "not-an-email", "01012345678").validate().is_err());
        assert!(register("alice1", "password123", "Alice", "a@x.com", "0101234567").validate().is_err());
        assert!(register("alice1", "password123", "Alice", "a@x.com", "010123456789").validate().is_err());
    }

    #[test]
    fn email_domain_needs_two_labels() {
        assert!(register("alice1", "password123", "Alice", "alice@localhost", "01012345678").validate().is_err());
        assert!(register("alice1", "password123", "Alice", "alice@example.", "01012345678").validate().is_err());
        assert!(register("alice1", "password123", "Alice", "alice@mail.example.com", "01012345678").validate().is_ok());
    }

    #[test]
    fn name_has_no_upper_bound() {
        let long_name = "N".repeat(300);
        assert!(register("alice1", "password123", &long_name, "a@x.com", "01012345678").validate().is_ok());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let input = register("alice1", "password123", "Alice", "a@x.com", "01012345678");
        assert!(!format!("{:?}", input).contains("password123"));
        let account = Account {
            user_code: 1,
            id: "alice1".into(),
            password_digest: "deadbeef".into(),
            name: "Alice".into(),
            email: "a@x.com".into(),
            phone: "01012345678".into(),
            credit: 0,
            electricity: 0,
        };
        assert!(!format!("{:?}", account).contains("deadbeef"));
    }

    #[test]
    fn profile_projection_drops_identity_fields() {
        let account = Account {
            user_code: 7,
            id: "alice1".into(),
            password_digest: "digest".into(),
            name: "Alice".into(),
            email: "a@x.com".into(),
            phone: "01012345678".into(),
            credit: 10,
            electricity: 20,
        };
        let profile = UserProfile::from(account);
        assert_eq!(profile, UserProfile { name: "Alice".into(), email: "a@x.com".into(), phone: "01012345678".into(), credit: 10, electricity: 20 });
    }
}
