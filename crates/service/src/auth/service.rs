use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use super::domain::{AuthSession, LoginInput, LookupKey, NewAccount, RegisterInput, RegisteredAccount, UserProfile};
use super::errors::{AuthError, CredentialFailure, UniqueField};
use super::hasher::CredentialHasher;
use super::repository::AccountRepository;
use super::token::TokenService;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub password_key: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AccountRepository + ?Sized> {
    repo: Arc<R>,
    hasher: CredentialHasher,
    tokens: TokenService,
}

impl<R: AccountRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        let hasher = CredentialHasher::new(cfg.password_key);
        let tokens = TokenService::new(&cfg.jwt_secret, cfg.token_ttl);
        Self { repo, hasher, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Authenticate by id and password and issue a token bound to the
    /// account's `user_code`.
    ///
    /// An unknown id and a wrong password both fail with
    /// [`AuthError::InvalidCredentials`].
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAccountRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAccountRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { password_key: "pw".into(), jwt_secret: "jwt".into(), token_ttl: chrono::Duration::hours(1) });
    /// let input = RegisterInput { id: "alice1".into(), password: "password123".into(), name: "Alice".into(), email: "a@x.com".into(), phone: "01012345678".into() };
    /// tokio_test::block_on(svc.register(input)).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { id: "alice1".into(), password: "password123".into() })).unwrap();
    /// assert!(svc.tokens().verify(&session.token).is_some());
    /// ```
    #[instrument(skip(self, input), fields(id = %input.id))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        input.validate().map_err(|e| {
            debug!(error = %e, "login input rejected");
            AuthError::Validation(e.to_string())
        })?;

        let Some(account) = self.repo.find_account(LookupKey::Id(&input.id)).await? else {
            info!("login refused: no such id");
            return Err(AuthError::InvalidCredentials(CredentialFailure::UnknownId));
        };

        if !self.hasher.verify(&input.password, &account.password_digest)? {
            info!(user_code = account.user_code, "login refused: wrong password");
            return Err(AuthError::InvalidCredentials(CredentialFailure::PasswordMismatch));
        }

        let token = self.tokens.issue(account.user_code)?;
        info!(user_code = account.user_code, "login_succeeded");
        Ok(AuthSession { token })
    }

    /// Register a new account. No token is issued; the caller logs in separately.
    ///
    /// Uniqueness is checked for `id`, then `email`, then `phone`, stopping at
    /// the first collision. A collision the store reports on insert (another
    /// request won the race) is reported the same way.
    #[instrument(skip(self, input), fields(id = %input.id))]
    pub async fn register(&self, input: RegisterInput) -> Result<RegisteredAccount, AuthError> {
        input.validate().map_err(|e| {
            debug!(error = %e, "register input rejected");
            AuthError::Validation(e.to_string())
        })?;

        for (field, key) in [
            (UniqueField::Id, LookupKey::Id(&input.id)),
            (UniqueField::Email, LookupKey::Email(&input.email)),
            (UniqueField::Phone, LookupKey::Phone(&input.phone)),
        ] {
            if self.repo.find_account(key).await?.is_some() {
                info!(%field, "register refused: duplicate");
                return Err(AuthError::Duplicate(field));
            }
        }

        let password_digest = self.hasher.hash(&input.password)?;
        let draft = NewAccount {
            id: input.id,
            password_digest,
            name: input.name,
            email: input.email,
            phone: input.phone,
        };
        let account = self.repo.create_account(draft).await.map_err(|e| match e {
            AuthError::Conflict(field) => {
                warn!(%field, "register lost a uniqueness race");
                AuthError::Duplicate(field)
            }
            other => other,
        })?;

        info!(user_code = account.user_code, id = %account.id, "account_registered");
        Ok(RegisteredAccount { user_code: account.user_code, id: account.id })
    }

    /// Resolve a token to the public profile of the account it names.
    #[instrument(skip_all)]
    pub async fn user_info(&self, token: &str) -> Result<UserProfile, AuthError> {
        let claims = self.tokens.verify(token).ok_or_else(|| {
            info!("user info refused: invalid token");
            AuthError::Unauthorized
        })?;

        let account = self
            .repo
            .find_account(LookupKey::UserCode(claims.user_code))
            .await?
            .ok_or_else(|| {
                info!(user_code = claims.user_code, "user info refused: account gone");
                AuthError::AccountNotFound
            })?;

        debug!(user_code = account.user_code, "user info returned");
        Ok(UserProfile::from(account))
    }
}
