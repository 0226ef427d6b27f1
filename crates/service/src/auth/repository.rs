use async_trait::async_trait;

use super::domain::{Account, LookupKey, NewAccount};
use super::errors::AuthError;

/// Repository abstraction for account persistence.
///
/// `create_account` must fail with [`AuthError::Conflict`] rather than
/// overwrite when `id`, `email` or `phone` is already taken.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_account(&self, key: LookupKey<'_>) -> Result<Option<Account>, AuthError>;
    async fn create_account(&self, draft: NewAccount) -> Result<Account, AuthError>;
}

/// Simple in-memory repository for tests, benches and doc examples
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    use crate::auth::errors::UniqueField;

    #[derive(Default)]
    pub struct MockAccountRepository {
        accounts: Mutex<Vec<Account>>,
        next_code: Mutex<i64>,
    }

    impl MockAccountRepository {
        fn accounts(&self) -> Result<MutexGuard<'_, Vec<Account>>, AuthError> {
            self.accounts.lock().map_err(|_| AuthError::Repository("account store poisoned".into()))
        }

        /// Drop an account, as an out-of-band deletion would.
        pub fn remove(&self, user_code: i64) -> bool {
            let Ok(mut accounts) = self.accounts() else { return false };
            let before = accounts.len();
            accounts.retain(|a| a.user_code != user_code);
            accounts.len() != before
        }

        pub fn len(&self) -> usize {
            self.accounts().map(|a| a.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    fn key_matches(account: &Account, key: &LookupKey<'_>) -> bool {
        match *key {
            LookupKey::Id(id) => account.id == id,
            LookupKey::Email(email) => account.email == email,
            LookupKey::Phone(phone) => account.phone == phone,
            LookupKey::UserCode(code) => account.user_code == code,
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn find_account(&self, key: LookupKey<'_>) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts()?;
            Ok(accounts.iter().find(|a| key_matches(a, &key)).cloned())
        }

        async fn create_account(&self, draft: NewAccount) -> Result<Account, AuthError> {
            let mut accounts = self.accounts()?;
            for (field, key) in [
                (UniqueField::Id, LookupKey::Id(&draft.id)),
                (UniqueField::Email, LookupKey::Email(&draft.email)),
                (UniqueField::Phone, LookupKey::Phone(&draft.phone)),
            ] {
                if accounts.iter().any(|a| key_matches(a, &key)) {
                    return Err(AuthError::Conflict(field));
                }
            }
            let mut next = self.next_code.lock().map_err(|_| AuthError::Repository("sequence poisoned".into()))?;
            *next += 1;
            let account = Account {
                user_code: *next,
                id: draft.id,
                password_digest: draft.password_digest,
                name: draft.name,
                email: draft.email,
                phone: draft.phone,
                credit: 0,
                electricity: 0,
            };
            accounts.push(account.clone());
            Ok(account)
        }
    }

}
