use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use models::account;
use models::errors::ModelError;

use crate::auth::domain::{Account, LookupKey, NewAccount};
use crate::auth::errors::{AuthError, UniqueField};
use crate::auth::repository::AccountRepository;

pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: account::Model) -> Account {
    Account {
        user_code: m.user_code,
        id: m.id,
        password_digest: m.password,
        name: m.name,
        email: m.email,
        phone: m.phone,
        credit: m.credit,
        electricity: m.electricity,
    }
}

/// Attribute a unique-constraint violation to a field from the constraint
/// name in the driver message (`uq_account_email`, `uq_account_phone`, ...).
pub(crate) fn conflict_field(message: &str) -> UniqueField {
    let lower = message.to_lowercase();
    if lower.contains("email") {
        UniqueField::Email
    } else if lower.contains("phone") {
        UniqueField::Phone
    } else {
        UniqueField::Id
    }
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_account(&self, key: LookupKey<'_>) -> Result<Option<Account>, AuthError> {
        let query = match key {
            LookupKey::Id(id) => account::Entity::find().filter(account::Column::Id.eq(id)),
            LookupKey::Email(email) => account::Entity::find().filter(account::Column::Email.eq(email)),
            LookupKey::Phone(phone) => account::Entity::find().filter(account::Column::Phone.eq(phone)),
            LookupKey::UserCode(code) => account::Entity::find().filter(account::Column::UserCode.eq(code)),
        };
        let res = query
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_domain))
    }

    async fn create_account(&self, draft: NewAccount) -> Result<Account, AuthError> {
        let row = account::NewRow {
            id: &draft.id,
            password_digest: &draft.password_digest,
            name: &draft.name,
            email: &draft.email,
            phone: &draft.phone,
        };
        let created = account::create(&self.db, row).await.map_err(|e| match e {
            ModelError::UniqueViolation(msg) => AuthError::Conflict(conflict_field(&msg)),
            ModelError::Validation(msg) => AuthError::Validation(msg),
            ModelError::Db(msg) => AuthError::Repository(msg),
        })?;
        Ok(to_domain(created))
    }
}
