use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_code: i64,
    #[sea_orm(unique)]
    pub id: String,
    /// Keyed digest of the password, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(unique, column_type = "Text")]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub credit: i64,
    pub electricity: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new row; `user_code` is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewRow<'a> {
    pub id: &'a str,
    pub password_digest: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

pub async fn create(db: &DatabaseConnection, row: NewRow<'_>) -> Result<Model, errors::ModelError> {
    if row.password_digest.trim().is_empty() {
        return Err(errors::ModelError::Validation("password digest required".into()));
    }
    let am = ActiveModel {
        user_code: NotSet,
        id: Set(row.id.to_string()),
        password: Set(row.password_digest.to_string()),
        name: Set(row.name.to_string()),
        email: Set(row.email.to_string()),
        phone: Set(row.phone.to_string()),
        credit: Set(0),
        electricity: Set(0),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(classify)
}

fn classify(e: DbErr) -> errors::ModelError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => errors::ModelError::UniqueViolation(msg),
        _ => errors::ModelError::Db(e.to_string()),
    }
}
