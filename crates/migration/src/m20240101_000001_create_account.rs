//! Create `account` table.
//!
//! `user_code` is the store-assigned surrogate key carried in tokens; the
//! user-chosen `id`, `email` and `phone` each carry a named unique constraint
//! so that insert conflicts can be attributed to a field.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::UserCode)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Account::Id, 20).not_null())
                    .col(string_len(Account::Password, 64).not_null())
                    .col(text(Account::Name).not_null())
                    .col(text(Account::Email).not_null())
                    .col(string_len(Account::Phone, 11).not_null())
                    .col(big_integer(Account::Credit).default(0))
                    .col(big_integer(Account::Electricity).default(0))
                    .col(timestamp_with_time_zone(Account::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("uq_account_id", Account::Id),
            ("uq_account_email", Account::Email),
            ("uq_account_phone", Account::Phone),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Account::Table)
                        .col(column)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Account::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Account { Table, UserCode, Id, Password, Name, Email, Phone, Credit, Electricity, CreatedAt }
