use sea_orm_migration::prelude::*;

use crate::m20250826_143100_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum UserToken {
    Table,
    Id,
    UserId,
    Token,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserToken::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserToken::UserId).integer().not_null())
                    .col(ColumnDef::new(UserToken::Token).text().not_null())
                    .col(ColumnDef::new(UserToken::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(UserToken::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_token-user_id")
                            .from(UserToken::Table, UserToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_token-token")
                    .table(UserToken::Table)
                    .col(UserToken::Token)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_token-user_id")
                    .table(UserToken::Table)
                    .col(UserToken::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserToken::Table).to_owned())
            .await
    }
}
