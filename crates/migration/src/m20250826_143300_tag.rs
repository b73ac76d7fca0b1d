use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Title,
    StatusId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tag::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tag::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Tag::StatusId)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Tag::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Tag::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Tag::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tag-title-status_id")
                    .table(Tag::Table)
                    .col(Tag::Title)
                    .col(Tag::StatusId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await
    }
}
