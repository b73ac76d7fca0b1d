use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub(crate) enum Category {
    Table,
    Id,
    Title,
    Slug,
    StatusId,
    Color,
    TagIds,
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
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Category::Slug).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Category::StatusId)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Category::Color)
                            .string_len(32)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Category::TagIds)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Category::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Category::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Category::DeletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        // Slugs are unique among active rows only, enforced by the engine.
        manager
            .create_index(
                Index::create()
                    .name("idx-category-slug-status_id")
                    .table(Category::Table)
                    .col(Category::Slug)
                    .col(Category::StatusId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await
    }
}
