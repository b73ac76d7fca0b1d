use sea_orm_migration::prelude::*;

use crate::m20250826_143000_category::Category;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Purchase {
    Table,
    Id,
    Date,
    Amount,
    Reason,
    StatusId,
    Color,
    Method,
    TagIds,
    Note,
    CategoryId,
    SubCategoryId,
    Details,
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
                    .table(Purchase::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Purchase::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Purchase::Date).timestamp().not_null())
                    .col(ColumnDef::new(Purchase::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Purchase::Reason)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Purchase::StatusId)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Purchase::Color)
                            .string_len(32)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Purchase::Method)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Purchase::TagIds)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Purchase::Note)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Purchase::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Purchase::SubCategoryId).integer())
                    .col(ColumnDef::new(Purchase::Details).json())
                    .col(ColumnDef::new(Purchase::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Purchase::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Purchase::DeletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase-category_id")
                            .from(Purchase::Table, Purchase::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase-sub_category_id")
                            .from(Purchase::Table, Purchase::SubCategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase-category_id")
                    .table(Purchase::Table)
                    .col(Purchase::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchase-sub_category_id")
                    .table(Purchase::Table)
                    .col(Purchase::SubCategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Purchase::Table).to_owned())
            .await
    }
}
