use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

use crate::{
    Purchase, PurchaseFilter, ResultEngine, Status,
    listing::{PageRequest, Paged},
    purchases,
};

use super::{PurchaseRepository, contains_text, order_column, tag_list_contains};

trait ApplyPurchaseFilters: QueryFilter + Sized {
    fn apply_purchase_filters(self, filter: &PurchaseFilter) -> Self;
}

impl<T> ApplyPurchaseFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_purchase_filters(mut self, filter: &PurchaseFilter) -> Self {
        let status = filter.status.unwrap_or(Status::Active);
        self = self.filter(purchases::Column::StatusId.eq(status.as_i32()));

        if let Some(id) = filter.id {
            self = self.filter(purchases::Column::Id.eq(id));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(purchases::Column::CategoryId.eq(category_id));
        }
        if let Some(sub_category_id) = filter.sub_category_id {
            self = self.filter(purchases::Column::SubCategoryId.eq(sub_category_id));
        }
        if let Some(reason) = &filter.reason {
            self = self.filter(contains_text(purchases::Column::Reason, reason));
        }
        if let Some(note) = &filter.note {
            self = self.filter(contains_text(purchases::Column::Note, note));
        }
        if let Some(color) = &filter.color {
            self = self.filter(purchases::Column::Color.eq(color.as_str()));
        }
        if let Some(method) = filter.method {
            self = self.filter(purchases::Column::Method.eq(method));
        }
        if let Some(amount) = filter.amount {
            self = self.filter(purchases::Column::Amount.eq(amount));
        }
        for tag_id in &filter.tag_ids {
            self = self.filter(tag_list_contains(purchases::Column::TagIds, *tag_id));
        }

        self
    }
}

pub struct SeaOrmPurchases {
    db: DatabaseConnection,
}

impl SeaOrmPurchases {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PurchaseRepository for SeaOrmPurchases {
    async fn insert(&self, purchase: &Purchase) -> ResultEngine<Purchase> {
        let model = purchases::ActiveModel::from(purchase)
            .insert(&self.db)
            .await?;
        Purchase::try_from(model)
    }

    async fn update(&self, purchase: &Purchase) -> ResultEngine<Purchase> {
        let model = purchases::ActiveModel::from(purchase)
            .update(&self.db)
            .await?;
        Purchase::try_from(model)
    }

    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<Purchase>> {
        let mut query = purchases::Entity::find_by_id(id);
        if let Some(status) = status {
            query = query.filter(purchases::Column::StatusId.eq(status.as_i32()));
        }
        query
            .one(&self.db)
            .await?
            .map(Purchase::try_from)
            .transpose()
    }

    async fn find_all(
        &self,
        filter: &PurchaseFilter,
        page: &PageRequest,
    ) -> ResultEngine<Paged<Purchase>> {
        let query = purchases::Entity::find().apply_purchase_filters(filter);
        let count = query.clone().count(&self.db).await?;
        let column: purchases::Column = order_column(page.order_by)?;
        let items = query
            .order_by(column, page.direction.into())
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Purchase::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Paged { items, count })
    }

    async fn soft_delete(&self, id: i32) -> ResultEngine<()> {
        let now = Utc::now();
        purchases::Entity::update_many()
            .col_expr(purchases::Column::StatusId, Expr::value(Status::Inactive.as_i32()))
            .col_expr(purchases::Column::DeletedAt, Expr::value(now))
            .col_expr(purchases::Column::UpdatedAt, Expr::value(now))
            .filter(purchases::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
