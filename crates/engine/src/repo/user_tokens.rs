use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::{EngineError, ResultEngine, UserToken, user_tokens};

use super::UserTokenRepository;

pub struct SeaOrmUserTokens {
    db: DatabaseConnection,
}

impl SeaOrmUserTokens {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserTokenRepository for SeaOrmUserTokens {
    async fn insert(&self, token: &UserToken) -> ResultEngine<UserToken> {
        let model = user_tokens::ActiveModel::from(token)
            .insert(&self.db)
            .await?;
        Ok(UserToken::from(model))
    }

    async fn find_by_token(&self, token: &str) -> ResultEngine<Option<UserToken>> {
        Ok(user_tokens::Entity::find()
            .filter(user_tokens::Column::Token.eq(token))
            .one(&self.db)
            .await?
            .map(UserToken::from))
    }

    async fn delete(&self, id: i32) -> ResultEngine<()> {
        let result = user_tokens::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("token not found".to_string()));
        }
        Ok(())
    }
}
