pub use sea_orm_migration::prelude::*;

mod m20250826_143000_category;
mod m20250826_143100_user;
mod m20250826_143200_user_token;
mod m20250826_143300_tag;
mod m20250826_143400_purchase;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250826_143000_category::Migration),
            Box::new(m20250826_143100_user::Migration),
            Box::new(m20250826_143200_user_token::Migration),
            Box::new(m20250826_143300_tag::Migration),
            Box::new(m20250826_143400_purchase::Migration),
        ]
    }
}
