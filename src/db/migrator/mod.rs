use sea_orm_migration::prelude::*;

mod m20150801_favorites;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20150801_favorites::Migration)]
    }
}
