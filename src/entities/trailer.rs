use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trailer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Remote id of the owning movie. Not enforced as a foreign key.
    pub movie_key: i64,

    #[sea_orm(unique)]
    pub trailer_id: String,

    pub uri: Option<String>,

    pub name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
