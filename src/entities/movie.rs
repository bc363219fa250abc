use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Remote catalog id; re-inserting the same id replaces the row.
    #[sea_orm(unique)]
    pub movie_id: i64,

    pub original_title: Option<String>,

    #[sea_orm(column_type = "Blob", nullable)]
    pub poster_image: Option<Vec<u8>>,

    pub release_date: Option<String>,

    /// Minutes.
    pub runtime: Option<i32>,

    pub vote_average: Option<f64>,

    #[sea_orm(column_type = "Text", nullable)]
    pub overview: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
