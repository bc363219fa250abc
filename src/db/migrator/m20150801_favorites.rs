use sea_orm_migration::prelude::*;

/// Unique remote-id columns resolve clashes by replacing the old row.
const UNIQUE_REPLACE: &str = "UNIQUE ON CONFLICT REPLACE";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movie::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Movie::MovieId)
                            .integer()
                            .not_null()
                            .extra(UNIQUE_REPLACE.to_owned()),
                    )
                    .col(ColumnDef::new(Movie::OriginalTitle).text().null())
                    .col(ColumnDef::new(Movie::PosterImage).blob().null())
                    .col(ColumnDef::new(Movie::ReleaseDate).text().null())
                    .col(ColumnDef::new(Movie::Runtime).integer().null())
                    .col(ColumnDef::new(Movie::VoteAverage).double().null())
                    .col(ColumnDef::new(Movie::Overview).text().null())
                    .to_owned(),
            )
            .await?;

        // movie_key references movie.movie_id by value only; deletes do not cascade.
        manager
            .create_table(
                Table::create()
                    .table(Trailer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trailer::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trailer::MovieKey).integer().not_null())
                    .col(
                        ColumnDef::new(Trailer::TrailerId)
                            .text()
                            .not_null()
                            .extra(UNIQUE_REPLACE.to_owned()),
                    )
                    .col(ColumnDef::new(Trailer::Uri).text().null())
                    .col(ColumnDef::new(Trailer::Name).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::MovieKey).integer().not_null())
                    .col(
                        ColumnDef::new(Review::ReviewId)
                            .text()
                            .not_null()
                            .extra(UNIQUE_REPLACE.to_owned()),
                    )
                    .col(ColumnDef::new(Review::Author).text().null())
                    .col(ColumnDef::new(Review::Content).text().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trailer::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movie::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Movie {
    Table,
    Id,
    MovieId,
    OriginalTitle,
    PosterImage,
    ReleaseDate,
    Runtime,
    VoteAverage,
    Overview,
}

#[derive(Iden)]
enum Trailer {
    Table,
    Id,
    MovieKey,
    TrailerId,
    Uri,
    Name,
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    MovieKey,
    ReviewId,
    Author,
    Content,
}
