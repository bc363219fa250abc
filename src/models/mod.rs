pub mod movie;

pub use movie::{MovieDetail, MovieSummary, Review, Trailer};
