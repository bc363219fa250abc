use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::MovieId;

/// One entry of a catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub original_title: String,
    pub poster_url: Option<String>,
    pub release_date: String,
    pub vote_average: f64,
    pub overview: String,
}

/// A movie with everything the details screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub original_title: String,
    pub poster_url: Option<String>,
    pub release_date: String,
    pub runtime: Option<i32>,
    pub vote_average: f64,
    pub overview: String,
    pub trailers: Vec<Trailer>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub id: String,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
}

/// Year of a `YYYY-MM-DD` release date.
pub fn release_year(release_date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(release_date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

impl MovieSummary {
    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }
}

impl MovieDetail {
    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }

    pub fn runtime_str(&self) -> Option<String> {
        self.runtime.filter(|m| *m > 0).map(|m| format!("{m} min"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_year_from_iso_date() {
        assert_eq!(release_year("2015-05-13"), Some(2015));
        assert_eq!(release_year(""), None);
        assert_eq!(release_year("2015"), None);
    }

    #[test]
    fn runtime_hides_unknown_values() {
        let mut detail = MovieDetail {
            id: MovieId::new(1),
            original_title: "Alien".into(),
            poster_url: None,
            release_date: "1979-05-25".into(),
            runtime: Some(117),
            vote_average: 8.1,
            overview: String::new(),
            trailers: Vec::new(),
            reviews: Vec::new(),
        };
        assert_eq!(detail.runtime_str().as_deref(), Some("117 min"));
        detail.runtime = Some(0);
        assert_eq!(detail.runtime_str(), None);
        assert_eq!(detail.release_year(), Some(1979));
    }
}
