pub mod tmdb {

    pub const BASE_URL: &str = "https://api.themoviedb.org/3";

    pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

    pub const POSTER_SIZE: &str = "w185";

    /// Extra sections fetched with a movie's details.
    pub const APPEND_TO_RESPONSE: &str = "videos,reviews";

    /// Only videos hosted here are kept as trailers.
    pub const TRAILER_SITE: &str = "YouTube";
}

pub mod youtube {

    pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
}

pub mod limits {

    /// Overview length shown in list output before truncation.
    pub const OVERVIEW_PREVIEW_CHARS: usize = 120;
}
