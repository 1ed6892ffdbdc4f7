//! Names shared by the storage backend and the table provisioning tooling.

/// Default table name.
pub const TABLE_NAME: &str = "MovieRank";

/// Secondary index keyed by movie name alone.
pub const MOVIE_NAME_INDEX: &str = "MovieName-index";

pub const ATTR_USER_ID: &str = "UserId";
pub const ATTR_MOVIE_NAME: &str = "MovieName";
pub const ATTR_DESCRIPTION: &str = "Description";
pub const ATTR_ACTORS: &str = "Actors";
pub const ATTR_RANKING: &str = "Ranking";
pub const ATTR_RANKED_DATE_TIME: &str = "RankedDateTime";
