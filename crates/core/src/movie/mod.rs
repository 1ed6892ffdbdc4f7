pub mod mapper;
mod mock_data;
mod requests;
mod responses;
mod types;

pub use mock_data::{generate_seed_rankings, seed_movie_names};
pub use requests::{MovieRankRequest, MovieUpdateRequest};
pub use responses::{MovieRankResponse, MovieResponse, UserRanking};
pub use types::MovieRankRecord;
