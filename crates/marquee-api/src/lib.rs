pub mod enrich;
pub mod tmdb;
pub mod traits;
