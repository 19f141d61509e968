pub mod reports;
pub mod repository;
pub mod reviews;

pub use repository::RepositoryError;
