pub mod repositories;

mod database;
mod error_mapper;

pub use database::Database;
pub use error_mapper::{RepositoryErrorMapper, ResultExt};
