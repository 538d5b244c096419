pub mod app_config;
pub mod assets;
pub mod booking_repo;
pub mod database;
pub mod mailer;
pub mod price_repo;
pub mod route_repo;
pub mod seat_repo;

pub use database::DbClient;

use sawaari_core::Error;

/// Map a sqlx error onto the shared taxonomy, turning unique-index
/// violations into `Conflict` with the given message.
pub(crate) fn map_insert_err(e: sqlx::Error, conflict_msg: &str) -> Error {
    if let sqlx::Error::Database(ref db) = e {
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return Error::Conflict(conflict_msg.to_owned());
        }
    }
    storage_err(e)
}

pub(crate) fn storage_err(e: sqlx::Error) -> Error {
    Error::Storage(e.to_string())
}
