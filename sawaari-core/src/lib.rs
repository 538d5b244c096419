pub mod error;
pub mod identity;
pub mod notify;

pub use error::{Error, Result};
