//! Infrastructure layer.

pub mod database;
pub mod external;

pub use self::{database::Database, external::External};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
