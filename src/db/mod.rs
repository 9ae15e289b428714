//! The row store: the `Db` handle and its row-lifecycle operations.

mod core;
mod row;

pub use self::core::Db;
