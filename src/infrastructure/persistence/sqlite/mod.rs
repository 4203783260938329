//! SQLite Persistence - 元数据持久化实现

mod database;
mod metadata_store;

pub use database::*;
pub use metadata_store::*;
