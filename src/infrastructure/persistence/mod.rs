//! Persistence Layer - 数据持久化
//!
//! SQLite 元数据存储和 Sled 字节存储实现

pub mod sled;
pub mod sqlite;

pub use self::sled::SledBlobStore;
pub use self::sqlite::SqliteMetadataStore;
