//! Memory Layer - In-Memory Storage
//!
//! 进程内存储，供测试使用，重启后数据丢失

mod blob_store;
mod metadata_store;

pub use blob_store::InMemoryBlobStore;
pub use metadata_store::InMemoryMetadataStore;
