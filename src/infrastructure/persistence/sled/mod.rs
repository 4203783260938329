//! Sled Persistence - 嵌入式 KV 字节存储

mod blob_store;

pub use blob_store::SledBlobStore;
