//! Storage Adapters

mod file_blob_store;

pub use file_blob_store::FileBlobStore;
