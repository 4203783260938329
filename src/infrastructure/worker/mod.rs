//! Worker Layer - Background Task Processing
//!
//! 实现 RetentionWorker，定期清理过期的生成音频

mod retention_worker;

pub use retention_worker::{RetentionWorker, RetentionWorkerConfig};
