//! Health Queries

use chrono::{DateTime, Utc};

/// 健康状态查询
#[derive(Debug, Clone)]
pub struct GetHealth;

/// 健康状态
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub model_loaded: bool,
    pub device: String,
    pub voices_total: usize,
    pub queue_depth: usize,
    pub engine_busy: bool,
    pub checked_at: DateTime<Utc>,
}
