//! Retention Worker - 生成音频的定期清理

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::application::{PurgeAudio, PurgeAudioHandler};

/// Worker 配置
#[derive(Debug, Clone)]
pub struct RetentionWorkerConfig {
    /// 清理周期
    pub interval: Duration,
    /// 超过该时长的音频被删除，None 表示不按时间清理
    pub max_age: Option<Duration>,
    /// 最多保留的音频条数，None 表示不限
    pub max_records: Option<usize>,
}

impl Default for RetentionWorkerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            max_age: Some(Duration::from_secs(7 * 24 * 3600)),
            max_records: None,
        }
    }
}

/// 保留策略 Worker
///
/// 按固定周期调用 PurgeAudioHandler，收到关闭信号后退出
pub struct RetentionWorker {
    config: RetentionWorkerConfig,
    purge_handler: Arc<PurgeAudioHandler>,
    shutdown: watch::Receiver<bool>,
}

impl RetentionWorker {
    pub fn new(
        config: RetentionWorkerConfig,
        purge_handler: Arc<PurgeAudioHandler>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            purge_handler,
            shutdown,
        }
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = ?self.config.max_age.map(|d| d.as_secs()),
            max_records = ?self.config.max_records,
            "RetentionWorker started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.run_once().await,
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("RetentionWorker stopped");
    }

    async fn run_once(&self) {
        let command = PurgeAudio {
            max_age: self.config.max_age,
            max_records: self.config.max_records,
        };
        // 单次失败不终止 worker，下个周期重试
        if let Err(e) = self.purge_handler.handle(command).await {
            tracing::error!(error = %e, "Audio retention purge failed");
        }
    }
}
