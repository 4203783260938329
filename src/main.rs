//! Echovox - 声音克隆 TTS 服务
//!
//! 启动顺序：配置 → 日志 → 存储 → 引擎 → Worker → HTTP

use std::sync::Arc;
use std::time::Duration;

use echovox::application::ports::{BlobStorePort, Namespace, TtsEnginePort};
use echovox::application::{EngineGate, PurgeAudioHandler, StorageBackend};
use echovox::config::{load_config, print_config, AppConfig, BlobBackend, TtsEngineKind};
use echovox::domain::voice::BuiltinVoices;
use echovox::infrastructure::adapters::{
    FakeTtsClient, FakeTtsClientConfig, FileBlobStore, HttpReferenceFetcher, HttpTtsClient,
    HttpTtsClientConfig, SymphoniaCodec,
};
use echovox::infrastructure::http::{AppState, HttpServer, ServerConfig};
use echovox::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
use echovox::infrastructure::persistence::{SledBlobStore, SqliteMetadataStore};
use echovox::infrastructure::worker::{RetentionWorker, RetentionWorkerConfig};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},echovox={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Echovox - 声音克隆 TTS 服务");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.root).await?;
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 元数据：SQLite
    let db_config = DatabaseConfig::new(&config.database.path, config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;
    let metadata = Arc::new(SqliteMetadataStore::new(pool));

    // 字节：文件或 Sled
    let blobs = open_blob_store(&config).await?;
    let storage = StorageBackend::new(blobs, metadata);
    for namespace in [Namespace::Voices, Namespace::Audio] {
        let usage = storage.blob_usage(namespace).await?;
        tracing::info!(
            namespace = namespace.as_str(),
            count = usage.count,
            bytes = usage.bytes,
            "Storage usage"
        );
    }

    // 引擎与编解码
    let codec = Arc::new(SymphoniaCodec::new());
    let engine: Arc<dyn TtsEnginePort> = match config.tts.engine {
        TtsEngineKind::Http => {
            let tts_config = HttpTtsClientConfig::new(&config.tts.url)
                .with_timeout(config.tts.timeout_secs)
                .with_device(&config.tts.device);
            Arc::new(HttpTtsClient::new(tts_config, codec.clone())?)
        }
        TtsEngineKind::Fake => Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            sample_rate: config.tts.fake_sample_rate,
            delay: Duration::from_millis(config.tts.fake_delay_ms),
        })),
    };
    if !engine.health_check().await {
        tracing::warn!("TTS engine is not ready yet, health will report unhealthy");
    }

    let gate = EngineGate::new(config.tts.queue_timeout());
    let builtins = Arc::new(BuiltinVoices::standard());
    let fetcher = Arc::new(HttpReferenceFetcher::new(Duration::from_secs(
        config.tts.timeout_secs,
    ))?);

    // 保留策略 Worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = if config.retention.enabled {
        let worker_config = RetentionWorkerConfig {
            interval: Duration::from_secs(config.retention.interval_secs),
            max_age: config.retention.max_age(),
            max_records: config.retention.max_records(),
        };
        let purge_handler = Arc::new(PurgeAudioHandler::new(storage.clone()));
        let worker = RetentionWorker::new(worker_config, purge_handler, shutdown_rx);
        Some(tokio::spawn(worker.run()))
    } else {
        None
    };

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_upload_size(config.server.max_upload_size);
    let state = AppState::new(builtins, storage, engine, gate, codec, fetcher);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = worker {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "RetentionWorker terminated abnormally");
        }
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn open_blob_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStorePort>> {
    let store: Arc<dyn BlobStorePort> = match config.storage.blob_backend {
        BlobBackend::File => Arc::new(FileBlobStore::new(config.storage.blobs_dir()).await?),
        BlobBackend::Sled => Arc::new(SledBlobStore::open(config.storage.sled_path())?),
    };
    Ok(store)
}
