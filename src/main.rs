//! 酒店图像分类服务主程序入口

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use hotel_image_detection::http_server::{self, ServerState};
use hotel_image_detection::{DetectionService, FileStore};

mod logging_config;

#[tokio::main]
async fn main() -> Result<()> {
    // 创建日志目录（在日志系统初始化前，错误输出到 stderr）
    let log_dir = PathBuf::from("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("ERROR: Failed to create logs directory: {:?}, error: {}", log_dir, e);
        return Err(anyhow::anyhow!("Failed to create logs directory: {}", e));
    }

    // 加载日志配置（支持模块级日志开关）
    let logging_config = logging_config::LoggingConfig::load();
    let env_filter = logging_config.build_env_filter();

    let log_path = log_dir.join("hotel-image-detection.log");

    // 文件日志按 5MB 轮转，保留最近 5 个
    let rotating_appender = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(5)),
        ContentLimit::Bytes(5 * 1024 * 1024),
        Compression::None,
    );
    let (non_blocking_appender, guard) = non_blocking(rotating_appender);

    // 文件日志格式（完整信息，JSON）
    let file_layer = tracing_subscriber::fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(non_blocking_appender)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_ansi(false)
        .json()
        .with_filter(env_filter);

    // 终端日志格式（INFO 及以上，简洁格式）
    let console_filter = EnvFilter::new("info");
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_level(true)
        .without_time()
        .compact()
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // 保持 guard 在程序运行期间一直存在（确保日志缓冲区被刷新）
    Box::leak(Box::new(guard));

    let app_name =
        std::env::var("APP_NAME").unwrap_or_else(|_| "hotel-image-detection".to_string());
    tracing::info!("Starting {}", app_name);

    let data_folder =
        PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
    if let Err(e) = std::fs::create_dir_all(&data_folder) {
        let error_msg = format!(
            "Failed to create data directory {:?}: {}",
            data_folder, e
        );
        eprintln!("ERROR: {}", error_msg);
        tracing::error!("{}", error_msg);
        return Err(anyhow::anyhow!(error_msg));
    }

    tracing::info!("Using data folder: {:?}", data_folder);

    // 按依赖顺序显式构建各组件，任一失败则拒绝启动
    let file_store = FileStore::new(&data_folder).map_err(|e| {
        let error_msg = format!("Failed to initialize FileStore: {}", e);
        eprintln!("ERROR: {}", error_msg);
        anyhow::anyhow!(error_msg)
    })?;

    let detection_service = DetectionService::new(&data_folder).map_err(|e| {
        let error_msg = format!("Failed to initialize DetectionService: {}", e);
        eprintln!("ERROR: {}", error_msg);
        anyhow::anyhow!(error_msg)
    })?;

    let port = std::env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let state = ServerState {
        file_store: Arc::new(file_store),
        detection_service: Arc::new(detection_service),
    };

    tracing::info!("Starting HTTP server on port {}", port);
    http_server::start_server(state, port).await.map_err(|e| {
        let error_msg = format!("Failed to start HTTP server: {}", e);
        eprintln!("ERROR: {}", error_msg);
        anyhow::anyhow!(error_msg)
    })?;

    Ok(())
}
