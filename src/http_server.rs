//! HTTP 服务器：存活探针与图像分类端点

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use image::ImageFormat;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::detection::{ClassProbability, DetectionService};
use crate::file_store::FileStore;

/// 分类端点路由前缀
const ROUTE_PREFIX: &str = "/hotel-image-detection";

/// multipart 上传大小上限（默认 2MB 对图片太小）
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// HTTP 服务器状态
#[derive(Clone)]
pub struct ServerState {
    pub file_store: Arc<FileStore>,
    pub detection_service: Arc<DetectionService>,
}

/// 分类响应（HTTP 格式）
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// 全部类别及概率，按概率降序
    pub predictions: Vec<ClassProbability>,
    /// 模型推理耗时（毫秒）
    pub prediction_time: f64,
}

/// 错误信息
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

type ErrorResponse = (StatusCode, Json<ErrorInfo>);

fn error_response(status: StatusCode, code: &str, message: String) -> ErrorResponse {
    (
        status,
        Json(ErrorInfo {
            code: code.to_string(),
            message,
        }),
    )
}

/// 启动 HTTP 服务器
pub async fn start_server(state: ServerState, port: u16) -> Result<()> {
    let app = Router::new()
        .route("/", get(get_alive))
        .route(&format!("{}/predict", ROUTE_PREFIX), post(handle_predict))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP server listening on: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 存活探针
async fn get_alive() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "OK",
        "message": "Alive",
        "docs": "/docs",
    }))
}

/// 处理图像分类请求（multipart 上传，字段名 file）
async fn handle_predict(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ErrorResponse> {
    let mut image_bytes: Option<Vec<u8>> = None;
    loop {
        let field = multipart.next_field().await.map_err(|e| {
            error!("Failed to read multipart body: {}", e);
            error_response(
                StatusCode::BAD_REQUEST,
                "INVALID_UPLOAD",
                format!("Failed to read multipart body: {}", e),
            )
        })?;
        let Some(field) = field else { break };
        if field.name() == Some("file") {
            let data = field.bytes().await.map_err(|e| {
                error!("Failed to read uploaded file: {}", e);
                error_response(
                    StatusCode::BAD_REQUEST,
                    "INVALID_UPLOAD",
                    format!("Failed to read uploaded file: {}", e),
                )
            })?;
            image_bytes = Some(data.to_vec());
            break;
        }
    }

    let image_bytes = image_bytes.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "MISSING_FILE",
            "Multipart field \"file\" is required".to_string(),
        )
    })?;

    let image = image::load_from_memory(&image_bytes).map_err(|e| {
        error!("Failed to decode uploaded image: {}", e);
        error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_IMAGE",
            format!("Failed to decode uploaded image: {}", e),
        )
    })?;

    let image_path = state
        .file_store
        .save(&image, ImageFormat::WebP)
        .map_err(|e| {
            error!("Failed to store uploaded image: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            )
        })?;

    let prediction = state
        .detection_service
        .make_prediction(&image_path)
        .await
        .map_err(|e| {
            error!("Prediction failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PREDICTION_ERROR",
                e.to_string(),
            )
        })?;

    Ok(Json(PredictResponse {
        predictions: prediction.ranked,
        prediction_time: prediction.prediction_ms,
    }))
}
