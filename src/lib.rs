//! 酒店图像分类推理服务库
//!
//! 提供图像预处理、ResNet-18 分类推理、上传文件存储与 HTTP 服务

pub mod detection;
pub mod file_store;
pub mod http_server;

// 重新导出主要类型
pub use detection::{ClassProbability, DetectionEngine, DetectionService, LabelMap, Prediction};
pub use file_store::FileStore;
