//! 酒店图像分类推理：标签映射、预处理、模型引擎与编排服务

pub mod engine;
pub mod labels;
pub mod preprocess;
pub mod service;
pub mod types;

pub use engine::DetectionEngine;
pub use labels::LabelMap;
pub use service::DetectionService;
pub use types::{ClassProbability, Prediction};
