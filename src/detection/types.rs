//! 推理结果类型

use serde::Serialize;

/// 单个类别及其概率
pub type ClassProbability = (String, f32);

/// 一次完整预测的结果
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// 概率高于置信阈值的类别（按概率降序）
    pub high_confidence: Vec<ClassProbability>,
    /// 全部类别，按概率降序
    pub ranked: Vec<ClassProbability>,
    /// 图像变换耗时（毫秒）
    pub transform_ms: f64,
    /// 模型推理耗时（毫秒）
    pub prediction_ms: f64,
}
