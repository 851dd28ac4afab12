//! 推理编排服务：预处理 -> 推理 -> 排序与置信过滤

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use super::engine::DetectionEngine;
use super::labels::LabelMap;
use super::preprocess;
use super::types::{ClassProbability, Prediction};

/// 高置信类别的概率阈值
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// 服务数据子目录名，模型与类别索引文件均放在此目录下
const SERVICE_DATA_DIR: &str = "HotelImageDetectionService";
const MODEL_FILE: &str = "model.pt";
const CLASS_INDICES_FILE: &str = "class_indices.json";

/// 酒店图像分类服务
///
/// 持有只读的模型引擎与标签映射，可在请求间并发共享。
pub struct DetectionService {
    engine: Arc<DetectionEngine>,
    labels: Arc<LabelMap>,
    data_dir: PathBuf,
}

impl DetectionService {
    /// 从数据目录初始化服务
    ///
    /// 模型或类别索引文件缺失时返回错误，由组合根决定拒绝启动。
    pub fn new(data_folder: &Path) -> Result<Self> {
        debug!("Initialising detection service");

        let data_dir = data_folder.join(SERVICE_DATA_DIR);
        std::fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create service data directory: {}", data_dir.display())
        })?;

        let model_path = data_dir.join(MODEL_FILE);
        if !model_path.exists() {
            error!(
                "No model was provided. Please provide a model in {}",
                model_path.display()
            );
            return Err(anyhow!("Model file not found: {}", model_path.display()));
        }

        let class_indices_path = data_dir.join(CLASS_INDICES_FILE);
        if !class_indices_path.exists() {
            error!(
                "No class indices were provided. Please provide them in {}",
                class_indices_path.display()
            );
            return Err(anyhow!(
                "Class indices file not found: {}",
                class_indices_path.display()
            ));
        }

        let labels = LabelMap::load(&class_indices_path)?;
        let engine = DetectionEngine::new(&model_path, labels.len() as i64)?;

        info!(
            num_classes = labels.len(),
            "Initialized detection service"
        );

        Ok(Self {
            engine: Arc::new(engine),
            labels: Arc::new(labels),
            data_dir,
        })
    }

    /// 对磁盘上的图像文件做一次完整预测
    ///
    /// 预处理与推理都是 CPU 密集操作，放到阻塞线程池执行。
    pub async fn make_prediction(&self, image_path: &Path) -> Result<Prediction> {
        let engine = self.engine.clone();
        let labels = self.labels.clone();
        let path = image_path.to_path_buf();

        let prediction = tokio::task::spawn_blocking(move || -> Result<Prediction> {
            info!("Transforming image for detection: {}", path.display());
            let (input, transform_ms) = preprocess::transform_image(&path)?;
            info!("Transforming image took {:.2} ms", transform_ms);

            let start = Instant::now();
            let probabilities = engine.predict(&input)?;
            let prediction_ms = start.elapsed().as_secs_f64() * 1000.0;

            let (high_confidence, ranked) = rank_probabilities(&probabilities, &labels)?;

            Ok(Prediction {
                high_confidence,
                ranked,
                transform_ms,
                prediction_ms,
            })
        })
        .await
        .map_err(|e| anyhow!("Prediction task panicked: {}", e))??;

        Ok(prediction)
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// 把概率分布映射为按概率降序的类别列表，并过滤出高置信子集
pub fn rank_probabilities(
    probabilities: &[f32],
    labels: &LabelMap,
) -> Result<(Vec<ClassProbability>, Vec<ClassProbability>)> {
    if probabilities.len() != labels.len() {
        return Err(anyhow!(
            "Got {} probabilities for {} classes",
            probabilities.len(),
            labels.len()
        ));
    }

    let mut ranked: Vec<ClassProbability> = labels
        .names()
        .iter()
        .zip(probabilities.iter())
        .map(|(name, prob)| (name.clone(), *prob))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let high_confidence: Vec<ClassProbability> = ranked
        .iter()
        .filter(|(_, prob)| *prob > HIGH_CONFIDENCE_THRESHOLD)
        .cloned()
        .collect();

    Ok((high_confidence, ranked))
}
