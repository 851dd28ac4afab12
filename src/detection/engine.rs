//! ResNet-18 分类引擎：权重加载与推理

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tch::nn::{ModuleT, VarStore};
use tch::vision::resnet;
use tch::{Device, Kind, Tensor};

/// ResNet-18 分类引擎
///
/// 骨干网络加载预训练结构，输出层替换为 N 类线性层。
/// 权重加载一次后只读，推理在评估模式下运行，无梯度计算。
pub struct DetectionEngine {
    net: Mutex<Box<dyn ModuleT + Send>>,
    num_classes: i64,
    model_path: PathBuf,
}

impl DetectionEngine {
    /// 从权重文件加载模型
    ///
    /// 权重文件缺失、缺少参数或张量形状与实例化的结构不匹配时返回错误。
    pub fn new(model_path: &Path, num_classes: i64) -> Result<Self> {
        if !model_path.exists() {
            return Err(anyhow!("Model file not found: {}", model_path.display()));
        }
        if num_classes < 1 {
            return Err(anyhow!("At least one class is required, got {}", num_classes));
        }

        tracing::info!("Loading detection model from: {}", model_path.display());
        let start = Instant::now();

        // 先按标签数实例化结构，再加载权重，形状不匹配在此失败
        let mut vs = VarStore::new(Device::Cpu);
        let net = resnet::resnet18(&vs.root(), num_classes);
        vs.load(model_path).map_err(|e| {
            anyhow!(
                "Failed to load model weights from {}: {}",
                model_path.display(),
                e
            )
        })?;
        vs.freeze();

        let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "Model was loaded from {}. Loading time: {:.2} ms",
            model_path.display(),
            load_time_ms
        );

        let net: Box<dyn ModuleT + Send> = Box::new(net);
        Ok(Self {
            net: Mutex::new(net),
            num_classes,
            model_path: model_path.to_path_buf(),
        })
    }

    /// 对预处理后的输入张量做一次推理
    ///
    /// 返回 N 个类别上的 softmax 概率分布。相同权重和输入下结果确定。
    pub fn predict(&self, input: &Tensor) -> Result<Vec<f32>> {
        let net = self
            .net
            .lock()
            .map_err(|e| anyhow!("Failed to lock model: {}", e))?;

        let output = tch::no_grad(|| net.forward_t(input, false).softmax(-1, Kind::Float));
        let probabilities = output.squeeze_dim(0);
        let probabilities = Vec::<f32>::try_from(&probabilities)
            .map_err(|e| anyhow!("Failed to extract probabilities: {}", e))?;

        if probabilities.len() != self.num_classes as usize {
            return Err(anyhow!(
                "Model produced {} outputs, expected {} classes",
                probabilities.len(),
                self.num_classes
            ));
        }

        Ok(probabilities)
    }

    pub fn num_classes(&self) -> i64 {
        self.num_classes
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}
