//! 类别索引映射：class_indices.json 的加载与校验

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// 类别索引到类别名称的双向映射
///
/// 索引必须从 0 开始连续且唯一，与模型输出层一一对应。
#[derive(Debug, Clone)]
pub struct LabelMap {
    idx_to_class: Vec<String>,
}

impl LabelMap {
    /// 从 class_indices.json（类别名 -> 索引）加载映射
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read class indices file: {}", path.display()))?;
        let class_to_idx: HashMap<String, usize> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse class indices file: {}", path.display()))?;
        Self::from_class_indices(class_to_idx)
    }

    /// 由类别名 -> 索引的映射构建，并校验索引连续且唯一
    pub fn from_class_indices(class_to_idx: HashMap<String, usize>) -> Result<Self> {
        if class_to_idx.is_empty() {
            return Err(anyhow!("Class index map is empty, at least one class is required"));
        }

        let num_classes = class_to_idx.len();
        let mut idx_to_class: Vec<Option<String>> = vec![None; num_classes];
        for (name, idx) in class_to_idx {
            if idx >= num_classes {
                return Err(anyhow!(
                    "Class index {} for \"{}\" is out of range for {} classes, indices must be contiguous starting at 0",
                    idx,
                    name,
                    num_classes
                ));
            }
            if let Some(existing) = idx_to_class[idx].replace(name) {
                return Err(anyhow!("Duplicate class index {} (already used by \"{}\")", idx, existing));
            }
        }

        let idx_to_class = idx_to_class
            .into_iter()
            .enumerate()
            .map(|(idx, name)| name.ok_or_else(|| anyhow!("No class name mapped to index {}", idx)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { idx_to_class })
    }

    /// 类别数量
    pub fn len(&self) -> usize {
        self.idx_to_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx_to_class.is_empty()
    }

    /// 按索引取类别名称
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.idx_to_class.get(idx).map(String::as_str)
    }

    /// 按索引顺序返回全部类别名称
    pub fn names(&self) -> &[String] {
        &self.idx_to_class
    }
}
