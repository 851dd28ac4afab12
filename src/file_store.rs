//! 上传文件存储：以 UUID 命名写入固定目录

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// 服务数据子目录名
const SERVICE_DATA_DIR: &str = "FileManagementService";

/// 文件存储服务
///
/// 每个上传写入一个随机唯一命名的新文件，文件创建后不再修改，也不自动删除。
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// 在数据目录下初始化存储目录（不存在则创建）
    pub fn new(data_folder: &Path) -> Result<Self> {
        debug!("Initialising file store");

        let base_dir = data_folder.join(SERVICE_DATA_DIR);
        std::fs::create_dir_all(&base_dir).with_context(|| {
            format!("Failed to create file store directory: {}", base_dir.display())
        })?;
        // 规范化为绝对路径，save 返回的路径即为绝对路径
        let base_dir = base_dir.canonicalize().with_context(|| {
            format!("Failed to resolve file store directory: {}", base_dir.display())
        })?;

        info!("Initialized file store at {}", base_dir.display());
        Ok(Self { base_dir })
    }

    /// 以请求的格式保存图像，返回写入文件的绝对路径
    ///
    /// 文件名为随机 UUID，并发保存不会冲突。文件系统错误直接向调用方传播。
    pub fn save(&self, image: &DynamicImage, format: ImageFormat) -> Result<PathBuf> {
        let extension = format.extensions_str().first().copied().unwrap_or("bin");
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.base_dir.join(file_name);

        image
            .save_with_format(&path, format)
            .with_context(|| format!("Failed to save image to {}", path.display()))?;

        debug!("Saved uploaded image to {}", path.display());
        Ok(path)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
