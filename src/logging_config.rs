//! 日志配置模块
//! 支持从配置文件加载模块级别的日志设置，并合并环境变量的设置

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 默认日志级别（如果模块未指定）
    #[serde(default = "default_log_level")]
    pub default_level: String,

    /// 模块级别的日志设置
    /// key: 模块名称（如 "hotel_image_detection::detection"）
    /// value: 日志级别（如 "debug", "info", "warn", "error"）
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// 从配置文件加载日志配置
    /// 配置文件路径固定为：config/observability.json（相对于服务运行目录）
    pub fn load() -> Self {
        let config_path = PathBuf::from("config/observability.json");

        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str::<LoggingConfig>(&content) {
                    Ok(config) => {
                        // 此时日志系统尚未初始化，使用 println! 输出
                        println!("Loaded logging config from: {:?}", config_path);
                        return config;
                    }
                    Err(e) => {
                        eprintln!("Failed to parse logging config {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    eprintln!("Failed to read logging config {:?}: {}", config_path, e);
                }
            }
        }

        LoggingConfig::default()
    }

    /// 构建 EnvFilter，合并配置文件和环境变量的设置
    /// 优先级：RUST_LOG > LOG_LEVEL > 配置文件 > 默认值
    pub fn build_env_filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            return EnvFilter::from_default_env();
        }

        let default_level = std::env::var("LOG_LEVEL")
            .map(|level| level.to_lowercase())
            .unwrap_or_else(|_| self.default_level.clone());

        let mut filter_parts = vec![default_level.clone()];
        for (module, level) in &self.modules {
            filter_parts.push(format!("{}={}", module, level));
        }
        let filter_str = filter_parts.join(",");

        EnvFilter::try_new(&filter_str).unwrap_or_else(|_| {
            eprintln!("Invalid log filter \"{}\", falling back to \"{}\"", filter_str, default_level);
            EnvFilter::new(default_level)
        })
    }
}
