use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::watermark::WatermarkConfig;

/// 指定配置文件路径的环境变量。
pub const SETTINGS_PATH_ENV: &str = "QR_WATERMARK_SETTINGS";
/// 覆盖监听地址的环境变量。
pub const BIND_ADDR_ENV: &str = "QR_WATERMARK_ADDR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    /// 单个请求体（multipart）允许的最大字节数。
    pub max_upload_bytes: usize,
    /// 二维码边长上限（像素）。
    pub max_barcode_size: u32,
    pub watermark: WatermarkConfig,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 10 << 20,
            max_barcode_size: 4096,
            watermark: WatermarkConfig::default(),
        }
    }
}

impl ServerSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.bind_addr.trim().is_empty() {
            return Err(AppError::Settings("bind_addr 不能为空".to_string()));
        }
        if self.max_upload_bytes < 1024 {
            return Err(AppError::Settings("max_upload_bytes 不能小于 1KB".to_string()));
        }
        if !(21..=16_384).contains(&self.max_barcode_size) {
            return Err(AppError::Settings(
                "max_barcode_size 必须在 21~16384 像素之间".to_string(),
            ));
        }
        self.watermark
            .validate()
            .map_err(|e| AppError::Settings(e.to_string()))
    }
}

fn settings_file_path() -> Option<PathBuf> {
    std::env::var_os(SETTINGS_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// 从指定路径读取配置；文件不存在时返回默认配置。
pub fn load_settings_from_path(path: &Path) -> Result<ServerSettings, AppError> {
    if !path.exists() {
        log::info!("配置文件不存在，使用默认配置: {}", path.display());
        return Ok(ServerSettings::default());
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str::<ServerSettings>(&content)
        .map_err(|e| AppError::Settings(format!("解析配置文件失败: {}", e)))
}

/// 读取配置文件、应用环境变量覆盖并校验。
pub fn load_settings() -> Result<ServerSettings, AppError> {
    let mut settings = match settings_file_path() {
        Some(path) => load_settings_from_path(&path)?,
        None => ServerSettings::default(),
    };

    if let Ok(addr) = std::env::var(BIND_ADDR_ENV) {
        if !addr.trim().is_empty() {
            settings.bind_addr = addr.trim().to_string();
        }
    }

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("qr-watermark-{}-{}-{}.json", name, std::process::id(), nanos))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings_from_path(&temp_path("missing")).expect("load failed");

        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let path = temp_path("partial");
        fs::write(
            &path,
            r#"{"bind_addr": "127.0.0.1:9000", "watermark": {"legacy_square_centering": true}}"#,
        )
        .expect("write settings failed");

        let settings = load_settings_from_path(&path).expect("load failed");
        let _ = fs::remove_file(&path);

        assert_eq!(settings.bind_addr, "127.0.0.1:9000");
        assert_eq!(settings.max_barcode_size, 4096);
        assert!(settings.watermark.legacy_square_centering);
    }

    #[test]
    fn malformed_file_is_a_settings_error() {
        let path = temp_path("malformed");
        fs::write(&path, "{ not json").expect("write settings failed");

        let result = load_settings_from_path(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(AppError::Settings(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let small_upload = ServerSettings {
            max_upload_bytes: 10,
            ..ServerSettings::default()
        };
        let huge_barcode = ServerSettings {
            max_barcode_size: 100_000,
            ..ServerSettings::default()
        };

        assert!(matches!(small_upload.validate(), Err(AppError::Settings(_))));
        assert!(matches!(huge_barcode.validate(), Err(AppError::Settings(_))));
        assert!(ServerSettings::default().validate().is_ok());
    }
}
