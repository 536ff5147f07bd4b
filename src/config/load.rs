use crate::config::types::{SETTINGS_FILE_NAME, UserSettings};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

impl UserSettings {
    /// 從目前工作目錄讀取設定檔，不存在時使用預設值
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("找不到設定檔 {}，使用預設設定", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        if settings.max_parallel_jobs == Some(0) {
            anyhow::bail!("設定檔 {} 的 max_parallel_jobs 必須大於 0", path.display());
        }

        debug!("已載入設定檔: {}", path.display());
        Ok(settings)
    }
}
