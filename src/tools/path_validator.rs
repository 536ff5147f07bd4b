use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_file() {
        bail!("路徑不是檔案: {}", path.display());
    }
    Ok(())
}

/// 建立目錄（含所有上層目錄）
///
/// 多個任務可能同時建立同一個輸出目錄，目錄已存在不視為錯誤。
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("file.png");
        fs::write(&file_path, "data").unwrap();

        assert!(validate_directory_exists(temp_dir.path()).is_ok());
        assert!(validate_directory_exists(&file_path).is_err());
        assert!(validate_directory_exists(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_validate_file_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("file.png");
        fs::write(&file_path, "data").unwrap();

        assert!(validate_file_exists(&file_path).is_ok());
        assert!(validate_file_exists(temp_dir.path()).is_err());
        assert!(validate_file_exists(&temp_dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_ensure_directory_exists_concurrently() {
        let temp_dir = TempDir::new().unwrap();
        let target = Arc::new(temp_dir.path().join("out").join("nested"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let target = Arc::clone(&target);
                thread::spawn(move || ensure_directory_exists(&target))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert!(target.is_dir());
    }
}
