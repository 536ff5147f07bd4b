use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 先寫入同目錄下的暫存檔，再改名覆蓋目標檔案
///
/// 失敗時不會留下不完整的輸出檔案。
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    if let Err(e) = write_and_sync(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| {
            format!(
                "無法將暫存檔改名: {} -> {}",
                temp_path.display(),
                path.display()
            )
        });
    }

    debug!("已寫入 {} bytes: {}", bytes.len(), path.display());
    Ok(())
}

fn write_and_sync(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path)
        .with_context(|| format!("無法建立暫存檔: {}", temp_path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("無法寫入暫存檔: {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("無法同步暫存檔: {}", temp_path.display()))?;
    Ok(())
}

const TEMP_SUFFIX: &str = ".tmp";

/// 是否為 `write_atomically` 產生的暫存檔（`.{name}.{uuid}.tmp`）
#[must_use]
pub fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|name| {
            name.starts_with('.')
                && name
                    .strip_suffix(TEMP_SUFFIX)
                    .and_then(|rest| rest.rsplit_once('.'))
                    .is_some_and(|(_, id)| Uuid::parse_str(id).is_ok())
        })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp_name = format!(".{file_name}.{}{TEMP_SUFFIX}", Uuid::new_v4());
    path.with_file_name(temp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn list_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_atomically_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out.png");

        write_atomically(&target, b"composite").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"composite");
        // 不應留下暫存檔
        assert_eq!(list_names(temp_dir.path()), vec!["out.png".to_string()]);
    }

    #[test]
    fn test_write_atomically_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out.png");
        fs::write(&target, b"old content that is longer").unwrap();

        write_atomically(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn test_write_atomically_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("missing").join("out.png");

        assert!(write_atomically(&target, b"data").is_err());
        assert!(!target.exists());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/out/A.png"));
        assert_eq!(temp.parent(), Some(Path::new("/out")));
        let name = temp.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".A.png."));
        assert!(name.ends_with(".tmp"));
        assert!(is_temp_file(&temp));
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new(
            "/out/.A.png.0f8fad5b-d9cb-469f-a165-70867728950e.tmp"
        )));
        assert!(!is_temp_file(Path::new("/out/A.png")));
        assert!(!is_temp_file(Path::new("/out/.hidden.png")));
        assert!(!is_temp_file(Path::new("/out/.notes.tmp")));
    }
}
