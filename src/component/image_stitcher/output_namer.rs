//! 輸出檔名產生
//!
//! 檔名一律為 `[prefix + separator] + 主體 + 副檔名`：
//! - 明確指定檔案時，主體為所有輸入檔名（去除副檔名）以分隔符號串接
//! - 掃描子資料夾時，主體為子資料夾名稱
//!
//! 副檔名取自第一個輸入檔案，保留原本的大小寫。

use crate::config::NamingPolicy;
use std::path::{Path, PathBuf};

#[must_use]
pub fn name_for_files(files: &[PathBuf], policy: &NamingPolicy) -> String {
    let stems: Vec<String> = files
        .iter()
        .map(|f| {
            f.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        })
        .collect();

    let ext = files
        .first()
        .and_then(|f| f.extension())
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    apply_prefix(&format!("{}{ext}", stems.join(policy.separator())), policy)
}

#[must_use]
pub fn name_for_directory(dir: &Path, first_file_ext: &str, policy: &NamingPolicy) -> String {
    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    apply_prefix(&format!("{dir_name}{first_file_ext}"), policy)
}

fn apply_prefix(name: &str, policy: &NamingPolicy) -> String {
    if policy.prefix().is_empty() {
        name.to_string()
    } else {
        format!("{}{}{name}", policy.prefix(), policy.separator())
    }
}
