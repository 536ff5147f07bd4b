use std::path::Path;

/// 支援的圖片副檔名（比對時不分大小寫）
pub const RECOGNIZED_EXTENSIONS: [&str; 8] = [
    ".png", ".jpg", ".jpeg", ".jfif", ".tiff", ".bmp", ".webp", ".avif",
];

/// 取得小寫、含 `.` 的副檔名，例如 `.png`
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// 副檔名是否在支援清單中，接受有無前置 `.` 的寫法
#[must_use]
pub fn is_recognized(ext: &str) -> bool {
    let normalized = if ext.starts_with('.') {
        ext.to_lowercase()
    } else {
        format!(".{}", ext.to_lowercase())
    };
    RECOGNIZED_EXTENSIONS.contains(&normalized.as_str())
}

#[must_use]
pub fn is_recognized_file(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| is_recognized(&ext))
}

/// 所有檔案的副檔名是否與第一個檔案相同
///
/// 呼叫端必須保證 `files` 不為空。
#[must_use]
pub fn all_equal<P: AsRef<Path>>(files: &[P]) -> bool {
    debug_assert!(!files.is_empty(), "all_equal 不接受空的檔案清單");

    let Some((first, rest)) = files.split_first() else {
        return false;
    };
    let first_ext = extension_of(first.as_ref());
    rest.iter().all(|file| extension_of(file.as_ref()) == first_ext)
}
