use crate::error::StitchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 設定檔名稱，從目前工作目錄讀取
pub const SETTINGS_FILE_NAME: &str = "image_stitcher.json";

pub const DEFAULT_SEPARATOR: &str = "-";

/// 預設的目錄與檔案篩選樣式
pub const DEFAULT_FILTER: &str = "*";

/// 拼接方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// 水平拼接預設由右至左，因此檔案順序預設反轉
    #[must_use]
    pub const fn reverses_by_default(self) -> bool {
        matches!(self, Self::Horizontal)
    }

    /// 實際是否需要反轉檔案順序，`reverse` 會翻轉預設行為
    #[must_use]
    pub const fn effective_reverse(self, reverse: bool) -> bool {
        self.reverses_by_default() != reverse
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "水平"),
            Self::Vertical => write!(f, "垂直"),
        }
    }
}

/// 使用者設定（image_stitcher.json）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub default_prefix: String,
    pub default_separator: String,
    /// 同時執行的拼接任務上限，未設定時使用 CPU 核心數
    pub max_parallel_jobs: Option<usize>,
    pub show_progress: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            default_prefix: String::new(),
            default_separator: DEFAULT_SEPARATOR.to_string(),
            max_parallel_jobs: None,
            show_progress: true,
        }
    }
}

/// 輸出檔名規則
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    prefix: String,
    separator: String,
}

impl NamingPolicy {
    /// 建立命名規則，前綴與分隔符號都不能含有檔名不允許的字元
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Result<Self, StitchError> {
        let prefix = prefix.into();
        let separator = separator.into();

        validate_name_fragment("prefix", &prefix)?;
        validate_name_fragment("separator", &separator)?;

        Ok(Self { prefix, separator })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

#[cfg(windows)]
const ILLEGAL_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[cfg(not(windows))]
const ILLEGAL_NAME_CHARS: &[char] = &['/'];

/// 找出第一個在目前平台上不能出現在檔名中的字元
#[must_use]
pub fn find_illegal_name_char(value: &str) -> Option<char> {
    value
        .chars()
        .find(|c| ILLEGAL_NAME_CHARS.contains(c) || *c == '\0' || (cfg!(windows) && c.is_control()))
}

fn validate_name_fragment(field: &'static str, value: &str) -> Result<(), StitchError> {
    match find_illegal_name_char(value) {
        Some(character) => Err(StitchError::IllegalNameCharacter {
            field,
            value: value.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

/// 輸入來源：明確的檔案清單，或掃描根目錄下的所有子資料夾
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Files(Vec<PathBuf>),
    AllSubdirectories {
        root: PathBuf,
        dir_filter: String,
        file_filter: String,
    },
}

/// 啟動時解析完成、之後不再變動的執行參數
#[derive(Debug, Clone)]
pub struct StitchRequest {
    pub mode: InputMode,
    pub direction: Direction,
    pub reverse: bool,
    pub naming: NamingPolicy,
    /// 單一任務模式下覆寫輸出目錄
    pub output_dir: Option<PathBuf>,
    pub max_parallel_jobs: Option<usize>,
    pub show_progress: bool,
    /// `--quiet` 時不輸出結果摘要
    pub show_summary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_reverse() {
        assert!(Direction::Horizontal.effective_reverse(false));
        assert!(!Direction::Horizontal.effective_reverse(true));
        assert!(!Direction::Vertical.effective_reverse(false));
        assert!(Direction::Vertical.effective_reverse(true));
    }

    #[test]
    fn test_naming_policy_default() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.prefix(), "");
        assert_eq!(policy.separator(), "-");
    }

    #[test]
    fn test_naming_policy_accepts_plain_values() {
        let policy = NamingPolicy::new("stitched", "_").unwrap();
        assert_eq!(policy.prefix(), "stitched");
        assert_eq!(policy.separator(), "_");

        // 空的分隔符號是允許的
        assert!(NamingPolicy::new("", "").is_ok());
    }

    #[test]
    fn test_naming_policy_rejects_path_separator() {
        let err = NamingPolicy::new("", "/").unwrap_err();
        assert!(matches!(
            err,
            StitchError::IllegalNameCharacter {
                field: "separator",
                character: '/',
                ..
            }
        ));

        let err = NamingPolicy::new("out/", "-").unwrap_err();
        assert!(matches!(
            err,
            StitchError::IllegalNameCharacter { field: "prefix", .. }
        ));
    }

    #[test]
    fn test_naming_policy_rejects_nul() {
        assert!(NamingPolicy::new("a\0b", "-").is_err());
    }

    #[cfg(windows)]
    #[test]
    fn test_naming_policy_rejects_windows_reserved() {
        for sep in ["\\", ":", "*", "?", "|", "<", ">", "\""] {
            assert!(NamingPolicy::new("", sep).is_err(), "{sep} 應該被拒絕");
        }
    }

    #[test]
    fn test_user_settings_default() {
        let settings = UserSettings::default();
        assert_eq!(settings.default_separator, "-");
        assert!(settings.default_prefix.is_empty());
        assert_eq!(settings.max_parallel_jobs, None);
        assert!(settings.show_progress);
    }
}
