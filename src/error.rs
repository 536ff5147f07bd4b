use std::path::PathBuf;
use thiserror::Error;

/// 錯誤分類，決定錯誤是阻斷整批作業還是只影響單一任務
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Discovery,
    JobValidation,
}

/// 在派送任何拼接任務之前就會被檢查出來的錯誤
#[derive(Error, Debug)]
pub enum StitchError {
    #[error("設定錯誤: {0}")]
    Configuration(String),

    #[error("{field} 含有檔名不允許的字元 {character:?}: {value:?}")]
    IllegalNameCharacter {
        field: &'static str,
        value: String,
        character: char,
    },

    #[error("無效的篩選樣式 {pattern:?}: {reason}")]
    InvalidFilter { pattern: String, reason: String },

    #[error("根目錄不存在: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("找不到可拼接的內容: {}", .0.display())]
    NoStitchableContent(PathBuf),

    #[error("輸入檔案不存在: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("不支援的副檔名: {}", .0.display())]
    UnrecognizedExtension(PathBuf),

    #[error("副檔名不一致: {0}")]
    MismatchedExtensions(String),

    #[error("檔案數量不足，至少需要 2 個檔案，實際為 {0} 個")]
    InsufficientFiles(usize),
}

impl StitchError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::IllegalNameCharacter { .. } | Self::InvalidFilter { .. } => {
                ErrorCategory::Configuration
            }
            Self::RootNotFound(_) | Self::NoStitchableContent(_) => ErrorCategory::Discovery,
            Self::InputNotFound(_)
            | Self::UnrecognizedExtension(_)
            | Self::MismatchedExtensions(_)
            | Self::InsufficientFiles(_) => ErrorCategory::JobValidation,
        }
    }
}

/// 一組檔案無法組成拼接任務的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobRejection {
    #[error("檔案數量不足，至少需要 2 個檔案，實際為 {0} 個")]
    InsufficientFiles(usize),

    #[error("副檔名不一致: {0}")]
    MismatchedExtensions(String),
}

impl From<JobRejection> for StitchError {
    fn from(rejection: JobRejection) -> Self {
        match rejection {
            JobRejection::InsufficientFiles(count) => Self::InsufficientFiles(count),
            JobRejection::MismatchedExtensions(files) => Self::MismatchedExtensions(files),
        }
    }
}

/// 單一拼接任務的執行失敗，只記錄在該任務的結果中
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    #[error("操作已取消")]
    Cancelled,

    #[error("拼接失敗: {0}")]
    Backend(String),

    #[error("寫入輸出檔案失敗: {0}")]
    Write(String),
}

impl JobFailure {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            StitchError::Configuration("x".to_string()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            StitchError::RootNotFound(PathBuf::from("/missing")).category(),
            ErrorCategory::Discovery
        );
        assert_eq!(
            StitchError::MismatchedExtensions("a.png, b.jpg".to_string()).category(),
            ErrorCategory::JobValidation
        );
    }

    #[test]
    fn test_job_rejection_keeps_category() {
        let err = StitchError::from(JobRejection::InsufficientFiles(1));
        assert!(matches!(err, StitchError::InsufficientFiles(1)));
        assert_eq!(err.category(), ErrorCategory::JobValidation);

        let err = StitchError::from(JobRejection::MismatchedExtensions("a.png, b.jpg".to_string()));
        assert!(matches!(err, StitchError::MismatchedExtensions(_)));
    }

    #[test]
    fn test_job_failure_cancelled() {
        assert!(JobFailure::Cancelled.is_cancelled());
        assert!(!JobFailure::Backend("boom".to_string()).is_cancelled());
    }
}
