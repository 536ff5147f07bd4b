use crate::config::{Direction, NamingPolicy};
use crate::error::JobRejection;
use crate::tools::{all_equal, extension_of};
use std::path::{Path, PathBuf};

use super::output_namer::{name_for_directory, name_for_files};

/// 一個拼接任務：一組副檔名相同、至少兩個的輸入檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchJob {
    /// 掃描子資料夾時為該資料夾，明確指定檔案時為 `None`
    directory: Option<PathBuf>,
    files: Vec<PathBuf>,
}

impl StitchJob {
    pub fn new(directory: Option<PathBuf>, files: Vec<PathBuf>) -> Result<Self, JobRejection> {
        if files.len() < 2 {
            return Err(JobRejection::InsufficientFiles(files.len()));
        }
        if !all_equal(&files) {
            return Err(JobRejection::MismatchedExtensions(describe_files(&files)));
        }
        Ok(Self { directory, files })
    }

    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// 原始順序（掃描順序或命令列順序）
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// 依拼接方向與 `reverse` 決定實際送入拼接的順序
    #[must_use]
    pub fn ordered_files(&self, direction: Direction, reverse: bool) -> Vec<PathBuf> {
        let mut files = self.files.clone();
        if direction.effective_reverse(reverse) {
            files.reverse();
        }
        files
    }

    /// 用於日誌與結果摘要的名稱
    #[must_use]
    pub fn label(&self) -> String {
        match &self.directory {
            Some(dir) => dir
                .file_name()
                .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().to_string()),
            None => describe_files(&self.files),
        }
    }

    #[must_use]
    pub fn output_name(&self, policy: &NamingPolicy) -> String {
        match &self.directory {
            Some(dir) => {
                let ext = self.files[0]
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                name_for_directory(dir, &ext, policy)
            }
            None => name_for_files(&self.files, policy),
        }
    }

    /// 輸出目錄：有指定時使用指定目錄，否則為第一個輸入檔案所在的目錄
    #[must_use]
    pub fn output_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir.map_or_else(
            || {
                self.files[0]
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default()
            },
            Path::to_path_buf,
        )
    }

    #[must_use]
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.files[0])
    }
}

fn describe_files(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| {
            f.file_name()
                .map_or_else(|| f.display().to_string(), |n| n.to_string_lossy().to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/imgs").join(n)).collect()
    }

    #[test]
    fn test_new_rejects_single_file() {
        let err = StitchJob::new(None, files(&["only.png"])).unwrap_err();
        assert_eq!(err, JobRejection::InsufficientFiles(1));
    }

    #[test]
    fn test_new_rejects_mismatched() {
        let err = StitchJob::new(None, files(&["a.png", "b.png", "c.jpg"])).unwrap_err();
        assert!(matches!(err, JobRejection::MismatchedExtensions(_)));
    }

    #[test]
    fn test_ordering_rule() {
        let job = StitchJob::new(None, files(&["1.png", "2.png", "3.png"])).unwrap();
        let natural = files(&["1.png", "2.png", "3.png"]);
        let reversed = files(&["3.png", "2.png", "1.png"]);

        // 水平預設由右至左
        assert_eq!(job.ordered_files(Direction::Horizontal, false), reversed);
        assert_eq!(job.ordered_files(Direction::Horizontal, true), natural);
        // 垂直預設由上至下
        assert_eq!(job.ordered_files(Direction::Vertical, false), natural);
        assert_eq!(job.ordered_files(Direction::Vertical, true), reversed);

        // 原始順序不受影響
        assert_eq!(job.files(), natural.as_slice());
    }

    #[test]
    fn test_output_name_for_directory_job() {
        let job = StitchJob::new(
            Some(PathBuf::from("/root/A")),
            vec![PathBuf::from("/root/A/1.png"), PathBuf::from("/root/A/2.png")],
        )
        .unwrap();
        assert_eq!(job.output_name(&NamingPolicy::default()), "A.png");
        assert_eq!(job.label(), "A");
    }

    #[test]
    fn test_output_name_for_file_job() {
        let job = StitchJob::new(None, files(&["a.jpg", "b.jpg"])).unwrap();
        assert_eq!(job.output_name(&NamingPolicy::default()), "a-b.jpg");
        assert_eq!(job.label(), "a.jpg, b.jpg");
    }

    #[test]
    fn test_output_dir() {
        let job = StitchJob::new(None, files(&["a.png", "b.png"])).unwrap();
        assert_eq!(job.output_dir(None), PathBuf::from("/imgs"));
        assert_eq!(
            job.output_dir(Some(Path::new("/elsewhere"))),
            PathBuf::from("/elsewhere")
        );
    }

    #[test]
    fn test_extension() {
        let job = StitchJob::new(None, files(&["a.PNG", "b.png"])).unwrap();
        assert_eq!(job.extension().as_deref(), Some(".png"));
    }
}
