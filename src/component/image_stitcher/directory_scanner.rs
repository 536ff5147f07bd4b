//! 子資料夾掃描器
//!
//! 只掃描根目錄下一層的子資料夾，每個子資料夾分類為一個拼接任務或一個略過原因

use super::stitch_job::StitchJob;
use crate::error::{JobRejection, StitchError};
use crate::tools::{NameFilter, is_recognized_file, is_temp_file, validate_directory_exists};
use anyhow::{Result, bail};
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::{DirEntry, WalkDir};

/// 子資料夾被略過的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    InsufficientFiles,
    MismatchedExtensions,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "沒有可用的圖片"),
            Self::InsufficientFiles => write!(f, "圖片數量不足"),
            Self::MismatchedExtensions => write!(f, "副檔名不一致"),
        }
    }
}

impl From<&JobRejection> for SkipReason {
    fn from(rejection: &JobRejection) -> Self {
        match rejection {
            JobRejection::InsufficientFiles(0) => Self::Empty,
            JobRejection::InsufficientFiles(_) => Self::InsufficientFiles,
            JobRejection::MismatchedExtensions(_) => Self::MismatchedExtensions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Job(StitchJob),
    Skipped { directory: PathBuf, reason: SkipReason },
}

/// 掃描結果
#[derive(Debug, Default)]
pub struct ScanReport {
    pub outcomes: Vec<ScanOutcome>,
}

impl ScanReport {
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ScanOutcome::Job(_)))
            .count()
    }

    #[must_use]
    pub fn skipped(&self) -> Vec<(&Path, SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ScanOutcome::Skipped { directory, reason } => Some((directory.as_path(), *reason)),
                ScanOutcome::Job(_) => None,
            })
            .collect()
    }

    /// 取出所有任務，沒有任何任務時視為整批失敗
    pub fn into_jobs(self, root: &Path) -> Result<Vec<StitchJob>, StitchError> {
        let jobs: Vec<StitchJob> = self
            .outcomes
            .into_iter()
            .filter_map(|o| match o {
                ScanOutcome::Job(job) => Some(job),
                ScanOutcome::Skipped { .. } => None,
            })
            .collect();

        if jobs.is_empty() {
            return Err(StitchError::NoStitchableContent(root.to_path_buf()));
        }
        Ok(jobs)
    }
}

pub struct DirectoryScanner {
    dir_filter: NameFilter,
    file_filter: NameFilter,
    shutdown_signal: Arc<AtomicBool>,
}

impl DirectoryScanner {
    #[must_use]
    pub const fn new(
        dir_filter: NameFilter,
        file_filter: NameFilter,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            dir_filter,
            file_filter,
            shutdown_signal,
        }
    }

    /// 掃描根目錄下所有符合篩選條件的子資料夾
    pub fn scan_subdirectories(&self, root: &Path) -> Result<ScanReport> {
        if validate_directory_exists(root).is_err() {
            return Err(StitchError::RootNotFound(root.to_path_buf()).into());
        }

        info!(
            "開始掃描目錄: {} (資料夾篩選: {}, 檔案篩選: {})",
            root.display(),
            self.dir_filter.pattern(),
            self.file_filter.pattern()
        );

        let mut report = ScanReport::default();

        for directory in self.list_subdirectories(root) {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                bail!("收到中斷訊號，停止掃描");
            }

            let outcome = self.classify(&directory);
            match &outcome {
                ScanOutcome::Job(job) => {
                    debug!("子資料夾 {} 有 {} 張圖片", directory.display(), job.files().len());
                }
                ScanOutcome::Skipped { reason, .. } => {
                    warn!("略過子資料夾 {}: {}", directory.display(), reason);
                }
            }
            report.outcomes.push(outcome);
        }

        info!(
            "掃描完成，共 {} 個子資料夾，{} 個可拼接",
            report.outcomes.len(),
            report.job_count()
        );

        Ok(report)
    }

    /// 將單一子資料夾分類為任務或略過
    #[must_use]
    pub fn classify(&self, directory: &Path) -> ScanOutcome {
        let files = self.list_candidate_files(directory);

        match StitchJob::new(Some(directory.to_path_buf()), files) {
            Ok(job) => ScanOutcome::Job(job),
            Err(rejection) => ScanOutcome::Skipped {
                directory: directory.to_path_buf(),
                reason: SkipReason::from(&rejection),
            },
        }
    }

    fn list_subdirectories(&self, root: &Path) -> Vec<PathBuf> {
        immediate_children(root)
            .filter(|entry| entry.file_type().is_dir())
            .map(DirEntry::into_path)
            .filter(|path| self.dir_filter.matches(path))
            .collect()
    }

    fn list_candidate_files(&self, directory: &Path) -> Vec<PathBuf> {
        immediate_children(directory)
            .filter(|entry| entry.file_type().is_file())
            .map(DirEntry::into_path)
            .filter(|path| self.file_filter.matches(path))
            .filter(|path| is_recognized_file(path))
            .collect()
    }
}

/// 列出下一層的項目（依名稱排序，符號連結會跟隨到目標）
///
/// 只排除寫入輸出時產生的暫存檔，隱藏的資料夾與檔案照常處理。
fn immediate_children(directory: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("讀取目錄項目失敗: {e}");
                None
            }
        })
        .filter(|entry| {
            if is_temp_file(entry.path()) {
                debug!("略過暫存檔: {}", entry.path().display());
                return false;
            }
            true
        })
}
