use super::backend::StitchBackend;
use super::batch_runner::{BatchResult, BatchRunner};
use super::directory_scanner::{DirectoryScanner, SkipReason};
use super::stitch_job::StitchJob;
use crate::config::{InputMode, StitchRequest};
use crate::error::StitchError;
use crate::tools::{NameFilter, all_equal, is_recognized_file, validate_file_exists};
use anyhow::Result;
use console::style;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 一次執行的結果摘要
#[derive(Debug, Default)]
pub struct StitchSummary {
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub batch: BatchResult,
}

impl StitchSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.batch.is_success()
    }
}

/// 圖片拼接元件
pub struct ImageStitcher {
    request: StitchRequest,
    backend: Box<dyn StitchBackend>,
    shutdown_signal: Arc<AtomicBool>,
}

impl ImageStitcher {
    #[must_use]
    pub fn new(
        request: StitchRequest,
        backend: Box<dyn StitchBackend>,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            request,
            backend,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<StitchSummary> {
        let summary = match &self.request.mode {
            InputMode::Files(files) => self.run_files(files)?,
            InputMode::AllSubdirectories {
                root,
                dir_filter,
                file_filter,
            } => self.run_subdirectories(root, dir_filter, file_filter)?,
        };

        if self.request.show_summary {
            self.print_summary(&summary);
        }
        Ok(summary)
    }

    /// 明確指定檔案：只有一個任務，驗證失敗直接中止
    fn run_files(&self, files: &[PathBuf]) -> Result<StitchSummary> {
        validate_explicit_files(files)?;

        if files.len() == 1 {
            warn!("只有一個檔案，不需要拼接: {}", files[0].display());
            return Ok(StitchSummary::default());
        }

        let job = StitchJob::new(None, files.to_vec()).map_err(StitchError::from)?;
        let batch = self.runner(self.request.output_dir.clone()).run_batch(
            std::slice::from_ref(&job),
            self.request.direction,
            self.request.reverse,
            &self.request.naming,
        )?;

        Ok(StitchSummary {
            skipped: Vec::new(),
            batch,
        })
    }

    /// 掃描子資料夾：每個子資料夾一個任務，不符合條件的子資料夾略過
    fn run_subdirectories(
        &self,
        root: &Path,
        dir_filter: &str,
        file_filter: &str,
    ) -> Result<StitchSummary> {
        let scanner = DirectoryScanner::new(
            NameFilter::new(dir_filter)?,
            NameFilter::new(file_filter)?,
            Arc::clone(&self.shutdown_signal),
        );

        let report = scanner.scan_subdirectories(root)?;
        let skipped: Vec<(PathBuf, SkipReason)> = report
            .skipped()
            .into_iter()
            .map(|(dir, reason)| (dir.to_path_buf(), reason))
            .collect();
        let jobs = report.into_jobs(root)?;

        info!("共 {} 個子資料夾需要拼接", jobs.len());

        let batch = self.runner(Some(root.to_path_buf())).run_batch(
            &jobs,
            self.request.direction,
            self.request.reverse,
            &self.request.naming,
        )?;

        Ok(StitchSummary { skipped, batch })
    }

    fn runner(&self, output_dir: Option<PathBuf>) -> BatchRunner<'_> {
        BatchRunner::new(self.backend.as_ref(), Arc::clone(&self.shutdown_signal))
            .with_output_dir(output_dir)
            .with_max_parallel_jobs(self.request.max_parallel_jobs)
            .with_progress(self.request.show_progress)
    }

    fn print_summary(&self, summary: &StitchSummary) {
        let completed = summary.batch.completed();
        let failed = summary.batch.failed();

        if completed.is_empty() && failed.is_empty() && summary.skipped.is_empty() {
            return;
        }

        println!();
        println!("{}", style("=== 拼接結果 ===").cyan().bold());

        for outcome in &completed {
            println!(
                "  {} {}",
                style("✓").green(),
                outcome.output_path.display()
            );
        }

        for outcome in &failed {
            let reason = outcome
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            println!("  {} {}: {}", style("✗").red(), outcome.label, reason);
        }

        for (directory, reason) in &summary.skipped {
            let name = directory
                .file_name()
                .map_or_else(|| directory.display().to_string(), |n| n.to_string_lossy().to_string());
            println!("  {} {}: {}", style("⋯").dim(), name, reason);
        }

        println!();
        println!("  成功: {}", style(completed.len()).green());
        if !failed.is_empty() {
            println!("  失敗: {}", style(failed.len()).red());
        }
        let cancelled = summary.batch.cancelled_count();
        if cancelled > 0 {
            println!("  其中已取消: {}", style(cancelled).yellow());
        }
        if !summary.skipped.is_empty() {
            println!("  略過: {}", style(summary.skipped.len()).dim());
        }
    }
}

/// 驗證明確指定的檔案：存在、副檔名受支援、且副檔名一致
///
/// 先檢查不支援的副檔名，再檢查副檔名是否一致。
fn validate_explicit_files(files: &[PathBuf]) -> Result<(), StitchError> {
    if files.is_empty() {
        return Err(StitchError::Configuration("沒有指定要拼接的檔案".to_string()));
    }

    for file in files {
        if validate_file_exists(file).is_err() {
            return Err(StitchError::InputNotFound(file.clone()));
        }
    }

    if let Some(file) = files.iter().find(|f| !is_recognized_file(f)) {
        return Err(StitchError::UnrecognizedExtension(file.clone()));
    }

    if !all_equal(files) {
        let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
        return Err(StitchError::MismatchedExtensions(names.join(", ")));
    }

    Ok(())
}
