use super::backend::StitchBackend;
use super::stitch_job::StitchJob;
use crate::config::{Direction, NamingPolicy};
use crate::error::JobFailure;
use crate::tools::{ensure_directory_exists, write_atomically};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// 整批任務目前的狀態，執行期間可從其他執行緒讀取
#[derive(Debug, Default)]
pub struct StatusBoard {
    statuses: Mutex<Vec<TaskStatus>>,
}

impl StatusBoard {
    fn reset(&self, len: usize) {
        *self.lock() = vec![TaskStatus::Pending; len];
    }

    fn set(&self, index: usize, status: TaskStatus) {
        if let Some(slot) = self.lock().get_mut(index) {
            *slot = status;
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<TaskStatus> {
        self.lock().clone()
    }

    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.lock().iter().filter(|s| **s == status).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TaskStatus>> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 單一任務的執行結果
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub label: String,
    pub output_path: PathBuf,
    pub status: TaskStatus,
    pub error: Option<JobFailure>,
}

impl JobOutcome {
    fn new(job: &StitchJob, output_path: PathBuf) -> Self {
        Self {
            label: job.label(),
            output_path,
            status: TaskStatus::Pending,
            error: None,
        }
    }

    fn finish(mut self, result: std::result::Result<(), JobFailure>) -> Self {
        match result {
            Ok(()) => self.status = TaskStatus::Completed,
            Err(failure) => {
                self.status = TaskStatus::Failed;
                self.error = Some(failure);
            }
        }
        self
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// 整批任務的結果
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<JobOutcome>,
}

impl BatchResult {
    #[must_use]
    pub fn completed(&self) -> Vec<&JobOutcome> {
        self.outcomes.iter().filter(|o| o.is_completed()).collect()
    }

    #[must_use]
    pub fn failed(&self) -> Vec<&JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_completed()).collect()
    }

    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.error.as_ref().is_some_and(JobFailure::is_cancelled))
            .count()
    }

    /// 任何一個任務失敗（包含取消）都視為整批失敗
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(JobOutcome::is_completed)
    }
}

/// 平行執行拼接任務
///
/// 每個任務各自擁有輸入清單與輸出路徑，任務之間只共用中斷訊號。
pub struct BatchRunner<'a> {
    backend: &'a dyn StitchBackend,
    shutdown_signal: Arc<AtomicBool>,
    status_board: Arc<StatusBoard>,
    output_dir: Option<PathBuf>,
    max_parallel_jobs: Option<usize>,
    show_progress: bool,
}

impl<'a> BatchRunner<'a> {
    #[must_use]
    pub fn new(backend: &'a dyn StitchBackend, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            backend,
            shutdown_signal,
            status_board: Arc::new(StatusBoard::default()),
            output_dir: None,
            max_parallel_jobs: None,
            show_progress: false,
        }
    }

    /// 指定輸出目錄，未指定時輸出到第一個輸入檔案所在的目錄
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// 共用外部的狀態表，讓呼叫端在執行期間觀察各任務狀態
    #[must_use]
    pub fn with_status_board(mut self, status_board: Arc<StatusBoard>) -> Self {
        self.status_board = status_board;
        self
    }

    #[must_use]
    pub fn status_board(&self) -> Arc<StatusBoard> {
        Arc::clone(&self.status_board)
    }

    #[must_use]
    pub fn with_max_parallel_jobs(mut self, max_parallel_jobs: Option<usize>) -> Self {
        self.max_parallel_jobs = max_parallel_jobs;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn run_batch(
        &self,
        jobs: &[StitchJob],
        direction: Direction,
        reverse: bool,
        naming: &NamingPolicy,
    ) -> Result<BatchResult> {
        info!("開始拼接，共 {} 個任務", jobs.len());

        let progress_bar = self.create_progress_bar(jobs.len())?;
        self.status_board.reset(jobs.len());

        let run = || {
            jobs.par_iter()
                .enumerate()
                .map(|(index, job)| {
                    let outcome = self.execute_job(index, job, direction, reverse, naming);
                    self.status_board.set(index, outcome.status);
                    progress_bar.inc(1);
                    progress_bar.set_message(format!(
                        "執行中: {}",
                        self.status_board.count(TaskStatus::Running)
                    ));
                    outcome
                })
                .collect::<Vec<_>>()
        };

        let outcomes = match self.max_parallel_jobs {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run),
            None => run(),
        };

        let result = BatchResult { outcomes };
        if self.shutdown_signal.load(Ordering::SeqCst) {
            progress_bar.abandon_with_message("操作已中斷");
        } else {
            progress_bar.finish_with_message("拼接完成");
        }

        info!(
            "拼接完成 - 成功: {}, 失敗: {}, 取消: {}",
            result.completed().len(),
            result.failed().len() - result.cancelled_count(),
            result.cancelled_count()
        );

        Ok(result)
    }

    fn execute_job(
        &self,
        index: usize,
        job: &StitchJob,
        direction: Direction,
        reverse: bool,
        naming: &NamingPolicy,
    ) -> JobOutcome {
        let output_dir = job.output_dir(self.output_dir.as_deref());
        let outcome = JobOutcome::new(job, output_dir.join(job.output_name(naming)));

        // 尚未開始的任務在收到中斷訊號後不再派送
        if self.shutdown_signal.load(Ordering::SeqCst) {
            debug!("任務 {} 已取消，未開始執行", outcome.label);
            return outcome.finish(Err(JobFailure::Cancelled));
        }

        debug!(
            "任務 {} 開始執行 ({} 張 {} 圖片)",
            outcome.label,
            job.files().len(),
            job.extension().unwrap_or_default()
        );
        self.status_board.set(index, TaskStatus::Running);
        let running = JobOutcome {
            status: TaskStatus::Running,
            ..outcome
        };

        // 單一任務的 panic 只讓該任務失敗
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.stitch_and_write(job, direction, reverse, &output_dir, &running.output_path)
        }))
        .unwrap_or_else(|payload| Err(JobFailure::Backend(panic_message(&*payload))));

        match &result {
            Ok(()) => info!("已拼接 {}: {}", running.label, running.output_path.display()),
            Err(failure) => error!("拼接失敗 [{}]: {}", running.label, failure),
        }
        running.finish(result)
    }

    fn stitch_and_write(
        &self,
        job: &StitchJob,
        direction: Direction,
        reverse: bool,
        output_dir: &Path,
        output_path: &Path,
    ) -> std::result::Result<(), JobFailure> {
        let inputs = job.ordered_files(direction, reverse);

        let bytes = self
            .backend
            .stitch(&inputs, direction)
            .map_err(|e| JobFailure::Backend(format!("{e:#}")))?;

        // 拼接期間收到中斷訊號時不寫入輸出
        if self.shutdown_signal.load(Ordering::SeqCst) {
            return Err(JobFailure::Cancelled);
        }

        ensure_directory_exists(output_dir).map_err(|e| JobFailure::Write(format!("{e:#}")))?;
        write_atomically(output_path, &bytes).map_err(|e| JobFailure::Write(format!("{e:#}")))
    }

    fn create_progress_bar(&self, len: usize) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let progress_bar = ProgressBar::new(len as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("#>-"),
        );
        progress_bar.set_message("拼接中...");
        Ok(progress_bar)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "未知原因".to_string());
    format!("拼接時發生 panic: {detail}")
}
