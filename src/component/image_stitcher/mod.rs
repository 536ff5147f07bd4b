//! 圖片拼接元件
//!
//! 流程：
//! A. 驗證命令列參數（命名規則、篩選樣式、輸入檔案）
//! B. 建立拼接任務（明確指定的檔案，或掃描每個子資料夾）
//! C. 平行執行拼接，每個任務獨立成功或失敗
//! D. 彙整結果

mod backend;
mod batch_runner;
mod directory_scanner;
mod main;
mod output_namer;
mod stitch_job;

pub use backend::{ImageCrateBackend, StitchBackend};
pub use batch_runner::{BatchResult, BatchRunner, JobOutcome, StatusBoard, TaskStatus};
pub use directory_scanner::{DirectoryScanner, ScanOutcome, ScanReport, SkipReason};
pub use main::{ImageStitcher, StitchSummary};
pub use output_namer::{name_for_directory, name_for_files};
pub use stitch_job::StitchJob;
