pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod init;
pub mod signal;
pub mod tools;

use crate::cli::Cli;
use crate::component::ImageStitcher;
use crate::component::image_stitcher::{ImageCrateBackend, StitchSummary};
use crate::config::UserSettings;
use crate::error::StitchError;
use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 讀取目前目錄的設定檔後執行
pub fn run(cli: Cli, shutdown_signal: Arc<AtomicBool>) -> Result<StitchSummary> {
    let settings = UserSettings::load()
        .map_err(|e| StitchError::Configuration(format!("{e:#}")))?;
    run_with_settings(cli, &settings, shutdown_signal)
}

/// 所有設定檢查都在這裡完成，之後才會碰到任何檔案或目錄
pub fn run_with_settings(
    cli: Cli,
    settings: &UserSettings,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<StitchSummary> {
    let request = cli.into_request(settings)?;
    let stitcher = ImageStitcher::new(request, Box::new(ImageCrateBackend), shutdown_signal);
    stitcher.run()
}
