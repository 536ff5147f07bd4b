use clap::Parser;
use clap::error::ErrorKind;
use console::style;
use image_stitcher::cli::Cli;
use image_stitcher::init;
use image_stitcher::signal::setup_shutdown_signal;
use log::{error, info, warn};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // 沒有參數時顯示說明，視為正常結束
            return match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init::init(cli.verbosity());

    let shutdown_signal = match setup_shutdown_signal() {
        Ok(signal) => signal,
        Err(e) => {
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match image_stitcher::run(cli, shutdown_signal) {
        Ok(summary) if summary.is_success() => {
            info!("程式正常結束");
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            warn!("{} 個拼接任務未完成", summary.batch.failed().len());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("執行失敗: {e:#}");
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
