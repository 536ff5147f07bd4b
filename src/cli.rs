use crate::config::{
    DEFAULT_FILTER, Direction, InputMode, NamingPolicy, StitchRequest, UserSettings,
};
use crate::error::StitchError;
use crate::init::Verbosity;
use clap::Parser;
use std::path::PathBuf;

/// 命令列可接受的方向寫法
const DIRECTION_ALIASES: &[(&str, Direction)] = &[
    ("h", Direction::Horizontal),
    ("horizontal", Direction::Horizontal),
    ("v", Direction::Vertical),
    ("vertical", Direction::Vertical),
];

fn parse_direction(raw: &str) -> Result<Direction, String> {
    let lowered = raw.to_lowercase();
    DIRECTION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, direction)| *direction)
        .ok_or_else(|| format!("無效的方向 {raw:?}，請使用 h（水平）或 v（垂直）"))
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "圖片拼接工具：將多張圖片水平或垂直拼接成一張",
    arg_required_else_help = true
)]
pub struct Cli {
    /// 拼接方向，h 為水平，v 為垂直
    #[arg(value_parser = parse_direction)]
    pub direction: Direction,

    /// 要拼接的檔案（不可與 --all-subdirectories 同時使用）
    pub files: Vec<PathBuf>,

    /// 拼接根目錄下每個子資料夾中的圖片，每個子資料夾各自輸出一張
    #[arg(short = 'a', long)]
    pub all_subdirectories: bool,

    /// 掃描子資料夾時的根目錄（預設為目前目錄）；指定檔案時作為輸出目錄
    #[arg(short = 'd', long)]
    pub root_dir: Option<PathBuf>,

    /// 子資料夾內的檔案篩選樣式
    #[arg(long, default_value = DEFAULT_FILTER)]
    pub file_filter: String,

    /// 子資料夾篩選樣式
    #[arg(long, default_value = DEFAULT_FILTER)]
    pub dir_filter: String,

    /// 反轉拼接順序：水平預設由右至左，垂直預設由上至下
    #[arg(short, long)]
    pub reverse: bool,

    /// 輸出檔名前綴
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// 輸出檔名分隔符號（預設為 -）
    #[arg(short, long)]
    pub separator: Option<String>,

    /// 同時執行的拼接任務上限（預設為 CPU 核心數）
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// 顯示除錯訊息
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// 只顯示警告與錯誤
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    /// 合併設定檔與命令列參數，並在開始任何工作之前完成所有設定檢查
    pub fn into_request(self, settings: &UserSettings) -> Result<StitchRequest, StitchError> {
        if self.all_subdirectories && !self.files.is_empty() {
            return Err(StitchError::Configuration(
                "--all-subdirectories 不能與指定檔案同時使用".to_string(),
            ));
        }
        if !self.all_subdirectories && self.files.is_empty() {
            return Err(StitchError::Configuration(
                "請指定要拼接的檔案，或使用 --all-subdirectories".to_string(),
            ));
        }
        if self.jobs == Some(0) {
            return Err(StitchError::Configuration("--jobs 必須大於 0".to_string()));
        }

        let naming = NamingPolicy::new(
            self.prefix.unwrap_or_else(|| settings.default_prefix.clone()),
            self.separator
                .unwrap_or_else(|| settings.default_separator.clone()),
        )?;

        let (mode, output_dir) = if self.all_subdirectories {
            let root = match self.root_dir {
                Some(root) => root,
                None => std::env::current_dir().map_err(|e| {
                    StitchError::Configuration(format!("無法取得目前目錄: {e}"))
                })?,
            };
            (
                InputMode::AllSubdirectories {
                    root,
                    dir_filter: self.dir_filter,
                    file_filter: self.file_filter,
                },
                None,
            )
        } else {
            (InputMode::Files(self.files), self.root_dir)
        };

        Ok(StitchRequest {
            mode,
            direction: self.direction,
            reverse: self.reverse,
            naming,
            output_dir,
            max_parallel_jobs: self.jobs.or(settings.max_parallel_jobs),
            show_progress: settings.show_progress && !self.quiet,
            show_summary: !self.quiet,
        })
    }
}
