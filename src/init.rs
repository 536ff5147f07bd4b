use env_logger::{Builder, Env};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

/// 初始化日誌，只在程式啟動時呼叫一次
///
/// 預設等級為 info，`RUST_LOG` 可覆寫；`-v` / `-q` 會再覆寫為 debug / warn。
pub fn init(verbosity: Verbosity) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_target(false).format_timestamp_secs();

    match verbosity {
        Verbosity::Verbose => {
            builder.filter_level(LevelFilter::Debug);
        }
        Verbosity::Quiet => {
            builder.filter_level(LevelFilter::Warn);
        }
        Verbosity::Normal => {}
    }

    // 重複初始化時保留既有的 logger
    let _ = builder.try_init();
}
