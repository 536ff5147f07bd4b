use anyhow::{Context, Result};
use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 設定 Ctrl-C 處理器，回傳所有任務共用的中斷訊號
///
/// 中斷是協作式的：已在執行的拼接不會被強制中止，但完成後不會寫入輸出，
/// 尚未開始的任務則不再執行。
pub fn setup_shutdown_signal() -> Result<Arc<AtomicBool>> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        warn!("收到中斷信號，正在安全關閉...");
    })
    .context("無法設定 Ctrl-C 處理器")?;

    Ok(shutdown_signal)
}
