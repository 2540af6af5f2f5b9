use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_NAME: &str = "danci-review.log";

/// 持有文件日志的后台写线程；drop 时刷新缓冲
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// 初始化 tracing
///
/// 终端输出走 stderr，避免与复习界面混在一起；`config.log_dir` 存在时额外按天滚动写文件。
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let (file_layer, guard) = match config.log_dir.as_deref().and_then(file_writer) {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn file_writer(log_dir: &Path) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if let Err(err) = std::fs::create_dir_all(log_dir) {
        eprintln!("failed to create log directory {}: {err}", log_dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
    Some(tracing_appender::non_blocking(appender))
}
