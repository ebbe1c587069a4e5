use std::fs::File;
use std::path::Path;

use color_eyre::eyre::Result;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "profolio.log";
pub const LOG_ENV: &str = "PROFOLIO_LOG";

/// 日志写入数据目录，终端由界面占用
pub fn initialize_logging(data_dir: &Path) -> Result<()> {
    let log_file = File::create(data_dir.join(LOG_FILE))?;

    let filter = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV))
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(filter));

    tracing_subscriber::registry().with(file_layer).try_init()?;
    Ok(())
}
