use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(version, about = "Assemble a portfolio page from reorderable sections")]
pub struct Cli {
    /// Directory holding the saved portfolio and the log file
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.config/profolio/config.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start from the saved portfolio instead of an empty one
    #[arg(short, long)]
    pub resume: bool,
}
