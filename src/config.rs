use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::Result;
use crate::storage::DEFAULT_STORAGE_KEY;

const APP_DIR: &str = "profolio";

/// 配置文件 (~/.config/profolio/config.toml)，所有字段可选
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub storage_key: String,
    pub tick_rate_ms: u64,
    pub resume: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            tick_rate_ms: 100,
            resume: false,
        }
    }
}

impl Config {
    /// 读取配置文件，文件不存在时使用默认值
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 读取配置并用命令行参数覆盖
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        let mut config = Self::load(&path)?;
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = Some(dir.clone());
        }
        if cli.resume {
            self.resume = true;
        }
    }

    /// 数据目录 (~/.local/share/profolio/)，不存在时创建
    pub fn data_dir(&self) -> io::Result<PathBuf> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "could not locate the user data directory",
                    )
                })?
                .join(APP_DIR),
        };

        fs::create_dir_all(&data_dir)?;

        Ok(data_dir)
    }
}

pub fn default_config_path() -> io::Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "could not locate the user config directory",
            )
        })?
        .join(APP_DIR)
        .join("config.toml"))
}
