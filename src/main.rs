mod cli;
mod command;
mod config;
mod error;
mod image;
mod logging;
mod models;
mod storage;
mod ui;

use std::io;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::cli::Cli;
use crate::config::Config;
use crate::image::ImageLoader;
use crate::models::PortfolioDocument;
use crate::storage::{FileStore, load_document};
use crate::ui::actions::Action;
use crate::ui::{App, render};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = Config::from_cli(&cli).wrap_err("failed to load configuration")?;
    let data_dir = config.data_dir()?;
    logging::initialize_logging(&data_dir)?;
    tracing::info!(data_dir = %data_dir.display(), "starting");

    // 文档默认从空白开始，--resume 时从存储恢复
    let store = FileStore::new(&data_dir);
    let document = if config.resume {
        load_document(&store, &config.storage_key).wrap_err("failed to load saved portfolio")?
    } else {
        PortfolioDocument::new()
    };

    // 图片解码在后台运行时中进行
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let images = ImageLoader::new(runtime.handle().clone());

    // 创建应用状态
    let mut app = App::new(document, Box::new(store), config.storage_key.clone(), images);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let result = run_app(&mut terminal, &mut app, tick_rate);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    app.images.cancel_all();
    tracing::info!("exiting");

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if ui::handle_key_event(app, key.code, key.modifiers) {
                        break;
                    }
                }
                // 粘贴整体进入输入框，不会被当作按键命令
                Event::Paste(text) => {
                    app.dispatch(Action::Paste(text));
                }
                _ => {}
            }
        }

        app.poll_images();
    }
    Ok(())
}
