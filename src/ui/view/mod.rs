//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;
pub mod section;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::section_editor::{FieldInput, SectionField};
use super::settings_form::SettingField;
use super::state::{App, AppMode, Focus, NoticeLevel};
use crate::command::Command;
use components::{field_line, render_dialog_framework, render_input_widget};
use layouts::centered_rect;
use section::render_section_editor;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(10),   // 主体
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SettingField::ALL.len() as u16 + 2), // 设置
            Constraint::Min(4),                                     // 区块列表
        ])
        .split(body[0]);

    render_title(frame, app, chunks[0]);
    render_settings(frame, app, left[0]);
    render_sections(frame, app, left[1]);

    let section = app.selected_section();
    render_section_editor(
        frame,
        body[1],
        section,
        app.selected_field(),
        app.focus == Focus::Editor,
        section.is_some_and(|section| app.images.is_pending(&section.id)),
    );

    render_help(frame, app, chunks[2]);

    // 渲染弹窗
    match &app.mode {
        AppMode::EditingSetting(field) => render_edit_dialog(
            frame,
            field.label(),
            &app.input_buffer,
            "Enter to save, Esc to cancel",
        ),
        AppMode::EditingSection { field, .. } => {
            let hint = match (field, field.input()) {
                (SectionField::Content, _) => {
                    "Enter for a new line, Ctrl+S or Alt+Enter to save, Esc to cancel"
                }
                (_, FieldInput::Path) => "Type an image path, Enter to load, Esc to cancel",
                _ => "Enter to save, Esc to cancel",
            };
            render_edit_dialog(frame, field.label(), &app.input_buffer, hint)
        }
        AppMode::Confirm(command) => render_confirm_dialog(frame, command),
        AppMode::Notice(notice) => render_notice(frame, notice.level, &notice.text),
        AppMode::Dragging(_) | AppMode::Normal => {} // 拖动模式使用列表高亮和底部提示
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.document.settings;
    let title = Line::from(vec![
        Span::styled(
            "▦ Profolio",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(settings.theme.label(), Style::default().fg(Color::Gray)),
    ]);
    let widget = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Settings;
    let settings = &app.document.settings;

    let values: Vec<(SettingField, String)> = SettingField::ALL
        .iter()
        .map(|field| (*field, field.value(settings)))
        .collect();
    let lines: Vec<Line> = values
        .iter()
        .enumerate()
        .map(|(i, (field, value))| {
            field_line(
                field.label(),
                value,
                field.placeholder(),
                focused && i == app.settings_index,
            )
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title("Portfolio by Profolio")
            .borders(Borders::ALL)
            .border_style(border_style(focused)),
    );
    frame.render_widget(widget, area);
}

fn render_sections(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Sections;
    let dragging = match &app.mode {
        AppMode::Dragging(id) => Some(id.as_str()),
        _ => None,
    };

    let mut items: Vec<ListItem> = app
        .document
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let grip = if dragging == Some(section.id.as_str()) { "✥ " } else { "⋮ " };
            let content = format!("{grip}[{}] {}", section.kind(), section.summary());

            let style = if dragging.is_some() && i == app.selected_index {
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if dragging == Some(section.id.as_str()) {
                Style::default().fg(Color::Magenta)
            } else if i == app.selected_index && app.focus != Focus::Settings {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![Span::styled(content, style)]))
        })
        .collect();

    items.push(ListItem::new(Line::styled(
        "+ Add New Section [a]",
        Style::default().fg(Color::DarkGray),
    )));

    let list = List::new(items).block(
        Block::default()
            .title(format!("Sections ({})", app.document.sections.len()))
            .borders(Borders::ALL)
            .border_style(border_style(focused || dragging.is_some())),
    );

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => concat!(
            "[Tab] panel  [j/k] move  [Enter] edit  [a] add  [d] delete  ",
            "[m] drag  [s] save  [R] reset  [q] quit"
        ),
        AppMode::EditingSection {
            field: SectionField::Content,
            ..
        } => "[Enter] new line  [Ctrl+S/Alt+Enter] save  [Esc] cancel",
        AppMode::EditingSetting(_) | AppMode::EditingSection { .. } => {
            "[Enter] save  [Esc] cancel"
        }
        AppMode::Dragging(_) => "[j/k] choose position  [m] drop  [Esc] cancel",
        AppMode::Confirm(_) => "[y] confirm  [n] cancel",
        AppMode::Notice(_) => "press any key",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{help_text}  |  {message}")
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_edit_dialog(frame: &mut Frame, label: &str, value: &str, hint: &str) {
    let area = centered_rect(70, 30, frame.area());
    let inner = render_dialog_framework(frame, area, "Edit", Color::Cyan);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    render_input_widget(frame, chunks[0], label, value, true, Color::Yellow);

    let hint = Paragraph::new(hint).style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[1]);
}

fn render_confirm_dialog(frame: &mut Frame, command: &Command) {
    let area = centered_rect(50, 20, frame.area());
    let inner = render_dialog_framework(frame, area, "⚠️ Confirm", Color::Red);

    let message = match command {
        Command::Reset => "Are you sure you want to reset? All changes will be lost.",
        _ => "Are you sure you want to delete this section?",
    };

    let dialog = Paragraph::new(format!("{message}\n\n[y] confirm  [n] cancel"))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });

    frame.render_widget(dialog, inner);
}

fn render_notice(frame: &mut Frame, level: NoticeLevel, text: &str) {
    let area = centered_rect(50, 20, frame.area());
    let (title, color) = match level {
        NoticeLevel::Info => ("Profolio", Color::Green),
        NoticeLevel::Warning => ("⚠️ Warning", Color::Yellow),
    };
    let inner = render_dialog_framework(frame, area, title, color);

    let notice = Paragraph::new(format!("{text}\n\npress any key"))
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    frame.render_widget(notice, inner);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::runtime::Runtime;

    use super::*;
    use crate::image::ImageLoader;
    use crate::storage::MemoryStore;
    use crate::ui::actions::Action;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_empty_and_with_sections() {
        let runtime = Runtime::new().unwrap();
        let loader = ImageLoader::new(runtime.handle().clone());
        let mut app = App::new(
            Default::default(),
            Box::new(MemoryStore::default()),
            "portfolioData".to_string(),
            loader,
        );

        let text = screen(&mut app);
        assert!(text.contains("Enter portfolio title"));
        assert!(text.contains("No section selected"));

        app.dispatch(Action::AddSection);
        app.dispatch(Action::StartDeleteSection);
        let text = screen(&mut app);
        assert!(text.contains("Sections (1)"));
        assert!(text.contains("delete this section"));
    }
}
