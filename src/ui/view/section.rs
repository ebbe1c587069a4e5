//! 区块编辑器视图

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::components::field_line;
use crate::models::{Section, SectionContent, SectionKind};
use crate::ui::section_editor::{self, SectionField, describe_data_url};

/// 渲染单个区块的表单，`selected` 为高亮的字段
pub fn render_section_editor(
    frame: &mut Frame,
    area: Rect,
    section: Option<&Section>,
    selected: Option<SectionField>,
    focused: bool,
    loading: bool,
) {
    let border = if focused { Color::Cyan } else { Color::Gray };
    let block = Block::default()
        .title("Section")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let Some(section) = section else {
        let empty = Paragraph::new("No section selected. Press 'a' to add a new section.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![kind_selector(
        section.kind(),
        focused && selected == Some(SectionField::Kind),
    )];
    lines.push(Line::raw(""));

    let values: Vec<(SectionField, String)> = section_editor::fields(section)
        .iter()
        .filter(|field| **field != SectionField::Kind)
        .map(|field| (*field, section_editor::field_value(section, *field)))
        .collect();
    for (field, value) in &values {
        let is_selected = focused && selected == Some(*field);
        let placeholder = match field {
            SectionField::GalleryClear => "[Enter]",
            _ => "(empty)",
        };
        lines.push(field_line(field.label(), value, placeholder, is_selected));
    }

    lines.push(Line::raw(""));
    lines.extend(preview(section));
    if loading {
        lines.push(Line::styled("Decoding image...", Style::default().fg(Color::Yellow)));
    }

    let editor = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(editor, area);
}

fn kind_selector(current: SectionKind, selected: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " Type       ",
        if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        },
    )];
    for kind in SectionKind::ALL {
        let style = if kind == current {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {kind} "), style));
    }
    Line::from(spans)
}

/// 类型相关的预览
fn preview(section: &Section) -> Vec<Line<'static>> {
    match &section.content {
        SectionContent::Skills { skills } => {
            let spans: Vec<Span> = skills
                .iter()
                .flat_map(|skill| {
                    [
                        Span::styled(format!(" {skill} "), Style::default().bg(Color::DarkGray)),
                        Span::raw(" "),
                    ]
                })
                .collect();
            vec![Line::from(spans)]
        }
        SectionContent::Gallery { images } => images
            .iter()
            .enumerate()
            .map(|(i, url)| Line::raw(format!("  {}. {}", i + 1, describe_data_url(url))))
            .collect(),
        SectionContent::Text { content, .. } => content
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(Color::Gray)))
            .collect(),
        SectionContent::Image { .. } => Vec::new(),
    }
}
