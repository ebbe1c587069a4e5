//! 区块编辑器
//!
//! 根据区块类型列出可编辑字段，并把用户输入转换为发往文档的 Command。
//! 只读取区块快照，从不直接修改文档。

use crate::command::Command;
use crate::image::expand_path;
use crate::models::{Section, SectionContent, SectionEdit, format_skills, parse_skills};

/// 区块字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionField {
    Kind,
    Title,
    Content,
    Image,
    Caption,
    Skills,
    GalleryAdd,
    GalleryClear,
}

/// 字段的编辑方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    /// 文本输入，提交时生成命令
    Text,
    /// 输入文件路径，提交时发起图片解码
    Path,
    /// 回车直接触发
    Toggle,
}

impl SectionField {
    pub fn label(self) -> &'static str {
        match self {
            SectionField::Kind => "Type",
            SectionField::Title => "Section Title",
            SectionField::Content => "Content",
            SectionField::Image => "Image file",
            SectionField::Caption => "Caption",
            SectionField::Skills => "Skills (comma-separated)",
            SectionField::GalleryAdd => "Add image file",
            SectionField::GalleryClear => "Clear gallery",
        }
    }

    pub fn input(self) -> FieldInput {
        match self {
            SectionField::Kind | SectionField::GalleryClear => FieldInput::Toggle,
            SectionField::Image | SectionField::GalleryAdd => FieldInput::Path,
            SectionField::Title
            | SectionField::Content
            | SectionField::Caption
            | SectionField::Skills => FieldInput::Text,
        }
    }
}

/// 区块当前类型下可编辑的字段，第一项总是类型选择
pub fn fields(section: &Section) -> &'static [SectionField] {
    match section.content {
        SectionContent::Text { .. } => &[
            SectionField::Kind,
            SectionField::Title,
            SectionField::Content,
        ],
        SectionContent::Image { .. } => &[
            SectionField::Kind,
            SectionField::Image,
            SectionField::Caption,
        ],
        SectionContent::Gallery { .. } => &[
            SectionField::Kind,
            SectionField::GalleryAdd,
            SectionField::GalleryClear,
        ],
        SectionContent::Skills { .. } => &[SectionField::Kind, SectionField::Skills],
    }
}

/// 字段的可编辑文本表示
pub fn field_value(section: &Section, field: SectionField) -> String {
    match (&section.content, field) {
        (_, SectionField::Kind) => section.kind().to_string(),
        (SectionContent::Text { title, .. }, SectionField::Title) => title.clone(),
        (SectionContent::Text { content, .. }, SectionField::Content) => content.clone(),
        (SectionContent::Image { caption, .. }, SectionField::Caption) => caption.clone(),
        (SectionContent::Image { url, .. }, SectionField::Image) => url
            .as_deref()
            .map(describe_data_url)
            .unwrap_or_else(|| "(no image)".to_string()),
        (SectionContent::Skills { skills }, SectionField::Skills) => format_skills(skills),
        (SectionContent::Gallery { images }, SectionField::GalleryAdd) => {
            format!("{} image(s)", images.len())
        }
        _ => String::new(),
    }
}

/// 开始编辑时输入框的初始内容
pub fn initial_input(section: &Section, field: SectionField) -> String {
    match field.input() {
        FieldInput::Path | FieldInput::Toggle => String::new(),
        FieldInput::Text => field_value(section, field),
    }
}

/// 提交输入后生成的命令
pub fn edit_command(section: &Section, field: SectionField, input: &str) -> Option<Command> {
    let id = section.id.clone();
    let edit = match field {
        SectionField::Title => SectionEdit::Title(input.to_string()),
        SectionField::Content => SectionEdit::Content(input.to_string()),
        SectionField::Caption => SectionEdit::Caption(input.to_string()),
        SectionField::Skills => SectionEdit::Skills(parse_skills(input)),
        SectionField::Image | SectionField::GalleryAdd => {
            if input.trim().is_empty() {
                return None;
            }
            return Some(Command::LoadImage {
                id,
                path: expand_path(input),
            });
        }
        SectionField::Kind | SectionField::GalleryClear => return None,
    };
    Some(Command::UpdateSection { id, edit })
}

/// 回车触发类字段生成的命令
pub fn activate_command(section: &Section, field: SectionField) -> Option<Command> {
    match field {
        SectionField::Kind => Some(Command::ChangeKind {
            id: section.id.clone(),
            kind: section.kind().next(),
        }),
        SectionField::GalleryClear => Some(Command::UpdateSection {
            id: section.id.clone(),
            edit: SectionEdit::ClearGallery,
        }),
        _ => None,
    }
}

/// 删除请求，确认由外壳负责
pub fn delete_command(section: &Section) -> Command {
    Command::Delete {
        id: section.id.clone(),
    }
}

/// data URL 的简短描述，如 `image/png, 12.3 KiB`
pub fn describe_data_url(url: &str) -> String {
    let Some((header, payload)) = url.split_once(',') else {
        return "(invalid image)".to_string();
    };
    let mime = header
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("unknown");
    let bytes = payload.len() / 4 * 3;
    format!("{mime}, {:.1} KiB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::SectionKind;

    #[test]
    fn test_fields_follow_kind() {
        let mut section = Section::new(SectionKind::Text);
        assert_eq!(
            fields(&section),
            &[SectionField::Kind, SectionField::Title, SectionField::Content]
        );

        section.change_kind(SectionKind::Skills);
        assert_eq!(fields(&section), &[SectionField::Kind, SectionField::Skills]);
    }

    #[test]
    fn test_skills_round_trip_through_input() {
        let mut section = Section::new(SectionKind::Skills);
        let command = edit_command(&section, SectionField::Skills, "Go, Rust ,  C++").unwrap();

        let Command::UpdateSection { id, edit } = command else {
            panic!("expected UpdateSection");
        };
        assert_eq!(id, section.id);
        assert_eq!(
            edit,
            SectionEdit::Skills(vec!["Go".to_string(), "Rust".to_string(), "C++".to_string()])
        );

        section.apply_edit(edit).unwrap();
        assert_eq!(initial_input(&section, SectionField::Skills), "Go, Rust, C++");
    }

    #[test]
    fn test_image_field_requests_load() {
        let section = Section::new(SectionKind::Image);

        assert_eq!(edit_command(&section, SectionField::Image, "   "), None);
        assert_eq!(
            edit_command(&section, SectionField::Image, " /tmp/me.png "),
            Some(Command::LoadImage {
                id: section.id.clone(),
                path: PathBuf::from("/tmp/me.png"),
            })
        );
        assert_eq!(field_value(&section, SectionField::Image), "(no image)");
    }

    #[test]
    fn test_kind_toggle_cycles() {
        let section = Section::new(SectionKind::Skills);
        assert_eq!(
            activate_command(&section, SectionField::Kind),
            Some(Command::ChangeKind {
                id: section.id.clone(),
                kind: SectionKind::Text,
            })
        );
        assert_eq!(activate_command(&section, SectionField::Title), None);
    }

    #[test]
    fn test_describe_data_url() {
        let url = format!("data:image/png;base64,{}", "A".repeat(4096));
        assert_eq!(describe_data_url(&url), "image/png, 3.0 KiB");
        assert_eq!(describe_data_url("garbage"), "(invalid image)");
    }
}
