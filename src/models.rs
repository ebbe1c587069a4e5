use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PortfolioError, Result};

/// 当前持久化格式版本
pub const SCHEMA_VERSION: u32 = 1;

/// 作品集主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Minimal,
    Professional,
}

impl Theme {
    /// 设置表单中循环切换
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Minimal,
            Theme::Minimal => Theme::Professional,
            Theme::Professional => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "✨ Light Theme",
            Theme::Dark => "🌙 Dark Theme",
            Theme::Minimal => "🎯 Minimal Theme",
            Theme::Professional => "💼 Professional Theme",
        }
    }
}

/// 作品集全局设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortfolioSettings {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub contact: String,
}

/// 设置的部分更新，只有 `Some` 的字段会被覆盖
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub theme: Option<Theme>,
    pub author: Option<String>,
    pub contact: Option<String>,
}

impl PortfolioSettings {
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
    }
}

/// 区块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    #[default]
    Text,
    Image,
    Gallery,
    Skills,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Text,
        SectionKind::Image,
        SectionKind::Gallery,
        SectionKind::Skills,
    ];

    pub fn next(self) -> Self {
        match self {
            SectionKind::Text => SectionKind::Image,
            SectionKind::Image => SectionKind::Gallery,
            SectionKind::Gallery => SectionKind::Skills,
            SectionKind::Skills => SectionKind::Text,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Text => "text",
            SectionKind::Image => "image",
            SectionKind::Gallery => "gallery",
            SectionKind::Skills => "skills",
        };
        f.write_str(name)
    }
}

/// 区块内容，每种类型只携带自己的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionContent {
    Text {
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: String,
    },
    Image {
        /// data URL
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default)]
        caption: String,
    },
    Gallery {
        #[serde(default)]
        images: Vec<String>,
    },
    Skills {
        #[serde(default)]
        skills: Vec<String>,
    },
}

impl SectionContent {
    /// 指定类型的空内容
    pub fn empty(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Text => SectionContent::Text {
                title: String::new(),
                content: String::new(),
            },
            SectionKind::Image => SectionContent::Image {
                url: None,
                caption: String::new(),
            },
            SectionKind::Gallery => SectionContent::Gallery { images: Vec::new() },
            SectionKind::Skills => SectionContent::Skills { skills: Vec::new() },
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            SectionContent::Text { .. } => SectionKind::Text,
            SectionContent::Image { .. } => SectionKind::Image,
            SectionContent::Gallery { .. } => SectionKind::Gallery,
            SectionContent::Skills { .. } => SectionKind::Skills,
        }
    }
}

/// 对单个区块字段的修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionEdit {
    Title(String),
    Content(String),
    Caption(String),
    ImageUrl(String),
    Skills(Vec<String>),
    AddGalleryImage(String),
    ClearGallery,
}

/// 作品集区块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub content: SectionContent,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            id: format!("section-{}", Uuid::new_v4()),
            content: SectionContent::empty(kind),
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.content.kind()
    }

    /// 列表中显示的简短标题
    pub fn summary(&self) -> String {
        match &self.content {
            SectionContent::Text { title, .. } if !title.is_empty() => title.clone(),
            SectionContent::Image { caption, .. } if !caption.is_empty() => caption.clone(),
            SectionContent::Gallery { images } => format!("{} image(s)", images.len()),
            SectionContent::Skills { skills } if !skills.is_empty() => skills.join(", "),
            _ => "(untitled)".to_string(),
        }
    }

    /// 合并单个字段修改，字段不属于当前类型时不做任何改动
    pub fn apply_edit(&mut self, edit: SectionEdit) -> Result<()> {
        match (&mut self.content, edit) {
            (SectionContent::Text { title, .. }, SectionEdit::Title(value)) => *title = value,
            (SectionContent::Text { content, .. }, SectionEdit::Content(value)) => {
                *content = value
            }
            (SectionContent::Image { caption, .. }, SectionEdit::Caption(value)) => {
                *caption = value
            }
            (SectionContent::Image { url, .. }, SectionEdit::ImageUrl(value)) => {
                *url = Some(value)
            }
            (SectionContent::Skills { skills }, SectionEdit::Skills(value)) => *skills = value,
            (SectionContent::Gallery { images }, SectionEdit::AddGalleryImage(value)) => {
                images.push(value)
            }
            (SectionContent::Gallery { images }, SectionEdit::ClearGallery) => images.clear(),
            (content, _) => {
                return Err(PortfolioError::FieldMismatch {
                    id: self.id.clone(),
                    kind: content.kind(),
                });
            }
        }
        Ok(())
    }

    /// 切换类型：构造新类型的默认内容，旧字段全部丢弃
    pub fn change_kind(&mut self, kind: SectionKind) -> bool {
        if self.kind() == kind {
            return false;
        }
        self.content = SectionContent::empty(kind);
        true
    }
}

/// 逗号分隔的技能字符串 -> 技能列表（去空白，丢弃空项）
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn format_skills(skills: &[String]) -> String {
    skills.join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Local>>,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            saved_at: None,
        }
    }
}

/// 持久化单元：设置 + 有序区块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortfolioDocument {
    #[serde(default)]
    pub meta: DocumentMeta,
    #[serde(default)]
    pub settings: PortfolioSettings,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl PortfolioDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.id == id)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    fn section_mut(&mut self, id: &str) -> Result<&mut Section> {
        self.sections
            .iter_mut()
            .find(|section| section.id == id)
            .ok_or_else(|| PortfolioError::SectionNotFound(id.to_string()))
    }

    /// 追加一个新的文本区块，返回其 ID
    pub fn add_section(&mut self) -> String {
        let section = Section::new(SectionKind::Text);
        let id = section.id.clone();
        self.sections.push(section);
        id
    }

    pub fn update_section(&mut self, id: &str, edit: SectionEdit) -> Result<()> {
        self.section_mut(id)?.apply_edit(edit)
    }

    /// 返回类型是否真的发生了变化
    pub fn change_section_kind(&mut self, id: &str, kind: SectionKind) -> Result<bool> {
        Ok(self.section_mut(id)?.change_kind(kind))
    }

    /// 删除区块（确认由调用方负责）
    pub fn delete_section(&mut self, id: &str) -> Result<Section> {
        let index = self
            .position(id)
            .ok_or_else(|| PortfolioError::SectionNotFound(id.to_string()))?;
        Ok(self.sections.remove(index))
    }

    /// 将 `from_id` 移动到 `to_id` 原来的位置
    pub fn reorder_sections(&mut self, from_id: &str, to_id: &str) -> Result<()> {
        if from_id == to_id {
            return Ok(());
        }
        let from = self
            .position(from_id)
            .ok_or_else(|| PortfolioError::SectionNotFound(from_id.to_string()))?;
        let to = self
            .position(to_id)
            .ok_or_else(|| PortfolioError::SectionNotFound(to_id.to_string()))?;

        let moved = self.sections.remove(from);
        self.sections.insert(to, moved);
        Ok(())
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.merge(patch);
    }

    /// 清空为全新文档
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
