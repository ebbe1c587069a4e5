//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use crate::command::Command;
use crate::image::ImageLoader;
use crate::models::{PortfolioDocument, Section};
use crate::storage::KeyValueStore;

use super::section_editor::{self, SectionField};
use super::settings_form::SettingField;

/// 应用状态
pub struct App {
    pub document: PortfolioDocument,
    pub focus: Focus,
    pub settings_index: usize,
    pub selected_index: usize,
    pub field_index: usize,
    pub mode: AppMode,
    pub input_buffer: String,
    pub message: Option<String>,
    pub store: Box<dyn KeyValueStore>,
    pub storage_key: String,
    pub images: ImageLoader,
}

/// 当前焦点所在的面板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Settings,
    Sections,
    Editor,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    EditingSetting(SettingField),
    EditingSection { id: String, field: SectionField },
    Dragging(String), // String is the section ID being dragged
    Confirm(Command), // 等待确认的删除或重置命令
    Notice(Notice),
}

/// 阻塞式提示，任意键关闭
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

impl App {
    /// 创建新的应用实例
    pub fn new(
        document: PortfolioDocument,
        store: Box<dyn KeyValueStore>,
        storage_key: String,
        images: ImageLoader,
    ) -> Self {
        let mut app = Self {
            document,
            focus: Focus::Settings,
            settings_index: 0,
            selected_index: 0,
            field_index: 0,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            message: None,
            store,
            storage_key,
            images,
        };
        app.clamp_selection();
        app
    }

    /// 确保选中索引有效
    pub fn clamp_selection(&mut self) {
        let len = self.document.sections.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }

        let field_count = self.selected_fields().len();
        if self.field_index >= field_count {
            self.field_index = field_count.saturating_sub(1);
        }
    }

    /// 获取当前选中的区块
    pub fn selected_section(&self) -> Option<&Section> {
        self.document.sections.get(self.selected_index)
    }

    /// 获取当前选中的区块 ID
    pub fn selected_section_id(&self) -> Option<String> {
        self.selected_section().map(|section| section.id.clone())
    }

    pub fn selected_setting(&self) -> SettingField {
        SettingField::ALL[self.settings_index.min(SettingField::ALL.len() - 1)]
    }

    pub fn selected_fields(&self) -> &'static [SectionField] {
        self.selected_section()
            .map(section_editor::fields)
            .unwrap_or(&[])
    }

    pub fn selected_field(&self) -> Option<SectionField> {
        self.selected_fields().get(self.field_index).copied()
    }

    pub fn select_section(&mut self, id: &str) {
        if let Some(index) = self.document.position(id) {
            self.selected_index = index;
        }
        self.clamp_selection();
    }
}
