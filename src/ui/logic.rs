//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use crate::command::{Command, Outcome};
use crate::image::ImageEvent;
use crate::models::{SectionEdit, SectionKind};
use crate::storage::save_document;

use super::actions::Action;
use super::section_editor::{self, FieldInput, SectionField};
use super::settings_form::SettingField;
use super::state::{App, AppMode, Focus, Notice};

impl App {
    /// 核心逻辑分发，返回是否退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::FocusNext => self.cycle_focus(true),
            Action::FocusPrev => self.cycle_focus(false),
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::Activate => self.activate(),
            Action::AddSection => self.add_section(),
            Action::StartDeleteSection => self.start_delete_section(),
            Action::StartDrag => self.start_drag(),
            Action::Save => self.save(),
            Action::StartReset => self.mode = AppMode::Confirm(Command::Reset),

            Action::Cancel => self.cancel(),

            Action::Submit => match &self.mode {
                AppMode::EditingSetting(field) => {
                    let field = *field;
                    self.confirm_setting(field);
                }
                AppMode::EditingSection { id, field } => {
                    let (id, field) = (id.clone(), *field);
                    self.confirm_section_edit(&id, field);
                }
                AppMode::Dragging(id) => {
                    let id = id.clone();
                    self.drop_section(&id);
                }
                AppMode::Confirm(_) => self.execute_confirm(),
                AppMode::Normal | AppMode::Notice(_) => {}
            },

            Action::Input(c) => {
                if self.is_editing() {
                    self.input_buffer.push(c);
                }
            }

            Action::Paste(text) => self.paste(&text),

            Action::DeleteChar => {
                if self.is_editing() {
                    self.input_buffer.pop();
                }
            }

            Action::Dismiss => {
                if matches!(self.mode, AppMode::Notice(_)) {
                    self.mode = AppMode::Normal;
                }
            }
        }
        false
    }

    fn is_editing(&self) -> bool {
        matches!(
            self.mode,
            AppMode::EditingSetting(_) | AppMode::EditingSection { .. }
        )
    }

    /// 粘贴文本到输入框，非编辑状态下忽略
    pub fn paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        match &self.mode {
            AppMode::EditingSection {
                field: SectionField::Content,
                ..
            } => self.input_buffer.push_str(&text),
            // 单行字段把换行折成空格
            AppMode::EditingSetting(_) | AppMode::EditingSection { .. } => {
                self.input_buffer.push_str(&text.replace('\n', " "))
            }
            _ => tracing::debug!(len = text.len(), "paste ignored outside of editing"),
        }
    }

    // ============ 命令执行 ============

    /// 执行命令：图片请求交给加载器，其余交给文档
    pub fn execute(&mut self, command: Command) -> Option<Outcome> {
        match &command {
            Command::LoadImage { id, path } => {
                let Some(kind) = self.document.section(id).map(|section| section.kind()) else {
                    self.message = Some(format!("Section not found: {id}"));
                    return None;
                };
                self.images.request(id, kind, path.clone());
                self.message = Some(format!("Loading {}...", path.display()));
                return Some(Outcome::Deferred);
            }
            Command::Delete { id } => self.images.cancel(id),
            Command::ChangeKind { id, kind } => {
                if self
                    .document
                    .section(id)
                    .is_some_and(|section| section.kind() != *kind)
                {
                    self.images.cancel(id);
                }
            }
            Command::Reset => self.images.cancel_all(),
            _ => {}
        }

        let section_id = command.section_id().map(str::to_string);
        match self.document.apply(command) {
            Ok(outcome) => {
                self.clamp_selection();
                Some(outcome)
            }
            Err(e) => {
                tracing::warn!(section = ?section_id, error = %e, "command rejected");
                self.message = Some(e.to_string());
                None
            }
        }
    }

    // ============ 导航相关 ============

    /// 在面板之间切换焦点，没有区块时跳过编辑器
    pub fn cycle_focus(&mut self, forward: bool) {
        let has_section = self.selected_section().is_some();
        self.focus = match (self.focus, forward) {
            (Focus::Settings, true) => Focus::Sections,
            (Focus::Sections, true) if has_section => Focus::Editor,
            (Focus::Sections, true) => Focus::Settings,
            (Focus::Editor, true) => Focus::Settings,
            (Focus::Settings, false) if has_section => Focus::Editor,
            (Focus::Settings, false) => Focus::Sections,
            (Focus::Sections, false) => Focus::Settings,
            (Focus::Editor, false) => Focus::Sections,
        };
    }

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if matches!(self.mode, AppMode::Dragging(_)) {
            self.selected_index = self.selected_index.saturating_sub(1);
            return;
        }
        match self.focus {
            Focus::Settings => self.settings_index = self.settings_index.saturating_sub(1),
            Focus::Sections => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                    self.field_index = 0;
                }
            }
            Focus::Editor => self.field_index = self.field_index.saturating_sub(1),
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if matches!(self.mode, AppMode::Dragging(_)) {
            if self.selected_index + 1 < self.document.sections.len() {
                self.selected_index += 1;
            }
            return;
        }
        match self.focus {
            Focus::Settings => {
                if self.settings_index + 1 < SettingField::ALL.len() {
                    self.settings_index += 1;
                }
            }
            Focus::Sections => {
                if self.selected_index + 1 < self.document.sections.len() {
                    self.selected_index += 1;
                    self.field_index = 0;
                }
            }
            Focus::Editor => {
                if self.field_index + 1 < self.selected_fields().len() {
                    self.field_index += 1;
                }
            }
        }
    }

    // ============ 编辑相关 ============

    /// 回车：编辑当前字段或触发选择项
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Settings => {
                let field = self.selected_setting();
                if field.is_choice() {
                    if let Some(command) = field.cycle_command(&self.document.settings) {
                        self.execute(command);
                    }
                } else {
                    self.input_buffer = field.value(&self.document.settings);
                    self.mode = AppMode::EditingSetting(field);
                }
            }
            Focus::Sections => {
                if self.selected_section().is_some() {
                    self.focus = Focus::Editor;
                    self.field_index = 0;
                } else {
                    self.message = Some("No sections yet, press 'a' to add one".to_string());
                }
            }
            Focus::Editor => self.activate_field(),
        }
    }

    fn activate_field(&mut self) {
        let (Some(section), Some(field)) = (self.selected_section(), self.selected_field()) else {
            return;
        };

        match field.input() {
            FieldInput::Toggle => {
                if let Some(command) = section_editor::activate_command(section, field) {
                    self.execute(command);
                }
            }
            FieldInput::Text | FieldInput::Path => {
                let id = section.id.clone();
                self.input_buffer = section_editor::initial_input(section, field);
                self.mode = AppMode::EditingSection { id, field };
            }
        }
    }

    /// 确认设置编辑
    pub fn confirm_setting(&mut self, field: SettingField) {
        let command = field.edit_command(&self.input_buffer);
        self.execute(command);
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
    }

    /// 确认区块字段编辑
    pub fn confirm_section_edit(&mut self, id: &str, field: SectionField) {
        let command = self
            .document
            .section(id)
            .and_then(|section| section_editor::edit_command(section, field, &self.input_buffer));
        self.mode = AppMode::Normal;
        self.input_buffer.clear();

        if let Some(command) = command {
            self.execute(command);
        }
    }

    // ============ 区块相关 ============

    /// 追加新区块并选中
    pub fn add_section(&mut self) {
        if let Some(Outcome::Added(id)) = self.execute(Command::Add) {
            self.select_section(&id);
            self.field_index = 0;
            self.focus = Focus::Sections;
            self.message = Some("Section added".to_string());
        }
    }

    /// 开始删除区块（需要确认）
    pub fn start_delete_section(&mut self) {
        if self.focus == Focus::Settings {
            return;
        }
        if let Some(section) = self.selected_section() {
            self.mode = AppMode::Confirm(section_editor::delete_command(section));
        }
    }

    /// 开始拖动区块
    pub fn start_drag(&mut self) {
        if let Some(id) = self.selected_section_id() {
            self.focus = Focus::Sections;
            self.mode = AppMode::Dragging(id);
            self.message = Some("Choose a new position, press 'm' to drop".to_string());
        }
    }

    /// 放下区块：移动到当前选中区块的位置
    pub fn drop_section(&mut self, source_id: &str) {
        self.mode = AppMode::Normal;
        let Some(target_id) = self.selected_section_id() else {
            return;
        };

        let command = Command::Reorder {
            from: source_id.to_string(),
            to: target_id,
        };
        match self.execute(command) {
            Some(Outcome::Changed) => self.message = Some("Section moved".to_string()),
            Some(_) => self.message = None,
            None => {}
        }
        self.select_section(source_id);
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self) {
        let AppMode::Confirm(command) = std::mem::replace(&mut self.mode, AppMode::Normal) else {
            return;
        };

        let message = match &command {
            Command::Reset => "Portfolio reset",
            _ => "Section deleted",
        };
        if self.execute(command).is_some() {
            self.message = Some(message.to_string());
        }
        if self.document.sections.is_empty() && self.focus == Focus::Editor {
            self.focus = Focus::Sections;
        }
    }

    // ============ 保存 ============

    /// 整体覆盖保存，结果以阻塞提示告知
    pub fn save(&mut self) {
        let saved = save_document(&mut self.document, self.store.as_mut(), &self.storage_key);
        self.mode = match saved {
            Ok(()) => AppMode::Notice(Notice::info("Portfolio saved successfully!")),
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                AppMode::Notice(Notice::warning(format!("Could not save portfolio: {e}")))
            }
        };
    }

    // ============ 图片 ============

    /// 取出所有已完成的图片解码
    pub fn poll_images(&mut self) {
        while let Some(event) = self.images.try_next() {
            self.apply_image_event(event);
        }
    }

    /// 应用解码结果；区块已不存在或类型已变时丢弃
    pub fn apply_image_event(&mut self, event: ImageEvent) {
        let ImageEvent {
            section_id,
            target,
            result,
        } = event;

        let current = self.document.section(&section_id).map(|section| section.kind());
        if current != Some(target) {
            tracing::debug!(%section_id, "image result for a stale section dropped");
            return;
        }

        match result {
            Ok(url) => {
                let edit = match target {
                    SectionKind::Gallery => SectionEdit::AddGalleryImage(url),
                    _ => SectionEdit::ImageUrl(url),
                };
                if self
                    .execute(Command::UpdateSection {
                        id: section_id,
                        edit,
                    })
                    .is_some()
                {
                    self.message = Some("Image loaded".to_string());
                }
            }
            Err(e) => {
                tracing::warn!(%section_id, error = %e, "image decode failed");
                let text = format!("Image not loaded: {e}");
                if self.mode == AppMode::Normal {
                    self.mode = AppMode::Notice(Notice::warning(text));
                } else {
                    self.message = Some(text);
                }
            }
        }
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
        self.message = None;
    }
}
