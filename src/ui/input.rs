//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::{KeyCode, KeyModifiers};

use super::actions::Action;
use super::section_editor::SectionField;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Enter | KeyCode::Char('e') => Some(Action::Activate),
            KeyCode::Char('a') => Some(Action::AddSection),
            KeyCode::Char('d') => Some(Action::StartDeleteSection),
            KeyCode::Char('m') => Some(Action::StartDrag),
            KeyCode::Char('s') => Some(Action::Save),
            KeyCode::Char('R') => Some(Action::StartReset),
            _ => None,
        },
        AppMode::EditingSetting(_) | AppMode::EditingSection { .. } => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Submit)
            }
            KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => Some(Action::Submit),
            // 正文是多行字段，回车换行
            KeyCode::Enter if is_multiline(mode) => Some(Action::Input('\n')),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Dragging(_) => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Enter => Some(Action::Submit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            _ => None,
        },
        AppMode::Confirm(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        AppMode::Notice(_) => Some(Action::Dismiss),
    }
}

fn is_multiline(mode: &AppMode) -> bool {
    matches!(
        mode,
        AppMode::EditingSection {
            field: SectionField::Content,
            ..
        }
    )
}

/// 处理按键事件，返回是否退出
pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
    match get_action(&app.mode, key, modifiers) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::ui::state::Notice;

    #[test]
    fn test_confirm_keys() {
        let mode = AppMode::Confirm(Command::Reset);
        assert_eq!(
            get_action(&mode, KeyCode::Char('y'), KeyModifiers::NONE),
            Some(Action::Submit)
        );
        assert_eq!(
            get_action(&mode, KeyCode::Esc, KeyModifiers::NONE),
            Some(Action::Cancel)
        );
        assert_eq!(
            get_action(&mode, KeyCode::Char('q'), KeyModifiers::NONE),
            None
        );
    }

    #[test]
    fn test_editing_captures_letters() {
        let mode = AppMode::EditingSetting(crate::ui::settings_form::SettingField::Title);
        assert_eq!(
            get_action(&mode, KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Input('q'))
        );
        assert_eq!(
            get_action(&mode, KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_content_enter_inserts_newline() {
        let mode = AppMode::EditingSection {
            id: "section-1".to_string(),
            field: SectionField::Content,
        };
        assert_eq!(
            get_action(&mode, KeyCode::Enter, KeyModifiers::NONE),
            Some(Action::Input('\n'))
        );
        assert_eq!(
            get_action(&mode, KeyCode::Char('s'), KeyModifiers::CONTROL),
            Some(Action::Submit)
        );
        assert_eq!(
            get_action(&mode, KeyCode::Enter, KeyModifiers::ALT),
            Some(Action::Submit)
        );

        let title = AppMode::EditingSection {
            id: "section-1".to_string(),
            field: SectionField::Title,
        };
        assert_eq!(
            get_action(&title, KeyCode::Enter, KeyModifiers::NONE),
            Some(Action::Submit)
        );
    }

    #[test]
    fn test_notice_dismissed_by_any_key() {
        let mode = AppMode::Notice(Notice::info("saved"));
        assert_eq!(
            get_action(&mode, KeyCode::Char('x'), KeyModifiers::NONE),
            Some(Action::Dismiss)
        );
    }
}
