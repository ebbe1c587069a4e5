//! 作品集设置表单

use crate::command::Command;
use crate::models::{PortfolioSettings, SettingsPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Title,
    Subtitle,
    Author,
    Contact,
    Theme,
}

impl SettingField {
    pub const ALL: [SettingField; 5] = [
        SettingField::Title,
        SettingField::Subtitle,
        SettingField::Author,
        SettingField::Contact,
        SettingField::Theme,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingField::Title => "Title",
            SettingField::Subtitle => "Subtitle",
            SettingField::Author => "Author",
            SettingField::Contact => "Contact",
            SettingField::Theme => "Theme",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SettingField::Title => "Enter portfolio title",
            SettingField::Subtitle => "Enter subtitle",
            SettingField::Author => "Enter author name",
            SettingField::Contact => "Enter contact information",
            SettingField::Theme => "",
        }
    }

    /// 主题是选择项，回车循环切换
    pub fn is_choice(self) -> bool {
        self == SettingField::Theme
    }

    pub fn value(self, settings: &PortfolioSettings) -> String {
        match self {
            SettingField::Title => settings.title.clone(),
            SettingField::Subtitle => settings.subtitle.clone(),
            SettingField::Author => settings.author.clone(),
            SettingField::Contact => settings.contact.clone(),
            SettingField::Theme => settings.theme.label().to_string(),
        }
    }

    /// 文本字段提交后的命令
    pub fn edit_command(self, input: &str) -> Command {
        let value = Some(input.to_string());
        let patch = match self {
            SettingField::Title => SettingsPatch {
                title: value,
                ..Default::default()
            },
            SettingField::Subtitle => SettingsPatch {
                subtitle: value,
                ..Default::default()
            },
            SettingField::Author => SettingsPatch {
                author: value,
                ..Default::default()
            },
            SettingField::Contact => SettingsPatch {
                contact: value,
                ..Default::default()
            },
            SettingField::Theme => SettingsPatch::default(),
        };
        Command::UpdateSettings(patch)
    }

    /// 选择项回车后的命令
    pub fn cycle_command(self, settings: &PortfolioSettings) -> Option<Command> {
        match self {
            SettingField::Theme => Some(Command::UpdateSettings(SettingsPatch {
                theme: Some(settings.theme.next()),
                ..Default::default()
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Theme;

    #[test]
    fn test_edit_command_targets_one_field() {
        assert_eq!(
            SettingField::Contact.edit_command("ada@example.com"),
            Command::UpdateSettings(SettingsPatch {
                contact: Some("ada@example.com".to_string()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_theme_cycles() {
        let settings = PortfolioSettings {
            theme: Theme::Professional,
            ..Default::default()
        };
        assert_eq!(
            SettingField::Theme.cycle_command(&settings),
            Some(Command::UpdateSettings(SettingsPatch {
                theme: Some(Theme::Light),
                ..Default::default()
            }))
        );
        assert_eq!(SettingField::Author.cycle_command(&settings), None);
    }
}
