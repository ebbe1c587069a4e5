//! 文档命令
//!
//! 所有对 `PortfolioDocument` 的修改都经过 `apply`

use std::path::PathBuf;

use crate::error::Result;
use crate::models::{PortfolioDocument, SectionEdit, SectionKind, SettingsPatch};

/// 发往文档的命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add,
    UpdateSection { id: String, edit: SectionEdit },
    ChangeKind { id: String, kind: SectionKind },
    Delete { id: String },
    Reorder { from: String, to: String },
    UpdateSettings(SettingsPatch),
    Reset,
    /// 由外壳交给图片加载器，完成后以 `UpdateSection` 回到文档
    LoadImage { id: String, path: PathBuf },
}

impl Command {
    /// 命令作用的区块
    pub fn section_id(&self) -> Option<&str> {
        match self {
            Command::UpdateSection { id, .. }
            | Command::ChangeKind { id, .. }
            | Command::Delete { id }
            | Command::LoadImage { id, .. } => Some(id),
            Command::Reorder { from, .. } => Some(from),
            Command::Add | Command::UpdateSettings(_) | Command::Reset => None,
        }
    }
}

/// 命令执行后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(String),
    Changed,
    Unchanged,
    /// 文档不处理，需要外壳转交
    Deferred,
}

impl PortfolioDocument {
    /// 唯一的修改入口
    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        tracing::debug!(?command, "apply");
        let outcome = match command {
            Command::Add => Outcome::Added(self.add_section()),
            Command::UpdateSection { id, edit } => {
                self.update_section(&id, edit)?;
                Outcome::Changed
            }
            Command::ChangeKind { id, kind } => {
                if self.change_section_kind(&id, kind)? {
                    Outcome::Changed
                } else {
                    Outcome::Unchanged
                }
            }
            Command::Delete { id } => {
                self.delete_section(&id)?;
                Outcome::Changed
            }
            Command::Reorder { from, to } => {
                if from == to {
                    Outcome::Unchanged
                } else {
                    self.reorder_sections(&from, &to)?;
                    Outcome::Changed
                }
            }
            Command::UpdateSettings(patch) => {
                self.update_settings(patch);
                Outcome::Changed
            }
            Command::Reset => {
                self.reset();
                Outcome::Changed
            }
            Command::LoadImage { .. } => Outcome::Deferred,
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::PortfolioError;
    use crate::models::SectionContent;

    #[test]
    fn test_apply_sequence() {
        let mut doc = PortfolioDocument::new();
        let Outcome::Added(a) = doc.apply(Command::Add).unwrap() else {
            panic!("expected Added");
        };
        let Outcome::Added(b) = doc.apply(Command::Add).unwrap() else {
            panic!("expected Added");
        };

        doc.apply(Command::ChangeKind {
            id: b.clone(),
            kind: SectionKind::Skills,
        })
        .unwrap();
        doc.apply(Command::UpdateSection {
            id: b.clone(),
            edit: SectionEdit::Skills(vec!["Rust".to_string()]),
        })
        .unwrap();
        let outcome = doc
            .apply(Command::Reorder {
                from: b.clone(),
                to: a.clone(),
            })
            .unwrap();

        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(doc.sections[0].id, b);
        assert_eq!(
            doc.sections[0].content,
            SectionContent::Skills {
                skills: vec!["Rust".to_string()]
            }
        );
    }

    #[test]
    fn test_reorder_onto_itself_is_unchanged() {
        let mut doc = PortfolioDocument::new();
        let id = doc.add_section();
        let before = doc.clone();

        let outcome = doc
            .apply(Command::Reorder {
                from: id.clone(),
                to: id,
            })
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_delete_unknown_reports_error() {
        let mut doc = PortfolioDocument::new();
        doc.add_section();
        let before = doc.clone();

        let err = doc
            .apply(Command::Delete {
                id: "section-missing".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, PortfolioError::SectionNotFound(_)));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_load_image_is_deferred() {
        let mut doc = PortfolioDocument::new();
        let id = doc.add_section();
        let before = doc.clone();

        let command = Command::LoadImage {
            id: id.clone(),
            path: PathBuf::from("avatar.png"),
        };
        assert_eq!(command.section_id(), Some(id.as_str()));
        assert_eq!(doc.apply(command).unwrap(), Outcome::Deferred);
        assert_eq!(doc, before);
    }
}
