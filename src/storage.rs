use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{PortfolioError, Result};
use crate::models::{PortfolioDocument, SCHEMA_VERSION};

/// 默认存储键
pub const DEFAULT_STORAGE_KEY: &str = "portfolioData";

/// 简单的键值存储，每个键对应一个完整的文本值
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// 基于文件的存储：每个键一个 `<key>.toml`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.toml"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        write_replacing(&self.path_for(key), value)
    }
}

/// 先写临时文件再改名，避免写到一半留下损坏的数据
fn write_replacing(path: &Path, value: &str) -> Result<()> {
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, value)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// 内存存储（测试用）
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 从存储加载文档，不存在时返回空文档
pub fn load_document(store: &dyn KeyValueStore, key: &str) -> Result<PortfolioDocument> {
    let Some(content) = store.get(key)? else {
        return Ok(PortfolioDocument::new());
    };

    let document: PortfolioDocument = toml::from_str(&content)?;
    if document.meta.version > SCHEMA_VERSION {
        return Err(PortfolioError::UnsupportedVersion(document.meta.version));
    }

    tracing::info!(key, sections = document.sections.len(), "portfolio loaded");
    Ok(document)
}

/// 整体覆盖写入文档
pub fn save_document(
    document: &mut PortfolioDocument,
    store: &mut dyn KeyValueStore,
    key: &str,
) -> Result<()> {
    let previous = document.meta.clone();
    document.meta.version = SCHEMA_VERSION;
    document.meta.saved_at = Some(Local::now());

    let written = toml::to_string_pretty(&*document)
        .map_err(PortfolioError::from)
        .and_then(|content| store.set(key, &content));

    if let Err(e) = written {
        document.meta = previous;
        return Err(e);
    }

    tracing::info!(key, sections = document.sections.len(), "portfolio saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{PortfolioSettings, SectionEdit, SectionKind, SettingsPatch, Theme};

    fn full_document() -> PortfolioDocument {
        let mut doc = PortfolioDocument::new();
        doc.update_settings(SettingsPatch {
            title: Some("Ada Lovelace".to_string()),
            subtitle: Some("Analyst".to_string()),
            theme: Some(Theme::Minimal),
            author: Some("Ada".to_string()),
            contact: Some("ada@example.com".to_string()),
        });

        let text = doc.add_section();
        doc.update_section(&text, SectionEdit::Title("About".to_string()))
            .unwrap();
        doc.update_section(
            &text,
            SectionEdit::Content("Line one\nLine \"two\"".to_string()),
        )
        .unwrap();

        let image = doc.add_section();
        doc.change_section_kind(&image, SectionKind::Image).unwrap();
        doc.update_section(
            &image,
            SectionEdit::ImageUrl("data:image/png;base64,iVBORw0=".to_string()),
        )
        .unwrap();
        doc.update_section(&image, SectionEdit::Caption("Portrait".to_string()))
            .unwrap();

        let empty_image = doc.add_section();
        doc.change_section_kind(&empty_image, SectionKind::Image).unwrap();

        let gallery = doc.add_section();
        doc.change_section_kind(&gallery, SectionKind::Gallery).unwrap();
        doc.update_section(
            &gallery,
            SectionEdit::AddGalleryImage("data:image/gif;base64,R0lG".to_string()),
        )
        .unwrap();

        let skills = doc.add_section();
        doc.change_section_kind(&skills, SectionKind::Skills).unwrap();
        doc.update_section(
            &skills,
            SectionEdit::Skills(vec!["Go".to_string(), "Rust".to_string(), "C++".to_string()]),
        )
        .unwrap();

        doc
    }

    #[test]
    fn test_round_trip_memory() {
        let mut store = MemoryStore::default();
        let mut doc = full_document();

        save_document(&mut doc, &mut store, DEFAULT_STORAGE_KEY).unwrap();
        let loaded = load_document(&store, DEFAULT_STORAGE_KEY).unwrap();

        assert!(loaded.meta.saved_at.is_some());
        assert_eq!(loaded.settings, doc.settings);
        assert_eq!(loaded.sections, doc.sections);
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        let mut doc = full_document();

        save_document(&mut doc, &mut store, DEFAULT_STORAGE_KEY).unwrap();
        assert!(store.path_for(DEFAULT_STORAGE_KEY).exists());

        let loaded = load_document(&store, DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(loaded.sections, doc.sections);
        assert_eq!(loaded.settings, doc.settings);
    }

    #[test]
    fn test_save_overwrites() {
        let mut store = MemoryStore::default();
        let mut doc = full_document();
        save_document(&mut doc, &mut store, DEFAULT_STORAGE_KEY).unwrap();

        doc.reset();
        save_document(&mut doc, &mut store, DEFAULT_STORAGE_KEY).unwrap();

        let loaded = load_document(&store, DEFAULT_STORAGE_KEY).unwrap();
        assert!(loaded.sections.is_empty());
        assert_eq!(loaded.settings, PortfolioSettings::default());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let doc = load_document(&store, DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(doc, PortfolioDocument::new());
    }

    #[test]
    fn test_load_rejects_newer_version() {
        let mut store = MemoryStore::default();
        store
            .set(DEFAULT_STORAGE_KEY, "sections = []\n\n[meta]\nversion = 99\n")
            .unwrap();

        let err = load_document(&store, DEFAULT_STORAGE_KEY).unwrap_err();
        assert!(matches!(err, PortfolioError::UnsupportedVersion(99)));
    }

    #[test]
    fn test_load_corrupt() {
        let mut store = MemoryStore::default();
        store.set(DEFAULT_STORAGE_KEY, "not = [valid").unwrap();

        let err = load_document(&store, DEFAULT_STORAGE_KEY).unwrap_err();
        assert!(matches!(err, PortfolioError::Deserialize(_)));
    }

    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(std::io::Error::other("quota exceeded").into())
        }
    }

    #[test]
    fn test_failed_save_keeps_meta() {
        let mut doc = full_document();
        let before = doc.clone();

        let err = save_document(&mut doc, &mut FullStore, DEFAULT_STORAGE_KEY).unwrap_err();

        assert!(matches!(err, PortfolioError::Io(_)));
        assert_eq!(doc, before);
    }
}
