//! 图片异步解码
//!
//! 读取本地文件并编码为 data URL。每个请求绑定到区块 ID，
//! 区块被删除、切换类型或文档被重置时取消，已取消的结果不会再交付。

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{PortfolioError, Result};
use crate::models::SectionKind;

/// 解码完成事件
#[derive(Debug)]
pub struct ImageEvent {
    pub section_id: String,
    /// 发起请求时区块的类型
    pub target: SectionKind,
    pub result: Result<String>,
}

#[derive(Debug)]
struct Message {
    ticket: u64,
    event: ImageEvent,
}

#[derive(Debug)]
struct Pending {
    token: CancellationToken,
    tickets: HashSet<u64>,
}

pub struct ImageLoader {
    handle: Handle,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    pending: HashMap<String, Pending>,
    next_ticket: u64,
}

impl ImageLoader {
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle,
            tx,
            rx,
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// 为区块发起一次解码
    pub fn request(&mut self, section_id: &str, target: SectionKind, path: PathBuf) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let pending = self
            .pending
            .entry(section_id.to_string())
            .or_insert_with(|| Pending {
                token: CancellationToken::new(),
                tickets: HashSet::new(),
            });
        pending.tickets.insert(ticket);
        let token = pending.token.child_token();

        let tx = self.tx.clone();
        let section_id = section_id.to_string();
        tracing::debug!(%section_id, ticket, path = %path.display(), "image decode started");

        self.handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(%section_id, ticket, "image decode cancelled");
                }
                result = read_data_url(&path) => {
                    if token.is_cancelled() {
                        return;
                    }
                    let event = ImageEvent { section_id, target, result };
                    if let Err(e) = tx.send(Message { ticket, event }) {
                        tracing::debug!(
                            section_id = %e.0.event.section_id,
                            ticket,
                            "image result receiver dropped"
                        );
                    }
                }
            }
        });
    }

    /// 取消区块上所有未完成的解码
    pub fn cancel(&mut self, section_id: &str) {
        if let Some(pending) = self.pending.remove(section_id) {
            pending.token.cancel();
            tracing::debug!(section_id, count = pending.tickets.len(), "image decodes cancelled");
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.token.cancel();
        }
    }

    pub fn is_pending(&self, section_id: &str) -> bool {
        self.pending.contains_key(section_id)
    }

    /// 非阻塞地取出下一个仍然有效的事件
    pub fn try_next(&mut self) -> Option<ImageEvent> {
        while let Ok(message) = self.rx.try_recv() {
            if let Some(event) = self.accept(message) {
                return Some(event);
            }
        }
        None
    }

    /// 等待下一个仍然有效的事件
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<ImageEvent> {
        while let Some(message) = self.rx.recv().await {
            if let Some(event) = self.accept(message) {
                return Some(event);
            }
        }
        None
    }

    fn accept(&mut self, message: Message) -> Option<ImageEvent> {
        let Message { ticket, event } = message;
        let Some(pending) = self.pending.get_mut(&event.section_id) else {
            tracing::debug!(section_id = %event.section_id, ticket, "stale image result dropped");
            return None;
        };
        if !pending.tickets.remove(&ticket) {
            tracing::debug!(section_id = %event.section_id, ticket, "stale image result dropped");
            return None;
        }
        if pending.tickets.is_empty() {
            self.pending.remove(&event.section_id);
        }
        Some(event)
    }
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// 读取文件并编码为 data URL
pub async fn read_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| PortfolioError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(encode_data_url(mime_for(path), &bytes))
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// 根据扩展名推断 MIME 类型，不做格式校验
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// 展开以 `~/` 开头的路径
pub fn expand_path(input: &str) -> PathBuf {
    let input = input.trim();
    match input.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(input)),
        None => PathBuf::from(input),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("photo.PNG", "image/png")]
    #[case("me.jpeg", "image/jpeg")]
    #[case("logo.svg", "image/svg+xml")]
    #[case("notes.txt", "application/octet-stream")]
    #[case("no_extension", "application/octet-stream")]
    fn test_mime_for(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(mime_for(Path::new(path)), expected);
    }

    #[test]
    fn test_encode_data_url() {
        assert_eq!(encode_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn test_decode_delivers_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let mut loader = ImageLoader::new(Handle::current());
        loader.request("section-1", SectionKind::Image, path);
        assert!(loader.is_pending("section-1"));

        let event = loader.next().await.unwrap();
        assert_eq!(event.section_id, "section-1");
        assert_eq!(event.target, SectionKind::Image);
        assert_eq!(event.result.unwrap(), "data:image/gif;base64,R0lGODlh");
        assert!(!loader.is_pending("section-1"));
        assert!(loader.try_next().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_reports_error() {
        let mut loader = ImageLoader::new(Handle::current());
        loader.request(
            "section-1",
            SectionKind::Gallery,
            PathBuf::from("/definitely/not/here.png"),
        );

        let event = loader.next().await.unwrap();
        assert!(matches!(event.result, Err(PortfolioError::ImageDecode { .. })));
    }

    #[tokio::test]
    async fn test_cancelled_decode_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.png");
        std::fs::write(&path, b"png").unwrap();

        let mut loader = ImageLoader::new(Handle::current());
        loader.request("section-1", SectionKind::Image, path.clone());
        loader.cancel("section-1");
        loader.request("section-2", SectionKind::Image, path);

        let event = tokio::time::timeout(Duration::from_secs(5), loader.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.section_id, "section-2");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(loader.try_next().is_none());
    }
}
