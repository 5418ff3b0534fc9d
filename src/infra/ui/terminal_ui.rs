// HostUi for running the add-on from a terminal: everything the document UI
// would show is written to stdout instead.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::core::addon::{HostUi, MenuItem, UiError};

pub struct TerminalUi<W: AsyncWrite + Unpin + Send> {
    out: Mutex<W>,
}

impl TerminalUi<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> TerminalUi<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    async fn write(&self, text: &str) -> Result<(), UiError> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> HostUi for TerminalUi<W> {
    async fn alert(&self, message: &str) -> Result<(), UiError> {
        tracing::debug!("Showing alert");
        self.write(&format!("{}\n", message)).await
    }

    async fn show_sidebar(&self, html: &str, title: &str) -> Result<(), UiError> {
        self.write(&format!("== {} ==\n{}", title, html)).await
    }

    async fn create_menu(&self, title: &str, items: &[MenuItem]) -> Result<(), UiError> {
        let mut text = format!("{}\n", title);
        for item in items {
            text.push_str(&format!("  {} -> {}\n", item.name, item.function_name));
        }
        self.write(&text).await
    }
}
