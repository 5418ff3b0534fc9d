// Contracts the add-on needs from the outside world.
// The infra layer implements these; tests swap in fakes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::activity::{CellValue, ConfigMap, TransportSettings};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("UI output failed: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// REQUEST / RESPONSE SHAPES
// ============================================================================

/// A POST to the activity event API.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRequest {
    pub url: String,
    pub api_key: String,
    pub api_token: String,
    pub body: serde_json::Value,
}

impl ActivityRequest {
    pub fn new(transport: &TransportSettings, body: &impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            url: transport.api_url.clone(),
            api_key: transport.api_key.clone(),
            api_token: transport.api_token.clone(),
            body: serde_json::to_value(body)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub content_type: String,
}

/// A menu entry; `function_name` must be a registered entry point name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub function_name: &'static str,
}

// ============================================================================
// TRAITS
// ============================================================================

/// Per-document key/value storage for the add-on configuration.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn load(&self) -> Result<ConfigMap, StoreError>;
    /// Replaces the stored properties wholesale.
    async fn save(&self, properties: ConfigMap) -> Result<(), StoreError>;
}

/// A sheet addressed with 1-based rows and columns.
#[async_trait]
pub trait TabularDataSource: Send + Sync {
    async fn last_row(&self) -> Result<usize, SheetError>;
    async fn last_column(&self) -> Result<usize, SheetError>;
    async fn get_values(
        &self,
        row: usize,
        column: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Result<Vec<Vec<CellValue>>, SheetError>;
    async fn set_values(
        &self,
        row: usize,
        column: usize,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), SheetError>;
}

#[async_trait]
pub trait ActivityTransport: Send + Sync {
    /// Performs the request. Non-200 statuses are returned, not raised.
    async fn post(&self, request: &ActivityRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// The host document's user interface.
#[async_trait]
pub trait HostUi: Send + Sync {
    async fn alert(&self, message: &str) -> Result<(), UiError>;
    async fn show_sidebar(&self, html: &str, title: &str) -> Result<(), UiError>;
    async fn create_menu(&self, title: &str, items: &[MenuItem]) -> Result<(), UiError>;
}

// Shared handles delegate to the inner implementation.
#[async_trait]
impl<T: PropertyStore + ?Sized> PropertyStore for Arc<T> {
    async fn load(&self) -> Result<ConfigMap, StoreError> {
        (**self).load().await
    }

    async fn save(&self, properties: ConfigMap) -> Result<(), StoreError> {
        (**self).save(properties).await
    }
}

#[async_trait]
impl<T: ActivityTransport + ?Sized> ActivityTransport for Arc<T> {
    async fn post(&self, request: &ActivityRequest) -> Result<ApiResponse, TransportError> {
        (**self).post(request).await
    }
}

#[async_trait]
impl<T: HostUi + ?Sized> HostUi for Arc<T> {
    async fn alert(&self, message: &str) -> Result<(), UiError> {
        (**self).alert(message).await
    }

    async fn show_sidebar(&self, html: &str, title: &str) -> Result<(), UiError> {
        (**self).show_sidebar(html, title).await
    }

    async fn create_menu(&self, title: &str, items: &[MenuItem]) -> Result<(), UiError> {
        (**self).create_menu(title, items).await
    }
}
