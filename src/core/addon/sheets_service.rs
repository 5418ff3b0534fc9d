// The spreadsheet variant of the add-on.
//
// A run reads every data row, builds one activity event per row, drops rows that
// are not verified or were already issued, and POSTs the rest as one array.
// Every run ends with exactly one alert; nothing is raised to the host.

use super::addon_ports::{
    ActivityRequest, ActivityTransport, HostUi, PropertyStore, SheetError, StoreError,
    TabularDataSource,
};
use super::delivery::{deliver, DeliveryOutcome, RetryPolicy};
use super::settings_sidebar::{show_settings_sidebar, SettingsError, MENU_TITLE, SHEETS_MENU};
use crate::core::activity::{
    build_sheet_payloads, describe_failure, filter_unissued, issued_property, resolve,
    sent_rows_message, write_back_issued, AddonSettings, ConfigMap,
};

pub const INCOMPLETE_SETTINGS_MESSAGE: &str =
    "Add the API URL, token and key in Settings before running.";

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Could not load settings: {0}")]
    Store(#[from] StoreError),
    #[error("Could not read the sheet: {0}")]
    Sheet(#[from] SheetError),
    #[error("Could not serialize the payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct SheetsAddonService<P, S, T, U>
where
    P: PropertyStore,
    S: TabularDataSource,
    T: ActivityTransport,
    U: HostUi,
{
    properties: P,
    sheet: S,
    transport: T,
    ui: U,
}

impl<P, S, T, U> SheetsAddonService<P, S, T, U>
where
    P: PropertyStore,
    S: TabularDataSource,
    T: ActivityTransport,
    U: HostUi,
{
    pub fn new(properties: P, sheet: S, transport: T, ui: U) -> Self {
        Self {
            properties,
            sheet,
            transport,
            ui,
        }
    }

    /// Runs on open and on install: adds the add-on menu.
    pub async fn add_menu(&self) {
        if let Err(err) = self.ui.create_menu(MENU_TITLE, &SHEETS_MENU).await {
            tracing::error!("Failed to create menu: {}", err);
        }
    }

    pub async fn save_configuration(&self, properties: ConfigMap) {
        let count = properties.len();
        match self.properties.save(properties).await {
            Ok(()) => tracing::info!(count, "Saved document properties"),
            Err(err) => {
                tracing::error!("Failed to save document properties: {}", err);
                self.alert(&format!("Settings could not be saved: {}", err)).await;
            }
        }
    }

    pub async fn show_settings(&self) {
        if let Err(err) = show_settings_sidebar(&self.properties, &self.ui).await {
            tracing::error!("Failed to show settings sidebar: {}", err);
            if let SettingsError::Store(_) = err {
                self.alert(&format!("Settings could not be loaded: {}", err)).await;
            }
        }
    }

    /// The "Run" menu action.
    pub async fn run(&self) {
        let message = match self.send_rows().await {
            Ok(message) => message,
            Err(err) => {
                tracing::error!("Sheet run failed: {}", err);
                format!("An error occurred: {}", err)
            }
        };
        self.alert(&message).await;
    }

    async fn send_rows(&self) -> Result<String, RunError> {
        let properties = self.properties.load().await?;
        let settings = AddonSettings::from_properties(&properties);
        if !settings.transport.is_complete() {
            tracing::warn!("Request cancelled as required properties are missing.");
            return Ok(INCOMPLETE_SETTINGS_MESSAGE.to_string());
        }

        let dynamic = resolve(&settings);
        let payloads = build_sheet_payloads(&settings, &self.sheet).await?;
        let payloads = filter_unissued(payloads, &dynamic);
        if payloads.is_empty() {
            tracing::info!("No rows left to send");
            return Ok(sent_rows_message(0));
        }

        let request = ActivityRequest::new(&settings.transport, &payloads)?;
        match deliver(&self.transport, &request, RetryPolicy::single_attempt()).await {
            DeliveryOutcome::Delivered => {}
            DeliveryOutcome::Failed {
                status: Some(status),
                detail,
            } => return Ok(describe_failure(status, &detail)),
            DeliveryOutcome::Failed { status: None, detail } => {
                return Ok(format!("An error occurred: {}", detail))
            }
        }

        let summary = sent_rows_message(payloads.len());
        tracing::info!(rows = payloads.len(), "Rows sent");

        if let Some(issued) = issued_property(&dynamic) {
            if let Err(err) = write_back_issued(&self.sheet, issued, &payloads).await {
                tracing::error!("Failed to update issued column: {}", err);
                return Ok(format!(
                    "{} The issued column could not be updated: {}",
                    summary, err
                ));
            }
        }

        Ok(summary)
    }

    async fn alert(&self, message: &str) {
        if let Err(err) = self.ui.alert(message).await {
            tracing::error!("Failed to show alert: {}", err);
        }
    }
}
