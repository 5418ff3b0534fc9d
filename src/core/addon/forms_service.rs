// The form variant of the add-on.
//
// Each submission becomes one activity event. Delivery is retried; when the last
// attempt fails the add-on owner gets an email with the API's answer.
// Success is silent, and no failure is raised to the host trigger.

use super::addon_ports::{
    ActivityRequest, ActivityTransport, EmailMessage, HostUi, Notifier, PropertyStore,
};
use super::delivery::{deliver, DeliveryOutcome, RetryPolicy};
use super::settings_sidebar::{show_settings_sidebar, FORMS_MENU, MENU_TITLE};
use crate::core::activity::{build_form_payload, AddonSettings, ConfigMap, FormResponse};

pub const FAILURE_EMAIL_SUBJECT: &str = "OpenBadges - An error occurred after form was submitted.";

pub struct FormsAddonService<P, T, N, U>
where
    P: PropertyStore,
    T: ActivityTransport,
    N: Notifier,
    U: HostUi,
{
    properties: P,
    transport: T,
    notifier: N,
    ui: U,
    /// Recipient of failure emails.
    owner_email: String,
    retry: RetryPolicy,
}

impl<P, T, N, U> FormsAddonService<P, T, N, U>
where
    P: PropertyStore,
    T: ActivityTransport,
    N: Notifier,
    U: HostUi,
{
    pub fn new(properties: P, transport: T, notifier: N, ui: U, owner_email: String) -> Self {
        Self {
            properties,
            transport,
            notifier,
            ui,
            owner_email,
            retry: RetryPolicy::default(),
        }
    }

    #[cfg(test)]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn add_menu(&self) {
        if let Err(err) = self.ui.create_menu(MENU_TITLE, &FORMS_MENU).await {
            tracing::error!("Failed to create menu: {}", err);
        }
    }

    pub async fn save_configuration(&self, properties: ConfigMap) {
        let count = properties.len();
        match self.properties.save(properties).await {
            Ok(()) => tracing::info!(count, "Saved document properties"),
            Err(err) => tracing::error!("Failed to save document properties: {}", err),
        }
    }

    pub async fn show_settings(&self) {
        if let Err(err) = show_settings_sidebar(&self.properties, &self.ui).await {
            tracing::error!("Failed to show settings sidebar: {}", err);
        }
    }

    /// The form-submit trigger.
    pub async fn on_form_submit(&self, response: &FormResponse) {
        let properties = match self.properties.load().await {
            Ok(properties) => properties,
            Err(err) => {
                tracing::error!("Could not load settings for form submission: {}", err);
                return;
            }
        };

        let settings = AddonSettings::from_properties(&properties);
        if !settings.transport.is_complete() {
            tracing::warn!("Request cancelled as required properties are missing.");
            return;
        }

        let payload = build_form_payload(&settings, response);
        let request = match ActivityRequest::new(&settings.transport, &payload) {
            Ok(request) => request,
            Err(err) => {
                tracing::error!("Could not serialize form payload: {}", err);
                return;
            }
        };

        match deliver(&self.transport, &request, self.retry).await {
            DeliveryOutcome::Delivered => {}
            DeliveryOutcome::Failed { status, detail } => {
                tracing::warn!(?status, form_id = %response.form_id, "Sending email to form owner");
                self.notify_failure(detail).await;
            }
        }
    }

    async fn notify_failure(&self, body: String) {
        let message = EmailMessage {
            to: self.owner_email.clone(),
            subject: FAILURE_EMAIL_SUBJECT.to_string(),
            body,
            content_type: "text/plain".to_string(),
        };
        if let Err(err) = self.notifier.send_email(&message).await {
            tracing::error!("Failed to send failure email: {}", err);
        }
    }
}
