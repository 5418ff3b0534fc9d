// Routes a host call to the add-on service for the active variant.
//
// The services swallow their own failures (alert or email), so the only errors
// surfaced here are calls the variant does not register and unreadable input.

use serde::de::DeserializeOwned;

use super::entry_points::{AddonVariant, EntryPoint};
use crate::core::activity::{ConfigMap, FormResponse};
use crate::core::addon::{
    ActivityTransport, FormsAddonService, HostUi, Notifier, PropertyStore, SheetsAddonService,
    TabularDataSource,
};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("{entry} is not available in the {variant} add-on")]
    Unsupported {
        entry: EntryPoint,
        variant: AddonVariant,
    },
    #[error("Invalid input for {entry}: {source}")]
    InvalidInput {
        entry: EntryPoint,
        #[source]
        source: serde_json::Error,
    },
}

fn parse_input<T: DeserializeOwned>(entry: EntryPoint, input: &str) -> Result<T, HostError> {
    serde_json::from_str(input).map_err(|source| HostError::InvalidInput { entry, source })
}

pub async fn dispatch_sheets<P, S, T, U>(
    service: &SheetsAddonService<P, S, T, U>,
    entry: EntryPoint,
    input: &str,
) -> Result<(), HostError>
where
    P: PropertyStore,
    S: TabularDataSource,
    T: ActivityTransport,
    U: HostUi,
{
    tracing::info!(%entry, variant = "sheets", "Dispatching entry point");

    match entry {
        EntryPoint::Open | EntryPoint::Install => service.add_menu().await,
        EntryPoint::SaveConfiguration => {
            let properties: ConfigMap = parse_input(entry, input)?;
            service.save_configuration(properties).await;
        }
        EntryPoint::Run => service.run().await,
        EntryPoint::ShowSettingsSidebar => service.show_settings().await,
        EntryPoint::FormSubmit => {
            return Err(HostError::Unsupported {
                entry,
                variant: AddonVariant::Sheets,
            })
        }
    }

    Ok(())
}

pub async fn dispatch_forms<P, T, N, U>(
    service: &FormsAddonService<P, T, N, U>,
    entry: EntryPoint,
    input: &str,
) -> Result<(), HostError>
where
    P: PropertyStore,
    T: ActivityTransport,
    N: Notifier,
    U: HostUi,
{
    tracing::info!(%entry, variant = "forms", "Dispatching entry point");

    match entry {
        EntryPoint::Open | EntryPoint::Install => service.add_menu().await,
        EntryPoint::SaveConfiguration => {
            let properties: ConfigMap = parse_input(entry, input)?;
            service.save_configuration(properties).await;
        }
        EntryPoint::FormSubmit => {
            let response: FormResponse = parse_input(entry, input)?;
            service.on_form_submit(&response).await;
        }
        EntryPoint::ShowSettingsSidebar => service.show_settings().await,
        EntryPoint::Run => {
            return Err(HostError::Unsupported {
                entry,
                variant: AddonVariant::Forms,
            })
        }
    }

    Ok(())
}
