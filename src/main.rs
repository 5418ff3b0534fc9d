// This is the entry point of the OpenBadges add-on runner.
//
// **Architecture Overview:**
// - `core/` = Business logic (host-agnostic)
// - `infra/` = Implementations of core traits (files, HTTP APIs, terminal)
// - `host/` = How the host reaches the add-on (entry points, dispatch, config)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Hand the requested entry point to the right service

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "host/host_layer.rs"]
mod host;
#[path = "infra/infra_layer.rs"]
mod infra;

use anyhow::{anyhow, Context};
use tokio::io::AsyncReadExt;

use crate::core::addon::{FormsAddonService, SheetsAddonService};
use crate::host::entry_points::ENTRY_POINTS;
use crate::host::{dispatch_forms, dispatch_sheets, AddonVariant, AppConfig, EntryPoint};
use crate::infra::activity_api::ActivityApiClient;
use crate::infra::notifications::SendGridNotifier;
use crate::infra::properties::JsonPropertyStore;
use crate::infra::sheets::JsonSheet;
use crate::infra::ui::TerminalUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let name = std::env::args().nth(1).ok_or_else(|| {
        anyhow!(
            "Usage: openbadges_addon <entry point>, one of: {}",
            ENTRY_POINTS
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    let entry =
        EntryPoint::from_name(&name).ok_or_else(|| anyhow!("Unknown entry point '{}'", name))?;

    let config = AppConfig::from_env()?;

    // The settings form and form submissions arrive as JSON on stdin.
    let mut input = String::new();
    if entry.reads_input() {
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("Failed to read input from stdin")?;
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let properties = JsonPropertyStore::new(&config.properties_path);
    let transport = ActivityApiClient::new()?;
    let ui = TerminalUi::stdout();

    match config.variant {
        AddonVariant::Sheets => {
            let sheet = JsonSheet::open(&config.sheet_path)
                .await
                .with_context(|| format!("Failed to open sheet {}", config.sheet_path.display()))?;
            let service = SheetsAddonService::new(properties, sheet, transport, ui);
            dispatch_sheets(&service, entry, &input).await?;
        }
        AddonVariant::Forms => {
            let mail = config
                .failure_mail
                .context("The forms add-on needs failure email settings")?;
            let notifier = SendGridNotifier::new(mail.sendgrid_key, mail.sendgrid_url, mail.sender);
            let service =
                FormsAddonService::new(properties, transport, notifier, ui, mail.owner_email);
            dispatch_forms(&service, entry, &input).await?;
        }
    }

    Ok(())
}
