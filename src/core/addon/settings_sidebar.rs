//! Settings sidebar and menu definitions shared by both add-on variants.

use super::addon_ports::{HostUi, MenuItem, PropertyStore, StoreError, UiError};
use crate::core::activity::{default_properties, ConfigMap, TransportKey};

pub const MENU_TITLE: &str = "OpenBadges";
pub const SIDEBAR_TITLE: &str = "Settings";

pub const SHEETS_MENU: [MenuItem; 2] = [
    MenuItem {
        name: "Settings",
        function_name: "showSettingsSidebar",
    },
    MenuItem {
        name: "Run",
        function_name: "onRun",
    },
];

pub const FORMS_MENU: [MenuItem; 1] = [MenuItem {
    name: "Settings",
    function_name: "showSettingsSidebar",
}];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("UI error: {0}")]
    Ui(#[from] UiError),
}

/// Saved properties layered over the defaults, so every field has a value.
pub fn sidebar_properties(saved: &ConfigMap) -> ConfigMap {
    let mut merged = default_properties();
    merged.extend(saved.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Renders the settings form. The host page posts the fields to `onSaveConfiguration`.
pub fn render_settings_sidebar(properties: &ConfigMap) -> String {
    let mut html = String::from("<form id=\"settings\" data-submit=\"onSaveConfiguration\">\n");
    for (key, value) in properties {
        let input_type = if TransportKey::from_key(key) == Some(TransportKey::ApiToken) {
            "password"
        } else {
            "text"
        };
        html.push_str(&format!(
            "  <label for=\"{key}\">{key}</label>\n  <input type=\"{input_type}\" id=\"{key}\" name=\"{key}\" value=\"{value}\">\n",
            key = escape_html(key),
            input_type = input_type,
            value = escape_html(value),
        ));
    }
    html.push_str("  <button type=\"submit\">Save</button>\n</form>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub async fn show_settings_sidebar<P, U>(store: &P, ui: &U) -> Result<(), SettingsError>
where
    P: PropertyStore + ?Sized,
    U: HostUi + ?Sized,
{
    let saved = store.load().await?;
    let html = render_settings_sidebar(&sidebar_properties(&saved));
    ui.show_sidebar(&html, SIDEBAR_TITLE).await?;
    Ok(())
}
