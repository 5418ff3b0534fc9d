// Process configuration, read from the environment after `.env` is loaded.

use std::path::PathBuf;

use anyhow::{anyhow, Context};

use super::entry_points::AddonVariant;

const DEFAULT_PROPERTIES_PATH: &str = "data/properties.json";
const DEFAULT_SHEET_PATH: &str = "data/sheet.json";

/// Where failure emails go and how they are sent. Only the forms variant needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMailConfig {
    pub sendgrid_key: String,
    pub sendgrid_url: String,
    /// The `from` address.
    pub sender: String,
    pub owner_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub variant: AddonVariant,
    pub properties_path: PathBuf,
    pub sheet_path: PathBuf,
    pub failure_mail: Option<FailureMailConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let variant = match lookup("ADDON_VARIANT") {
            Some(value) => value.parse::<AddonVariant>()?,
            None => AddonVariant::Sheets,
        };

        let properties_path = lookup("ADDON_PROPERTIES_PATH")
            .unwrap_or_else(|| DEFAULT_PROPERTIES_PATH.to_string());
        let sheet_path =
            lookup("ADDON_SHEET_PATH").unwrap_or_else(|| DEFAULT_SHEET_PATH.to_string());

        let failure_mail = match variant {
            AddonVariant::Sheets => None,
            AddonVariant::Forms => {
                let required = |key: &str| {
                    lookup(key)
                        .filter(|value| !value.trim().is_empty())
                        .ok_or_else(|| anyhow!("Missing {} environment variable", key))
                };
                Some(FailureMailConfig {
                    sendgrid_key: required("SENDGRID_KEY")?,
                    sendgrid_url: required("SENDGRID_URL")?,
                    sender: required("ERROR_EMAIL")?,
                    owner_email: required("ADDON_OWNER_EMAIL")
                        .context("The forms add-on emails its owner when a submission fails")?,
                })
            }
        };

        Ok(Self {
            variant,
            properties_path: PathBuf::from(properties_path),
            sheet_path: PathBuf::from(sheet_path),
            failure_mail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_sheets() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.variant, AddonVariant::Sheets);
        assert_eq!(config.properties_path, PathBuf::from("data/properties.json"));
        assert_eq!(config.sheet_path, PathBuf::from("data/sheet.json"));
        assert!(config.failure_mail.is_none());
    }

    #[test]
    fn test_forms_requires_mail_settings() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("ADDON_VARIANT", "forms"),
            ("SENDGRID_KEY", "key"),
        ]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("SENDGRID_URL"), "{}", err);
    }

    #[test]
    fn test_forms_config() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ADDON_VARIANT", "forms"),
            ("ADDON_PROPERTIES_PATH", "/tmp/props.json"),
            ("SENDGRID_KEY", "key"),
            ("SENDGRID_URL", "https://api.sendgrid.com/v3/mail/send"),
            ("ERROR_EMAIL", "errors@example.com"),
            ("ADDON_OWNER_EMAIL", "owner@example.com"),
        ]))
        .unwrap();

        assert_eq!(config.variant, AddonVariant::Forms);
        assert_eq!(config.properties_path, PathBuf::from("/tmp/props.json"));
        let mail = config.failure_mail.unwrap();
        assert_eq!(mail.sender, "errors@example.com");
        assert_eq!(mail.owner_email, "owner@example.com");
    }

    #[test]
    fn test_unknown_variant_fails() {
        assert!(AppConfig::from_lookup(lookup_from(&[("ADDON_VARIANT", "slides")])).is_err());
    }
}
