use std::fmt;
use std::str::FromStr;

/// A function the host can invoke on the add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Open,
    Install,
    SaveConfiguration,
    Run,
    FormSubmit,
    ShowSettingsSidebar,
}

/// Registration table: the host-visible name of every entry point.
/// Menu items refer to entries in this table by name.
pub const ENTRY_POINTS: [(&str, EntryPoint); 6] = [
    ("onOpen", EntryPoint::Open),
    ("onInstall", EntryPoint::Install),
    ("onSaveConfiguration", EntryPoint::SaveConfiguration),
    ("onRun", EntryPoint::Run),
    ("onFormSubmit", EntryPoint::FormSubmit),
    ("showSettingsSidebar", EntryPoint::ShowSettingsSidebar),
];

impl EntryPoint {
    pub fn from_name(name: &str) -> Option<Self> {
        ENTRY_POINTS
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, entry)| *entry)
    }

    pub fn name(self) -> &'static str {
        ENTRY_POINTS
            .iter()
            .find(|(_, entry)| *entry == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Whether the host passes a JSON document along with the call.
    pub fn reads_input(self) -> bool {
        matches!(self, EntryPoint::SaveConfiguration | EntryPoint::FormSubmit)
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which document type the add-on is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonVariant {
    Sheets,
    Forms,
}

impl AddonVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            AddonVariant::Sheets => "sheets",
            AddonVariant::Forms => "forms",
        }
    }
}

impl fmt::Display for AddonVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown add-on variant '{0}', expected 'sheets' or 'forms'")]
pub struct UnknownVariant(String);

impl FromStr for AddonVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sheets" | "sheet" => Ok(AddonVariant::Sheets),
            "forms" | "form" => Ok(AddonVariant::Forms),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}
