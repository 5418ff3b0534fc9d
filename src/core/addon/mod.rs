// Add-on services for the sheets and forms variants, plus the ports they depend on.

pub mod addon_ports;
pub mod delivery;
pub mod forms_service;
pub mod settings_sidebar;
pub mod sheets_service;

pub use addon_ports::{
    ActivityRequest, ActivityTransport, ApiResponse, EmailMessage, HostUi, MenuItem, Notifier,
    NotifyError, PropertyStore, SheetError, StoreError, TabularDataSource, TransportError,
    UiError,
};
pub use forms_service::FormsAddonService;
pub use sheets_service::SheetsAddonService;
