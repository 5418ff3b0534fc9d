#[path = "sendgrid_notifier.rs"]
pub mod sendgrid_notifier;

pub use sendgrid_notifier::SendGridNotifier;
