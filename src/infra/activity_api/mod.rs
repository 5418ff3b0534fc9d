// Activity event API infra: the HTTP client behind `ActivityTransport`.

#[path = "activity_api_client.rs"]
pub mod activity_api_client;

pub use activity_api_client::ActivityApiClient;
