pub mod beacon;
pub mod device;
pub mod summary;

use thiserror::Error;

pub use device::DeviceInfo;
pub use summary::{SummaryCache, SummaryResponse, SummaryState};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to collect device info: {0}")]
    Collect(String),
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("built without network support")]
    Disabled,
}
