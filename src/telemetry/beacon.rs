use std::thread;

use tracing::{info, warn};

use crate::telemetry::{DeviceInfo, TelemetryError, device};

#[cfg(feature = "network")]
pub fn send(url: &str, info: &DeviceInfo) -> Result<(), TelemetryError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;
    let response = client.post(url).json(info).send()?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(TelemetryError::Status(status.as_u16()));
    }
    Ok(())
}

#[cfg(not(feature = "network"))]
pub fn send(_url: &str, _info: &DeviceInfo) -> Result<(), TelemetryError> {
    Err(TelemetryError::Disabled)
}

pub fn collect_and_send(url: &str) -> Result<DeviceInfo, TelemetryError> {
    let info = device::collect()?;
    send(url, &info)?;
    Ok(info)
}

/// Runs the beacon on its own thread; `done` receives the outcome.
pub fn spawn<F>(url: String, done: F) -> thread::JoinHandle<()>
where
    F: FnOnce(Result<(), TelemetryError>) + Send + 'static,
{
    thread::spawn(move || {
        let outcome = collect_and_send(&url).map(|info| {
            info!(id = %info.id, %url, "beacon delivered");
        });
        if let Err(err) = &outcome {
            warn!(%err, %url, "beacon failed");
        }
        done(outcome);
    })
}
