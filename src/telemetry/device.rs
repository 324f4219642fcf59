use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::{Networks, System};
use tracing::{debug, info};

use crate::telemetry::TelemetryError;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub username: String,
    pub os: String,
    /// Total memory in megabytes.
    pub ram_total: u64,
    pub cpu_cores: u32,
    #[serde(default)]
    pub file_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    pub last_beacon_time: DateTime<Utc>,
}

fn username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}

fn count_entries(dir: &Path) -> Option<u64> {
    fs::read_dir(dir).ok().map(|entries| entries.count() as u64)
}

pub fn collect() -> Result<DeviceInfo, TelemetryError> {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_cpu_all();

    let cpu_cores = u32::try_from(sys.cpus().len())
        .map_err(|_| TelemetryError::Collect("cpu count out of range".to_string()))?;
    if cpu_cores == 0 {
        return Err(TelemetryError::Collect("no cpus reported".to_string()));
    }

    let networks = Networks::new_with_refreshed_list();
    let mut interfaces: Vec<String> = networks.list().keys().cloned().collect();
    interfaces.sort();

    let info = DeviceInfo {
        id: System::host_name().unwrap_or_else(|| "unknown".to_string()),
        username: username(),
        os: std::env::consts::OS.to_string(),
        ram_total: sys.total_memory() / BYTES_PER_MB,
        cpu_cores,
        file_count: dirs::home_dir().and_then(|home| count_entries(&home)),
        interfaces,
        last_beacon_time: Utc::now(),
    };

    info!(
        id = %info.id,
        os = %info.os,
        ram_mb = info.ram_total,
        cpus = info.cpu_cores,
        "collected device info"
    );
    debug!(interfaces = ?info.interfaces, file_count = ?info.file_count);
    Ok(info)
}
