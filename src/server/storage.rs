use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use thiserror::Error;

use crate::telemetry::DeviceInfo;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Clone)]
pub struct BeaconStore {
    pool: SqlitePool,
}

fn to_i64<T: TryInto<i64>>(value: T, field: &str) -> Result<i64, StorageError> {
    value
        .try_into()
        .map_err(|_| StorageError::Serialization(format!("{field} out of range")))
}

fn from_i64<T: TryFrom<i64>>(value: i64, field: &str) -> Result<T, StorageError> {
    T::try_from(value).map_err(|_| StorageError::Serialization(format!("{field} out of range")))
}

impl BeaconStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        // Each in-memory connection is its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS system_info (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                os TEXT NOT NULL,
                ram_total INTEGER NOT NULL,
                cpu_cores INTEGER NOT NULL,
                file_count INTEGER,
                interfaces TEXT NOT NULL DEFAULT '[]',
                last_beacon_time TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace the record keyed by `info.id`.
    pub async fn save(&self, info: &DeviceInfo) -> Result<(), StorageError> {
        let interfaces = serde_json::to_string(&info.interfaces)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let file_count = info
            .file_count
            .map(|count| to_i64(count, "file_count"))
            .transpose()?;

        sqlx::query(
            r"
            INSERT OR REPLACE INTO system_info
                (id, username, os, ram_total, cpu_cores, file_count, interfaces, last_beacon_time)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&info.id)
        .bind(&info.username)
        .bind(&info.os)
        .bind(to_i64(info.ram_total, "ram_total")?)
        .bind(i64::from(info.cpu_cores))
        .bind(file_count)
        .bind(interfaces)
        .bind(info.last_beacon_time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<DeviceInfo>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, username, os, ram_total, cpu_cores, file_count, interfaces, last_beacon_time
            FROM system_info
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_device(&row)).transpose()
    }

    pub async fn count(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM system_info")
            .fetch_one(&self.pool)
            .await?;
        from_i64(count, "count")
    }
}

fn map_device(row: &SqliteRow) -> Result<DeviceInfo, StorageError> {
    let interfaces: String = row.try_get("interfaces")?;
    let interfaces: Vec<String> = serde_json::from_str(&interfaces)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    let file_count: Option<i64> = row.try_get("file_count")?;
    let last_beacon_time: DateTime<Utc> = row.try_get("last_beacon_time")?;

    Ok(DeviceInfo {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        os: row.try_get("os")?,
        ram_total: from_i64(row.try_get("ram_total")?, "ram_total")?,
        cpu_cores: from_i64(row.try_get("cpu_cores")?, "cpu_cores")?,
        file_count: file_count
            .map(|count| from_i64(count, "file_count"))
            .transpose()?,
        interfaces,
        last_beacon_time,
    })
}
