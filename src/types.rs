use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type UnitId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Active,
    Idle,
    Maintenance,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 3] = [Self::Active, Self::Idle, Self::Maintenance];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Idle => "Idle",
            Self::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("battery level {0} is outside 0..=100")]
pub struct BatteryOutOfRange(i64);

/// Battery charge in percent, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Battery(u8);

impl Battery {
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Battery {
    type Error = BatteryOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|percent| *percent <= 100)
            .map(Battery)
            .ok_or(BatteryOutOfRange(value))
    }
}

impl From<Battery> for i64 {
    fn from(battery: Battery) -> Self {
        i64::from(battery.0)
    }
}

impl fmt::Display for Battery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub model: String,
    pub status: UnitStatus,
    pub battery: Battery,
    // Served pre-formatted, e.g. "2024-05-01 14:03"
    pub created_at: String,
    #[serde(default)]
    pub sensor_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub speed: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingInput {
    pub temperature: f64,
    pub humidity: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleBatch {
    pub sensors: Vec<ReadingInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkEntry {
    // An entry without an id is still sent, the service reports it as failed.
    #[serde(default, alias = "robotId", skip_serializing_if = "Option::is_none")]
    pub robot_id: Option<UnitId>,
    pub sensors: Vec<ReadingInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkBatch {
    pub robots: Vec<BulkEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleIngestResponse {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PerUnitResult {
    Success {
        robot_id: UnitId,
        robot_name: String,
        count: u64,
    },
    Error {
        #[serde(default)]
        robot_id: Option<UnitId>,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkIngestResponse {
    pub total_sensors: u64,
    pub results: Vec<PerUnitResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUnit {
    pub name: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Created {
    pub id: UnitId,
}

/// Partial update, absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<Battery>,
}

impl UnitPatch {
    pub fn status(status: UnitStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteStats {
    pub total_robots: u64,
    pub active_robots: u64,
    pub total_sensors: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRow {
    pub id: UnitId,
    pub name: String,
    pub model: String,
    pub status: UnitStatus,
    pub battery: Battery,
    pub sensor_count: u64,
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub avg_speed: f64,
    pub last_reading: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    Unit(UnitId),
    All,
}
