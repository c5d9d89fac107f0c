//! Device inventory model and normalization.
//!
//! Raw controller responses are projected into a fixed 9-column table
//! (header row first) so snapshots diff and persist the same shape run
//! over run.

pub mod diff;

use serde::Deserialize;

pub use diff::SnapshotDiff;

/// Fixed column order for normalized device tables
pub const COLUMNS: [&str; 9] = [
    "hostname",
    "id",
    "location",
    "family",
    "platformId",
    "role",
    "serialNumber",
    "upTime",
    "errorCode",
];

/// One device entry as returned by the controller.
///
/// Every field is required; a device record missing one of them is a
/// deserialization error that terminates the run.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDevice {
    pub hostname: String,
    pub id: String,
    pub location: String,
    pub family: String,
    #[serde(rename = "platformId")]
    pub platform_id: String,
    pub role: String,
    #[serde(rename = "serialNumber")]
    pub serial_number: String,
    #[serde(rename = "upTime")]
    pub up_time: String,
    #[serde(rename = "errorCode")]
    pub error_code: String,
}

/// Device-list payload: `{"response": [device...]}`
#[derive(Debug, Deserialize)]
pub struct DeviceListResponse {
    pub response: Vec<RawDevice>,
}

/// A normalized device table: header row followed by one row per device.
pub type DeviceTable = Vec<Vec<String>>;

/// Project raw device entries into the fixed tabular form, header row first.
pub fn normalize(response: &DeviceListResponse) -> DeviceTable {
    let mut rows = Vec::with_capacity(response.response.len() + 1);
    rows.push(COLUMNS.iter().map(|c| c.to_string()).collect());

    for device in &response.response {
        rows.push(vec![
            device.hostname.clone(),
            device.id.clone(),
            device.location.clone(),
            device.family.clone(),
            device.platform_id.clone(),
            device.role.clone(),
            device.serial_number.clone(),
            normalize_uptime(&device.up_time),
            device.error_code.clone(),
        ]);
    }
    rows
}

/// Prefix `0day,` when the controller reports an uptime below one day, so
/// downstream parsing can always assume a "days,time" shape.
pub fn normalize_uptime(up_time: &str) -> String {
    if up_time.contains("day") {
        up_time.to_string()
    } else {
        format!("0day,{}", up_time)
    }
}

/// Number of data rows in a normalized table (header excluded).
pub fn device_count(table: &DeviceTable) -> usize {
    table.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_device(hostname: &str, up_time: &str) -> serde_json::Value {
        serde_json::json!({
            "hostname": hostname,
            "id": "f0a1",
            "location": "bldg-1",
            "family": "Switches and Hubs",
            "platformId": "C9300-48P",
            "role": "ACCESS",
            "serialNumber": "FCW1234L0AB",
            "upTime": up_time,
            "errorCode": "null",
        })
    }

    #[test]
    fn test_normalize_uptime_adds_day_component() {
        assert_eq!(normalize_uptime("5 hrs"), "0day,5 hrs");
        assert_eq!(normalize_uptime("3 days, 2 hrs"), "3 days, 2 hrs");
        assert_eq!(normalize_uptime("1 day, 0:05:12.00"), "1 day, 0:05:12.00");
    }

    #[test]
    fn test_normalize_emits_header_then_devices() {
        let payload = serde_json::json!({
            "response": [sample_device("sw-01", "14:32:45.300"), sample_device("sw-02", "2 days, 1:00:00.000")],
        });
        let response: DeviceListResponse = serde_json::from_value(payload).unwrap();
        let table = normalize(&response);

        assert_eq!(table.len(), 3);
        assert_eq!(table[0], COLUMNS.map(String::from).to_vec());
        assert_eq!(table[1][0], "sw-01");
        assert_eq!(table[1][7], "0day,14:32:45.300");
        assert_eq!(table[2][7], "2 days, 1:00:00.000");
        assert_eq!(device_count(&table), 2);
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let payload = serde_json::json!({
            "response": [{"hostname": "sw-01", "id": "f0a1"}],
        });
        assert!(serde_json::from_value::<DeviceListResponse>(payload).is_err());
    }

    #[test]
    fn test_missing_response_key_is_fatal() {
        let payload = serde_json::json!({"version": "1.0"});
        assert!(serde_json::from_value::<DeviceListResponse>(payload).is_err());
    }
}
