//! Network controller REST API client.

pub mod client;

pub use client::{ControllerClient, ControllerError};

/// Controller-defined device category used to filter inventory queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFamily {
    Switch,
    WirelessAp,
}

impl DeviceFamily {
    /// Both families polled in a run, in report order.
    pub const ALL: [DeviceFamily; 2] = [DeviceFamily::Switch, DeviceFamily::WirelessAp];

    /// Filter string the controller expects in the family query parameter.
    pub fn filter(&self) -> &'static str {
        match self {
            DeviceFamily::Switch => "Switches and Hubs",
            DeviceFamily::WirelessAp => "Unified AP",
        }
    }

    /// Label used in console reports.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceFamily::Switch => "Switch",
            DeviceFamily::WirelessAp => "Wireless",
        }
    }

    /// Snapshot file name for this family.
    pub fn snapshot_file(&self) -> &'static str {
        match self {
            DeviceFamily::Switch => "device_switch_list.csv",
            DeviceFamily::WirelessAp => "device_wireless_list.csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_filters_match_controller_categories() {
        assert_eq!(DeviceFamily::Switch.filter(), "Switches and Hubs");
        assert_eq!(DeviceFamily::WirelessAp.filter(), "Unified AP");
    }

    #[test]
    fn test_snapshot_files_are_distinct() {
        assert_ne!(
            DeviceFamily::Switch.snapshot_file(),
            DeviceFamily::WirelessAp.snapshot_file()
        );
    }
}
