//! Network prefab descriptors

use serde::{Deserialize, Serialize};

/// Road, rail or path prefab as reported by the game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetPrefab {
    pub name: String,
    #[serde(default)]
    pub width: f32,
    #[serde(default = "default_overground")]
    pub is_overground: bool,
    #[serde(default)]
    pub is_underground: bool,
    #[serde(default)]
    pub fw_vehicle_lane_count: u32,
    #[serde(default)]
    pub bw_vehicle_lane_count: u32,
}

fn default_overground() -> bool {
    true
}

impl NetPrefab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 0.0,
            is_overground: default_overground(),
            is_underground: false,
            fw_vehicle_lane_count: 0,
            bw_vehicle_lane_count: 0,
        }
    }

    /// Total vehicle lanes in both directions, saturating at `u32::MAX`
    pub fn vehicle_lane_count(&self) -> u32 {
        self.fw_vehicle_lane_count.saturating_add(self.bw_vehicle_lane_count)
    }

    /// Whether traffic runs in a single direction
    pub fn is_one_way(&self) -> bool {
        (self.fw_vehicle_lane_count == 0) != (self.bw_vehicle_lane_count == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_game_message() {
        let json = r#"{
            "name": "Basic Road",
            "width": 16.0,
            "is_overground": true,
            "is_underground": false,
            "fw_vehicle_lane_count": 1,
            "bw_vehicle_lane_count": 1
        }"#;
        let prefab: NetPrefab = serde_json::from_str(json).unwrap();
        assert_eq!(prefab.name, "Basic Road");
        assert_eq!(prefab.width, 16.0);
        assert_eq!(prefab.vehicle_lane_count(), 2);
        assert!(!prefab.is_one_way());
    }

    #[test]
    fn test_missing_fields_default() {
        let prefab: NetPrefab = serde_json::from_str(r#"{"name": "Oneway Road", "fw_vehicle_lane_count": 2}"#).unwrap();
        assert!(prefab.is_one_way());
        assert!(prefab.is_overground);
        assert!(!prefab.is_underground);
    }

    #[test]
    fn test_name_only_matches_new() {
        let prefab: NetPrefab = serde_json::from_str(r#"{"name": "Gravel Road"}"#).unwrap();
        assert_eq!(prefab, NetPrefab::new("Gravel Road"));
    }

    #[test]
    fn test_lane_count_saturates() {
        let json = r#"{"name": "Huge Road", "fw_vehicle_lane_count": 4294967295, "bw_vehicle_lane_count": 1}"#;
        let prefab: NetPrefab = serde_json::from_str(json).unwrap();
        assert_eq!(prefab.vehicle_lane_count(), u32::MAX);
    }
}
