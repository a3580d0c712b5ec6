//! Camera context derived from capture paths.
//!
//! Captures are stored as `.../foscam/<location>/<device>/<snap|record>/<file>`
//! with file names such as `MDAlarm_20240101-120000.jpg`.

use std::path::{Component, Path};

use chrono::{NaiveDateTime, Timelike};
use sentinel_analysis::prompts::location_keys;
use serde::Serialize;

pub const UNKNOWN_CAMERA: &str = "unknown_camera";

const STORAGE_ROOT: &str = "foscam";

/// File name prefixes and the motion trigger each one denotes.
const ALARM_PREFIXES: &[(&str, &str)] = &[
    ("MDAlarm_", "MD"),
    ("HMDAlarm_", "HMD"),
    ("MDalarm_", "MD"),
];

/// Images use a dash between date and time, recordings an underscore.
const TIMESTAMP_FORMATS: &[&str] = &["%Y%m%d-%H%M%S", "%Y%m%d_%H%M%S"];

fn path_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::RootDir => Some("/".to_string()),
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Camera name for a capture path.
pub fn extract_camera_name(path: impl AsRef<Path>) -> String {
    let parts = path_parts(path.as_ref());

    if let Some(root) = parts.iter().position(|part| part == STORAGE_ROOT) {
        if root + 2 < parts.len() {
            return format!("{}_{}", parts[root + 1], parts[root + 2]);
        }
    }

    if parts.len() >= 3 {
        return format!("{}_{}", parts[parts.len() - 3], parts[parts.len() - 2]);
    }

    UNKNOWN_CAMERA.to_string()
}

/// Camera location directory under the storage root, if the path has one.
pub fn extract_location(path: impl AsRef<Path>) -> Option<String> {
    let parts = path_parts(path.as_ref());
    let root = parts.iter().position(|part| part == STORAGE_ROOT)?;
    parts.get(root + 1).cloned()
}

/// Prompt location key contained in a camera location name.
///
/// `ami_frontyard_left` maps to `frontyard`, `dock_right` to `dock`.
pub fn location_key(location: &str) -> Option<&'static str> {
    let lower = location.to_lowercase();
    location_keys().find(|key| lower.contains(key))
}

/// Motion trigger ("MD" or "HMD") encoded in an alarm file name.
pub fn motion_trigger(file_name: &str) -> Option<&'static str> {
    ALARM_PREFIXES
        .iter()
        .find(|(prefix, _)| file_name.starts_with(prefix))
        .map(|(_, trigger)| *trigger)
}

/// Capture time encoded in an alarm file name.
pub fn parse_capture_time(file_name: &str) -> Option<NaiveDateTime> {
    let rest = ALARM_PREFIXES
        .iter()
        .find_map(|(prefix, _)| file_name.strip_prefix(prefix))?;
    let stamp = rest.split('.').next().unwrap_or(rest);

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(stamp, format).ok())
}

/// Time-of-day period key for an hour (0-23).
pub fn time_period(hour: u32) -> &'static str {
    match hour {
        5..=11 => "morning",
        12..=16 => "afternoon",
        17..=20 => "evening",
        _ => "night",
    }
}

/// Context that steers the image prompts toward a camera and time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisContext {
    pub camera_name: String,
    /// Location key from the prompt catalog
    pub location: Option<String>,
    pub time_period: Option<String>,
    /// Alert key from the prompt catalog (e.g. `person_detected`)
    pub alert_type: Option<String>,
    pub captured_at: Option<NaiveDateTime>,
    pub motion_trigger: Option<String>,
}

impl AnalysisContext {
    /// Derive everything the path encodes. The alert type is left unset.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let captured_at = parse_capture_time(&file_name);

        Self {
            camera_name: extract_camera_name(path),
            location: extract_location(path)
                .as_deref()
                .and_then(location_key)
                .map(String::from),
            time_period: captured_at.map(|at| time_period(at.hour()).to_string()),
            alert_type: None,
            captured_at,
            motion_trigger: motion_trigger(&file_name).map(String::from),
        }
    }

    pub fn with_alert_type(mut self, alert_type: impl Into<String>) -> Self {
        self.alert_type = Some(alert_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_camera_name_from_storage_layout() {
        let path = "/data/foscam/ami_frontyard_left/FoscamCamera_00626EFE8B21/snap/MDAlarm_20250101-101010.jpg";
        assert_eq!(
            extract_camera_name(path),
            "ami_frontyard_left_FoscamCamera_00626EFE8B21"
        );
    }

    #[test]
    fn test_camera_name_fallbacks() {
        assert_eq!(extract_camera_name("/mnt/dock/cam2/clip.mkv"), "dock_cam2");
        // Storage root too close to the end falls through to the generic rule
        assert_eq!(extract_camera_name("/srv/foscam/kitchen"), "srv_foscam");
        assert_eq!(extract_camera_name("clip.mkv"), UNKNOWN_CAMERA);
        assert_eq!(extract_camera_name("cams/clip.mkv"), UNKNOWN_CAMERA);
    }

    #[test]
    fn test_location_key() {
        assert_eq!(location_key("ami_frontyard_left"), Some("frontyard"));
        assert_eq!(location_key("beach_front_left"), None);
        assert_eq!(location_key("dock_right"), Some("dock"));
        assert_eq!(location_key("Kitchen"), Some("kitchen"));
        assert_eq!(location_key("den"), None);
    }

    #[test]
    fn test_parse_capture_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(18, 5, 1)
            .unwrap();
        assert_eq!(parse_capture_time("MDAlarm_20240309-180501.jpg"), Some(expected));
        assert_eq!(parse_capture_time("MDalarm_20240309_180501.mkv"), Some(expected));
        assert_eq!(parse_capture_time("HMDAlarm_20240309-180501.jpg"), Some(expected));
        assert_eq!(parse_capture_time("snapshot_20240309-180501.jpg"), None);
        assert_eq!(parse_capture_time("MDAlarm_garbage.jpg"), None);
    }

    #[test]
    fn test_motion_trigger() {
        assert_eq!(motion_trigger("HMDAlarm_20240309-180501.jpg"), Some("HMD"));
        assert_eq!(motion_trigger("MDalarm_20240309_180501.mkv"), Some("MD"));
        assert_eq!(motion_trigger("clip.mkv"), None);
    }

    #[test]
    fn test_time_period_boundaries() {
        assert_eq!(time_period(4), "night");
        assert_eq!(time_period(5), "morning");
        assert_eq!(time_period(11), "morning");
        assert_eq!(time_period(12), "afternoon");
        assert_eq!(time_period(16), "afternoon");
        assert_eq!(time_period(17), "evening");
        assert_eq!(time_period(20), "evening");
        assert_eq!(time_period(21), "night");
        assert_eq!(time_period(0), "night");
    }

    #[test]
    fn test_context_from_path() {
        let context = AnalysisContext::from_path(
            "/data/foscam/ami_frontyard_left/Cam01/snap/MDAlarm_20240309-221500.jpg",
        );
        assert_eq!(context.camera_name, "ami_frontyard_left_Cam01");
        assert_eq!(context.location.as_deref(), Some("frontyard"));
        assert_eq!(context.time_period.as_deref(), Some("night"));
        assert_eq!(context.motion_trigger.as_deref(), Some("MD"));
        assert!(context.alert_type.is_none());

        let context = context.with_alert_type("person_detected");
        assert_eq!(context.alert_type.as_deref(), Some("person_detected"));
    }

    #[test]
    fn test_context_from_unstructured_path() {
        let context = AnalysisContext::from_path("photo.png");
        assert_eq!(context.camera_name, UNKNOWN_CAMERA);
        assert!(context.location.is_none());
        assert!(context.time_period.is_none());
        assert!(context.captured_at.is_none());
    }
}
