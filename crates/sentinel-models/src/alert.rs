//! Alert tag models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Security-relevant flag derived from answer text by keyword matching.
///
/// Variants are declared in detection order; `Ord` is alphabetical by name
/// so sorted collections list tags the way summaries print them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertTag {
    PersonDetected,
    VehicleDetected,
    PackageDetected,
    UnusualActivity,
    NightTime,
}

impl AlertTag {
    /// All tags in detection order.
    pub const ALL: [AlertTag; 5] = [
        AlertTag::PersonDetected,
        AlertTag::VehicleDetected,
        AlertTag::PackageDetected,
        AlertTag::UnusualActivity,
        AlertTag::NightTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonDetected => "PERSON_DETECTED",
            Self::VehicleDetected => "VEHICLE_DETECTED",
            Self::PackageDetected => "PACKAGE_DETECTED",
            Self::UnusualActivity => "UNUSUAL_ACTIVITY",
            Self::NightTime => "NIGHT_TIME",
        }
    }

    /// Lower-case key used by the alert prompt table (e.g. `person_detected`).
    pub fn prompt_key(&self) -> &'static str {
        match self {
            Self::PersonDetected => "person_detected",
            Self::VehicleDetected => "vehicle_detected",
            Self::PackageDetected => "package_detected",
            Self::UnusualActivity => "unusual_activity",
            Self::NightTime => "night_time",
        }
    }

    /// High-value tags raise image confidence.
    pub fn is_high_value(&self) -> bool {
        matches!(self, Self::PersonDetected | Self::VehicleDetected)
    }
}

impl PartialOrd for AlertTag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AlertTag {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl std::fmt::Display for AlertTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s) || tag.prompt_key() == s)
            .ok_or_else(|| format!("Unknown alert tag: {}", s))
    }
}

/// Join tags with `", "` for display.
pub fn join_tags<'a>(tags: impl IntoIterator<Item = &'a AlertTag>) -> String {
    tags.into_iter()
        .map(AlertTag::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
