//! Identification details extracted from the identification aspects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Vehicle attributes mentioned in an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Commercial marking such as a carrier name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl VehicleDetails {
    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.vehicle_type.is_none()
            && self.color.is_none()
            && self.commercial.is_none()
            && self.features.is_empty()
    }
}

/// Person attributes mentioned in an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PersonDetails {
    #[serde(default)]
    pub clothing: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair: Option<String>,
}

impl PersonDetails {
    pub fn is_empty(&self) -> bool {
        self.clothing.is_empty()
            && self.colors.is_empty()
            && self.accessories.is_empty()
            && self.build.is_none()
            && self.hair.is_none()
    }
}

/// Combined identification details for one image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IdentificationDetails {
    pub vehicle: VehicleDetails,
    pub person: PersonDetails,
    /// Company keywords, at most one per company category
    #[serde(default)]
    pub companies: Vec<String>,
}

impl IdentificationDetails {
    pub fn is_empty(&self) -> bool {
        self.vehicle.is_empty() && self.person.is_empty() && self.companies.is_empty()
    }
}
