//! Keyword tables.
//!
//! Every table is an ordered slice of `(category, keywords)`. Declaration
//! order is significant: classifiers scan categories and keywords in the
//! order written here.

use sentinel_models::{AlertTag, EventType};

/// Ordered category table.
pub type KeywordTable = &'static [(&'static str, &'static [&'static str])];

pub const ACTIVITY_KEYWORDS: KeywordTable = &[
    ("movement", &["walking", "running", "moving", "approaching", "leaving", "entering", "exiting"]),
    ("delivery", &["delivering", "dropping off", "picking up", "carrying", "package", "box"]),
    ("vehicles", &["driving", "parking", "backing up", "pulling in", "arriving", "departing"]),
    ("interaction", &["talking", "meeting", "greeting", "conversation", "handshake"]),
    ("suspicious", &["lurking", "hiding", "sneaking", "loitering", "prowling", "trespassing"]),
    ("maintenance", &["working", "repairing", "cleaning", "servicing", "installing"]),
];

pub const ENVIRONMENT_KEYWORDS: KeywordTable = &[
    ("time", &["morning", "afternoon", "evening", "night", "dawn", "dusk", "daylight", "dark"]),
    ("weather", &["sunny", "cloudy", "rainy", "foggy", "clear", "overcast", "storm"]),
    ("location", &["residential", "commercial", "parking", "driveway", "street", "yard", "dock", "marina"]),
    ("lighting", &["bright", "dim", "shadows", "illuminated", "dark", "lit up", "spotlight"]),
];

/// Alert keyword groups in emission order.
pub const ALERT_KEYWORDS: &[(AlertTag, &[&str])] = &[
    (AlertTag::PersonDetected, &["person", "people", "individual", "man", "woman", "child", "adult", "human"]),
    (AlertTag::VehicleDetected, &["vehicle", "car", "truck", "van", "motorcycle", "bike", "automobile"]),
    (AlertTag::PackageDetected, &["package", "delivery", "box", "bag", "container", "parcel"]),
    (AlertTag::UnusualActivity, &["suspicious", "unusual", "unexpected", "strange", "odd", "abnormal"]),
    (AlertTag::NightTime, &["night", "dark", "darkness", "evening", "late"]),
];

pub const VEHICLE_MAKES: &[&str] = &[
    "ford", "chevrolet", "toyota", "honda", "nissan", "bmw", "mercedes", "audi", "hyundai", "kia",
];
pub const VEHICLE_TYPES: &[&str] = &[
    "sedan", "suv", "truck", "van", "coupe", "hatchback", "convertible", "pickup",
];
pub const VEHICLE_COLORS: &[&str] = &[
    "white", "black", "gray", "silver", "red", "blue", "green", "yellow", "brown",
];
pub const VEHICLE_COMMERCIAL: &[&str] = &[
    "delivery", "ups", "fedex", "amazon", "dhl", "usps", "utility", "service",
];
pub const VEHICLE_FEATURES: &[&str] = &[
    "license plate", "bumper", "hood", "door", "window", "tire", "rim", "headlight",
];

pub const PERSON_CLOTHING: &[&str] = &[
    "shirt", "pants", "dress", "jacket", "coat", "hat", "cap", "uniform", "suit",
];
pub const PERSON_COLORS: &[&str] = &[
    "black", "white", "red", "blue", "green", "yellow", "brown", "gray", "pink",
];
pub const PERSON_ACCESSORIES: &[&str] = &[
    "bag", "backpack", "hat", "glasses", "watch", "phone", "keys", "umbrella",
];
pub const PERSON_BUILD: &[&str] = &["tall", "short", "thin", "heavy", "medium", "large", "small"];
pub const PERSON_HAIR: &[&str] = &[
    "blonde", "brown", "black", "gray", "red", "long", "short", "curly", "straight",
];

pub const COMPANY_KEYWORDS: KeywordTable = &[
    ("delivery", &["ups", "fedex", "amazon", "dhl", "usps", "delivery", "express", "shipping"]),
    ("utilities", &["electric", "gas", "water", "cable", "internet", "phone", "utility"]),
    ("services", &["cleaning", "lawn", "pest", "security", "maintenance", "repair", "service"]),
    ("food", &["pizza", "restaurant", "food", "catering", "uber", "doordash", "grubhub"]),
];

pub const CHANGE_KEYWORDS: KeywordTable = &[
    ("appearance", &["appears", "emerges", "shows up", "comes into view", "arrives"]),
    ("disappearance", &["disappears", "vanishes", "leaves", "exits", "goes away"]),
    ("movement", &["moves", "shifts", "changes position", "relocates", "travels"]),
    ("activity", &["starts", "begins", "stops", "ends", "continues", "resumes"]),
];

/// Event categories in priority order; the first hit wins.
pub const EVENT_TYPES: &[(EventType, &[&str])] = &[
    (EventType::PersonEnters, &["person enters", "person appears", "person arrives", "person comes"]),
    (EventType::PersonExits, &["person exits", "person leaves", "person disappears", "person goes"]),
    (EventType::VehicleArrives, &["vehicle arrives", "car arrives", "truck arrives", "vehicle appears"]),
    (EventType::VehicleLeaves, &["vehicle leaves", "car leaves", "truck leaves", "vehicle disappears"]),
    (EventType::ActivityStarts, &["starts", "begins", "activity begins", "movement starts"]),
    (EventType::ActivityStops, &["stops", "ends", "activity ends", "movement stops"]),
    (EventType::SceneChange, &["different", "changed", "new scene", "scene changes"]),
    (EventType::NoChange, &["no change", "same", "similar", "unchanged"]),
];

/// Relevance phrases, most severe first.
pub const SECURITY_RELEVANCE: KeywordTable = &[
    ("high", &["unknown person", "suspicious activity", "forced entry", "breaking", "damage"]),
    ("medium", &["delivery", "visitor", "service person", "maintenance", "package"]),
    ("low", &["routine activity", "normal behavior", "expected visitor", "regular pattern"]),
];

/// Security description terms reported first.
pub const HIGH_PRIORITY_TERMS: &[&str] = &[
    "person", "individual", "vehicle", "suspicious", "unusual", "unauthorized",
];

/// Security description terms reported after the high-priority ones.
pub const MEDIUM_PRIORITY_TERMS: &[&str] = &["delivery", "package", "visitor", "service"];

/// First keyword of `keywords` contained in the lower-cased `text`.
pub fn first_match(text_lower: &str, keywords: &[&'static str]) -> Option<&'static str> {
    keywords.iter().copied().find(|keyword| text_lower.contains(keyword))
}

/// Every keyword of `keywords` contained in the lower-cased `text`, in table order.
pub fn all_matches(text_lower: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    keywords
        .iter()
        .copied()
        .filter(|keyword| text_lower.contains(keyword))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lower_case() {
        let tables: &[KeywordTable] = &[
            ACTIVITY_KEYWORDS,
            ENVIRONMENT_KEYWORDS,
            COMPANY_KEYWORDS,
            CHANGE_KEYWORDS,
            SECURITY_RELEVANCE,
        ];
        let keywords = tables
            .iter()
            .flat_map(|table| table.iter().flat_map(|(_, k)| k.iter()))
            .chain(ALERT_KEYWORDS.iter().flat_map(|(_, k)| k.iter()))
            .chain(EVENT_TYPES.iter().flat_map(|(_, k)| k.iter()));

        for keyword in keywords {
            assert_eq!(*keyword, keyword.to_lowercase());
        }
    }

    #[test]
    fn test_alert_groups_follow_tag_order() {
        let tags: Vec<AlertTag> = ALERT_KEYWORDS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, AlertTag::ALL.to_vec());
    }

    #[test]
    fn test_first_and_all_matches() {
        let text = "a black jacket and a red cap";
        assert_eq!(first_match(text, PERSON_CLOTHING), Some("jacket"));
        assert_eq!(all_matches(text, PERSON_CLOTHING), vec!["jacket", "cap"]);
        assert_eq!(first_match("nothing here", PERSON_CLOTHING), None);
    }
}
