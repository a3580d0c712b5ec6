//! Prompt catalog.
//!
//! Static question tables used to fan one image out into several aspects.
//! Context tables (location, time period, alert type) contribute at most one
//! extra aspect each, and only for keys they know; unknown keys are ignored.

use sentinel_models::aspect::{
    ACTIVITIES, ALERT_CONTEXT, CHANGE_DETECTION, COMPANY_LOGOS, DISTINCTIVE_FEATURES,
    ENVIRONMENT, GENERAL, IDENTIFICATION, LICENSE_PLATES, LOCATION_CONTEXT, OBJECTS,
    PACKAGES_DELIVERIES, PEOPLE, PERSON_IDENTIFICATION, READABLE_TEXT, SCENE_SUMMARY, SECURITY,
    TIMELINE_DESCRIPTION, TIME_CONTEXT, VEHICLES, VEHICLE_DETAILS,
};
use sentinel_models::PromptSet;

/// Maximum characters of the previous scene quoted in a comparison prompt.
pub const PREVIOUS_SCENE_CONTEXT_CHARS: usize = 100;

/// Standard image aspects, general first.
pub const IMAGE_ANALYSIS_PROMPTS: &[(&str, &str)] = &[
    (GENERAL, "Question: What is happening in this image? Describe the scene in detail. Answer:"),
    (SECURITY, "Question: From a security perspective, what security-relevant elements, people, vehicles, or activities can you identify in this image? Answer:"),
    (IDENTIFICATION, "Question: What specific identifying information can you extract from this image? Include vehicle details (make, model, color, license plates), person descriptions (clothing, physical features), company logos, text, signs, or any other distinguishing features. Answer:"),
    (VEHICLES, "Question: If there are any vehicles in this image, describe them in detail including make, model, color, type, license plate numbers, company markings, logos, or any text visible on the vehicle. Answer:"),
    (PEOPLE, "Question: If there are people in this image, describe their clothing, physical appearance, what they are carrying, and any distinguishing features that could help identify them. Answer:"),
    (OBJECTS, "Question: What objects, items, packages, signs, or text can you identify in this image? Include any readable text, logos, or markings. Answer:"),
    (ACTIVITIES, "Question: What activities, movements, or behaviors are occurring in this image? Answer:"),
    (ENVIRONMENT, "Question: What is the environmental context? Describe the location, time of day, weather conditions, and setting. Answer:"),
];

/// Identification aspects, always appended after the context aspects.
pub const SECURITY_IDENTIFICATION_PROMPTS: &[(&str, &str)] = &[
    (LICENSE_PLATES, "Question: Are there any license plates visible in this image? If so, describe the text, numbers, state, or any other details you can see. Answer:"),
    (VEHICLE_DETAILS, "Question: For any vehicles present, describe in detail: make, model, year (if identifiable), color, body type, any damage or distinctive features, company logos, decals, or text. Answer:"),
    (PERSON_IDENTIFICATION, "Question: For any people present, describe: clothing colors and styles, physical build, hair color/style, accessories, what they are carrying, and any distinctive features. Answer:"),
    (COMPANY_LOGOS, "Question: Are there any company logos, business names, or commercial text visible on vehicles, uniforms, packages, or signs? Describe them in detail. Answer:"),
    (READABLE_TEXT, "Question: What text, numbers, or writing can you read in this image? Include signs, labels, license plates, vehicle text, or any other readable content. Answer:"),
    (PACKAGES_DELIVERIES, "Question: Are there any packages, boxes, or delivery items visible? Describe their size, color, shape, and any logos or text on them. Answer:"),
    (DISTINCTIVE_FEATURES, "Question: What are the most distinctive or unusual features in this image that would help identify this scene, person, or vehicle later? Answer:"),
];

/// Alert-focused prompts keyed by lower-case alert name.
pub const ALERT_SPECIFIC_PROMPTS: &[(&str, &str)] = &[
    ("person_detected", "Question: Focus on the person(s) in this image. Describe their appearance, clothing, what they are doing, and any identifying features. Answer:"),
    ("vehicle_detected", "Question: Focus on the vehicle(s) in this image. Describe make, model, color, license plate, and any company markings or distinctive features. Answer:"),
    ("package_detected", "Question: Focus on the package or delivery item. Describe its size, color, shape, any logos or text, and the delivery context. Answer:"),
    ("unusual_activity", "Question: What makes this activity unusual or suspicious? Describe the specific behaviors or elements that stand out. Answer:"),
    ("night_time", "Question: This is a nighttime scene. What can you identify despite the low light conditions? Focus on any visible details. Answer:"),
];

/// Camera location prompts.
pub const LOCATION_SPECIFIC_PROMPTS: &[(&str, &str)] = &[
    ("frontyard", "Question: This is a front yard security camera. Focus on visitors, deliveries, vehicles, and any activity near the entrance. Answer:"),
    ("backyard", "Question: This is a backyard security camera. Focus on any unusual activity, people, or access attempts in the private area. Answer:"),
    ("driveway", "Question: This is a driveway security camera. Focus on vehicles, their details, and any loading/unloading activity. Answer:"),
    ("dock", "Question: This is a dock security camera. Focus on boats, water activity, people on the dock, and any marine-related activity. Answer:"),
    ("kitchen", "Question: This is an indoor kitchen security camera. Focus on any people, activity, or unusual events in the home. Answer:"),
    ("general", "Question: Analyze this security camera footage for any notable activity, people, vehicles, or events. Answer:"),
];

/// Time-of-day prompts.
pub const TIME_BASED_PROMPTS: &[(&str, &str)] = &[
    ("morning", "Question: This is morning footage. Focus on typical morning activities, deliveries, and commuting patterns. Answer:"),
    ("afternoon", "Question: This is afternoon footage. Focus on any mid-day activities, service visits, or unusual events. Answer:"),
    ("evening", "Question: This is evening footage. Focus on evening activities, arrivals, and any unusual late-day events. Answer:"),
    ("night", "Question: This is nighttime footage. Focus on any activity during sleeping hours, which may be more significant. Answer:"),
];

/// Prompts for the first sampled frame of a video.
pub const FIRST_FRAME_PROMPTS: &[(&str, &str)] = &[
    (SCENE_SUMMARY, "Question: What is the initial scene at the beginning of this video? Describe the setting, main elements, and any people or objects present. Answer:"),
    (TIMELINE_DESCRIPTION, "Question: This is the opening scene of a video. What is happening and what should we watch for? Answer:"),
    (CHANGE_DETECTION, "Question: What key elements are present in this initial scene that might change later? Answer:"),
];

/// Prompts for every later sampled frame.
pub const SUBSEQUENT_FRAME_PROMPTS: &[(&str, &str)] = &[
    (SCENE_SUMMARY, "Question: What is currently happening in this scene? Focus on the main activity and any people or objects. Answer:"),
    (TIMELINE_DESCRIPTION, "Question: Compared to the previous scene, what has changed or is different in this current scene? Focus only on new events or changes. Answer:"),
    (CHANGE_DETECTION, "Question: What specific changes, movements, or new events can you identify in this scene? Answer:"),
];

/// Known camera location keys, in table order.
pub fn location_keys() -> impl Iterator<Item = &'static str> {
    LOCATION_SPECIFIC_PROMPTS.iter().map(|(key, _)| *key)
}


fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, prompt)| *prompt)
}

/// Build the image prompt set for an optional location, time period and alert type.
pub fn get_analysis_prompts(
    location: Option<&str>,
    time_period: Option<&str>,
    alert_type: Option<&str>,
) -> PromptSet {
    let mut prompts: PromptSet = IMAGE_ANALYSIS_PROMPTS.iter().copied().collect();

    if let Some(prompt) = location.and_then(|key| lookup(LOCATION_SPECIFIC_PROMPTS, key)) {
        prompts.insert(LOCATION_CONTEXT, prompt);
    }
    if let Some(prompt) = time_period.and_then(|key| lookup(TIME_BASED_PROMPTS, key)) {
        prompts.insert(TIME_CONTEXT, prompt);
    }
    if let Some(prompt) = alert_type.and_then(|key| lookup(ALERT_SPECIFIC_PROMPTS, key)) {
        prompts.insert(ALERT_CONTEXT, prompt);
    }

    for (aspect, prompt) in SECURITY_IDENTIFICATION_PROMPTS {
        prompts.insert(*aspect, *prompt);
    }

    prompts
}

/// Build the three-aspect prompt set for a timeline frame.
///
/// Later frames quote up to [`PREVIOUS_SCENE_CONTEXT_CHARS`] characters of
/// the previous scene in the timeline description prompt.
pub fn get_timeline_prompts(is_first_frame: bool, previous_scene: Option<&str>) -> PromptSet {
    if is_first_frame {
        return FIRST_FRAME_PROMPTS.iter().copied().collect();
    }

    let mut prompts: PromptSet = SUBSEQUENT_FRAME_PROMPTS.iter().copied().collect();
    if let Some(previous) = previous_scene.filter(|s| !s.is_empty()) {
        let excerpt: String = previous.chars().take(PREVIOUS_SCENE_CONTEXT_CHARS).collect();
        prompts.insert(
            TIMELINE_DESCRIPTION,
            format!(
                "Question: Compared to the previous scene: '{}...', what has changed or is different in this current scene? Focus only on new events or changes. Answer:",
                excerpt
            ),
        );
    }
    prompts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts_have_standard_and_identification_aspects() {
        let prompts = get_analysis_prompts(None, None, None);
        assert_eq!(prompts.len(), 15);

        let aspects: Vec<&str> = prompts.aspects().collect();
        assert_eq!(aspects[0], GENERAL);
        assert_eq!(aspects[7], ENVIRONMENT);
        assert_eq!(aspects[8], LICENSE_PLATES);
        assert!(!prompts.contains(LOCATION_CONTEXT));
    }

    #[test]
    fn test_known_context_keys_are_injected_before_identification() {
        let prompts = get_analysis_prompts(Some("driveway"), Some("night"), Some("vehicle_detected"));
        assert_eq!(prompts.len(), 18);

        let aspects: Vec<&str> = prompts.aspects().collect();
        assert_eq!(&aspects[8..11], &[LOCATION_CONTEXT, TIME_CONTEXT, ALERT_CONTEXT]);
        assert!(prompts.get(LOCATION_CONTEXT).unwrap().contains("driveway"));
        assert!(prompts.get(TIME_CONTEXT).unwrap().contains("nighttime"));
    }

    #[test]
    fn test_unknown_context_keys_are_ignored() {
        let prompts = get_analysis_prompts(Some("garage"), Some("midnight"), Some("fire"));
        assert_eq!(prompts, get_analysis_prompts(None, None, None));
    }

    #[test]
    fn test_first_frame_prompts() {
        let prompts = get_timeline_prompts(true, Some("ignored"));
        let aspects: Vec<&str> = prompts.aspects().collect();
        assert_eq!(aspects, vec![SCENE_SUMMARY, TIMELINE_DESCRIPTION, CHANGE_DETECTION]);
        assert!(prompts.get(TIMELINE_DESCRIPTION).unwrap().contains("opening scene"));
    }

    #[test]
    fn test_subsequent_prompt_embeds_truncated_previous_scene() {
        let previous = "x".repeat(150);
        let prompts = get_timeline_prompts(false, Some(&previous));
        let prompt = prompts.get(TIMELINE_DESCRIPTION).unwrap();

        assert!(prompt.contains(&format!("'{}...'", "x".repeat(100))));
        assert!(!prompt.contains(&"x".repeat(101)));
    }

    #[test]
    fn test_subsequent_prompt_without_previous_scene_is_generic() {
        let prompts = get_timeline_prompts(false, Some(""));
        assert_eq!(
            prompts.get(TIMELINE_DESCRIPTION),
            Some(SUBSEQUENT_FRAME_PROMPTS[1].1)
        );
    }

    #[test]
    fn test_previous_scene_truncation_respects_char_boundaries() {
        let previous = "é".repeat(120);
        let prompts = get_timeline_prompts(false, Some(&previous));
        assert!(prompts
            .get(TIMELINE_DESCRIPTION)
            .unwrap()
            .contains(&"é".repeat(100)));
    }
}
