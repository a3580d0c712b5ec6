//! Identification details from the identification aspects.

use sentinel_models::aspect::{COMPANY_LOGOS, PEOPLE, PERSON_IDENTIFICATION, VEHICLES, VEHICLE_DETAILS};
use sentinel_models::{AspectResult, IdentificationDetails, PersonDetails, VehicleDetails};

use crate::keywords::{
    all_matches, first_match, COMPANY_KEYWORDS, PERSON_ACCESSORIES, PERSON_BUILD, PERSON_CLOTHING,
    PERSON_COLORS, PERSON_HAIR, VEHICLE_COLORS, VEHICLE_COMMERCIAL, VEHICLE_FEATURES,
    VEHICLE_MAKES, VEHICLE_TYPES,
};

fn owned(keyword: Option<&str>) -> Option<String> {
    keyword.map(str::to_string)
}

fn owned_all(keywords: Vec<&str>) -> Vec<String> {
    keywords.into_iter().map(str::to_string).collect()
}

pub fn extract_vehicle_details(text: &str) -> VehicleDetails {
    let lower = text.to_lowercase();
    VehicleDetails {
        make: owned(first_match(&lower, VEHICLE_MAKES)),
        vehicle_type: owned(first_match(&lower, VEHICLE_TYPES)),
        color: owned(first_match(&lower, VEHICLE_COLORS)),
        commercial: owned(first_match(&lower, VEHICLE_COMMERCIAL)),
        features: owned_all(all_matches(&lower, VEHICLE_FEATURES)),
    }
}

pub fn extract_person_details(text: &str) -> PersonDetails {
    let lower = text.to_lowercase();
    PersonDetails {
        clothing: owned_all(all_matches(&lower, PERSON_CLOTHING)),
        colors: owned_all(all_matches(&lower, PERSON_COLORS)),
        accessories: owned_all(all_matches(&lower, PERSON_ACCESSORIES)),
        build: owned(first_match(&lower, PERSON_BUILD)),
        hair: owned(first_match(&lower, PERSON_HAIR)),
    }
}

/// First company keyword per company category.
pub fn extract_companies(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    COMPANY_KEYWORDS
        .iter()
        .filter_map(|(_, keywords)| first_match(&lower, keywords))
        .map(str::to_string)
        .collect()
}

fn joined(results: &AspectResult, aspects: &[&str]) -> Option<String> {
    let texts: Vec<&str> = aspects.iter().filter_map(|a| results.text(a)).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join(" "))
    }
}

/// Build identification details from the vehicle, person and logo answers.
///
/// Returns `None` when none of those aspects was answered.
pub fn extract_identification(results: &AspectResult) -> Option<IdentificationDetails> {
    let vehicle_text = joined(results, &[VEHICLE_DETAILS, VEHICLES]);
    let person_text = joined(results, &[PERSON_IDENTIFICATION, PEOPLE]);
    let company_text = joined(results, &[COMPANY_LOGOS]);

    if vehicle_text.is_none() && person_text.is_none() && company_text.is_none() {
        return None;
    }

    Some(IdentificationDetails {
        vehicle: vehicle_text
            .as_deref()
            .map(extract_vehicle_details)
            .unwrap_or_default(),
        person: person_text
            .as_deref()
            .map(extract_person_details)
            .unwrap_or_default(),
        companies: company_text
            .as_deref()
            .map(extract_companies)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_models::aspect::GENERAL;
    use sentinel_models::AspectOutcome;

    #[test]
    fn test_vehicle_details() {
        let details = extract_vehicle_details(
            "A white Ford van with a UPS logo, dented bumper and a visible license plate",
        );
        assert_eq!(details.make.as_deref(), Some("ford"));
        assert_eq!(details.vehicle_type.as_deref(), Some("van"));
        assert_eq!(details.color.as_deref(), Some("white"));
        assert_eq!(details.commercial.as_deref(), Some("ups"));
        assert_eq!(details.features, vec!["license plate", "bumper"]);
    }

    #[test]
    fn test_person_details() {
        let details = extract_person_details(
            "A tall man in a blue jacket and black cap, carrying a backpack, curly hair",
        );
        assert_eq!(details.clothing, vec!["jacket", "cap"]);
        assert_eq!(details.colors, vec!["black", "blue"]);
        assert_eq!(details.accessories, vec!["backpack"]);
        assert_eq!(details.build.as_deref(), Some("tall"));
        assert_eq!(details.hair.as_deref(), Some("black"));
    }

    #[test]
    fn test_companies_one_per_category() {
        let companies = extract_companies("An Amazon delivery van and a pizza restaurant sign");
        assert_eq!(companies, vec!["amazon", "pizza"]);
    }

    #[test]
    fn test_extract_identification_none_without_answers() {
        let results: AspectResult = vec![
            (GENERAL, AspectOutcome::answered("A quiet porch")),
            (VEHICLE_DETAILS, AspectOutcome::failed(VEHICLE_DETAILS, "timeout")),
        ]
        .into_iter()
        .collect();
        assert_eq!(extract_identification(&results), None);
    }

    #[test]
    fn test_extract_identification_combines_aspects() {
        let results: AspectResult = vec![
            (VEHICLES, AspectOutcome::answered("a red sedan")),
            (VEHICLE_DETAILS, AspectOutcome::answered("Toyota with a FedEx decal")),
            (PEOPLE, AspectOutcome::answered("a person in a green coat")),
        ]
        .into_iter()
        .collect();

        let details = extract_identification(&results).unwrap();
        assert_eq!(details.vehicle.make.as_deref(), Some("toyota"));
        assert_eq!(details.vehicle.vehicle_type.as_deref(), Some("sedan"));
        assert_eq!(details.vehicle.color.as_deref(), Some("red"));
        assert_eq!(details.vehicle.commercial.as_deref(), Some("fedex"));
        assert_eq!(details.person.clothing, vec!["coat"]);
        assert!(details.companies.is_empty());
    }
}
