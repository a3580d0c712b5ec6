//! Scene analysis engine.
//!
//! Pure, table-driven building blocks shared by the image and video paths:
//! - [`prompts`]: the aspect prompt catalog
//! - [`keywords`]: static keyword tables
//! - [`classify`]: free text to typed signals
//! - [`identification`]: vehicle, person and company details
//! - [`scoring`]: image and timeline confidence
//! - [`synthesis`]: the comprehensive description

pub mod classify;
pub mod identification;
pub mod keywords;
pub mod prompts;
pub mod scoring;
pub mod synthesis;

pub use classify::{
    alert_tags_for_text, classify_event_type, classify_security_level, extract_activities,
    extract_changes, extract_environment_info, extract_object_counts,
    extract_security_relevance, generate_alert_tags, SecurityLevel,
};
pub use identification::{
    extract_companies, extract_identification, extract_person_details, extract_vehicle_details,
};
pub use prompts::{get_analysis_prompts, get_timeline_prompts};
pub use scoring::ScoringConfig;
pub use synthesis::{synthesize, synthesize_with, Synthesis};
