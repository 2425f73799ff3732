use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::models::{CandidateWithPackage, Gender, Recommendation, RequirementsRecord};

const SUPPORTED_CITIES: [(&str, &str); 4] = [
    ("mumbai", "Mumbai"),
    ("delhi", "Delhi"),
    ("bangalore", "Bangalore"),
    ("bengaluru", "Bangalore"),
];

// (trigger in the request text, specialty fragment to look for)
const HEALTH_KEYWORDS: [(&str, &str); 3] = [
    ("weight loss", "weight"),
    ("lose weight", "weight"),
    ("diabet", "diabet"),
];

fn female_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bfemale\b").expect("valid regex"))
}

fn male_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bmale\b").expect("valid regex"))
}

/// Pick the highlighted candidate.
///
/// Rules run in a fixed order and each one that fires overwrites whatever an
/// earlier rule chose, so the last firing rule decides:
///
/// 1. first candidate ("best overall match")
/// 2. gender preference
/// 3. "experienced" / "senior" -> most years of experience
/// 4. supported city -> first candidate located there
/// 5. structured budget -> package price closest to the bucket target
/// 6. weight-loss / diabetes keywords -> first matching specialty
/// 7. "best rated" / "highest rated" -> highest rating
///
/// Ties always go to the earliest candidate.
pub fn rank(requirements: &RequirementsRecord, candidates: &[CandidateWithPackage]) -> Option<Recommendation> {
    let first = candidates.first()?;
    let text = requirements.search_text();

    let mut recommendation = recommend(first, "Best overall match".to_string());

    if let Some(gender) = gender_preference(requirements, &text) {
        if let Some(found) = candidates.iter().find(|c| c.candidate.gender == gender) {
            recommendation = recommend(found, format!("Matches your preference for a {} specialist", gender.as_str()));
        }
    }

    if text.contains("experienced") || text.contains("senior") {
        if let Some(most_experienced) = candidates
            .iter()
            .reduce(|best, c| if c.candidate.experience_years > best.candidate.experience_years { c } else { best })
        {
            recommendation = recommend(
                most_experienced,
                format!("Most experienced ({} years)", most_experienced.candidate.experience_years),
            );
        }
    }

    if let Some(city) = mentioned_city(&text) {
        let city_lower = city.to_lowercase();
        if let Some(local) = candidates
            .iter()
            .find(|c| c.candidate.location.to_lowercase().contains(&city_lower))
        {
            recommendation = recommend(local, format!("Located in {}", city));
        }
    }

    if let Some(budget) = requirements.structured().and_then(|fields| fields.budget_range) {
        let target = budget.target_price();
        if let Some(closest) = candidates
            .iter()
            .reduce(|best, c| if c.package.price.abs_diff(target) < best.package.price.abs_diff(target) { c } else { best })
        {
            recommendation = recommend(closest, format!("Best fit for your budget of {}", budget.label()));
        }
    }

    let keywords: Vec<&str> = HEALTH_KEYWORDS
        .iter()
        .filter(|(trigger, _)| text.contains(trigger))
        .map(|(_, specialty)| *specialty)
        .collect();
    if !keywords.is_empty() {
        if let Some((specialist, specialty)) = candidates.iter().find_map(|c| {
            keywords
                .iter()
                .find_map(|keyword| c.candidate.has_specialty_matching(keyword))
                .map(|specialty| (c, specialty.to_string()))
        }) {
            recommendation = recommend(specialist, format!("Specializes in {}", specialty));
        }
    }

    if text.contains("best rated") || text.contains("highest rated") {
        if let Some(top) = candidates
            .iter()
            .reduce(|best, c| if c.candidate.rating > best.candidate.rating { c } else { best })
        {
            recommendation = recommend(top, format!("Highest rated ({:.1}/5.0)", top.candidate.rating));
        }
    }

    debug!(
        "Recommended {} ({})",
        recommendation.recommended_candidate_id, recommendation.reason
    );
    Some(recommendation)
}

fn recommend(entry: &CandidateWithPackage, reason: String) -> Recommendation {
    Recommendation {
        recommended_candidate_id: entry.candidate.id.clone(),
        reason,
    }
}

fn gender_preference(requirements: &RequirementsRecord, text: &str) -> Option<Gender> {
    match requirements {
        RequirementsRecord::Structured(fields) => fields.gender_preference,
        RequirementsRecord::FreeText { .. } => {
            if female_pattern().is_match(text) {
                Some(Gender::Female)
            } else if male_pattern().is_match(text) {
                Some(Gender::Male)
            } else {
                None
            }
        }
    }
}

fn mentioned_city(text: &str) -> Option<&'static str> {
    SUPPORTED_CITIES
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .map(|(_, city)| *city)
}
