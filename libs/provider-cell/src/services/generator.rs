use chrono::Weekday;
use tracing::debug;

use crate::models::{Candidate, CandidateWithPackage, Package, RequirementsRecord};

const PACKAGE_DISCOUNT: f64 = 0.8;
const SENIORITY_MULTIPLIER: f64 = 1.2;
const TOP_RATED_MULTIPLIER: f64 = 1.1;
const SENIORITY_THRESHOLD_YEARS: u32 = 10;
const TOP_RATED_THRESHOLD: f32 = 4.8;

/// Derive a priced package for every eligible seed candidate.
///
/// A structured gender preference filters the roster, unless nobody matches,
/// in which case the full roster is kept so the review step is never empty.
pub fn generate_candidates(
    requirements: &RequirementsRecord,
    service_name: &str,
    seeds: &[Candidate],
    session_rate: u64,
) -> Vec<CandidateWithPackage> {
    let eligible = filter_by_gender(requirements, seeds);
    let (duration, sessions_per_week) = requirements.plan();
    let session_count = sessions_per_week.saturating_mul(duration.weeks());
    let schedule = schedule_text(requirements, sessions_per_week);
    let description = description_text(requirements, service_name);

    debug!(
        "Generating {} packages for {} ({} sessions)",
        eligible.len(),
        service_name,
        session_count
    );

    eligible
        .into_iter()
        .map(|candidate| {
            let (price, original_price) = price_for(&candidate, session_count, session_rate);
            CandidateWithPackage {
                package: Package {
                    duration,
                    session_count,
                    price,
                    original_price,
                    savings: original_price - price,
                    schedule: schedule.clone(),
                    description: description.clone(),
                },
                candidate,
            }
        })
        .collect()
}

fn filter_by_gender(requirements: &RequirementsRecord, seeds: &[Candidate]) -> Vec<Candidate> {
    let Some(gender) = requirements.structured().and_then(|fields| fields.gender_preference) else {
        return seeds.to_vec();
    };

    let filtered: Vec<Candidate> = seeds.iter().filter(|c| c.gender == gender).cloned().collect();
    if filtered.is_empty() {
        debug!("No {} candidates available, keeping full roster", gender.as_str());
        seeds.to_vec()
    } else {
        filtered
    }
}

/// Returns `(price, original_price)`, both rounded to whole rupees.
fn price_for(candidate: &Candidate, session_count: u32, session_rate: u64) -> (u64, u64) {
    let base = f64::from(session_count) * session_rate as f64;

    let mut multiplier = 1.0;
    if candidate.experience_years > SENIORITY_THRESHOLD_YEARS {
        multiplier *= SENIORITY_MULTIPLIER;
    }
    if candidate.rating > TOP_RATED_THRESHOLD {
        multiplier *= TOP_RATED_MULTIPLIER;
    }

    let original = (base * multiplier).round() as u64;
    let price = (base * PACKAGE_DISCOUNT * multiplier).round() as u64;
    (price.min(original), original)
}

fn schedule_text(requirements: &RequirementsRecord, sessions_per_week: u32) -> String {
    let days = requirements
        .structured()
        .map(|fields| fields.preferred_days.as_slice())
        .unwrap_or_default();

    if days.is_empty() {
        return "Flexible scheduling available".to_string();
    }

    let mut ordered: Vec<Weekday> = days.to_vec();
    ordered.sort_by_key(|day| day.num_days_from_monday());
    ordered.dedup();

    let names = ordered.iter().map(|day| day_name(*day)).collect::<Vec<_>>().join(", ");
    format!("{} sessions per week on {}", sessions_per_week, names)
}

fn description_text(requirements: &RequirementsRecord, service_name: &str) -> String {
    match requirements.structured().map(|fields| fields.health_goals.trim()) {
        Some(goals) if !goals.is_empty() => format!("Personalized plan focused on: {}", goals),
        _ => format!(
            "Comprehensive {} program tailored to your health needs",
            service_name.to_lowercase()
        ),
    }
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
