use chrono::Weekday;

use provider_cell::{
    BudgetRange, Gender, PlanDuration, ProviderError, RequirementsRecord, StructuredRequirements, SESSIONS_PER_WEEK,
};

use crate::error::CaptureError;
use crate::models::StructuredForm;

/// Sentence appended to the free-text draft by the simulated voice input.
pub const VOICE_FILL_SENTENCE: &str =
    "I need a certified specialist for 3 months, twice a week, preferably in the evenings.";

/// Whether the free-text submit action is enabled.
pub fn can_submit_free_text(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Turn the structured form into a requirements record. Only duration and
/// sessions per week are required; blank optional fields are dropped.
pub fn submit_structured(form: &StructuredForm) -> Result<RequirementsRecord, CaptureError> {
    if form.duration.trim().is_empty() {
        return Err(CaptureError::MissingField("duration"));
    }
    if form.sessions_per_week.trim().is_empty() {
        return Err(CaptureError::MissingField("sessions_per_week"));
    }

    let duration: PlanDuration = form.duration.parse().map_err(invalid)?;
    let sessions_per_week = form
        .sessions_per_week
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| SESSIONS_PER_WEEK.contains(n))
        .ok_or_else(|| CaptureError::InvalidField {
            field: "sessions_per_week",
            value: form.sessions_per_week.clone(),
        })?;

    let mut preferred_days = Vec::with_capacity(form.preferred_days.len());
    for day in &form.preferred_days {
        let parsed = day.trim().parse::<Weekday>().map_err(|_| CaptureError::InvalidField {
            field: "preferred_days",
            value: day.clone(),
        })?;
        if !preferred_days.contains(&parsed) {
            preferred_days.push(parsed);
        }
    }

    let gender_preference = non_blank(&form.gender_preference)
        .map(|raw| raw.parse::<Gender>())
        .transpose()
        .map_err(invalid)?;
    let budget_range = non_blank(&form.budget_range)
        .map(|raw| raw.parse::<BudgetRange>())
        .transpose()
        .map_err(invalid)?;

    Ok(RequirementsRecord::Structured(StructuredRequirements {
        duration,
        sessions_per_week,
        preferred_days,
        gender_preference,
        budget_range,
        health_goals: form.health_goals.trim().to_string(),
        specific_requirements: form.specific_requirements.trim().to_string(),
    }))
}

pub fn submit_free_text(text: &str) -> Result<RequirementsRecord, CaptureError> {
    if !can_submit_free_text(text) {
        return Err(CaptureError::EmptyText);
    }

    Ok(RequirementsRecord::FreeText {
        raw_text: text.trim().to_string(),
    })
}

/// Append the voice sentence to whatever the user already typed.
pub fn append_voice_text(draft: &str) -> String {
    if draft.trim().is_empty() {
        VOICE_FILL_SENTENCE.to_string()
    } else {
        format!("{} {}", draft.trim_end(), VOICE_FILL_SENTENCE)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(err: ProviderError) -> CaptureError {
    match err {
        ProviderError::InvalidField { field, value } => CaptureError::InvalidField { field, value },
        other => CaptureError::InvalidField {
            field: "form",
            value: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn form(duration: &str, sessions: &str) -> StructuredForm {
        StructuredForm {
            duration: duration.to_string(),
            sessions_per_week: sessions.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_structured_requires_duration_and_sessions() {
        assert_matches!(submit_structured(&form("", "2")), Err(CaptureError::MissingField("duration")));
        assert_matches!(
            submit_structured(&form("3 months", "")),
            Err(CaptureError::MissingField("sessions_per_week"))
        );
    }

    #[test]
    fn test_structured_optional_fields() {
        let mut input = form("3 months", "2");
        input.preferred_days = vec!["Monday".to_string(), "wed".to_string(), "Mon".to_string()];
        input.gender_preference = Some("Female".to_string());
        input.budget_range = Some("₹5,000 - ₹10,000".to_string());
        input.health_goals = "  weight loss ".to_string();

        let record = submit_structured(&input).unwrap();
        let fields = record.structured().unwrap();
        assert_eq!(fields.sessions_per_week, 2);
        assert_eq!(fields.preferred_days, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(fields.gender_preference, Some(Gender::Female));
        assert_eq!(fields.budget_range, Some(BudgetRange::From5kTo10k));
        assert_eq!(fields.health_goals, "weight loss");
    }

    #[test]
    fn test_blank_optional_fields_are_ignored() {
        let mut input = form("1 month", "3");
        input.gender_preference = Some("   ".to_string());
        input.budget_range = Some(String::new());

        let record = submit_structured(&input).unwrap();
        let fields = record.structured().unwrap();
        assert_eq!(fields.gender_preference, None);
        assert_eq!(fields.budget_range, None);
    }

    #[test]
    fn test_invalid_values_name_the_field() {
        for sessions in ["nine", "0", "8", "4294967296"] {
            assert_matches!(
                submit_structured(&form("3 months", sessions)),
                Err(CaptureError::InvalidField { field: "sessions_per_week", .. })
            );
        }
        assert_matches!(
            submit_structured(&form("forever", "2")),
            Err(CaptureError::InvalidField { field: "duration", .. })
        );

        let mut input = form("3 months", "2");
        input.preferred_days = vec!["Someday".to_string()];
        assert_matches!(
            submit_structured(&input),
            Err(CaptureError::InvalidField { field: "preferred_days", .. })
        );
    }

    #[test]
    fn test_free_text_requires_content() {
        assert_matches!(submit_free_text("   \n"), Err(CaptureError::EmptyText));
        assert_eq!(
            submit_free_text("  need a coach ").unwrap(),
            RequirementsRecord::FreeText { raw_text: "need a coach".to_string() }
        );
    }

    #[test]
    fn test_voice_text_appends() {
        assert_eq!(append_voice_text(""), VOICE_FILL_SENTENCE);
        assert_eq!(append_voice_text("Hello "), format!("Hello {}", VOICE_FILL_SENTENCE));
    }
}
