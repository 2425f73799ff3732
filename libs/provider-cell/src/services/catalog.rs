use std::fmt;
use std::str::FromStr;

use crate::models::{Candidate, Gender, ProviderError};

/// Supplementary services that can be quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Dietician,
    Physiotherapy,
    Yoga,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [ServiceKind::Dietician, ServiceKind::Physiotherapy, ServiceKind::Yoga];

    pub fn slug(&self) -> &'static str {
        match self {
            ServiceKind::Dietician => "dietician",
            ServiceKind::Physiotherapy => "physiotherapy",
            ServiceKind::Yoga => "yoga",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Dietician => "Dietician",
            ServiceKind::Physiotherapy => "Physiotherapy",
            ServiceKind::Yoga => "Yoga Instructor",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ServiceKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "dietician" | "dietitian" | "nutritionist" | "nutrition" => Ok(ServiceKind::Dietician),
            "physiotherapy" | "physiotherapist" | "physio" => Ok(ServiceKind::Physiotherapy),
            "yoga" | "yoga-instructor" => Ok(ServiceKind::Yoga),
            _ => Err(ProviderError::UnknownService(s.to_string())),
        }
    }
}

/// Static seed roster standing in for a provider backend.
#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog;

impl ProviderCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn seeds_for(&self, service: ServiceKind) -> Vec<Candidate> {
        match service {
            ServiceKind::Dietician => vec![
                seed(
                    "dt-1", "Dr. Priya Sharma", 4.9, 234, 12, "Mumbai", Gender::Female,
                    &["M.Sc Clinical Nutrition", "Registered Dietitian"],
                    &["English", "Hindi", "Marathi"],
                    &["Weight Loss", "Diabetes Management", "Sports Nutrition"],
                    true,
                ),
                seed(
                    "dt-2", "Dr. Rajesh Kumar", 4.7, 189, 8, "Delhi", Gender::Male,
                    &["M.Sc Food Science", "Certified Diabetes Educator"],
                    &["English", "Hindi", "Punjabi"],
                    &["Clinical Nutrition", "Heart Health", "Diabetes Care"],
                    true,
                ),
                seed(
                    "dt-3", "Dr. Anita Desai", 4.8, 156, 15, "Bangalore", Gender::Female,
                    &["Ph.D Nutrition", "Registered Dietitian"],
                    &["English", "Kannada", "Hindi"],
                    &["PCOS Management", "Weight Loss", "Pregnancy Nutrition"],
                    false,
                ),
                seed(
                    "dt-4", "Dr. Vikram Singh", 4.95, 312, 6, "Delhi", Gender::Male,
                    &["M.Sc Sports Nutrition"],
                    &["English", "Hindi"],
                    &["Sports Nutrition", "Muscle Gain", "Gut Health"],
                    true,
                ),
            ],
            ServiceKind::Physiotherapy => vec![
                seed(
                    "pt-1", "Dr. Arjun Mehta", 4.8, 201, 11, "Mumbai", Gender::Male,
                    &["MPT Orthopaedics"],
                    &["English", "Hindi", "Gujarati"],
                    &["Sports Injury", "Back Pain", "Post-Surgery Rehab"],
                    true,
                ),
                seed(
                    "pt-2", "Dr. Kavya Reddy", 4.9, 143, 7, "Bangalore", Gender::Female,
                    &["MPT Neurology"],
                    &["English", "Telugu", "Kannada"],
                    &["Stroke Rehab", "Balance Training"],
                    true,
                ),
                seed(
                    "pt-3", "Dr. Sameer Khan", 4.6, 98, 14, "Delhi", Gender::Male,
                    &["BPT", "Certified Manual Therapist"],
                    &["English", "Hindi", "Urdu"],
                    &["Geriatric Care", "Arthritis", "Weight Loss Support"],
                    false,
                ),
                seed(
                    "pt-4", "Dr. Neha Joshi", 4.85, 176, 9, "Pune", Gender::Female,
                    &["MPT Cardiopulmonary"],
                    &["English", "Marathi", "Hindi"],
                    &["Cardiac Rehab", "Diabetes Exercise Therapy"],
                    true,
                ),
            ],
            ServiceKind::Yoga => vec![
                seed(
                    "yg-1", "Meera Iyer", 4.9, 287, 10, "Bangalore", Gender::Female,
                    &["RYT 500", "M.A. Yoga Therapy"],
                    &["English", "Tamil", "Kannada"],
                    &["Therapeutic Yoga", "Prenatal Yoga", "Weight Loss"],
                    true,
                ),
                seed(
                    "yg-2", "Rohan Verma", 4.7, 165, 13, "Delhi", Gender::Male,
                    &["RYT 500"],
                    &["English", "Hindi"],
                    &["Power Yoga", "Diabetes Yoga Therapy"],
                    true,
                ),
                seed(
                    "yg-3", "Sunita Rao", 4.8, 120, 18, "Mumbai", Gender::Female,
                    &["RYT 200", "Ayurveda Diploma"],
                    &["English", "Marathi", "Hindi"],
                    &["Meditation", "Senior Citizen Yoga"],
                    false,
                ),
                seed(
                    "yg-4", "Karan Malhotra", 4.6, 74, 4, "Mumbai", Gender::Male,
                    &["RYT 200"],
                    &["English", "Hindi"],
                    &["Vinyasa", "Flexibility"],
                    true,
                ),
            ],
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    name: &str,
    rating: f32,
    review_count: u32,
    experience_years: u32,
    location: &str,
    gender: Gender,
    qualifications: &[&str],
    languages: &[&str],
    specialties: &[&str],
    negotiation_enabled: bool,
) -> Candidate {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
        rating,
        review_count,
        experience_years,
        location: location.to_string(),
        gender,
        qualifications: owned(qualifications),
        languages: owned(languages),
        specialties: owned(specialties),
        negotiation_enabled,
    }
}
