use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::{CandidateList, ProviderError, RequirementsRecord};
use crate::services::catalog::{ProviderCatalog, ServiceKind};
use crate::services::generator::generate_candidates;
use crate::services::ranking::rank;

/// Generates and ranks candidates for one service request.
#[derive(Debug, Clone)]
pub struct QuoteService {
    catalog: ProviderCatalog,
    session_rate: u64,
}

impl QuoteService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            catalog: ProviderCatalog::new(),
            session_rate: config.session_rate,
        }
    }

    pub fn resolve_service(&self, service: &str) -> Result<ServiceKind, ProviderError> {
        service.parse()
    }

    /// Candidate review contents for a submitted requirements record.
    pub fn quote(&self, service: ServiceKind, requirements: RequirementsRecord) -> CandidateList {
        debug!("Quoting {} for {:?}", service, requirements);

        let seeds = self.catalog.seeds_for(service);
        let generated = generate_candidates(&requirements, service.display_name(), &seeds, self.session_rate);
        let recommendation = rank(&requirements, &generated);

        info!(
            "Quoted {} candidates for {}, recommended {:?}",
            generated.len(),
            service,
            recommendation.as_ref().map(|r| r.recommended_candidate_id.as_str())
        );

        CandidateList::new(service.slug().to_string(), requirements, generated, recommendation)
    }

    /// The "see all packages" view: default plan, no preferences.
    pub fn all_packages(&self, service: ServiceKind) -> CandidateList {
        self.quote(service, RequirementsRecord::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetRange, Gender, ListedCandidate, PlanDuration, StructuredRequirements};

    fn service() -> QuoteService {
        QuoteService::new(&AppConfig::default())
    }

    fn recommended(list: &CandidateList) -> &ListedCandidate {
        list.candidates.iter().find(|listed| listed.recommended).unwrap()
    }

    #[test]
    fn test_all_packages_marks_exactly_one_recommended() {
        let list = service().all_packages(ServiceKind::Physiotherapy);
        assert_eq!(list.candidates.len(), 4);
        assert_eq!(list.candidates.iter().filter(|c| c.recommended).count(), 1);
        assert_eq!(recommended(&list).entry.candidate.id, "pt-1");
        assert_eq!(
            recommended(&list).recommendation_reason.as_deref(),
            Some("Best overall match")
        );
    }

    #[test]
    fn test_dietician_budget_scenario() {
        let requirements = RequirementsRecord::Structured(StructuredRequirements {
            duration: "3 months".parse::<PlanDuration>().unwrap(),
            sessions_per_week: 2,
            gender_preference: Some(Gender::Female),
            budget_range: Some("₹5,000 - ₹10,000".parse::<BudgetRange>().unwrap()),
            ..Default::default()
        });

        let list = service().quote(ServiceKind::Dietician, requirements);

        assert!(list.candidates.len() <= 4);
        assert!(list.candidates.iter().all(|c| c.entry.package.session_count == 24));

        let target = 7500u64;
        let closest = list
            .candidates
            .iter()
            .map(|c| c.entry.package.price.abs_diff(target))
            .min()
            .unwrap();
        assert_eq!(recommended(&list).entry.package.price.abs_diff(target), closest);
        assert_eq!(list.find("dt-3").map(|c| c.candidate.name.as_str()), Some("Dr. Anita Desai"));
    }

    #[test]
    fn test_unknown_service_is_rejected() {
        assert!(service().resolve_service("astrology").is_err());
    }
}
