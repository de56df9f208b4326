use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

/// Requirement code whose required-ness is conditional on the commodities
/// an applicant supplies.
pub const FDA_REQUIREMENT_CODE: &str = "FDA_CERT_PROCESSED_FOOD";

/// Free-text commodity terms that imply processed food. Inherited keyword
/// heuristic; see DESIGN.md before extending.
pub const PROCESSED_FOOD_KEYWORDS: &[&str] = &["tom brown", "palm oil"];

/// The slice of a `document_requirements` row the completeness check needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementSummary {
    pub id: i32,
    pub code: String,
    pub label: String,
    pub is_required: bool,
    pub is_active: bool,
}

/// True when any selected commodity is flagged as processed food, or the
/// free-text "other commodities" field mentions a known processed-food term.
pub fn supplies_processed_foods(
    has_processed_commodity: bool,
    other_commodities: Option<&str>,
) -> bool {
    if has_processed_commodity {
        return true;
    }
    match other_commodities {
        Some(text) => {
            let text = text.to_lowercase();
            PROCESSED_FOOD_KEYWORDS.iter().any(|term| text.contains(term))
        }
        None => false,
    }
}

/// The set of requirements this application must satisfy: every active
/// `is_required` requirement, plus the FDA certificate when the
/// processed-food rule fires.
pub fn compute_required(
    requirements: &[RequirementSummary],
    supplies_processed: bool,
) -> Vec<&RequirementSummary> {
    requirements
        .iter()
        .filter(|req| req.is_active)
        .filter(|req| req.is_required || (supplies_processed && req.code == FDA_REQUIREMENT_CODE))
        .collect()
}

/// Missing = required minus uploaded. Pure and idempotent: the same inputs
/// always produce the same list, in requirement order.
pub fn compute_missing<'a>(
    requirements: &'a [RequirementSummary],
    supplies_processed: bool,
    uploaded_requirement_ids: &HashSet<i32>,
) -> Vec<&'a RequirementSummary> {
    compute_required(requirements, supplies_processed)
        .into_iter()
        .filter(|req| !uploaded_requirement_ids.contains(&req.id))
        .collect()
}

/// Deadline policy: a pending application with missing documents gets a
/// completion deadline if it has none yet; once nothing is missing the
/// deadline is cleared.
pub fn resolve_deadline(
    missing_is_empty: bool,
    current_deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window_days: i64,
) -> Option<DateTime<Utc>> {
    if missing_is_empty {
        None
    } else {
        current_deadline.or_else(|| Some(now + Duration::days(window_days)))
    }
}

/// A completion token stays valid while no deadline is set or the deadline
/// lies in the future.
pub fn is_completion_token_valid(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match deadline {
        None => true,
        Some(deadline) => now <= deadline,
    }
}

/// An outstanding document request is satisfied once every linked
/// requirement has a verified upload.
pub fn is_request_satisfied(
    requested_requirement_ids: &HashSet<i32>,
    verified_requirement_ids: &HashSet<i32>,
) -> bool {
    requested_requirement_ids.is_subset(verified_requirement_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(id: i32, code: &str, required: bool, active: bool) -> RequirementSummary {
        RequirementSummary {
            id,
            code: code.to_string(),
            label: code.replace('_', " "),
            is_required: required,
            is_active: active,
        }
    }

    fn catalogue() -> Vec<RequirementSummary> {
        vec![
            requirement(1, "BUSINESS_REGISTRATION_DOCS", true, true),
            requirement(2, "VAT_CERTIFICATE", true, true),
            requirement(3, "TAX_CLEARANCE_CERT", true, false),
            requirement(4, FDA_REQUIREMENT_CODE, false, true),
        ]
    }

    #[test]
    fn processed_food_detection() {
        assert!(supplies_processed_foods(true, None));
        assert!(supplies_processed_foods(false, Some("Tom Brown and shea butter")));
        assert!(supplies_processed_foods(false, Some("refined PALM OIL")));
        assert!(!supplies_processed_foods(false, Some("groundnuts")));
        assert!(!supplies_processed_foods(false, None));
    }

    #[test]
    fn required_set_skips_inactive_and_optional() {
        let reqs = catalogue();
        let required = compute_required(&reqs, false);
        let ids: Vec<i32> = required.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn fda_requirement_joins_when_rule_fires() {
        let reqs = catalogue();
        let ids: Vec<i32> = compute_required(&reqs, true).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn missing_is_required_minus_uploaded() {
        let reqs = catalogue();
        let uploaded: HashSet<i32> = [1].into_iter().collect();
        let missing: Vec<i32> = compute_missing(&reqs, false, &uploaded)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(missing, vec![2]);
    }

    #[test]
    fn missing_computation_is_idempotent() {
        let reqs = catalogue();
        let uploaded: HashSet<i32> = [2].into_iter().collect();
        let first: Vec<i32> = compute_missing(&reqs, true, &uploaded)
            .iter()
            .map(|r| r.id)
            .collect();
        let second: Vec<i32> = compute_missing(&reqs, true, &uploaded)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_required_catalogue_yields_empty_missing() {
        let reqs = vec![requirement(9, "OPTIONAL_EXTRA", false, true)];
        assert!(compute_missing(&reqs, false, &HashSet::new()).is_empty());
    }

    #[test]
    fn deadline_set_once_and_cleared_when_complete() {
        let now = Utc::now();
        let deadline = resolve_deadline(false, None, now, 30);
        assert_eq!(deadline, Some(now + Duration::days(30)));

        // An existing deadline is not pushed out by later saves.
        let kept = resolve_deadline(false, deadline, now + Duration::days(5), 30);
        assert_eq!(kept, deadline);

        assert_eq!(resolve_deadline(true, deadline, now, 30), None);
    }

    #[test]
    fn completion_token_validity_tracks_deadline() {
        let now = Utc::now();
        assert!(is_completion_token_valid(None, now));
        assert!(is_completion_token_valid(Some(now + Duration::hours(1)), now));
        assert!(!is_completion_token_valid(Some(now - Duration::hours(1)), now));
    }

    #[test]
    fn request_resolution_needs_every_requirement_verified() {
        let requested: HashSet<i32> = [2, 4].into_iter().collect();
        let one_of_two: HashSet<i32> = [2].into_iter().collect();
        assert!(!is_request_satisfied(&requested, &one_of_two));

        let both: HashSet<i32> = [2, 4, 7].into_iter().collect();
        assert!(is_request_satisfied(&requested, &both));
    }
}
