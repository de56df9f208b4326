use serde::{Deserialize, Serialize};

/// Lifecycle of a supplier application.
///
/// PENDING_REVIEW -> UNDER_REVIEW -> {APPROVED, REJECTED}. Stored as TEXT
/// in the database; `as_str`/`parse` are the only mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    PendingReview,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingReview => "PENDING_REVIEW",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING_REVIEW" => Some(Self::PendingReview),
            "UNDER_REVIEW" => Some(Self::UnderReview),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingReview => "Pending Review",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Whether a staff decision (approve/reject/request documents) is still open.
    pub const fn can_decide(self) -> bool {
        matches!(self, Self::PendingReview | Self::UnderReview)
    }

    pub const fn is_decided(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} an application in status {}", .current.as_str())]
    InvalidStatus {
        current: ApplicationStatus,
        action: &'static str,
    },
    #[error("required documents are not yet verified: {}", .0.join(", "))]
    UnverifiedDocuments(Vec<String>),
    #[error("a rejection reason is required")]
    MissingReason,
    #[error("the declaration must be agreed before submission")]
    DeclarationNotAgreed,
}

/// Approval is allowed from PENDING_REVIEW or UNDER_REVIEW, and only once
/// every required document has a verified upload.
pub fn ensure_can_approve(
    current: ApplicationStatus,
    unverified_required: &[String],
) -> Result<(), TransitionError> {
    if !current.can_decide() {
        return Err(TransitionError::InvalidStatus {
            current,
            action: "approve",
        });
    }
    if !unverified_required.is_empty() {
        return Err(TransitionError::UnverifiedDocuments(
            unverified_required.to_vec(),
        ));
    }
    Ok(())
}

/// Rejection is allowed from PENDING_REVIEW or UNDER_REVIEW and requires a
/// non-empty reason.
pub fn ensure_can_reject(current: ApplicationStatus, reason: &str) -> Result<(), TransitionError> {
    if !current.can_decide() {
        return Err(TransitionError::InvalidStatus {
            current,
            action: "reject",
        });
    }
    if reason.trim().is_empty() {
        return Err(TransitionError::MissingReason);
    }
    Ok(())
}

pub fn ensure_can_request_documents(current: ApplicationStatus) -> Result<(), TransitionError> {
    if !current.can_decide() {
        return Err(TransitionError::InvalidStatus {
            current,
            action: "request documents for",
        });
    }
    Ok(())
}

pub fn ensure_declaration_agreed(agreed: bool) -> Result<(), TransitionError> {
    if agreed {
        Ok(())
    } else {
        Err(TransitionError::DeclarationNotAgreed)
    }
}

/// Opening the detail view moves a pending application under review; any
/// other status is left untouched.
pub fn next_status_on_review_open(current: ApplicationStatus) -> Option<ApplicationStatus> {
    match current {
        ApplicationStatus::PendingReview => Some(ApplicationStatus::UnderReview),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ApplicationStatus::PendingReview,
            ApplicationStatus::UnderReview,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("SUBMITTED"), None);
    }

    #[test]
    fn approve_requires_open_status() {
        for status in [ApplicationStatus::Approved, ApplicationStatus::Rejected] {
            match ensure_can_approve(status, &[]) {
                Err(TransitionError::InvalidStatus { current, action }) => {
                    assert_eq!(current, status);
                    assert_eq!(action, "approve");
                }
                other => panic!("expected invalid status, got {other:?}"),
            }
        }
    }

    #[test]
    fn approve_requires_verified_documents() {
        let unverified = vec!["VAT Certificate".to_string()];
        match ensure_can_approve(ApplicationStatus::UnderReview, &unverified) {
            Err(TransitionError::UnverifiedDocuments(docs)) => {
                assert_eq!(docs, unverified);
            }
            other => panic!("expected unverified documents, got {other:?}"),
        }
        assert!(ensure_can_approve(ApplicationStatus::UnderReview, &[]).is_ok());
        assert!(ensure_can_approve(ApplicationStatus::PendingReview, &[]).is_ok());
    }

    #[test]
    fn reject_requires_reason() {
        assert_eq!(
            ensure_can_reject(ApplicationStatus::PendingReview, "  "),
            Err(TransitionError::MissingReason)
        );
        assert!(ensure_can_reject(ApplicationStatus::UnderReview, "incomplete records").is_ok());
        assert!(matches!(
            ensure_can_reject(ApplicationStatus::Approved, "late"),
            Err(TransitionError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn review_open_only_moves_pending() {
        assert_eq!(
            next_status_on_review_open(ApplicationStatus::PendingReview),
            Some(ApplicationStatus::UnderReview)
        );
        for status in [
            ApplicationStatus::UnderReview,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(next_status_on_review_open(status), None);
        }
    }

    #[test]
    fn declaration_gate() {
        assert!(ensure_declaration_agreed(true).is_ok());
        assert_eq!(
            ensure_declaration_agreed(false),
            Err(TransitionError::DeclarationNotAgreed)
        );
    }
}
