pub mod completeness;
pub mod lifecycle;
pub mod status;
pub mod validation;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::accounts;
use crate::config::Config;
use crate::db::audit::AuditEvent;
use crate::db::{
    self, DocumentRequirement, DocumentUpload, NewApplication, NewBankAccount, NewNextOfKin,
    NewTeamMember, OutstandingDocumentRequest, SupplierApplication, User,
};
use crate::error::AppError;
use crate::notify::{Notification, NotificationKind, NotifyHandle};

use completeness::RequirementSummary;
use status::ApplicationStatus;

const BUSINESS_TYPES: &[&str] = &["sole", "partnership", "limited", "corporation", "other"];
const GCX_PROOF_CODE: &str = "GCX_REGISTRATION_PROOF";

/// Human-shareable reference in the GCX-YYYY-NNNNNN form, checked against
/// the store for uniqueness with a UUID fallback.
pub async fn generate_tracking_code(pool: &PgPool) -> Result<String, AppError> {
    let year = Utc::now().format("%Y");
    for _ in 0..100 {
        let number: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        let code = format!("GCX-{year}-{number}");
        if !db::applications::tracking_code_exists(pool, &code).await? {
            return Ok(code);
        }
    }
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    Ok(format!("GCX-{year}-{suffix}"))
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%B %d, %Y").to_string()
}

async fn supplies_processed(
    pool: &PgPool,
    application: &SupplierApplication,
) -> Result<bool, AppError> {
    let has_processed_commodity =
        db::applications::has_processed_commodity(pool, application.id).await?;
    Ok(completeness::supplies_processed_foods(
        has_processed_commodity,
        application.other_commodities.as_deref(),
    ))
}

async fn requirement_summaries(pool: &PgPool) -> Result<Vec<RequirementSummary>, AppError> {
    Ok(db::documents::active_requirements(pool)
        .await?
        .iter()
        .map(DocumentRequirement::summary)
        .collect())
}

#[derive(Debug, Clone)]
pub struct CompletenessReport {
    pub missing: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Recompute the missing-document list and deadline, persisting the result.
/// Explicit post-condition check: callers invoke it after every mutation of
/// an undecided application; re-running with unchanged inputs is a no-op.
pub async fn refresh_completeness(
    pool: &PgPool,
    config: &Config,
    application: &SupplierApplication,
) -> Result<CompletenessReport, AppError> {
    if !application.status().can_decide() {
        return Ok(CompletenessReport {
            missing: application.missing_documents.0.clone(),
            deadline: application.document_completion_deadline,
        });
    }

    let requirements = requirement_summaries(pool).await?;
    let supplies = supplies_processed(pool, application).await?;
    let uploaded = db::applications::uploaded_requirement_ids(pool, application.id).await?;

    let missing: Vec<String> = completeness::compute_missing(&requirements, supplies, &uploaded)
        .iter()
        .map(|req| req.label.clone())
        .collect();
    let deadline = completeness::resolve_deadline(
        missing.is_empty(),
        application.document_completion_deadline,
        Utc::now(),
        config.document_completion_days,
    );

    db::applications::update_completeness(pool, application.id, &missing, deadline).await?;
    Ok(CompletenessReport { missing, deadline })
}

/// Full requirement rows currently missing for the application; the
/// snapshot an outstanding request is built from.
pub async fn missing_requirements(
    pool: &PgPool,
    application: &SupplierApplication,
) -> Result<Vec<DocumentRequirement>, AppError> {
    let requirements = db::documents::active_requirements(pool).await?;
    let summaries: Vec<RequirementSummary> =
        requirements.iter().map(DocumentRequirement::summary).collect();
    let supplies = supplies_processed(pool, application).await?;
    let uploaded = db::applications::uploaded_requirement_ids(pool, application.id).await?;

    let missing_ids: HashSet<i32> = completeness::compute_missing(&summaries, supplies, &uploaded)
        .iter()
        .map(|req| req.id)
        .collect();
    Ok(requirements
        .into_iter()
        .filter(|req| missing_ids.contains(&req.id))
        .collect())
}

/// Labels of required documents that lack a verified upload; empty means
/// the approve guard is satisfiable.
pub async fn unverified_required_labels(
    pool: &PgPool,
    application: &SupplierApplication,
) -> Result<Vec<String>, AppError> {
    let requirements = requirement_summaries(pool).await?;
    let supplies = supplies_processed(pool, application).await?;
    let verified = db::applications::verified_requirement_ids(pool, application.id).await?;

    Ok(completeness::compute_required(&requirements, supplies)
        .into_iter()
        .filter(|req| !verified.contains(&req.id))
        .map(|req| req.label.clone())
        .collect())
}

/// Staff opening the detail view moves a pending application under review;
/// any other status passes through unchanged.
pub async fn open_for_review(
    pool: &PgPool,
    application: SupplierApplication,
    actor: &User,
) -> Result<SupplierApplication, AppError> {
    if status::next_status_on_review_open(application.status()).is_none() {
        return Ok(application);
    }
    let Some(updated) = db::applications::mark_under_review(pool, application.id).await? else {
        return Ok(application);
    };

    db::audit::record(
        pool,
        AuditEvent {
            user_id: Some(actor.id),
            action: "STATUS_CHANGED",
            description: format!("Application {} moved under review", updated.tracking_code),
            model_name: "SupplierApplication",
            object_id: updated.id.to_string(),
            details: json!({
                "tracking_code": updated.tracking_code,
                "old_status": ApplicationStatus::PendingReview.as_str(),
                "new_status": ApplicationStatus::UnderReview.as_str(),
            }),
        },
    )
    .await?;
    Ok(updated)
}

#[derive(Debug)]
pub struct ApprovalOutcome {
    pub application: SupplierApplication,
    pub user_created: bool,
}

/// Approve an application: guard the transition, create the supplier
/// account when none exists, stamp the decision, audit it and queue the
/// notification. The guard failing leaves everything untouched.
pub async fn approve(
    pool: &PgPool,
    notify: &NotifyHandle,
    config: &Config,
    application_id: i32,
    actor: &User,
    comment: &str,
) -> Result<ApprovalOutcome, AppError> {
    let application = db::applications::get(pool, application_id)
        .await?
        .ok_or(AppError::NotFound("application"))?;
    let old_status = application.status();

    let unverified = unverified_required_labels(pool, &application).await?;
    status::ensure_can_approve(old_status, &unverified)?;

    let existing = db::accounts::user_by_email(pool, &application.email).await?;
    let (user, temp_password, user_created) = match existing {
        Some(user) => (user, None, false),
        None => {
            let password = accounts::generate_temp_password();
            let hash = accounts::hash_password(&password)?;
            let user = db::accounts::insert_user(
                pool,
                &application.email,
                &application.signer_name,
                &application.telephone,
                accounts::ROLE_SUPPLIER,
                &hash,
                true,
            )
            .await?;
            tracing::info!(
                "supplier account created for approved application {}",
                application.tracking_code
            );
            (user, Some(password), true)
        }
    };

    let updated = db::applications::record_decision(
        pool,
        application.id,
        ApplicationStatus::Approved.as_str(),
        comment,
        Some(user.id),
    )
    .await?;

    db::audit::record(
        pool,
        AuditEvent {
            user_id: Some(actor.id),
            action: "APPROVE_APPLICATION",
            description: format!("Application {} approved", updated.tracking_code),
            model_name: "SupplierApplication",
            object_id: updated.id.to_string(),
            details: json!({
                "tracking_code": updated.tracking_code,
                "business_name": updated.business_name,
                "old_status": old_status.as_str(),
                "new_status": updated.status,
                "reviewer_comment": comment,
                "user_created": user_created,
                "user_id": user.id,
            }),
        },
    )
    .await?;

    let mut context = json!({
        "business_name": updated.business_name,
        "tracking_code": updated.tracking_code,
        "login_link": config.login_link(),
        "user_email": user.email,
    });
    if let Some(password) = &temp_password {
        context["temp_password"] = json!(password);
    }
    notify.enqueue(Notification {
        kind: NotificationKind::Approved,
        application_id: updated.id,
        tracking_code: updated.tracking_code.clone(),
        business_name: updated.business_name.clone(),
        email: updated.email.clone(),
        telephone: updated.telephone.clone(),
        context,
    });

    Ok(ApprovalOutcome {
        application: updated,
        user_created,
    })
}

/// Reject an application with a mandatory reason.
pub async fn reject(
    pool: &PgPool,
    notify: &NotifyHandle,
    application_id: i32,
    actor: &User,
    reason: &str,
) -> Result<SupplierApplication, AppError> {
    let application = db::applications::get(pool, application_id)
        .await?
        .ok_or(AppError::NotFound("application"))?;
    let old_status = application.status();

    status::ensure_can_reject(old_status, reason)?;

    let updated = db::applications::record_decision(
        pool,
        application.id,
        ApplicationStatus::Rejected.as_str(),
        reason,
        None,
    )
    .await?;

    db::audit::record(
        pool,
        AuditEvent {
            user_id: Some(actor.id),
            action: "REJECT_APPLICATION",
            description: format!("Application {} rejected", updated.tracking_code),
            model_name: "SupplierApplication",
            object_id: updated.id.to_string(),
            details: json!({
                "tracking_code": updated.tracking_code,
                "business_name": updated.business_name,
                "old_status": old_status.as_str(),
                "new_status": updated.status,
                "reason": reason,
            }),
        },
    )
    .await?;

    notify.enqueue(Notification {
        kind: NotificationKind::Rejected,
        application_id: updated.id,
        tracking_code: updated.tracking_code.clone(),
        business_name: updated.business_name.clone(),
        email: updated.email.clone(),
        telephone: updated.telephone.clone(),
        context: json!({
            "business_name": updated.business_name,
            "tracking_code": updated.tracking_code,
            "reason": reason,
        }),
    });

    Ok(updated)
}

/// Snapshot the currently missing requirements into an outstanding request,
/// move the application under review and notify the applicant with the
/// secure completion link.
pub async fn request_documents(
    pool: &PgPool,
    notify: &NotifyHandle,
    config: &Config,
    application_id: i32,
    actor: &User,
    message: &str,
) -> Result<OutstandingDocumentRequest, AppError> {
    let application = db::applications::get(pool, application_id)
        .await?
        .ok_or(AppError::NotFound("application"))?;
    let old_status = application.status();

    status::ensure_can_request_documents(old_status)?;

    let missing = missing_requirements(pool, &application).await?;
    if missing.is_empty() {
        return Err(AppError::validation(
            "no documents are outstanding for this application",
        ));
    }
    let missing_ids: Vec<i32> = missing.iter().map(|req| req.id).collect();
    let missing_labels: Vec<String> = missing.iter().map(|req| req.label.clone()).collect();

    let message = if message.trim().is_empty() {
        "Please provide the listed documents."
    } else {
        message
    };

    let request = db::documents::insert_outstanding_request(
        pool,
        application.id,
        message,
        actor.id,
        &missing_ids,
    )
    .await?;

    let updated = db::applications::set_reviewer_comment(
        pool,
        application.id,
        ApplicationStatus::UnderReview.as_str(),
        message,
    )
    .await?;
    let report = refresh_completeness(pool, config, &updated).await?;

    db::audit::record(
        pool,
        AuditEvent {
            user_id: Some(actor.id),
            action: "REQUEST_DOCUMENTS",
            description: format!(
                "Outstanding documents requested for {}",
                updated.tracking_code
            ),
            model_name: "SupplierApplication",
            object_id: updated.id.to_string(),
            details: json!({
                "tracking_code": updated.tracking_code,
                "business_name": updated.business_name,
                "old_status": old_status.as_str(),
                "new_status": updated.status,
                "missing_documents": missing_labels,
                "outstanding_request_id": request.id,
            }),
        },
    )
    .await?;

    notify.enqueue(Notification {
        kind: NotificationKind::DocumentsRequested,
        application_id: updated.id,
        tracking_code: updated.tracking_code.clone(),
        business_name: updated.business_name.clone(),
        email: updated.email.clone(),
        telephone: updated.telephone.clone(),
        context: json!({
            "business_name": updated.business_name,
            "tracking_code": updated.tracking_code,
            "missing_documents": missing_labels,
            "message": message,
            "completion_link": config.completion_link(&updated.completion_token),
            "deadline": report.deadline.map(format_date).unwrap_or_default(),
        }),
    });

    Ok(request)
}

/// Persist an upload, audit it, then run the two post-condition checks:
/// completeness refresh and outstanding-request resolution.
#[allow(clippy::too_many_arguments)]
pub async fn record_upload(
    pool: &PgPool,
    config: &Config,
    application: &SupplierApplication,
    requirement: &DocumentRequirement,
    file_path: &str,
    original_filename: &str,
    file_size: i64,
    mime_type: &str,
) -> Result<DocumentUpload, AppError> {
    let upload = db::documents::upsert_upload(
        pool,
        application.id,
        requirement.id,
        file_path,
        original_filename,
        file_size,
        mime_type,
    )
    .await?;

    db::audit::record(
        pool,
        AuditEvent {
            user_id: None,
            action: "DOCUMENT_UPLOADED",
            description: format!(
                "{} uploaded for {}",
                requirement.label, application.tracking_code
            ),
            model_name: "DocumentUpload",
            object_id: upload.id.to_string(),
            details: json!({
                "tracking_code": application.tracking_code,
                "business_name": application.business_name,
                "requirement_code": requirement.code,
                "requirement_label": requirement.label,
                "filename": original_filename,
                "file_size": file_size,
            }),
        },
    )
    .await?;

    refresh_completeness(pool, config, application).await?;
    resolve_outstanding(pool, application).await?;

    Ok(upload)
}

/// Staff verification of an upload; confirming the GCX registration proof
/// doubles as payment confirmation.
pub async fn verify_document(
    pool: &PgPool,
    upload_id: i32,
    actor: &User,
    note: &str,
) -> Result<DocumentUpload, AppError> {
    let upload = db::documents::upload_by_id(pool, upload_id)
        .await?
        .ok_or(AppError::NotFound("document upload"))?;
    let requirement = db::documents::requirement_by_id(pool, upload.requirement_id)
        .await?
        .ok_or(AppError::NotFound("document requirement"))?;
    let application = db::applications::get(pool, upload.application_id)
        .await?
        .ok_or(AppError::NotFound("application"))?;

    let verified = db::documents::mark_verified(pool, upload.id, actor.id, note).await?;

    let action = if requirement.code == GCX_PROOF_CODE {
        "PAYMENT_CONFIRMED"
    } else {
        "VERIFY_DOCUMENT"
    };
    db::audit::record(
        pool,
        AuditEvent {
            user_id: Some(actor.id),
            action,
            description: format!(
                "{} verified for {}",
                requirement.label, application.tracking_code
            ),
            model_name: "DocumentUpload",
            object_id: verified.id.to_string(),
            details: json!({
                "tracking_code": application.tracking_code,
                "business_name": application.business_name,
                "requirement_code": requirement.code,
                "requirement_label": requirement.label,
            }),
        },
    )
    .await?;

    resolve_outstanding(pool, &application).await?;
    Ok(verified)
}

/// Resolution check: an unresolved request flips exactly once, when every
/// linked requirement has a verified upload. Returns the ids that flipped.
pub async fn resolve_outstanding(
    pool: &PgPool,
    application: &SupplierApplication,
) -> Result<Vec<i32>, AppError> {
    let requests = db::documents::unresolved_requests(pool, application.id).await?;
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let verified = db::applications::verified_requirement_ids(pool, application.id).await?;
    let mut resolved = Vec::new();
    for request in requests {
        let required = db::documents::request_requirement_ids(pool, request.id).await?;
        if completeness::is_request_satisfied(&required, &verified)
            && db::documents::mark_request_resolved(pool, request.id).await?
        {
            db::audit::record(
                pool,
                AuditEvent {
                    user_id: None,
                    action: "DOCUMENT_REQUEST_RESOLVED",
                    description: format!(
                        "All requested documents received for {}",
                        application.tracking_code
                    ),
                    model_name: "OutstandingDocumentRequest",
                    object_id: request.id.to_string(),
                    details: json!({
                        "tracking_code": application.tracking_code,
                        "business_name": application.business_name,
                    }),
                },
            )
            .await?;
            resolved.push(request.id);
        }
    }
    Ok(resolved)
}

/// Everything a public submission carries.
#[derive(Debug, serde::Deserialize)]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub application: NewApplication,
    #[serde(default)]
    pub commodity_ids: Vec<i32>,
    #[serde(default)]
    pub team_members: Vec<NewTeamMember>,
    #[serde(default)]
    pub next_of_kin: Vec<NewNextOfKin>,
    #[serde(default)]
    pub bank_accounts: Vec<NewBankAccount>,
}

fn validate_submission(payload: &SubmissionPayload) -> Result<(), AppError> {
    status::ensure_declaration_agreed(payload.application.declaration_agreed)?;

    if payload.application.business_name.trim().is_empty() {
        return Err(AppError::validation("business name is required"));
    }
    if !BUSINESS_TYPES.contains(&payload.application.business_type.as_str()) {
        return Err(AppError::validation(format!(
            "business type must be one of: {}",
            BUSINESS_TYPES.join(", ")
        )));
    }
    if !validation::is_valid_ghana_phone(&payload.application.telephone) {
        return Err(AppError::validation(
            "telephone must be a Ghana number such as 0243123456 or +233243123456",
        ));
    }

    for account in &payload.bank_accounts {
        if !validation::bank_account_name_matches(
            &payload.application.business_name,
            &account.account_name,
        ) {
            return Err(AppError::validation(format!(
                "account name '{}' must match the business name '{}'",
                account.account_name, payload.application.business_name
            )));
        }
        if !(1..=2).contains(&account.account_index) {
            return Err(AppError::validation("bank account index must be 1 or 2"));
        }
    }

    for member in &payload.team_members {
        if member.telephone.is_empty() && member.email.is_empty() {
            return Err(AppError::validation(format!(
                "team member {} needs a telephone number or an email address",
                member.full_name
            )));
        }
        if !member.telephone.is_empty() && !validation::is_valid_ghana_phone(&member.telephone) {
            return Err(AppError::validation(format!(
                "team member {} has an invalid Ghana telephone number",
                member.full_name
            )));
        }
        if !member.id_card_type.is_empty() && member.id_card_number.is_empty() {
            return Err(AppError::validation(format!(
                "team member {} specifies an ID card type without a number",
                member.full_name
            )));
        }
    }

    for kin in &payload.next_of_kin {
        if !validation::is_valid_ghana_phone(&kin.mobile) {
            return Err(AppError::validation(format!(
                "next of kin {} has an invalid Ghana mobile number",
                kin.full_name
            )));
        }
    }

    Ok(())
}

/// Public submission: validate, create the aggregate, run the completeness
/// check, audit and queue the confirmation.
pub async fn submit_application(
    pool: &PgPool,
    notify: &NotifyHandle,
    config: &Config,
    payload: &SubmissionPayload,
) -> Result<(SupplierApplication, CompletenessReport), AppError> {
    validate_submission(payload)?;

    if db::applications::email_exists(pool, &payload.application.email).await? {
        return Err(AppError::Conflict(format!(
            "an application already exists for {}",
            payload.application.email
        )));
    }

    let commodity_ids: Vec<i32> = payload
        .commodity_ids
        .iter()
        .copied()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    if !commodity_ids.is_empty() {
        let known = db::reference::commodities_by_ids(pool, &commodity_ids).await?;
        if known.len() != commodity_ids.len() {
            return Err(AppError::validation("one or more commodity ids are unknown"));
        }
    }

    let tracking_code = generate_tracking_code(pool).await?;
    let completion_token = Uuid::new_v4();

    let application = db::applications::insert(
        pool,
        &payload.application,
        &tracking_code,
        completion_token,
        &commodity_ids,
        &payload.team_members,
        &payload.next_of_kin,
        &payload.bank_accounts,
    )
    .await?;

    let report = refresh_completeness(pool, config, &application).await?;

    db::audit::record(
        pool,
        AuditEvent {
            user_id: None,
            action: "APPLICATION_CREATED",
            description: format!("Application {tracking_code} submitted"),
            model_name: "SupplierApplication",
            object_id: application.id.to_string(),
            details: json!({
                "tracking_code": tracking_code,
                "business_name": application.business_name,
                "missing_documents": report.missing,
            }),
        },
    )
    .await?;

    notify.enqueue(Notification {
        kind: NotificationKind::SubmissionReceived,
        application_id: application.id,
        tracking_code: application.tracking_code.clone(),
        business_name: application.business_name.clone(),
        email: application.email.clone(),
        telephone: application.telephone.clone(),
        context: json!({
            "business_name": application.business_name,
            "tracking_code": application.tracking_code,
            "application_date": format_date(application.created_at),
            "missing_documents": report.missing,
            "completion_link": config.completion_link(&application.completion_token),
            "deadline": report.deadline.map(format_date).unwrap_or_default(),
        }),
    });

    let application = db::applications::get(pool, application.id)
        .await?
        .unwrap_or(application);
    Ok((application, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::status::TransitionError;

    fn payload() -> SubmissionPayload {
        SubmissionPayload {
            application: NewApplication {
                business_name: "Kumasi Grains Ltd".to_string(),
                business_type: "limited".to_string(),
                registration_number: "CS-2020-1234".to_string(),
                tin_number: "C0001234567".to_string(),
                physical_address: "Plot 4, Adum".to_string(),
                city: "Kumasi".to_string(),
                postal_code: "AK-039".to_string(),
                country: "Ghana".to_string(),
                region_id: 2,
                telephone: "0243123456".to_string(),
                email: "owner@kumasigrains.gh".to_string(),
                other_commodities: None,
                warehouse_location: "Asafo market warehouse".to_string(),
                declaration_agreed: true,
                data_consent: true,
                signer_name: "Akosua Mensah".to_string(),
                signer_designation: "Managing Director".to_string(),
            },
            commodity_ids: vec![1, 2],
            team_members: Vec::new(),
            next_of_kin: Vec::new(),
            bank_accounts: Vec::new(),
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(validate_submission(&payload()).is_ok());
    }

    #[test]
    fn submission_requires_declaration() {
        let mut p = payload();
        p.application.declaration_agreed = false;
        match validate_submission(&p) {
            Err(AppError::Transition(TransitionError::DeclarationNotAgreed)) => {}
            other => panic!("expected declaration error, got {other:?}"),
        }
    }

    #[test]
    fn submission_rejects_bad_phone() {
        let mut p = payload();
        p.application.telephone = "12345".to_string();
        assert!(matches!(
            validate_submission(&p),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn submission_rejects_unknown_business_type() {
        let mut p = payload();
        p.application.business_type = "charity".to_string();
        assert!(matches!(
            validate_submission(&p),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn bank_account_name_must_match_business() {
        let mut p = payload();
        p.bank_accounts.push(NewBankAccount {
            bank_name: "GCB Bank".to_string(),
            branch: "Adum".to_string(),
            account_name: "Someone Else".to_string(),
            account_number: "1234567890".to_string(),
            account_index: 1,
        });
        assert!(matches!(
            validate_submission(&p),
            Err(AppError::Validation(_))
        ));

        p.bank_accounts[0].account_name = "KUMASI GRAINS LTD".to_string();
        assert!(validate_submission(&p).is_ok());
    }

    #[test]
    fn team_member_needs_a_contact_channel() {
        let mut p = payload();
        p.team_members.push(NewTeamMember {
            full_name: "Yaw Boateng".to_string(),
            position: "Logistics".to_string(),
            years_experience: Some(4),
            address: "Asokwa".to_string(),
            city: "Kumasi".to_string(),
            country: "Ghana".to_string(),
            region_id: 2,
            telephone: String::new(),
            email: String::new(),
            id_card_type: String::new(),
            id_card_number: String::new(),
        });
        assert!(matches!(
            validate_submission(&p),
            Err(AppError::Validation(_))
        ));

        p.team_members[0].email = "yaw@kumasigrains.gh".to_string();
        assert!(validate_submission(&p).is_ok());
    }
}
