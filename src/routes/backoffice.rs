use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::accounts::StaffUser;
use crate::db::{self, contracts::NewContract};
use crate::error::AppError;
use crate::pdf::{self, DocumentLine};
use crate::state::AppState;
use crate::storage;
use crate::workflow::lifecycle::{ensure_transition, LifecycleEntity};
use crate::workflow::{self, status::ApplicationStatus};

fn file_response(
    path: &std::path::Path,
    download_name: &str,
    inline: bool,
) -> Result<Response, AppError> {
    let content = std::fs::read(path)?;
    let mime = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    let disposition = if inline { "inline" } else { "attachment" };

    Response::builder()
        .header("Content-Type", mime)
        .header(
            "Content-Disposition",
            format!("{disposition}; filename=\"{download_name}\""),
        )
        .body(Body::from(content))
        .map_err(|e| AppError::internal(format!("failed to build file response: {e}")))
}

/// Dashboard counters: totals per status.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
) -> Result<impl IntoResponse, AppError> {
    let counts = db::applications::status_counts(state.pool.as_ref()).await?;
    let total: i64 = counts.iter().map(|(_, count)| count).sum();

    let count_for = |status: ApplicationStatus| {
        counts
            .iter()
            .find(|(s, _)| s == status.as_str())
            .map(|(_, count)| *count)
            .unwrap_or(0)
    };

    Ok(Json(json!({
        "total_applications": total,
        "pending_count": count_for(ApplicationStatus::PendingReview),
        "review_count": count_for(ApplicationStatus::UnderReview),
        "approved_count": count_for(ApplicationStatus::Approved),
        "rejected_count": count_for(ApplicationStatus::Rejected),
    })))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub region_id: Option<i32>,
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(status) = &query.status {
        if ApplicationStatus::parse(status).is_none() {
            return Err(AppError::validation(format!("unknown status filter: {status}")));
        }
    }

    let per_page = query.per_page.clamp(1, 100);
    let filter = db::applications::ApplicationFilter {
        status: query.status.clone(),
        region_id: query.region_id,
        search: query
            .search
            .clone()
            .filter(|s| !s.trim().is_empty()),
        limit: per_page,
        offset: (query.page.max(1) - 1) * per_page,
    };
    let applications = db::applications::list(state.pool.as_ref(), &filter).await?;

    Ok(Json(json!({
        "page": query.page.max(1),
        "per_page": per_page,
        "applications": applications,
    })))
}

/// Detail view. Opening a pending application flips it under review as a
/// side effect of the read.
pub async fn application_detail(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let application = db::applications::get(pool, id)
        .await?
        .ok_or(AppError::NotFound("application"))?;
    let application = workflow::open_for_review(pool, application, &staff).await?;

    let team_members = db::applications::team_members(pool, application.id).await?;
    let next_of_kin = db::applications::next_of_kin(pool, application.id).await?;
    let bank_accounts = db::applications::bank_accounts(pool, application.id).await?;
    let commodities = db::applications::commodities(pool, application.id).await?;
    let requests = db::documents::requests_for_application(pool, application.id).await?;

    let requirements = db::documents::active_requirements(pool).await?;
    let uploads = db::documents::uploads_for_application(pool, application.id).await?;
    let document_status: Vec<serde_json::Value> = requirements
        .iter()
        .map(|req| {
            let upload = uploads.iter().find(|u| u.requirement_id == req.id);
            json!({
                "requirement_id": req.id,
                "code": req.code,
                "label": req.label,
                "is_required": req.is_required,
                "upload": upload,
            })
        })
        .collect();

    let unverified = workflow::unverified_required_labels(pool, &application).await?;
    let status = application.status();
    let can_approve = status.can_decide() && unverified.is_empty();

    Ok(Json(json!({
        "application": application,
        "team_members": team_members,
        "next_of_kin": next_of_kin,
        "bank_accounts": bank_accounts,
        "commodities": commodities,
        "document_status": document_status,
        "outstanding_requests": requests,
        "unverified_documents": unverified,
        "can_approve": can_approve,
        "can_reject": status.can_decide(),
        "can_request_documents": status.can_decide(),
    })))
}

/// Soft delete: the row is flagged, never removed.
pub async fn delete_application(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let application = db::applications::get(pool, id)
        .await?
        .ok_or(AppError::NotFound("application"))?;

    db::applications::soft_delete(pool, application.id).await?;
    db::audit::record(
        pool,
        db::audit::AuditEvent {
            user_id: Some(staff.id),
            action: "APPLICATION_UPDATED",
            description: format!("Application {} soft-deleted", application.tracking_code),
            model_name: "SupplierApplication",
            object_id: application.id.to_string(),
            details: json!({
                "tracking_code": application.tracking_code,
                "soft_deleted": true,
            }),
        },
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize, Default)]
pub struct DecisionPayload {
    #[serde(default)]
    pub comment: String,
}

pub async fn approve_application(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let comment = payload.map(|Json(p)| p.comment).unwrap_or_default();
    let outcome = workflow::approve(
        state.pool.as_ref(),
        &state.notify,
        &state.config,
        id,
        &staff,
        &comment,
    )
    .await?;

    Ok(Json(json!({
        "tracking_code": outcome.application.tracking_code,
        "status": outcome.application.status,
        "user_created": outcome.user_created,
    })))
}

#[derive(Deserialize, Default)]
pub struct RejectPayload {
    #[serde(default)]
    pub reason: String,
}

pub async fn reject_application(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
    payload: Option<Json<RejectPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let reason = payload.map(|Json(p)| p.reason).unwrap_or_default();
    let application =
        workflow::reject(state.pool.as_ref(), &state.notify, id, &staff, &reason).await?;

    Ok(Json(json!({
        "tracking_code": application.tracking_code,
        "status": application.status,
    })))
}

#[derive(Deserialize, Default)]
pub struct RequestDocumentsPayload {
    #[serde(default)]
    pub message: String,
}

pub async fn request_documents(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
    payload: Option<Json<RequestDocumentsPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let message = payload.map(|Json(p)| p.message).unwrap_or_default();
    let request = workflow::request_documents(
        state.pool.as_ref(),
        &state.notify,
        &state.config,
        id,
        &staff,
        &message,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "request": request }))))
}

#[derive(Deserialize, Default)]
pub struct VerifyPayload {
    #[serde(default)]
    pub note: String,
}

pub async fn verify_document(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
    payload: Option<Json<VerifyPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let note = payload.map(|Json(p)| p.note).unwrap_or_default();
    let upload = workflow::verify_document(state.pool.as_ref(), id, &staff, &note).await?;
    Ok(Json(json!({ "upload": upload })))
}

pub async fn download_document(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let upload = db::documents::upload_by_id(state.pool.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("document upload"))?;
    file_response(
        std::path::Path::new(&upload.file_path),
        &upload.original_filename,
        false,
    )
}

/// Bundle every uploaded document for an application into a zip download.
pub async fn download_application_documents(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let pool = state.pool.as_ref();
    let application = db::applications::get(pool, id)
        .await?
        .ok_or(AppError::NotFound("application"))?;
    let uploads = db::documents::uploads_for_application(pool, application.id).await?;
    let requirements = db::documents::active_requirements(pool).await?;

    let mut zip_data = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_data));
        let options = zip::write::SimpleFileOptions::default().unix_permissions(0o644);

        for upload in &uploads {
            let Ok(content) = std::fs::read(&upload.file_path) else {
                tracing::warn!("missing file on disk for upload {}", upload.id);
                continue;
            };
            let code = requirements
                .iter()
                .find(|req| req.id == upload.requirement_id)
                .map(|req| req.code.as_str())
                .unwrap_or("DOCUMENT");
            let name = format!("{}_{}", code, upload.original_filename);
            if zip.start_file(name, options).is_ok() {
                let _ = zip.write_all(&content);
            }
        }
        zip.finish()
            .map_err(|e| AppError::internal(format!("failed to build zip: {e}")))?;
    }

    let download_name = format!("{}_documents.zip", application.tracking_code);
    Response::builder()
        .header("Content-Type", "application/zip")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{download_name}\""),
        )
        .body(Body::from(zip_data))
        .map_err(|e| AppError::internal(format!("failed to build file response: {e}")))
}

/// Render (or re-render) the application summary PDF. Generation failures
/// surface to the caller; they never touch application state.
pub async fn generate_application_pdf(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let application = db::applications::get(pool, id)
        .await?
        .ok_or(AppError::NotFound("application"))?;

    let team_members = db::applications::team_members(pool, application.id).await?;
    let bank_accounts = db::applications::bank_accounts(pool, application.id).await?;
    let requirements = db::documents::active_requirements(pool).await?;
    let uploads = db::documents::uploads_for_application(pool, application.id).await?;

    let documents: Vec<DocumentLine> = requirements
        .iter()
        .map(|req| {
            let upload = uploads.iter().find(|u| u.requirement_id == req.id);
            DocumentLine {
                label: req.label.clone(),
                uploaded: upload.is_some(),
                verified: upload.map(|u| u.verified).unwrap_or(false),
            }
        })
        .collect();

    let path = storage::application_pdf_path(&state.config.upload_dir, &application.tracking_code);
    pdf::generate_application_summary(
        &application,
        &team_members,
        &bank_accounts,
        &documents,
        &path,
    )
    .map_err(AppError::Internal)?;

    db::applications::set_pdf_file(pool, application.id, &path.to_string_lossy()).await?;

    Ok(Json(json!({
        "tracking_code": application.tracking_code,
        "pdf_file": path.to_string_lossy(),
    })))
}

pub async fn download_application_pdf(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let application = db::applications::get(state.pool.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("application"))?;
    let pdf_file = application
        .pdf_file
        .as_deref()
        .ok_or(AppError::NotFound("application PDF"))?;

    file_response(
        std::path::Path::new(pdf_file),
        &format!("application_{}.pdf", application.tracking_code),
        true,
    )
}

#[derive(Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

pub async fn audit_logs(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let logs = db::audit::recent(state.pool.as_ref(), query.limit.clamp(1, 500)).await?;
    Ok(Json(json!({ "audit_logs": logs })))
}

pub async fn notification_logs(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let logs = db::notifications::recent(state.pool.as_ref(), query.limit.clamp(1, 500)).await?;
    Ok(Json(json!({ "notifications": logs })))
}

/// Contracts can only be raised against approved applications.
pub async fn create_contract(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<NewContract>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let application = db::applications::get(pool, payload.application_id)
        .await?
        .ok_or(AppError::NotFound("application"))?;
    if application.status() != ApplicationStatus::Approved {
        return Err(AppError::validation(
            "contracts can only be created for approved applications",
        ));
    }
    if payload.end_date < payload.start_date {
        return Err(AppError::validation("contract end date precedes start date"));
    }

    let contract = db::contracts::insert_contract(pool, &payload, None, staff.id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "contract": contract }))))
}

pub async fn application_contracts(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let contracts = db::contracts::contracts_for_application(state.pool.as_ref(), id).await?;
    Ok(Json(json!({ "contracts": contracts })))
}

#[derive(Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

pub async fn update_contract_status(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let contract = db::contracts::contract_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("contract"))?;
    ensure_transition(LifecycleEntity::Contract, &contract.status, &payload.status)?;

    let contract = db::contracts::update_contract_status(pool, id, &payload.status).await?;
    Ok(Json(json!({ "contract": contract })))
}

/// Attach a signed copy or annex to a contract.
pub async fn attach_contract_document(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let contract = db::contracts::contract_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("contract"))?;

    let mut title = String::new();
    let mut stored: Option<(String, String)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name == "title" {
            if let Ok(text) = field.text().await {
                title = text;
            }
        } else if name == "file" {
            let filename = field.file_name().unwrap_or("contract.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("failed to read upload: {e}")))?;
            if data.is_empty() {
                return Err(AppError::validation("uploaded file is empty"));
            }
            let path = storage::contract_path(
                &state.config.upload_dir,
                &contract.contract_number,
                &filename,
            );
            storage::save_file(&path, &data)?;
            stored = Some((path.to_string_lossy().into_owned(), filename));
        }
    }

    let (file_path, filename) =
        stored.ok_or_else(|| AppError::validation("no file was uploaded"))?;
    let title = if title.trim().is_empty() { filename } else { title };

    let document =
        db::contracts::insert_contract_document(pool, contract.id, &title, &file_path, staff.id)
            .await?;
    Ok((StatusCode::CREATED, Json(json!({ "document": document }))))
}

#[derive(Deserialize)]
pub struct DeliveryListQuery {
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub async fn list_deliveries(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Query(query): Query<DeliveryListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = db::contracts::deliveries_by_status(
        state.pool.as_ref(),
        query.status.as_deref(),
        query.limit.clamp(1, 500),
    )
    .await?;
    Ok(Json(json!({ "deliveries": deliveries })))
}

#[derive(Deserialize)]
pub struct DeliveryVerificationPayload {
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

/// Staff confirm or reject a delivered consignment.
pub async fn verify_delivery(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<i32>,
    Json(payload): Json<DeliveryVerificationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let delivery = db::contracts::delivery_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("delivery"))?;
    ensure_transition(LifecycleEntity::Delivery, &delivery.status, &payload.status)?;

    let delivery =
        db::contracts::verify_delivery(pool, id, staff.id, &payload.status, &payload.notes)
            .await?;
    Ok(Json(json!({ "delivery": delivery })))
}

pub async fn update_srv_status(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let srv = db::contracts::srv_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("store receipt voucher"))?;
    ensure_transition(LifecycleEntity::StoreReceipt, &srv.status, &payload.status)?;

    let srv = db::contracts::update_srv_status(pool, id, &payload.status).await?;
    Ok(Json(json!({ "store_receipt_voucher": srv })))
}

pub async fn update_invoice_status(
    State(state): State<Arc<AppState>>,
    StaffUser(_): StaffUser,
    Path(id): Path<i32>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let invoice = db::contracts::invoice_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("invoice"))?;
    ensure_transition(LifecycleEntity::Invoice, &invoice.status, &payload.status)?;

    let invoice = db::contracts::update_invoice_status(pool, id, &payload.status).await?;
    Ok(Json(json!({ "invoice": invoice })))
}
