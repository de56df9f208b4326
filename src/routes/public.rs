use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage;
use crate::workflow::{self, validation, SubmissionPayload};

/// Reference data backing the public application form.
pub async fn reference_data(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let regions = db::reference::regions(state.pool.as_ref()).await?;
    let commodities = db::reference::commodities(state.pool.as_ref()).await?;
    let requirements = db::documents::active_requirements(state.pool.as_ref()).await?;

    Ok(Json(json!({
        "regions": regions,
        "commodities": commodities,
        "document_requirements": requirements,
    })))
}

pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmissionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (application, report) = workflow::submit_application(
        state.pool.as_ref(),
        &state.notify,
        &state.config,
        &payload,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "tracking_code": application.tracking_code,
            "status": application.status,
            "missing_documents": report.missing,
            "document_completion_deadline": report.deadline,
        })),
    ))
}

/// Public status lookup by tracking code.
pub async fn application_status(
    State(state): State<Arc<AppState>>,
    Path(tracking_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let application = db::applications::get_by_tracking_code(state.pool.as_ref(), &tracking_code)
        .await?
        .ok_or(AppError::NotFound("application"))?;

    Ok(Json(json!({
        "tracking_code": application.tracking_code,
        "business_name": application.business_name,
        "status": application.status,
        "status_label": application.status().label(),
        "submitted_at": application.submitted_at,
        "decided_at": application.decided_at,
        "missing_documents": application.missing_documents.0,
        "document_completion_deadline": application.document_completion_deadline,
    })))
}

async fn application_for_token(
    state: &AppState,
    token: Uuid,
) -> Result<db::SupplierApplication, AppError> {
    let application = db::applications::get_by_completion_token(state.pool.as_ref(), token)
        .await?
        .ok_or(AppError::NotFound("application"))?;

    if !application.status().can_decide() {
        return Err(AppError::validation(
            "this application is no longer accepting documents",
        ));
    }
    if !application.is_completion_token_valid(Utc::now()) {
        return Err(AppError::validation(
            "this document submission link has expired",
        ));
    }
    Ok(application)
}

/// Context for the token-keyed document submission page: what is asked for
/// and what has already arrived.
pub async fn document_submission_context(
    State(state): State<Arc<AppState>>,
    Path(token): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let application = application_for_token(&state, token).await?;
    let pool = state.pool.as_ref();

    let outstanding = db::documents::unresolved_requests(pool, application.id).await?;
    let required = match outstanding.first() {
        Some(request) => db::documents::request_requirements(pool, request.id).await?,
        None => workflow::missing_requirements(pool, &application).await?,
    };

    let uploads = db::documents::uploads_for_application(pool, application.id).await?;
    let documents: Vec<serde_json::Value> = required
        .iter()
        .map(|req| {
            let upload = uploads.iter().find(|u| u.requirement_id == req.id);
            json!({
                "code": req.code,
                "label": req.label,
                "description": req.description,
                "allowed_extensions": req.allowed_extensions.0,
                "max_file_size_mb": req.max_file_size_mb,
                "uploaded": upload.is_some(),
                "verified": upload.map(|u| u.verified).unwrap_or(false),
            })
        })
        .collect();

    Ok(Json(json!({
        "tracking_code": application.tracking_code,
        "business_name": application.business_name,
        "status": application.status,
        "message": outstanding.first().map(|r| r.message.clone()),
        "document_completion_deadline": application.document_completion_deadline,
        "documents": documents,
    })))
}

/// Unauthenticated upload endpoint. Multipart fields are named by
/// requirement code; each file is validated against the requirement's rule
/// row before it is stored.
pub async fn upload_documents(
    State(state): State<Arc<AppState>>,
    Path(token): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let application = application_for_token(&state, token).await?;
    let pool = state.pool.as_ref();

    let mut uploaded = Vec::new();
    let mut errors = Vec::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or("").to_string();
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let content_type = field.content_type().map(str::to_string);
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                errors.push(format!("failed to read {filename}: {e}"));
                continue;
            }
        };

        let Some(requirement) = db::documents::requirement_by_code(pool, &field_name).await? else {
            errors.push(format!("unknown document type: {field_name}"));
            continue;
        };

        if let Err(e) =
            validation::validate_upload(&requirement.upload_rule(), &filename, data.len() as u64)
        {
            errors.push(e.to_string());
            continue;
        }

        let path = storage::document_path(
            &state.config.upload_dir,
            &application.tracking_code,
            &requirement.code,
            &filename,
        );
        storage::save_file(&path, &data)?;

        let mime_type = content_type.unwrap_or_else(|| {
            mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string()
        });

        let upload = workflow::record_upload(
            pool,
            &state.config,
            &application,
            &requirement,
            &path.to_string_lossy(),
            &filename,
            data.len() as i64,
            &mime_type,
        )
        .await?;

        uploaded.push(json!({
            "requirement": requirement.label,
            "filename": upload.original_filename,
        }));
    }

    if uploaded.is_empty() && errors.is_empty() {
        return Err(AppError::validation("no files were uploaded"));
    }

    let application = db::applications::get(pool, application.id)
        .await?
        .ok_or(AppError::NotFound("application"))?;

    Ok(Json(json!({
        "success": errors.is_empty(),
        "uploaded_files": uploaded,
        "errors": errors,
        "missing_documents": application.missing_documents.0,
    })))
}
