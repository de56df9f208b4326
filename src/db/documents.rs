use std::collections::HashSet;

use sqlx::PgPool;

use super::{DocumentRequirement, DocumentUpload, OutstandingDocumentRequest};

pub async fn active_requirements(pool: &PgPool) -> Result<Vec<DocumentRequirement>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRequirement>(
        "SELECT * FROM document_requirements WHERE is_active ORDER BY label",
    )
    .fetch_all(pool)
    .await
}

pub async fn requirement_by_code(
    pool: &PgPool,
    code: &str,
) -> Result<Option<DocumentRequirement>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRequirement>(
        "SELECT * FROM document_requirements WHERE upper(code) = upper($1) AND is_active",
    )
    .bind(code)
    .fetch_optional(pool)
    .await
}

pub async fn requirement_by_id(
    pool: &PgPool,
    id: i32,
) -> Result<Option<DocumentRequirement>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRequirement>("SELECT * FROM document_requirements WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn uploads_for_application(
    pool: &PgPool,
    application_id: i32,
) -> Result<Vec<DocumentUpload>, sqlx::Error> {
    sqlx::query_as::<_, DocumentUpload>(
        "SELECT * FROM document_uploads WHERE application_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn upload_by_id(pool: &PgPool, id: i32) -> Result<Option<DocumentUpload>, sqlx::Error> {
    sqlx::query_as::<_, DocumentUpload>("SELECT * FROM document_uploads WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// One row per (application, requirement): a re-upload replaces the file
/// and resets the verification state.
pub async fn upsert_upload(
    pool: &PgPool,
    application_id: i32,
    requirement_id: i32,
    file_path: &str,
    original_filename: &str,
    file_size: i64,
    mime_type: &str,
) -> Result<DocumentUpload, sqlx::Error> {
    sqlx::query_as::<_, DocumentUpload>(
        r#"
        INSERT INTO document_uploads (
            application_id, requirement_id, file_path, original_filename, file_size, mime_type
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (application_id, requirement_id) DO UPDATE
        SET file_path = EXCLUDED.file_path,
            original_filename = EXCLUDED.original_filename,
            file_size = EXCLUDED.file_size,
            mime_type = EXCLUDED.mime_type,
            verified = FALSE,
            verified_by = NULL,
            verified_at = NULL,
            verifier_note = '',
            uploaded_at = now(),
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(requirement_id)
    .bind(file_path)
    .bind(original_filename)
    .bind(file_size)
    .bind(mime_type)
    .fetch_one(pool)
    .await
}

pub async fn mark_verified(
    pool: &PgPool,
    upload_id: i32,
    verified_by: i32,
    note: &str,
) -> Result<DocumentUpload, sqlx::Error> {
    sqlx::query_as::<_, DocumentUpload>(
        r#"
        UPDATE document_uploads
        SET verified = TRUE,
            verified_by = $2,
            verified_at = now(),
            verifier_note = $3,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(upload_id)
    .bind(verified_by)
    .bind(note)
    .fetch_one(pool)
    .await
}

/// Create an outstanding request with its requirement snapshot in one
/// transaction.
pub async fn insert_outstanding_request(
    pool: &PgPool,
    application_id: i32,
    message: &str,
    requested_by: i32,
    requirement_ids: &[i32],
) -> Result<OutstandingDocumentRequest, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let request = sqlx::query_as::<_, OutstandingDocumentRequest>(
        r#"
        INSERT INTO outstanding_document_requests (application_id, message, requested_by)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(message)
    .bind(requested_by)
    .fetch_one(&mut *tx)
    .await?;

    for requirement_id in requirement_ids {
        sqlx::query(
            r#"
            INSERT INTO outstanding_request_requirements (request_id, requirement_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(request.id)
        .bind(requirement_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(request)
}

pub async fn unresolved_requests(
    pool: &PgPool,
    application_id: i32,
) -> Result<Vec<OutstandingDocumentRequest>, sqlx::Error> {
    sqlx::query_as::<_, OutstandingDocumentRequest>(
        r#"
        SELECT * FROM outstanding_document_requests
        WHERE application_id = $1 AND NOT is_resolved
        ORDER BY created_at
        "#,
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn requests_for_application(
    pool: &PgPool,
    application_id: i32,
) -> Result<Vec<OutstandingDocumentRequest>, sqlx::Error> {
    sqlx::query_as::<_, OutstandingDocumentRequest>(
        r#"
        SELECT * FROM outstanding_document_requests
        WHERE application_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn request_requirement_ids(
    pool: &PgPool,
    request_id: i32,
) -> Result<HashSet<i32>, sqlx::Error> {
    let rows: Vec<(i32,)> = sqlx::query_as(
        "SELECT requirement_id FROM outstanding_request_requirements WHERE request_id = $1",
    )
    .bind(request_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn request_requirements(
    pool: &PgPool,
    request_id: i32,
) -> Result<Vec<DocumentRequirement>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRequirement>(
        r#"
        SELECT r.* FROM document_requirements r
        JOIN outstanding_request_requirements orr ON orr.requirement_id = r.id
        WHERE orr.request_id = $1
        ORDER BY r.label
        "#,
    )
    .bind(request_id)
    .fetch_all(pool)
    .await
}

/// Stamp a request resolved; the `NOT is_resolved` guard makes the flip
/// happen at most once.
pub async fn mark_request_resolved(pool: &PgPool, request_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE outstanding_document_requests
        SET is_resolved = TRUE, resolved_at = now()
        WHERE id = $1 AND NOT is_resolved
        "#,
    )
    .bind(request_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
