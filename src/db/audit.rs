use sqlx::PgPool;

use super::AuditLog;

/// A single audit trail entry; `user_id` is absent for public actions.
#[derive(Debug, Default)]
pub struct AuditEvent {
    pub user_id: Option<i32>,
    pub action: &'static str,
    pub description: String,
    pub model_name: &'static str,
    pub object_id: String,
    pub details: serde_json::Value,
}

pub async fn record(pool: &PgPool, event: AuditEvent) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (user_id, action, description, model_name, object_id, details)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(event.user_id)
    .bind(event.action)
    .bind(&event.description)
    .bind(event.model_name)
    .bind(&event.object_id)
    .bind(&event.details)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as::<_, AuditLog>("SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(pool)
        .await
}
