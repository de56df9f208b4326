use sqlx::PgPool;

use super::NotificationLog;

#[allow(clippy::too_many_arguments)]
pub async fn insert_pending(
    pool: &PgPool,
    kind: &str,
    channel: &str,
    recipient: &str,
    recipient_name: &str,
    subject: &str,
    body: &str,
    application_id: Option<i32>,
) -> Result<i32, sqlx::Error> {
    let row: (i32,) = sqlx::query_as(
        r#"
        INSERT INTO notification_logs (kind, channel, recipient, recipient_name, subject, body, application_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(kind)
    .bind(channel)
    .bind(recipient)
    .bind(recipient_name)
    .bind(subject)
    .bind(body)
    .bind(application_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn mark_sent(pool: &PgPool, id: i32, external_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE notification_logs SET status = 'SENT', external_id = $2, sent_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(external_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_failed(pool: &PgPool, id: i32, error: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE notification_logs SET status = 'FAILED', error = $2 WHERE id = $1")
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<NotificationLog>, sqlx::Error> {
    sqlx::query_as::<_, NotificationLog>(
        "SELECT * FROM notification_logs ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
