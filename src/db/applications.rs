use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    BankAccount, Commodity, NewApplication, NewBankAccount, NewNextOfKin, NewTeamMember,
    NextOfKin, SupplierApplication, TeamMember,
};

/// Filters for the back-office application listing.
#[derive(Debug, Default)]
pub struct ApplicationFilter {
    pub status: Option<String>,
    pub region_id: Option<i32>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

pub async fn insert(
    pool: &PgPool,
    new: &NewApplication,
    tracking_code: &str,
    completion_token: Uuid,
    commodity_ids: &[i32],
    team_members: &[NewTeamMember],
    next_of_kin: &[NewNextOfKin],
    bank_accounts: &[NewBankAccount],
) -> Result<SupplierApplication, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let application = sqlx::query_as::<_, SupplierApplication>(
        r#"
        INSERT INTO supplier_applications (
            business_name, business_type, registration_number, tin_number,
            physical_address, city, postal_code, country, region_id,
            telephone, email, other_commodities, warehouse_location,
            declaration_agreed, data_consent, signer_name, signer_designation,
            signed_at, tracking_code, completion_token, submitted_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, now(), $18, $19, now())
        RETURNING *
        "#,
    )
    .bind(&new.business_name)
    .bind(&new.business_type)
    .bind(&new.registration_number)
    .bind(&new.tin_number)
    .bind(&new.physical_address)
    .bind(&new.city)
    .bind(&new.postal_code)
    .bind(&new.country)
    .bind(new.region_id)
    .bind(&new.telephone)
    .bind(&new.email)
    .bind(&new.other_commodities)
    .bind(&new.warehouse_location)
    .bind(new.declaration_agreed)
    .bind(new.data_consent)
    .bind(&new.signer_name)
    .bind(&new.signer_designation)
    .bind(tracking_code)
    .bind(completion_token)
    .fetch_one(&mut *tx)
    .await?;

    for commodity_id in commodity_ids {
        sqlx::query(
            "INSERT INTO application_commodities (application_id, commodity_id) VALUES ($1, $2)",
        )
        .bind(application.id)
        .bind(commodity_id)
        .execute(&mut *tx)
        .await?;
    }

    for member in team_members {
        sqlx::query(
            r#"
            INSERT INTO team_members (
                application_id, full_name, position, years_experience, address,
                city, country, region_id, telephone, email, id_card_type, id_card_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(application.id)
        .bind(&member.full_name)
        .bind(&member.position)
        .bind(member.years_experience)
        .bind(&member.address)
        .bind(&member.city)
        .bind(&member.country)
        .bind(member.region_id)
        .bind(&member.telephone)
        .bind(&member.email)
        .bind(&member.id_card_type)
        .bind(&member.id_card_number)
        .execute(&mut *tx)
        .await?;
    }

    for kin in next_of_kin {
        sqlx::query(
            r#"
            INSERT INTO next_of_kin (
                application_id, full_name, relationship, address, mobile,
                id_card_type, id_card_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(application.id)
        .bind(&kin.full_name)
        .bind(&kin.relationship)
        .bind(&kin.address)
        .bind(&kin.mobile)
        .bind(&kin.id_card_type)
        .bind(&kin.id_card_number)
        .execute(&mut *tx)
        .await?;
    }

    for account in bank_accounts {
        sqlx::query(
            r#"
            INSERT INTO bank_accounts (
                application_id, bank_name, branch, account_name, account_number, account_index
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(application.id)
        .bind(&account.bank_name)
        .bind(&account.branch)
        .bind(&account.account_name)
        .bind(&account.account_number)
        .bind(account.account_index)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(application)
}

pub async fn get(pool: &PgPool, id: i32) -> Result<Option<SupplierApplication>, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        "SELECT * FROM supplier_applications WHERE id = $1 AND NOT is_deleted",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_by_tracking_code(
    pool: &PgPool,
    tracking_code: &str,
) -> Result<Option<SupplierApplication>, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        "SELECT * FROM supplier_applications WHERE tracking_code = $1 AND NOT is_deleted",
    )
    .bind(tracking_code)
    .fetch_optional(pool)
    .await
}

pub async fn get_by_completion_token(
    pool: &PgPool,
    token: Uuid,
) -> Result<Option<SupplierApplication>, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        "SELECT * FROM supplier_applications WHERE completion_token = $1 AND NOT is_deleted",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn get_by_supplier_user(
    pool: &PgPool,
    user_id: i32,
) -> Result<Option<SupplierApplication>, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        "SELECT * FROM supplier_applications WHERE supplier_user_id = $1 AND NOT is_deleted",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let exists: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM supplier_applications WHERE email = $1 AND NOT is_deleted)",
    )
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(exists.0)
}

pub async fn tracking_code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM supplier_applications WHERE tracking_code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await?;
    Ok(exists.0)
}

pub async fn list(
    pool: &PgPool,
    filter: &ApplicationFilter,
) -> Result<Vec<SupplierApplication>, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        r#"
        SELECT * FROM supplier_applications
        WHERE NOT is_deleted
          AND ($1::TEXT IS NULL OR status = $1)
          AND ($2::INTEGER IS NULL OR region_id = $2)
          AND ($3::TEXT IS NULL
               OR business_name ILIKE '%' || $3 || '%'
               OR email ILIKE '%' || $3 || '%'
               OR tracking_code ILIKE '%' || $3 || '%')
        ORDER BY created_at DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(&filter.status)
    .bind(filter.region_id)
    .bind(&filter.search)
    .bind(filter.limit.max(1))
    .bind(filter.offset.max(0))
    .fetch_all(pool)
    .await
}

pub async fn status_counts(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT status, COUNT(*) FROM supplier_applications
        WHERE NOT is_deleted
        GROUP BY status
        ORDER BY status
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Flip a pending application to UNDER_REVIEW, stamping `reviewed_at`.
/// Returns the fresh row when the flip happened.
pub async fn mark_under_review(
    pool: &PgPool,
    id: i32,
) -> Result<Option<SupplierApplication>, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        r#"
        UPDATE supplier_applications
        SET status = 'UNDER_REVIEW', reviewed_at = now(), updated_at = now()
        WHERE id = $1 AND status = 'PENDING_REVIEW'
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Record a final decision (APPROVED / REJECTED) with the reviewer's comment.
pub async fn record_decision(
    pool: &PgPool,
    id: i32,
    status: &str,
    reviewer_comment: &str,
    supplier_user_id: Option<i32>,
) -> Result<SupplierApplication, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        r#"
        UPDATE supplier_applications
        SET status = $2,
            reviewer_comment = $3,
            supplier_user_id = COALESCE($4, supplier_user_id),
            decided_at = now(),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(reviewer_comment)
    .bind(supplier_user_id)
    .fetch_one(pool)
    .await
}

pub async fn set_reviewer_comment(
    pool: &PgPool,
    id: i32,
    status: &str,
    reviewer_comment: &str,
) -> Result<SupplierApplication, sqlx::Error> {
    sqlx::query_as::<_, SupplierApplication>(
        r#"
        UPDATE supplier_applications
        SET status = $2,
            reviewer_comment = $3,
            reviewed_at = COALESCE(reviewed_at, now()),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(reviewer_comment)
    .fetch_one(pool)
    .await
}

pub async fn update_completeness(
    pool: &PgPool,
    id: i32,
    missing_documents: &[String],
    deadline: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE supplier_applications
        SET missing_documents = $2, document_completion_deadline = $3, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(sqlx::types::Json(missing_documents))
    .bind(deadline)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_pdf_file(pool: &PgPool, id: i32, pdf_file: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE supplier_applications SET pdf_file = $2, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(pdf_file)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn soft_delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE supplier_applications SET is_deleted = TRUE, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn team_members(pool: &PgPool, application_id: i32) -> Result<Vec<TeamMember>, sqlx::Error> {
    sqlx::query_as::<_, TeamMember>(
        "SELECT * FROM team_members WHERE application_id = $1 ORDER BY full_name",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn next_of_kin(pool: &PgPool, application_id: i32) -> Result<Vec<NextOfKin>, sqlx::Error> {
    sqlx::query_as::<_, NextOfKin>(
        "SELECT * FROM next_of_kin WHERE application_id = $1 ORDER BY full_name",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn bank_accounts(
    pool: &PgPool,
    application_id: i32,
) -> Result<Vec<BankAccount>, sqlx::Error> {
    sqlx::query_as::<_, BankAccount>(
        "SELECT * FROM bank_accounts WHERE application_id = $1 ORDER BY account_index",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn commodities(pool: &PgPool, application_id: i32) -> Result<Vec<Commodity>, sqlx::Error> {
    sqlx::query_as::<_, Commodity>(
        r#"
        SELECT c.* FROM commodities c
        JOIN application_commodities ac ON ac.commodity_id = c.id
        WHERE ac.application_id = $1
        ORDER BY c.name
        "#,
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

/// Whether any commodity linked to the application is flagged processed food.
pub async fn has_processed_commodity(
    pool: &PgPool,
    application_id: i32,
) -> Result<bool, sqlx::Error> {
    let exists: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM application_commodities ac
            JOIN commodities c ON c.id = ac.commodity_id
            WHERE ac.application_id = $1 AND c.is_processed_food
        )
        "#,
    )
    .bind(application_id)
    .fetch_one(pool)
    .await?;
    Ok(exists.0)
}

/// Requirement ids with a verified upload, for the approve guard and
/// outstanding-request resolution.
pub async fn verified_requirement_ids(
    pool: &PgPool,
    application_id: i32,
) -> Result<HashSet<i32>, sqlx::Error> {
    let rows: Vec<(i32,)> = sqlx::query_as(
        "SELECT requirement_id FROM document_uploads WHERE application_id = $1 AND verified",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn uploaded_requirement_ids(
    pool: &PgPool,
    application_id: i32,
) -> Result<HashSet<i32>, sqlx::Error> {
    let rows: Vec<(i32,)> =
        sqlx::query_as("SELECT requirement_id FROM document_uploads WHERE application_id = $1")
            .bind(application_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
