use sqlx::PgPool;

use super::{Commodity, Region, School};

pub async fn regions(pool: &PgPool) -> Result<Vec<Region>, sqlx::Error> {
    sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE is_active ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn region_by_id(pool: &PgPool, id: i32) -> Result<Option<Region>, sqlx::Error> {
    sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn commodities(pool: &PgPool) -> Result<Vec<Commodity>, sqlx::Error> {
    sqlx::query_as::<_, Commodity>("SELECT * FROM commodities WHERE is_active ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn commodities_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Commodity>, sqlx::Error> {
    sqlx::query_as::<_, Commodity>("SELECT * FROM commodities WHERE id = ANY($1) ORDER BY name")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn schools(pool: &PgPool, region_id: Option<i32>) -> Result<Vec<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(
        r#"
        SELECT * FROM schools
        WHERE is_active AND ($1::INTEGER IS NULL OR region_id = $1)
        ORDER BY name
        "#,
    )
    .bind(region_id)
    .fetch_all(pool)
    .await
}

pub async fn school_by_id(pool: &PgPool, id: i32) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
