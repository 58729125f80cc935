//! SQL storage helpers for marketplace listings and found reports.

use anyhow::{Context, Result};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{Contact, CreateFoundRequest, CreatePurchaseRequest, FoundResponse, PurchaseResponse};

const CREATED_AT_FMT: &str = r#"to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')"#;

/// Render `created_at` as UTC RFC 3339 for a table-qualified column.
fn created_at_utc(column: &str) -> String {
    format!(r#"to_char({column} AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')"#)
}

fn purchase_from_row(row: &PgRow) -> PurchaseResponse {
    PurchaseResponse {
        id: row.get("id"),
        seller_id: row.get("seller_id"),
        name: row.get("name"),
        description: row.get("description"),
        category: row.get("category"),
        old_price: row.get("old_price"),
        current_price: row.get("current_price"),
        image_urls: row.get("image_urls"),
        created_at: row.get("created_at"),
    }
}

fn found_from_row(row: &PgRow) -> FoundResponse {
    FoundResponse {
        id: row.get("id"),
        finder_id: row.get("finder_id"),
        name: row.get("name"),
        description: row.get("description"),
        location_found: row.get("location_found"),
        image_urls: row.get("image_urls"),
        created_at: row.get("created_at"),
    }
}

pub(super) async fn insert_purchase(
    pool: &PgPool,
    seller_id: Uuid,
    request: &CreatePurchaseRequest,
) -> Result<PurchaseResponse> {
    let query = format!(
        r"
        INSERT INTO purchase_items
            (seller_id, name, description, category, old_price, current_price, image_urls)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id::text AS id, seller_id::text AS seller_id, name, description,
            category, old_price, current_price, image_urls,
            {CREATED_AT_FMT} AS created_at
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(seller_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.category)
        .bind(request.old_price)
        .bind(request.current_price)
        .bind(&request.image_urls)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert purchase item")?;

    Ok(purchase_from_row(&row))
}

async fn fetch_purchases(
    pool: &PgPool,
    predicate: &str,
    bind: Option<&str>,
) -> Result<Vec<PurchaseResponse>> {
    let query = format!(
        r"
        SELECT id::text AS id, seller_id::text AS seller_id, name, description,
            category, old_price, current_price, image_urls,
            {CREATED_AT_FMT} AS created_at
        FROM purchase_items
        {predicate}
        ORDER BY created_at DESC
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let mut statement = sqlx::query(&query);
    if let Some(value) = bind {
        statement = statement.bind(value);
    }
    let rows = statement
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list purchase items")?;

    Ok(rows.iter().map(purchase_from_row).collect())
}

pub(super) async fn list_purchases(pool: &PgPool) -> Result<Vec<PurchaseResponse>> {
    fetch_purchases(pool, "", None).await
}

pub(super) async fn list_purchases_by_category(
    pool: &PgPool,
    category: &str,
) -> Result<Vec<PurchaseResponse>> {
    fetch_purchases(pool, "WHERE category = $1", Some(category)).await
}

pub(super) async fn search_purchases(pool: &PgPool, pattern: &str) -> Result<Vec<PurchaseResponse>> {
    fetch_purchases(
        pool,
        "WHERE name ILIKE $1 OR description ILIKE $1",
        Some(pattern),
    )
    .await
}

pub(super) async fn list_purchases_by_seller(
    pool: &PgPool,
    seller_id: Uuid,
) -> Result<Vec<PurchaseResponse>> {
    let query = format!(
        r"
        SELECT id::text AS id, seller_id::text AS seller_id, name, description,
            category, old_price, current_price, image_urls,
            {CREATED_AT_FMT} AS created_at
        FROM purchase_items
        WHERE seller_id = $1
        ORDER BY created_at DESC
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(seller_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list own purchase items")?;

    Ok(rows.iter().map(purchase_from_row).collect())
}

/// Item plus seller contact for the detail view.
pub(super) async fn purchase_details(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<(PurchaseResponse, Contact)>> {
    let created_at = created_at_utc("p.created_at");
    let query = format!(
        r"
        SELECT p.id::text AS id, p.seller_id::text AS seller_id, p.name, p.description,
            p.category, p.old_price, p.current_price, p.image_urls,
            {created_at} AS created_at,
            u.name AS seller_name, u.email AS seller_email, u.phone AS seller_phone
        FROM purchase_items p
        JOIN users u ON u.id = p.seller_id
        WHERE p.id = $1
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch purchase item details")?;

    Ok(row.map(|row| {
        let item = PurchaseResponse {
            id: row.get("id"),
            seller_id: row.get("seller_id"),
            name: row.get("name"),
            description: row.get("description"),
            category: row.get("category"),
            old_price: row.get("old_price"),
            current_price: row.get("current_price"),
            image_urls: row.get("image_urls"),
            created_at: row.get("created_at"),
        };
        let seller = Contact {
            name: row.get("seller_name"),
            email: row.get("seller_email"),
            phone: row.get("seller_phone"),
        };
        (item, seller)
    }))
}

/// Delete scoped to the owner; returns `false` when nothing matched.
pub(super) async fn delete_purchase(pool: &PgPool, id: Uuid, seller_id: Uuid) -> Result<bool> {
    let query = "DELETE FROM purchase_items WHERE id = $1 AND seller_id = $2";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .bind(seller_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete purchase item")?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn insert_found(
    pool: &PgPool,
    finder_id: Uuid,
    request: &CreateFoundRequest,
) -> Result<FoundResponse> {
    let query = format!(
        r"
        INSERT INTO found_items
            (finder_id, name, description, location_found, image_urls)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id::text AS id, finder_id::text AS finder_id, name, description,
            location_found, image_urls,
            {CREATED_AT_FMT} AS created_at
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(finder_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.location_found)
        .bind(&request.image_urls)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert found item")?;

    Ok(found_from_row(&row))
}

pub(super) async fn list_found_by_finder(
    pool: &PgPool,
    finder_id: Uuid,
) -> Result<Vec<FoundResponse>> {
    let query = format!(
        r"
        SELECT id::text AS id, finder_id::text AS finder_id, name, description,
            location_found, image_urls,
            {CREATED_AT_FMT} AS created_at
        FROM found_items
        WHERE finder_id = $1
        ORDER BY created_at DESC
        "
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(finder_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list own found items")?;

    Ok(rows.iter().map(found_from_row).collect())
}

/// Item plus finder contact for the detail view.
pub(super) async fn found_details(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<(FoundResponse, Contact)>> {
    let query = r#"
        SELECT f.id::text AS id, f.finder_id::text AS finder_id, f.name, f.description,
            f.location_found, f.image_urls,
            to_char(f.created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            u.name AS finder_name, u.email AS finder_email, u.phone AS finder_phone
        FROM found_items f
        JOIN users u ON u.id = f.finder_id
        WHERE f.id = $1
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch found item details")?;

    Ok(row.map(|row| {
        let item = FoundResponse {
            id: row.get("id"),
            finder_id: row.get("finder_id"),
            name: row.get("name"),
            description: row.get("description"),
            location_found: row.get("location_found"),
            image_urls: row.get("image_urls"),
            created_at: row.get("created_at"),
        };
        let finder = Contact {
            name: row.get("finder_name"),
            email: row.get("finder_email"),
            phone: row.get("finder_phone"),
        };
        (item, finder)
    }))
}

pub(super) async fn delete_found(pool: &PgPool, id: Uuid, finder_id: Uuid) -> Result<bool> {
    let query = "DELETE FROM found_items WHERE id = $1 AND finder_id = $2";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .bind(finder_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete found item")?;

    Ok(result.rows_affected() > 0)
}
