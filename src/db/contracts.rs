use chrono::NaiveDate;
use sqlx::PgPool;

use super::{ContractDocument, ContractSigning, DeliveryTracking, Invoice, StoreReceiptVoucher, SupplierContract};

#[derive(Debug, serde::Deserialize)]
pub struct NewContract {
    pub application_id: i32,
    pub contract_number: String,
    #[serde(default = "default_contract_type")]
    pub contract_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub contract_value: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_contract_type() -> String {
    "SUPPLY_AGREEMENT".to_string()
}

fn default_currency() -> String {
    "GHS".to_string()
}

#[derive(Debug, serde::Deserialize)]
pub struct NewDelivery {
    pub contract_id: Option<i32>,
    pub region_id: i32,
    pub school_id: i32,
    pub commodity_id: i32,
    pub serial_number: String,
    pub delivery_date: NaiveDate,
    pub srv_number: String,
    pub waybill_number: String,
    pub quantity_delivered: f64,
    pub unit_of_measure: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct NewStoreReceiptVoucher {
    pub srv_number: String,
    pub region_id: i32,
    pub school_id: i32,
    pub commodity_id: i32,
    pub quantity: f64,
    pub unit_of_measure: String,
    pub unit_price: f64,
    pub delivery_date: NaiveDate,
    pub received_by: String,
    #[serde(default)]
    pub received_by_designation: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub region_id: i32,
    pub school_id: i32,
    pub commodity_id: i32,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub quantity: f64,
    pub unit_of_measure: String,
    pub unit_price: f64,
    #[serde(default)]
    pub notes: String,
}

pub async fn insert_contract(
    pool: &PgPool,
    new: &NewContract,
    contract_file: Option<&str>,
    created_by: i32,
) -> Result<SupplierContract, sqlx::Error> {
    sqlx::query_as::<_, SupplierContract>(
        r#"
        INSERT INTO supplier_contracts (
            application_id, contract_number, contract_type, title, description,
            contract_file, start_date, end_date, contract_value, currency, created_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(new.application_id)
    .bind(&new.contract_number)
    .bind(&new.contract_type)
    .bind(&new.title)
    .bind(&new.description)
    .bind(contract_file)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(new.contract_value)
    .bind(&new.currency)
    .bind(created_by)
    .fetch_one(pool)
    .await
}

pub async fn contract_by_id(pool: &PgPool, id: i32) -> Result<Option<SupplierContract>, sqlx::Error> {
    sqlx::query_as::<_, SupplierContract>("SELECT * FROM supplier_contracts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn contracts_for_application(
    pool: &PgPool,
    application_id: i32,
) -> Result<Vec<SupplierContract>, sqlx::Error> {
    sqlx::query_as::<_, SupplierContract>(
        "SELECT * FROM supplier_contracts WHERE application_id = $1 ORDER BY created_at DESC",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn contracts_for_supplier(
    pool: &PgPool,
    supplier_user_id: i32,
) -> Result<Vec<SupplierContract>, sqlx::Error> {
    sqlx::query_as::<_, SupplierContract>(
        r#"
        SELECT c.* FROM supplier_contracts c
        JOIN supplier_applications a ON a.id = c.application_id
        WHERE a.supplier_user_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(supplier_user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_contract_status(
    pool: &PgPool,
    id: i32,
    status: &str,
) -> Result<SupplierContract, sqlx::Error> {
    sqlx::query_as::<_, SupplierContract>(
        "UPDATE supplier_contracts SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn insert_contract_document(
    pool: &PgPool,
    contract_id: i32,
    title: &str,
    file_path: &str,
    uploaded_by: i32,
) -> Result<ContractDocument, sqlx::Error> {
    sqlx::query_as::<_, ContractDocument>(
        r#"
        INSERT INTO contract_documents (contract_id, title, file_path, uploaded_by)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(contract_id)
    .bind(title)
    .bind(file_path)
    .bind(uploaded_by)
    .fetch_one(pool)
    .await
}

pub async fn documents_for_contract(
    pool: &PgPool,
    contract_id: i32,
) -> Result<Vec<ContractDocument>, sqlx::Error> {
    sqlx::query_as::<_, ContractDocument>(
        "SELECT * FROM contract_documents WHERE contract_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(contract_id)
    .fetch_all(pool)
    .await
}

/// One signing per contract; the unique constraint surfaces a second
/// attempt as a conflict.
pub async fn insert_signing(
    pool: &PgPool,
    contract_id: i32,
    signed_by: i32,
    signer_name: &str,
    signer_designation: &str,
) -> Result<ContractSigning, sqlx::Error> {
    sqlx::query_as::<_, ContractSigning>(
        r#"
        INSERT INTO contract_signings (contract_id, signed_by, signer_name, signer_designation)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(contract_id)
    .bind(signed_by)
    .bind(signer_name)
    .bind(signer_designation)
    .fetch_one(pool)
    .await
}

pub async fn signing_for_contract(
    pool: &PgPool,
    contract_id: i32,
) -> Result<Option<ContractSigning>, sqlx::Error> {
    sqlx::query_as::<_, ContractSigning>(
        "SELECT * FROM contract_signings WHERE contract_id = $1",
    )
    .bind(contract_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_delivery(
    pool: &PgPool,
    supplier_user_id: i32,
    new: &NewDelivery,
) -> Result<DeliveryTracking, sqlx::Error> {
    sqlx::query_as::<_, DeliveryTracking>(
        r#"
        INSERT INTO delivery_tracking (
            supplier_user_id, contract_id, region_id, school_id, commodity_id,
            serial_number, delivery_date, srv_number, waybill_number,
            quantity_delivered, unit_of_measure, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(supplier_user_id)
    .bind(new.contract_id)
    .bind(new.region_id)
    .bind(new.school_id)
    .bind(new.commodity_id)
    .bind(&new.serial_number)
    .bind(new.delivery_date)
    .bind(&new.srv_number)
    .bind(&new.waybill_number)
    .bind(new.quantity_delivered)
    .bind(&new.unit_of_measure)
    .bind(&new.notes)
    .fetch_one(pool)
    .await
}

pub async fn delivery_by_id(pool: &PgPool, id: i32) -> Result<Option<DeliveryTracking>, sqlx::Error> {
    sqlx::query_as::<_, DeliveryTracking>("SELECT * FROM delivery_tracking WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn deliveries_for_supplier(
    pool: &PgPool,
    supplier_user_id: i32,
) -> Result<Vec<DeliveryTracking>, sqlx::Error> {
    sqlx::query_as::<_, DeliveryTracking>(
        "SELECT * FROM delivery_tracking WHERE supplier_user_id = $1 ORDER BY created_at DESC",
    )
    .bind(supplier_user_id)
    .fetch_all(pool)
    .await
}

pub async fn deliveries_by_status(
    pool: &PgPool,
    status: Option<&str>,
    limit: i64,
) -> Result<Vec<DeliveryTracking>, sqlx::Error> {
    sqlx::query_as::<_, DeliveryTracking>(
        r#"
        SELECT * FROM delivery_tracking
        WHERE ($1::TEXT IS NULL OR status = $1)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(status)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn update_delivery_status(
    pool: &PgPool,
    id: i32,
    status: &str,
) -> Result<DeliveryTracking, sqlx::Error> {
    sqlx::query_as::<_, DeliveryTracking>(
        "UPDATE delivery_tracking SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn verify_delivery(
    pool: &PgPool,
    id: i32,
    verified_by: i32,
    status: &str,
    notes: &str,
) -> Result<DeliveryTracking, sqlx::Error> {
    sqlx::query_as::<_, DeliveryTracking>(
        r#"
        UPDATE delivery_tracking
        SET status = $2,
            verified_by = $3,
            verified_at = now(),
            verification_notes = $4,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(verified_by)
    .bind(notes)
    .fetch_one(pool)
    .await
}

pub async fn insert_srv(
    pool: &PgPool,
    supplier_user_id: i32,
    new: &NewStoreReceiptVoucher,
) -> Result<StoreReceiptVoucher, sqlx::Error> {
    let total_amount = new.quantity * new.unit_price;
    sqlx::query_as::<_, StoreReceiptVoucher>(
        r#"
        INSERT INTO store_receipt_vouchers (
            srv_number, supplier_user_id, region_id, school_id, commodity_id,
            quantity, unit_of_measure, unit_price, total_amount, delivery_date,
            received_by, received_by_designation, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(&new.srv_number)
    .bind(supplier_user_id)
    .bind(new.region_id)
    .bind(new.school_id)
    .bind(new.commodity_id)
    .bind(new.quantity)
    .bind(&new.unit_of_measure)
    .bind(new.unit_price)
    .bind(total_amount)
    .bind(new.delivery_date)
    .bind(&new.received_by)
    .bind(&new.received_by_designation)
    .bind(&new.notes)
    .fetch_one(pool)
    .await
}

pub async fn srv_by_id(pool: &PgPool, id: i32) -> Result<Option<StoreReceiptVoucher>, sqlx::Error> {
    sqlx::query_as::<_, StoreReceiptVoucher>("SELECT * FROM store_receipt_vouchers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn srvs_for_supplier(
    pool: &PgPool,
    supplier_user_id: i32,
) -> Result<Vec<StoreReceiptVoucher>, sqlx::Error> {
    sqlx::query_as::<_, StoreReceiptVoucher>(
        "SELECT * FROM store_receipt_vouchers WHERE supplier_user_id = $1 ORDER BY created_at DESC",
    )
    .bind(supplier_user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_srv_status(
    pool: &PgPool,
    id: i32,
    status: &str,
) -> Result<StoreReceiptVoucher, sqlx::Error> {
    sqlx::query_as::<_, StoreReceiptVoucher>(
        "UPDATE store_receipt_vouchers SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn insert_invoice(
    pool: &PgPool,
    supplier_user_id: i32,
    new: &NewInvoice,
) -> Result<Invoice, sqlx::Error> {
    let subtotal = new.quantity * new.unit_price;
    sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices (
            invoice_number, supplier_user_id, region_id, school_id, commodity_id,
            invoice_date, due_date, quantity, unit_of_measure, unit_price,
            subtotal, total_amount, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(&new.invoice_number)
    .bind(supplier_user_id)
    .bind(new.region_id)
    .bind(new.school_id)
    .bind(new.commodity_id)
    .bind(new.invoice_date)
    .bind(new.due_date)
    .bind(new.quantity)
    .bind(&new.unit_of_measure)
    .bind(new.unit_price)
    .bind(subtotal)
    .bind(subtotal)
    .bind(&new.notes)
    .fetch_one(pool)
    .await
}

pub async fn invoice_by_id(pool: &PgPool, id: i32) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn invoices_for_supplier(
    pool: &PgPool,
    supplier_user_id: i32,
) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        "SELECT * FROM invoices WHERE supplier_user_id = $1 ORDER BY created_at DESC",
    )
    .bind(supplier_user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_invoice_status(
    pool: &PgPool,
    id: i32,
    status: &str,
) -> Result<Invoice, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        "UPDATE invoices SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}
