use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::accounts::SupplierUser;
use crate::db::contracts::{NewDelivery, NewInvoice, NewStoreReceiptVoucher};
use crate::db::{self, SupplierApplication, SupplierContract};
use crate::error::AppError;
use crate::state::AppState;
use crate::workflow::lifecycle::{ensure_transition, LifecycleEntity};

async fn own_application(
    state: &AppState,
    user_id: i32,
) -> Result<SupplierApplication, AppError> {
    db::applications::get_by_supplier_user(state.pool.as_ref(), user_id)
        .await?
        .ok_or(AppError::NotFound("supplier application"))
}

async fn own_contract(
    state: &AppState,
    user_id: i32,
    contract_id: i32,
) -> Result<SupplierContract, AppError> {
    let application = own_application(state, user_id).await?;
    let contract = db::contracts::contract_by_id(state.pool.as_ref(), contract_id)
        .await?
        .ok_or(AppError::NotFound("contract"))?;
    if contract.application_id != application.id {
        return Err(AppError::NotFound("contract"));
    }
    Ok(contract)
}

/// Check that the delivery location actually exists and lines up.
async fn validate_location(
    state: &AppState,
    region_id: i32,
    school_id: i32,
    commodity_id: i32,
) -> Result<(), AppError> {
    let pool = state.pool.as_ref();

    let region = db::reference::region_by_id(pool, region_id)
        .await?
        .ok_or_else(|| AppError::validation("unknown region"))?;
    let school = db::reference::school_by_id(pool, school_id)
        .await?
        .ok_or_else(|| AppError::validation("unknown school"))?;
    if school.region_id != region.id {
        return Err(AppError::validation(format!(
            "school {} is not in region {}",
            school.name, region.name
        )));
    }

    let commodities = db::reference::commodities_by_ids(pool, &[commodity_id]).await?;
    if commodities.is_empty() {
        return Err(AppError::validation("unknown commodity"));
    }
    Ok(())
}

/// Reference data for the delivery, SRV and invoice forms.
pub async fn reference_data(
    State(state): State<Arc<AppState>>,
    SupplierUser(_): SupplierUser,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let regions = db::reference::regions(pool).await?;
    let schools = db::reference::schools(pool, None).await?;
    let commodities = db::reference::commodities(pool).await?;

    Ok(Json(json!({
        "regions": regions,
        "schools": schools,
        "commodities": commodities,
    })))
}

/// The supplier dashboard: application, contracts and their signing state.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
) -> Result<impl IntoResponse, AppError> {
    let application = own_application(&state, user.id).await?;
    let contracts = db::contracts::contracts_for_supplier(state.pool.as_ref(), user.id).await?;

    Ok(Json(json!({
        "user": user,
        "application": application,
        "contracts": contracts,
    })))
}

pub async fn contracts(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let contracts = db::contracts::contracts_for_supplier(pool, user.id).await?;

    let mut entries = Vec::with_capacity(contracts.len());
    for contract in contracts {
        let signing = db::contracts::signing_for_contract(pool, contract.id).await?;
        let documents = db::contracts::documents_for_contract(pool, contract.id).await?;
        let today = chrono::Utc::now().date_naive();
        entries.push(json!({
            "contract": contract,
            "is_active": contract.is_active(today),
            "days_remaining": contract.days_remaining(today),
            "signing": signing,
            "documents": documents,
        }));
    }

    Ok(Json(json!({ "contracts": entries })))
}

#[derive(Deserialize)]
pub struct SignPayload {
    pub signer_name: String,
    #[serde(default)]
    pub signer_designation: String,
}

/// Record the supplier's acceptance of an active contract; a second
/// signing attempt surfaces as a conflict.
pub async fn sign_contract(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
    Path(id): Path<i32>,
    Json(payload): Json<SignPayload>,
) -> Result<impl IntoResponse, AppError> {
    let contract = own_contract(&state, user.id, id).await?;
    if contract.status != "ACTIVE" {
        return Err(AppError::validation("only active contracts can be signed"));
    }
    if payload.signer_name.trim().is_empty() {
        return Err(AppError::validation("signer name is required"));
    }

    let signing = db::contracts::insert_signing(
        state.pool.as_ref(),
        contract.id,
        user.id,
        payload.signer_name.trim(),
        payload.signer_designation.trim(),
    )
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("this contract has already been signed".to_string())
        }
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "signing": signing }))))
}

pub async fn create_delivery(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
    Json(payload): Json<NewDelivery>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(contract_id) = payload.contract_id {
        own_contract(&state, user.id, contract_id).await?;
    }
    if payload.quantity_delivered <= 0.0 {
        return Err(AppError::validation("delivered quantity must be positive"));
    }
    validate_location(&state, payload.region_id, payload.school_id, payload.commodity_id).await?;

    let delivery =
        db::contracts::insert_delivery(state.pool.as_ref(), user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "delivery": delivery }))))
}

pub async fn deliveries(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
) -> Result<impl IntoResponse, AppError> {
    let deliveries =
        db::contracts::deliveries_for_supplier(state.pool.as_ref(), user.id).await?;
    Ok(Json(json!({ "deliveries": deliveries })))
}

#[derive(Deserialize)]
pub struct DeliveryStatusPayload {
    pub status: String,
}

/// Suppliers move their own deliveries through PENDING -> IN_TRANSIT ->
/// DELIVERED; verification stays with staff.
pub async fn update_delivery_status(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
    Path(id): Path<i32>,
    Json(payload): Json<DeliveryStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let delivery = db::contracts::delivery_by_id(pool, id)
        .await?
        .filter(|d| d.supplier_user_id == user.id)
        .ok_or(AppError::NotFound("delivery"))?;

    if matches!(payload.status.as_str(), "VERIFIED" | "REJECTED") {
        return Err(AppError::Forbidden);
    }
    ensure_transition(LifecycleEntity::Delivery, &delivery.status, &payload.status)?;

    let delivery = db::contracts::update_delivery_status(pool, id, &payload.status).await?;
    Ok(Json(json!({ "delivery": delivery })))
}

pub async fn create_srv(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
    Json(payload): Json<NewStoreReceiptVoucher>,
) -> Result<impl IntoResponse, AppError> {
    if payload.quantity <= 0.0 || payload.unit_price < 0.0 {
        return Err(AppError::validation("quantity and unit price must be positive"));
    }
    validate_location(&state, payload.region_id, payload.school_id, payload.commodity_id).await?;

    let srv = db::contracts::insert_srv(state.pool.as_ref(), user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "store_receipt_voucher": srv }))))
}

pub async fn srvs(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
) -> Result<impl IntoResponse, AppError> {
    let srvs = db::contracts::srvs_for_supplier(state.pool.as_ref(), user.id).await?;
    Ok(Json(json!({ "store_receipt_vouchers": srvs })))
}

/// Submit a draft SRV for approval.
pub async fn submit_srv(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let srv = db::contracts::srv_by_id(pool, id)
        .await?
        .filter(|s| s.supplier_user_id == user.id)
        .ok_or(AppError::NotFound("store receipt voucher"))?;
    ensure_transition(LifecycleEntity::StoreReceipt, &srv.status, "SUBMITTED")?;

    let srv = db::contracts::update_srv_status(pool, id, "SUBMITTED").await?;
    Ok(Json(json!({ "store_receipt_voucher": srv })))
}

pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
    Json(payload): Json<NewInvoice>,
) -> Result<impl IntoResponse, AppError> {
    if payload.quantity <= 0.0 || payload.unit_price < 0.0 {
        return Err(AppError::validation("quantity and unit price must be positive"));
    }
    if payload.due_date < payload.invoice_date {
        return Err(AppError::validation("due date precedes the invoice date"));
    }
    validate_location(&state, payload.region_id, payload.school_id, payload.commodity_id).await?;

    let invoice = db::contracts::insert_invoice(state.pool.as_ref(), user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "invoice": invoice }))))
}

pub async fn invoices(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
) -> Result<impl IntoResponse, AppError> {
    let invoices = db::contracts::invoices_for_supplier(state.pool.as_ref(), user.id).await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// Submit a draft invoice for approval.
pub async fn submit_invoice(
    State(state): State<Arc<AppState>>,
    SupplierUser(user): SupplierUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let pool = state.pool.as_ref();
    let invoice = db::contracts::invoice_by_id(pool, id)
        .await?
        .filter(|i| i.supplier_user_id == user.id)
        .ok_or(AppError::NotFound("invoice"))?;
    ensure_transition(LifecycleEntity::Invoice, &invoice.status, "SUBMITTED")?;

    let invoice = db::contracts::update_invoice_status(pool, id, "SUBMITTED").await?;
    Ok(Json(json!({ "invoice": invoice })))
}
