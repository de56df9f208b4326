use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::workflow::completeness::{self, RequirementSummary};
use crate::workflow::status::ApplicationStatus;
use crate::workflow::validation::UploadRule;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_staff(&self) -> bool {
        self.role == "ADMIN" || self.role == "REVIEWER"
    }

    pub fn is_supplier(&self) -> bool {
        self.role == "SUPPLIER"
    }
}

#[derive(Debug, FromRow)]
pub struct Session {
    pub id: i32,
    pub token: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Commodity {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub is_processed_food: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct School {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub region_id: i32,
    pub district: String,
    pub address: String,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupplierApplication {
    pub id: i32,
    pub business_name: String,
    pub business_type: String,
    pub registration_number: String,
    pub tin_number: String,
    pub physical_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub region_id: i32,
    pub telephone: String,
    pub email: String,
    pub other_commodities: Option<String>,
    pub warehouse_location: String,
    pub declaration_agreed: bool,
    pub data_consent: bool,
    pub signer_name: String,
    pub signer_designation: String,
    pub signed_at: Option<DateTime<Utc>>,
    pub tracking_code: String,
    pub status: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub reviewer_comment: String,
    #[serde(skip_serializing)]
    pub completion_token: Uuid,
    pub missing_documents: Json<Vec<String>>,
    pub document_completion_deadline: Option<DateTime<Utc>>,
    pub pdf_file: Option<String>,
    pub supplier_user_id: Option<i32>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierApplication {
    pub fn status(&self) -> ApplicationStatus {
        ApplicationStatus::parse(&self.status).unwrap_or(ApplicationStatus::PendingReview)
    }

    pub fn is_completion_token_valid(&self, now: DateTime<Utc>) -> bool {
        completeness::is_completion_token_valid(self.document_completion_deadline, now)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: i32,
    pub application_id: i32,
    pub full_name: String,
    pub position: String,
    pub years_experience: Option<i32>,
    pub address: String,
    pub city: String,
    pub country: String,
    pub region_id: i32,
    pub telephone: String,
    pub email: String,
    pub id_card_type: String,
    pub id_card_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NextOfKin {
    pub id: i32,
    pub application_id: i32,
    pub full_name: String,
    pub relationship: String,
    pub address: String,
    pub mobile: String,
    pub id_card_type: String,
    pub id_card_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BankAccount {
    pub id: i32,
    pub application_id: i32,
    pub bank_name: String,
    pub branch: String,
    pub account_name: String,
    pub account_number: String,
    pub account_index: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentRequirement {
    pub id: i32,
    pub code: String,
    pub label: String,
    pub description: String,
    pub is_required: bool,
    pub condition_note: String,
    pub allowed_extensions: Json<Vec<String>>,
    pub max_file_size_mb: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRequirement {
    pub fn upload_rule(&self) -> UploadRule {
        let allowed_extensions = if self.allowed_extensions.0.is_empty() {
            ["pdf", "jpg", "jpeg", "png"].map(String::from).to_vec()
        } else {
            self.allowed_extensions.0.clone()
        };
        UploadRule {
            allowed_extensions,
            max_file_size_mb: self.max_file_size_mb,
        }
    }

    pub fn summary(&self) -> RequirementSummary {
        RequirementSummary {
            id: self.id,
            code: self.code.clone(),
            label: self.label.clone(),
            is_required: self.is_required,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentUpload {
    pub id: i32,
    pub application_id: i32,
    pub requirement_id: i32,
    pub file_path: String,
    pub original_filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub verified: bool,
    pub verified_by: Option<i32>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verifier_note: String,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutstandingDocumentRequest {
    pub id: i32,
    pub application_id: i32,
    pub message: String,
    pub requested_by: i32,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: i32,
    pub user_id: Option<i32>,
    pub action: String,
    pub description: String,
    pub model_name: String,
    pub object_id: String,
    pub details: Json<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationLog {
    pub id: i32,
    pub kind: String,
    pub channel: String,
    pub recipient: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub error: String,
    pub external_id: String,
    pub application_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupplierContract {
    pub id: i32,
    pub application_id: i32,
    pub contract_number: String,
    pub contract_type: String,
    pub title: String,
    pub description: String,
    pub contract_file: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub contract_value: Option<f64>,
    pub currency: String,
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierContract {
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.status == "ACTIVE" && self.start_date <= today && today <= self.end_date
    }

    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days().max(0)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractDocument {
    pub id: i32,
    pub contract_id: i32,
    pub title: String,
    pub file_path: String,
    pub uploaded_by: Option<i32>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractSigning {
    pub id: i32,
    pub contract_id: i32,
    pub signed_by: i32,
    pub signer_name: String,
    pub signer_designation: String,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeliveryTracking {
    pub id: i32,
    pub supplier_user_id: i32,
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
    pub status: String,
    pub verified_by: Option<i32>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verification_notes: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoreReceiptVoucher {
    pub id: i32,
    pub srv_number: String,
    pub supplier_user_id: i32,
    pub region_id: i32,
    pub school_id: i32,
    pub commodity_id: i32,
    pub quantity: f64,
    pub unit_of_measure: String,
    pub unit_price: f64,
    pub total_amount: f64,
    pub delivery_date: NaiveDate,
    pub received_by: String,
    pub received_by_designation: String,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: i32,
    pub invoice_number: String,
    pub supplier_user_id: i32,
    pub region_id: i32,
    pub school_id: i32,
    pub commodity_id: i32,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub quantity: f64,
    pub unit_of_measure: String,
    pub unit_price: f64,
    pub subtotal: f64,
    pub total_amount: f64,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewApplication {
    pub business_name: String,
    pub business_type: String,
    pub registration_number: String,
    pub tin_number: String,
    pub physical_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub region_id: i32,
    pub telephone: String,
    pub email: String,
    pub other_commodities: Option<String>,
    pub warehouse_location: String,
    pub declaration_agreed: bool,
    pub data_consent: bool,
    pub signer_name: String,
    pub signer_designation: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTeamMember {
    pub full_name: String,
    #[serde(default)]
    pub position: String,
    pub years_experience: Option<i32>,
    pub address: String,
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub region_id: i32,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id_card_type: String,
    #[serde(default)]
    pub id_card_number: String,
}

#[derive(Debug, Deserialize)]
pub struct NewNextOfKin {
    pub full_name: String,
    pub relationship: String,
    pub address: String,
    pub mobile: String,
    #[serde(default)]
    pub id_card_type: String,
    #[serde(default)]
    pub id_card_number: String,
}

#[derive(Debug, Deserialize)]
pub struct NewBankAccount {
    pub bank_name: String,
    pub branch: String,
    pub account_name: String,
    pub account_number: String,
    pub account_index: i16,
}

fn default_country() -> String {
    "Ghana".to_string()
}
