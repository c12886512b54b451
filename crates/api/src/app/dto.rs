use serde::Deserialize;

use billfold_accounts::Account;
use billfold_auth::Role;
use billfold_bills::{Bill, BillStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: BillStatus,
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    pub ids: Vec<String>,
}

// -------------------------
// Response mapping
// -------------------------

/// Account as exposed over HTTP. The password digest never leaves the server.
pub fn account_to_json(account: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": account.id.to_string(),
        "name": account.name,
        "email": account.email,
        "role": account.role.as_str(),
    })
}

pub fn bill_to_json(bill: &Bill) -> serde_json::Value {
    serde_json::json!({
        "id": bill.id.to_string(),
        "owner_id": bill.owner_id.to_string(),
        "date": bill.date.to_rfc3339(),
        "amount_cents": bill.amount_cents,
        "bill_type": bill.bill_type,
        "description": bill.description,
        "status": bill.status,
        "proof": bill.proof.as_ref().map(|l| l.as_str()),
        "version": bill.version,
    })
}
