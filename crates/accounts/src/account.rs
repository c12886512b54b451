use serde::{Deserialize, Serialize};

use billfold_auth::Role;
use billfold_core::{AccountId, DomainError, DomainResult};

/// Account record.
///
/// `email` is unique across the directory, enforced at write time.
/// `password_hash` is a salted digest; plaintext is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Registration input (plaintext password, hashed by the directory).
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewAccount {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        Ok(())
    }
}

/// Partial update applied to an existing account.
///
/// A password change carries both the resubmitted current password and the
/// new one; the directory rejects the patch unless the current one matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub new_email: Option<String>,
    pub role: Option<Role>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}
