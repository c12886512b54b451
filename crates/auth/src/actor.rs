use billfold_core::AccountId;

use crate::{JwtClaims, Role};

/// Verified identity of the caller, derived from a credential token.
///
/// Ephemeral: built once per request and passed explicitly into every core
/// operation. Nothing here is persisted or shared across requests.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Actor {
    pub account_id: AccountId,
    pub role: Role,
}

impl Actor {
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&JwtClaims> for Actor {
    fn from(claims: &JwtClaims) -> Self {
        Self {
            account_id: claims.sub,
            role: claims.role,
        }
    }
}
