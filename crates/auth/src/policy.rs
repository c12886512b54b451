//! Single authorization policy for bill operations.
//!
//! Every ownership/role decision goes through [`can`]. Handlers and services
//! never re-derive "is admin" checks on their own.

use billfold_core::{AccountId, DomainError, DomainResult};

use crate::Actor;

/// Operations an actor can attempt on an existing bill.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BillAction {
    Read,
    Update,
    Delete,
    /// Approve or reject; reserved for admins regardless of ownership.
    ChangeStatus,
}

/// Whether `actor` may perform `action` on a bill owned by `owner_id`.
pub fn can(actor: &Actor, action: BillAction, owner_id: AccountId) -> bool {
    if actor.is_admin() {
        return true;
    }
    match action {
        BillAction::Read | BillAction::Update | BillAction::Delete => {
            actor.account_id == owner_id
        }
        BillAction::ChangeStatus => false,
    }
}

/// [`can`] lifted into the domain error model.
pub fn authorize_bill_action(
    actor: &Actor,
    action: BillAction,
    owner_id: AccountId,
) -> DomainResult<()> {
    if can(actor, action, owner_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
