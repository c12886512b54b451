use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billfold_attachments::Locator;
use billfold_core::{AccountId, BillId, DomainError, DomainResult};

/// Review status of a bill.
///
/// `Pending` is the only non-terminal state: a bill moves to `Approved` or
/// `Rejected` exactly once and never reopens. Revisions happen through
/// metadata edits, not status changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BillStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl BillStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BillStatus::Pending)
    }
}

impl core::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BillStatus::Pending => write!(f, "Pending"),
            BillStatus::Approved => write!(f, "Approved"),
            BillStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Expense claim record.
///
/// # Invariants
/// - `amount_cents` is strictly positive.
/// - `status` starts `Pending` and only ever moves to a terminal state.
/// - `proof`, once set, changes only through an explicit replace that swaps
///   the locator in one write.
/// - `version` increases by one per successful repository update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub owner_id: AccountId,
    pub date: DateTime<Utc>,
    pub amount_cents: u64,
    pub bill_type: String,
    pub description: String,
    pub status: BillStatus,
    pub proof: Option<Locator>,
    pub version: u64,
}

impl Bill {
    /// Move to a terminal status. Only `Pending` bills transition, and only
    /// to `Approved` or `Rejected`.
    pub fn transition(&mut self, to: BillStatus) -> DomainResult<()> {
        if to == BillStatus::Pending {
            return Err(DomainError::validation(
                "target status must be Approved or Rejected",
            ));
        }
        if self.status.is_terminal() {
            return Err(DomainError::invalid_transition(format!(
                "bill is already {}",
                self.status
            )));
        }
        self.status = to;
        Ok(())
    }
}

/// Input for creating a bill. Status and ownership are never caller-supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct BillDraft {
    pub date: DateTime<Utc>,
    pub amount_cents: u64,
    pub bill_type: String,
    pub description: String,
}

impl BillDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.amount_cents == 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        if self.bill_type.trim().is_empty() {
            return Err(DomainError::validation("bill type cannot be empty"));
        }
        Ok(())
    }

    pub fn into_bill(self, owner_id: AccountId) -> Bill {
        Bill {
            id: BillId::new(),
            owner_id,
            date: self.date,
            amount_cents: self.amount_cents,
            bill_type: self.bill_type,
            description: self.description,
            status: BillStatus::Pending,
            proof: None,
            version: 0,
        }
    }
}

/// Partial metadata update.
///
/// A `status` that differs from the bill's current status is admin-only and
/// goes through [`Bill::transition`]; echoing the current status is a no-op.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillPatch {
    pub date: Option<DateTime<Utc>>,
    pub amount_cents: Option<u64>,
    pub bill_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<BillStatus>,
}

impl BillPatch {
    /// Apply the metadata fields (not `status`) to `bill`.
    pub fn apply_metadata(&self, bill: &mut Bill) -> DomainResult<()> {
        if let Some(amount_cents) = self.amount_cents {
            if amount_cents == 0 {
                return Err(DomainError::validation("amount must be positive"));
            }
            bill.amount_cents = amount_cents;
        }
        if let Some(bill_type) = &self.bill_type {
            if bill_type.trim().is_empty() {
                return Err(DomainError::validation("bill type cannot be empty"));
            }
            bill.bill_type = bill_type.clone();
        }
        if let Some(date) = self.date {
            bill.date = date;
        }
        if let Some(description) = &self.description {
            bill.description = description.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pending_bill() -> Bill {
        BillDraft {
            date: Utc::now(),
            amount_cents: 4250,
            bill_type: "Travel".to_string(),
            description: "Train to client site".to_string(),
        }
        .into_bill(AccountId::new())
    }

    #[test]
    fn draft_becomes_pending_bill_owned_by_actor() {
        let owner = AccountId::new();
        let bill = BillDraft {
            date: Utc::now(),
            amount_cents: 4250,
            bill_type: "Travel".to_string(),
            description: String::new(),
        }
        .into_bill(owner);

        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.owner_id, owner);
        assert_eq!(bill.version, 0);
        assert!(bill.proof.is_none());
    }

    #[test]
    fn zero_amount_draft_rejected() {
        let draft = BillDraft {
            date: Utc::now(),
            amount_cents: 0,
            bill_type: "Travel".to_string(),
            description: String::new(),
        };
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn pending_transitions_once() {
        let mut bill = pending_bill();
        bill.transition(BillStatus::Approved).unwrap();
        assert_eq!(bill.status, BillStatus::Approved);

        let err = bill.transition(BillStatus::Rejected).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn transition_back_to_pending_is_invalid() {
        let mut bill = pending_bill();
        assert!(matches!(
            bill.transition(BillStatus::Pending),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(bill.status, BillStatus::Pending);
    }

    #[test]
    fn patch_rejects_zero_amount_and_leaves_rest_unapplied() {
        let mut bill = pending_bill();
        let patch = BillPatch {
            amount_cents: Some(0),
            ..Default::default()
        };
        assert!(patch.apply_metadata(&mut bill).is_err());
        assert_eq!(bill.amount_cents, 4250);
    }

    proptest! {
        /// Terminal states never transition again, whatever the target.
        #[test]
        fn terminal_states_are_terminal(
            start in prop_oneof![Just(BillStatus::Approved), Just(BillStatus::Rejected)],
            target in prop_oneof![
                Just(BillStatus::Pending),
                Just(BillStatus::Approved),
                Just(BillStatus::Rejected),
            ],
        ) {
            let mut bill = pending_bill();
            bill.status = start;

            prop_assert!(bill.transition(target).is_err());
            prop_assert_eq!(bill.status, start);
        }

        /// A pending bill accepts exactly the two terminal targets.
        #[test]
        fn pending_accepts_only_terminal_targets(
            target in prop_oneof![
                Just(BillStatus::Pending),
                Just(BillStatus::Approved),
                Just(BillStatus::Rejected),
            ],
        ) {
            let mut bill = pending_bill();
            let result = bill.transition(target);

            if target == BillStatus::Pending {
                prop_assert!(result.is_err());
                prop_assert_eq!(bill.status, BillStatus::Pending);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(bill.status, target);
            }
        }
    }
}
