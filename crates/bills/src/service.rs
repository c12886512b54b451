//! Bill lifecycle manager.
//!
//! Orchestrates create/read/update/delete/status-transition requests against
//! the repository and the attachment store, consulting the authorization
//! policy for every operation. All calls are synchronous and take the actor
//! explicitly; there is no ambient identity.

use thiserror::Error;

use billfold_attachments::{AttachmentError, AttachmentStore, Locator};
use billfold_auth::{Actor, BillAction, authorize_bill_action};
use billfold_core::{BillId, DomainError, DomainResult};

use crate::{Bill, BillDraft, BillPatch, BillRepository, BillStatus};

#[derive(Debug, Error)]
pub enum BillError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Attachment storage failed; the surrounding operation is aborted.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

pub type BillResult<T> = Result<T, BillError>;

/// An uploaded proof file: raw bytes plus the client-supplied filename
/// (used only to preserve the extension).
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub bytes: Vec<u8>,
    pub original_name: String,
}

pub struct BillService<R, S> {
    repo: R,
    attachments: S,
}

impl<R, S> BillService<R, S>
where
    R: BillRepository,
    S: AttachmentStore,
{
    pub fn new(repo: R, attachments: S) -> Self {
        Self { repo, attachments }
    }

    /// Create a bill owned by the actor, `Pending`, optionally with a proof.
    ///
    /// The attachment is stored before the record exists: if the upload
    /// fails, no bill is created and no locator dangles.
    pub fn create(
        &self,
        actor: &Actor,
        draft: BillDraft,
        proof: Option<ProofUpload>,
    ) -> BillResult<Bill> {
        draft.validate()?;

        let mut bill = draft.into_bill(actor.account_id);
        if let Some(upload) = proof {
            let locator = self
                .attachments
                .put(&upload.bytes, &upload.original_name)?;
            bill.proof = Some(locator);
        }

        self.repo.insert(bill.clone())?;
        tracing::info!(bill_id = %bill.id, owner_id = %bill.owner_id, "bill created");
        Ok(bill)
    }

    /// List bills visible to the actor: everything for admins, own bills
    /// otherwise. Authorization narrows the result set, it never errors.
    pub fn list(&self, actor: &Actor) -> Vec<Bill> {
        if actor.is_admin() {
            self.repo.list_all()
        } else {
            self.repo.list_by_owner(actor.account_id)
        }
    }

    pub fn get(&self, actor: &Actor, id: BillId) -> DomainResult<Bill> {
        let bill = self.repo.find(id).ok_or(DomainError::NotFound)?;
        authorize_bill_action(actor, BillAction::Read, bill.owner_id)?;
        Ok(bill)
    }

    /// Apply a metadata patch, optionally replacing the proof attachment.
    ///
    /// A `status` field in the patch is honored only when it differs from the
    /// current status, and then only through the admin-only transition path.
    pub fn update(
        &self,
        actor: &Actor,
        id: BillId,
        patch: BillPatch,
        proof: Option<ProofUpload>,
    ) -> BillResult<Bill> {
        let mut bill = self.repo.find(id).ok_or(DomainError::NotFound)?;
        authorize_bill_action(actor, BillAction::Update, bill.owner_id)?;

        if let Some(target) = patch.status {
            if target != bill.status {
                authorize_bill_action(actor, BillAction::ChangeStatus, bill.owner_id)?;
                bill.transition(target)?;
            }
        }
        patch.apply_metadata(&mut bill)?;

        if let Some(upload) = proof {
            // Store first, then swap the locator in the same record write.
            // The previous blob is left in storage.
            let locator = self
                .attachments
                .put(&upload.bytes, &upload.original_name)?;
            bill.proof = Some(locator);
        }

        Ok(self.repo.update(bill)?)
    }

    /// Admin-only `Pending → Approved | Rejected` transition.
    pub fn change_status(
        &self,
        actor: &Actor,
        id: BillId,
        target: BillStatus,
    ) -> DomainResult<Bill> {
        let mut bill = self.repo.find(id).ok_or(DomainError::NotFound)?;
        authorize_bill_action(actor, BillAction::ChangeStatus, bill.owner_id)?;

        bill.transition(target)?;
        let bill = self.repo.update(bill)?;
        tracing::info!(bill_id = %bill.id, status = %bill.status, "bill status changed");
        Ok(bill)
    }

    /// Delete one bill. The proof blob, if any, stays in storage.
    pub fn delete(&self, actor: &Actor, id: BillId) -> DomainResult<()> {
        let bill = self.repo.find(id).ok_or(DomainError::NotFound)?;
        authorize_bill_action(actor, BillAction::Delete, bill.owner_id)?;

        self.repo.remove(id);
        Ok(())
    }

    /// Bulk delete. Every id must exist and be deletable by the actor;
    /// otherwise nothing is removed.
    pub fn delete_many(&self, actor: &Actor, ids: &[BillId]) -> DomainResult<usize> {
        for &id in ids {
            let bill = self.repo.find(id).ok_or(DomainError::NotFound)?;
            authorize_bill_action(actor, BillAction::Delete, bill.owner_id)?;
        }
        let mut removed = 0;
        for &id in ids {
            if self.repo.remove(id) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Fetch the proof bytes for a bill the actor may read.
    pub fn proof(&self, actor: &Actor, id: BillId) -> BillResult<(Locator, Vec<u8>)> {
        let bill = self.repo.find(id).ok_or(DomainError::NotFound)?;
        authorize_bill_action(actor, BillAction::Read, bill.owner_id)?;

        let locator = bill.proof.ok_or(DomainError::NotFound)?;
        let bytes = self.attachments.get(&locator)?;
        Ok((locator, bytes))
    }
}
