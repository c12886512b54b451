//! `billfold-bills` — the bill lifecycle and authorization core.
//!
//! A bill is an expense claim: submitted by its owner, reviewed by an admin,
//! optionally backed by a proof attachment. This crate owns the status state
//! machine and every ownership/role decision around bill records.

pub mod bill;
pub mod repository;
pub mod service;

pub use bill::{Bill, BillDraft, BillPatch, BillStatus};
pub use repository::{BillRepository, InMemoryBillRepository};
pub use service::{BillError, BillService, ProofUpload};
