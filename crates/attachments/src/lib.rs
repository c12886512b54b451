//! `billfold-attachments` — proof blob storage.
//!
//! Pure key/value blob storage with no business logic: store bytes under a
//! collision-resistant key, hand back a locator, dereference it later.

pub mod locator;
pub mod store;

pub use locator::Locator;
pub use store::{AttachmentError, AttachmentStore, InMemoryAttachmentStore, LocalDiskAttachmentStore};
