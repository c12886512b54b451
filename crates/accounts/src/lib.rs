//! `billfold-accounts` — account records and credential hashing.
//!
//! Consumed by the bill lifecycle only to resolve "who is the actor"; bills
//! themselves never reach into this crate.

pub mod account;
pub mod directory;
pub mod repository;

pub use account::{Account, AccountPatch, NewAccount};
pub use directory::AccountDirectory;
pub use repository::{AccountRepository, InMemoryAccountRepository};
