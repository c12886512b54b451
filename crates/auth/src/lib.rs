//! `billfold-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it verifies
//! credentials (JWT, passwords) and decides what an actor may do, nothing else.

pub mod actor;
pub mod claims;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod roles;

pub use actor::Actor;
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use password::PasswordHasher;
pub use policy::{BillAction, authorize_bill_action, can};
pub use roles::Role;
