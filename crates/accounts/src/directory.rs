//! Account Directory: registration, lookup, profile updates, authentication.

use billfold_auth::PasswordHasher;
use billfold_core::{DomainError, DomainResult};

use crate::{Account, AccountPatch, AccountRepository, NewAccount};
use billfold_core::AccountId;

/// Owns account records and credential hashing.
pub struct AccountDirectory<R> {
    repo: R,
    hasher: PasswordHasher,
}

/// Canonical form stored and looked up everywhere. An email registered with
/// any casing must keep resolving the same record.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<R: AccountRepository> AccountDirectory<R> {
    pub fn new(repo: R, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    /// Register a new account; the raw password is digested before storage.
    pub fn create(&self, input: NewAccount) -> DomainResult<Account> {
        input.validate()?;

        let account = Account {
            id: AccountId::new(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash: self.hasher.digest(&input.password),
            role: input.role,
        };

        self.repo.insert(account.clone())?;
        tracing::info!(account_id = %account.id, "account registered");
        Ok(account)
    }

    pub fn find_by_email(&self, email: &str) -> DomainResult<Account> {
        self.repo
            .find_by_email(&normalize_email(email))
            .ok_or(DomainError::NotFound)
    }

    pub fn find_by_id(&self, id: AccountId) -> DomainResult<Account> {
        self.repo.find_by_id(id).ok_or(DomainError::NotFound)
    }

    pub fn list(&self) -> Vec<Account> {
        self.repo.list()
    }

    /// Apply a patch to the account registered under `email`.
    ///
    /// A password change requires the resubmitted current password to match
    /// the stored digest; on mismatch the patch is rejected and nothing is
    /// written.
    pub fn update(&self, email: &str, patch: AccountPatch) -> DomainResult<Account> {
        let mut account = self.find_by_email(email)?;

        if let Some(new_password) = &patch.new_password {
            let current = patch
                .current_password
                .as_deref()
                .ok_or_else(|| DomainError::validation("current password required"))?;
            if !self.hasher.verify(current, &account.password_hash) {
                return Err(DomainError::InvalidCredentials);
            }
            if new_password.is_empty() {
                return Err(DomainError::validation("password cannot be empty"));
            }
            account.password_hash = self.hasher.digest(new_password);
        }

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            account.name = name.trim().to_string();
        }
        if let Some(new_email) = patch.new_email {
            if new_email.trim().is_empty() || !new_email.contains('@') {
                return Err(DomainError::validation("invalid email format"));
            }
            account.email = normalize_email(&new_email);
        }
        if let Some(role) = patch.role {
            account.role = role;
        }

        self.repo.update(account)
    }

    /// Remove the account registered under `email`. Idempotent.
    pub fn delete(&self, email: &str) {
        self.repo.delete_by_email(&normalize_email(email));
    }

    /// Resolve an email/password pair to an account (login path).
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn authenticate(&self, email: &str, password: &str) -> DomainResult<Account> {
        let account = self
            .repo
            .find_by_email(&normalize_email(email))
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.hasher.verify(password, &account.password_hash) {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryAccountRepository;
    use billfold_auth::Role;
    use std::sync::Arc;

    fn directory() -> AccountDirectory<Arc<InMemoryAccountRepository>> {
        AccountDirectory::new(
            Arc::new(InMemoryAccountRepository::new()),
            PasswordHasher::new("test-salt"),
        )
    }

    fn alice() -> NewAccount {
        NewAccount {
            name: "Alice Martin".to_string(),
            email: "alice@example.com".to_string(),
            password: "abc123".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn create_hashes_password() {
        let dir = directory();
        let account = dir.create(alice()).unwrap();

        assert_ne!(account.password_hash, "abc123");
        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.role, Role::User);
    }

    #[test]
    fn find_by_id_resolves_created_account() {
        let dir = directory();
        let created = dir.create(alice()).unwrap();

        assert_eq!(dir.find_by_id(created.id).unwrap(), created);

        dir.delete("alice@example.com");
        assert_eq!(dir.find_by_id(created.id), Err(DomainError::NotFound));
    }

    #[test]
    fn mixed_case_email_keeps_resolving_the_account() {
        let dir = directory();
        let mut input = alice();
        input.email = "Iris@Example.com".to_string();
        let created = dir.create(input).unwrap();
        assert_eq!(created.email, "iris@example.com");

        // Every lookup path accepts the spelling used at registration.
        assert!(dir.authenticate("Iris@Example.com", "abc123").is_ok());
        assert_eq!(dir.find_by_email("Iris@Example.com").unwrap(), created);
        assert!(
            dir.update("IRIS@example.com", AccountPatch::default())
                .is_ok()
        );

        dir.delete(" Iris@Example.com ");
        assert_eq!(
            dir.find_by_email("iris@example.com"),
            Err(DomainError::NotFound)
        );
    }

    #[test]
    fn duplicate_email_conflicts_and_first_is_untouched() {
        let dir = directory();
        let first = dir.create(alice()).unwrap();

        let mut second = alice();
        second.name = "Impostor".to_string();
        let err = dir.create(second).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let stored = dir.find_by_email("alice@example.com").unwrap();
        assert_eq!(stored, first);
    }

    #[test]
    fn create_rejects_malformed_email() {
        let dir = directory();
        let mut input = alice();
        input.email = "not-an-email".to_string();
        assert!(matches!(
            dir.create(input),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_name_and_role() {
        let dir = directory();
        dir.create(alice()).unwrap();

        let updated = dir
            .update(
                "alice@example.com",
                AccountPatch {
                    name: Some("Alice Durand".to_string()),
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Alice Durand");
        assert_eq!(updated.role, Role::Admin);
    }

    #[test]
    fn update_unknown_email_is_not_found() {
        let dir = directory();
        let err = dir
            .update("ghost@example.com", AccountPatch::default())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn password_change_requires_correct_current_password() {
        let dir = directory();
        let before = dir.create(alice()).unwrap();

        let err = dir
            .update(
                "alice@example.com",
                AccountPatch {
                    current_password: Some("wrong".to_string()),
                    new_password: Some("newpass".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidCredentials);

        // Stored hash unchanged; old password still authenticates.
        let stored = dir.find_by_email("alice@example.com").unwrap();
        assert_eq!(stored.password_hash, before.password_hash);
        assert!(dir.authenticate("alice@example.com", "abc123").is_ok());
    }

    #[test]
    fn password_change_without_current_password_is_validation_error() {
        let dir = directory();
        dir.create(alice()).unwrap();

        let err = dir
            .update(
                "alice@example.com",
                AccountPatch {
                    new_password: Some("newpass".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn password_change_rotates_digest() {
        let dir = directory();
        dir.create(alice()).unwrap();

        dir.update(
            "alice@example.com",
            AccountPatch {
                current_password: Some("abc123".to_string()),
                new_password: Some("newpass".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(dir.authenticate("alice@example.com", "newpass").is_ok());
        assert!(matches!(
            dir.authenticate("alice@example.com", "abc123"),
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[test]
    fn email_change_to_taken_email_conflicts() {
        let dir = directory();
        dir.create(alice()).unwrap();
        dir.create(NewAccount {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
            role: Role::User,
        })
        .unwrap();

        let err = dir
            .update(
                "bob@example.com",
                AccountPatch {
                    new_email: Some("alice@example.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = directory();
        dir.create(alice()).unwrap();

        dir.delete("alice@example.com");
        dir.delete("alice@example.com");
        assert_eq!(dir.find_by_email("alice@example.com"), Err(DomainError::NotFound));
    }

    #[test]
    fn authenticate_unknown_email_is_invalid_credentials() {
        let dir = directory();
        assert!(matches!(
            dir.authenticate("ghost@example.com", "pw"),
            Err(DomainError::InvalidCredentials)
        ));
    }
}
