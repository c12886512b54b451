use std::sync::Arc;

use billfold_accounts::{AccountDirectory, InMemoryAccountRepository};
use billfold_attachments::{
    AttachmentStore, InMemoryAttachmentStore, LocalDiskAttachmentStore,
};
use billfold_auth::{Hs256JwtValidator, PasswordHasher};
use billfold_bills::{BillService, InMemoryBillRepository};

use crate::app::AppConfig;

/// Wired services shared by all handlers.
pub struct AppServices {
    pub jwt: Arc<Hs256JwtValidator>,
    pub directory: AccountDirectory<Arc<InMemoryAccountRepository>>,
    pub bills: BillService<Arc<InMemoryBillRepository>, Arc<dyn AttachmentStore>>,
}

pub fn build_services(config: &AppConfig) -> AppServices {
    let jwt = Arc::new(Hs256JwtValidator::new(
        config.jwt_secret.clone().into_bytes(),
    ));
    let hasher = PasswordHasher::new(config.password_salt.clone());

    let attachments: Arc<dyn AttachmentStore> = match &config.attachment_dir {
        Some(dir) => match LocalDiskAttachmentStore::new(dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(
                    dir = %dir.display(),
                    error = %e,
                    "attachment dir unusable, falling back to in-memory store"
                );
                Arc::new(InMemoryAttachmentStore::new())
            }
        },
        None => Arc::new(InMemoryAttachmentStore::new()),
    };

    AppServices {
        jwt,
        directory: AccountDirectory::new(Arc::new(InMemoryAccountRepository::new()), hasher),
        bills: BillService::new(Arc::new(InMemoryBillRepository::new()), attachments),
    }
}
