//! Identity store: turns a (role, username, password) triple into a `Principal`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::{CredentialVerifier, PasswordError, Principal, Role};
use crate::error::PanelError;
use crate::store::PanelStore;

/// Authenticates admins and sellers.
///
/// Lookups go to the table of the requested role only, so a seller's
/// credentials never authenticate as an admin.
#[derive(Debug)]
pub struct IdentityService<S, V> {
    store: Arc<S>,
    verifier: Arc<V>,
    /// Checked against on unknown usernames so a miss costs one verify, like a hit.
    decoy_hash: Option<Arc<str>>,
}

impl<S, V> Clone for IdentityService<S, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: Arc::clone(&self.verifier),
            decoy_hash: self.decoy_hash.clone(),
        }
    }
}

impl<S: PanelStore, V: CredentialVerifier> IdentityService<S, V> {
    /// Creates an identity service over a store and verifier.
    ///
    /// Hashes a decoy credential once with the verifier's own cost.
    pub fn new(store: Arc<S>, verifier: Arc<V>) -> Self {
        let decoy_hash = verifier
            .hash("decoy-credential")
            .inspect_err(|e| warn!(error = %e, "Decoy hash unavailable; unknown usernames skip verification"))
            .ok()
            .map(Arc::<str>::from);
        Self {
            store,
            verifier,
            decoy_hash,
        }
    }

    /// Authenticates a caller.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller. A stored value that is not a valid hash is treated as a
    /// mismatch and logged.
    ///
    /// # Errors
    ///
    /// - `PanelError::InvalidCredentials` when no account matches.
    /// - `PanelError::Storage` when the lookup fails.
    pub async fn authenticate(
        &self,
        role: Role,
        username: &str,
        password: &str,
    ) -> Result<Principal, PanelError> {
        let found = match role {
            Role::Admin => self
                .store
                .find_admin_by_username(username)
                .await?
                .map(|admin| (Principal::admin(admin.id, admin.username), admin.password_hash)),
            Role::Seller => self
                .store
                .find_seller_by_username(username)
                .await?
                .map(|seller| (Principal::seller(&seller), seller.password_hash)),
        };

        let Some((principal, stored)) = found else {
            if let Some(decoy) = &self.decoy_hash {
                let _ = self.verifier.verify(password, decoy);
            }
            debug!(role = %role, username = %username, "Login for unknown account");
            return Err(PanelError::InvalidCredentials);
        };

        match self.verifier.verify(password, &stored) {
            Ok(true) => Ok(principal),
            Ok(false) => {
                debug!(role = %role, username = %username, "Password mismatch");
                Err(PanelError::InvalidCredentials)
            }
            Err(PasswordError::InvalidHash) => {
                warn!(
                    role = %role,
                    table = role.table(),
                    username = %username,
                    "Stored credential is not a valid hash"
                );
                Err(PanelError::InvalidCredentials)
            }
            Err(e) => Err(PanelError::Internal(e.to_string())),
        }
    }
}
