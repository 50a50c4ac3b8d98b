//! The panel as seen by an authenticated admin or seller.

use std::sync::Arc;

use tracing::info;

use reseller_shared::types::{AdminId, EndUserId, SellerId};

use super::AdminOverview;
use crate::auth::{CredentialVerifier, Principal, Role};
use crate::error::PanelError;
use crate::identity::IdentityService;
use crate::provisioning::{Provisioned, ProvisioningCoordinator, SellerDeletion};
use crate::store::{EndUser, EndUserWithSeller, NewSeller, PanelStore, Seller};

/// Access-scoped facade over identity, ledger and provisioning.
#[derive(Debug)]
pub struct ScopedPanel<S, V> {
    store: Arc<S>,
    verifier: Arc<V>,
    identity: IdentityService<S, V>,
    coordinator: ProvisioningCoordinator<S, V>,
}

impl<S, V> Clone for ScopedPanel<S, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: Arc::clone(&self.verifier),
            identity: self.identity.clone(),
            coordinator: self.coordinator.clone(),
        }
    }
}

fn require_admin(principal: &Principal) -> Result<AdminId, PanelError> {
    principal
        .admin_id()
        .ok_or_else(|| PanelError::Forbidden("admin role required".to_string()))
}

fn require_seller(principal: &Principal) -> Result<SellerId, PanelError> {
    principal
        .seller_id()
        .ok_or_else(|| PanelError::Forbidden("seller role required".to_string()))
}

impl<S: PanelStore, V: CredentialVerifier> ScopedPanel<S, V> {
    /// Wires the panel over one store and verifier.
    pub fn new(store: Arc<S>, verifier: Arc<V>) -> Self {
        Self {
            identity: IdentityService::new(Arc::clone(&store), Arc::clone(&verifier)),
            coordinator: ProvisioningCoordinator::new(Arc::clone(&store), Arc::clone(&verifier)),
            store,
            verifier,
        }
    }

    /// Returns the provisioning coordinator.
    pub const fn coordinator(&self) -> &ProvisioningCoordinator<S, V> {
        &self.coordinator
    }

    // ========== Session ==========

    /// Authenticates a caller.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` if no account of `role` matches.
    pub async fn login(
        &self,
        role: Role,
        username: &str,
        password: &str,
    ) -> Result<Principal, PanelError> {
        let principal = self.identity.authenticate(role, username, password).await?;
        info!(principal_id = %principal.id, role = %role, "Login succeeded");
        Ok(principal)
    }

    /// Returns the principal with its balance re-read from storage.
    ///
    /// Admins are returned unchanged.
    ///
    /// # Errors
    ///
    /// `NotFound` if a seller principal's row is gone.
    pub async fn refresh_principal(&self, principal: Principal) -> Result<Principal, PanelError> {
        match principal.seller_id() {
            Some(seller_id) => {
                let seller = self.coordinator.ledger().seller(seller_id).await?;
                Ok(principal.with_balance(&seller))
            }
            None => Ok(principal),
        }
    }

    // ========== Admin ==========

    /// Lists the sellers this admin administers, newest first.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins.
    pub async fn list_sellers(&self, principal: &Principal) -> Result<Vec<Seller>, PanelError> {
        let admin_id = require_admin(principal)?;
        Ok(self.store.list_sellers_by_admin(admin_id).await?)
    }

    /// Creates a seller owned by this admin.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for non-admins.
    /// - `InvalidArgument` for blank credentials or negative credits.
    /// - `Conflict` if the username is taken.
    pub async fn create_seller(
        &self,
        principal: &Principal,
        username: &str,
        password: &str,
        credits: i64,
    ) -> Result<Seller, PanelError> {
        let admin_id = require_admin(principal)?;
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(PanelError::InvalidArgument(
                "username and password are required".to_string(),
            ));
        }
        if credits < 0 {
            return Err(PanelError::InvalidArgument(format!(
                "credits must be zero or more, got {credits}"
            )));
        }

        let password_hash = self
            .verifier
            .hash(password)
            .map_err(|e| PanelError::Internal(e.to_string()))?;
        let seller = self
            .store
            .insert_seller(NewSeller {
                username: username.to_string(),
                password_hash,
                credits,
                admin_id,
            })
            .await?;

        info!(admin_id = %admin_id, seller_id = %seller.id, credits = credits, "Seller created");
        Ok(seller)
    }

    /// Sets the balance of a seller this admin administers.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for non-admins or sellers of another admin.
    /// - `InvalidArgument` for a negative value.
    /// - `NotFound` if the seller does not exist.
    pub async fn set_seller_credits(
        &self,
        principal: &Principal,
        seller_id: SellerId,
        credits: i64,
    ) -> Result<Seller, PanelError> {
        self.owned_seller(principal, seller_id).await?;
        self.coordinator.ledger().set_balance(seller_id, credits).await
    }

    /// Deletes a seller this admin administers, with its end users.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for non-admins or sellers of another admin.
    /// - `NotFound` if the seller does not exist.
    pub async fn delete_seller(
        &self,
        principal: &Principal,
        seller_id: SellerId,
    ) -> Result<SellerDeletion, PanelError> {
        self.owned_seller(principal, seller_id).await?;
        self.coordinator.delete_seller(seller_id).await
    }

    /// Lists every end user in the system with its seller's name.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins.
    pub async fn list_all_end_users(
        &self,
        principal: &Principal,
    ) -> Result<Vec<EndUserWithSeller>, PanelError> {
        require_admin(principal)?;
        Ok(self.store.list_all_end_users().await?)
    }

    /// Counts the caller's sellers and their combined balance, and the
    /// end users across the system.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for non-admins.
    /// - `Internal` if the balances overflow `i64`.
    pub async fn admin_overview(&self, principal: &Principal) -> Result<AdminOverview, PanelError> {
        let admin_id = require_admin(principal)?;
        let sellers = self.store.list_sellers_by_admin(admin_id).await?;
        let end_users = self.store.list_all_end_users().await?;

        let total_credits = sellers
            .iter()
            .try_fold(0_i64, |sum, seller| sum.checked_add(seller.credits))
            .ok_or_else(|| {
                PanelError::Internal(format!("credit total overflows for admin {admin_id}"))
            })?;

        Ok(AdminOverview {
            seller_count: sellers.len() as u64,
            end_user_count: end_users.len() as u64,
            total_credits,
        })
    }

    async fn owned_seller(
        &self,
        principal: &Principal,
        seller_id: SellerId,
    ) -> Result<Seller, PanelError> {
        let admin_id = require_admin(principal)?;
        let seller = self.coordinator.ledger().seller(seller_id).await?;
        if seller.admin_id != admin_id {
            return Err(PanelError::Forbidden(format!(
                "seller {seller_id} belongs to another admin"
            )));
        }
        Ok(seller)
    }

    // ========== Seller ==========

    /// Re-reads the caller's own seller row.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-sellers, `NotFound` if the row is gone.
    pub async fn own_seller(&self, principal: &Principal) -> Result<Seller, PanelError> {
        let seller_id = require_seller(principal)?;
        self.coordinator.ledger().seller(seller_id).await
    }

    /// Lists the caller's end users, newest first.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-sellers.
    pub async fn list_own_end_users(
        &self,
        principal: &Principal,
    ) -> Result<Vec<EndUser>, PanelError> {
        let seller_id = require_seller(principal)?;
        Ok(self.store.list_end_users_by_seller(seller_id).await?)
    }

    /// Provisions an end user for the caller.
    ///
    /// The balance precondition uses a fresh read of the seller row, never
    /// the principal's cached credits.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-sellers, otherwise as
    /// [`ProvisioningCoordinator::provision_end_user`].
    pub async fn provision_end_user(
        &self,
        principal: &Principal,
        username: &str,
        password: &str,
    ) -> Result<Provisioned, PanelError> {
        let seller = self.own_seller(principal).await?;
        self.coordinator
            .provision_end_user(&seller, username, password)
            .await
    }

    /// Updates one of the caller's end users.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-sellers, otherwise as
    /// [`ProvisioningCoordinator::update_end_user`].
    pub async fn update_end_user(
        &self,
        principal: &Principal,
        id: EndUserId,
        username: &str,
        password: Option<&str>,
    ) -> Result<EndUser, PanelError> {
        let seller_id = require_seller(principal)?;
        self.coordinator
            .update_end_user(id, seller_id, username, password)
            .await
    }

    /// Deletes one of the caller's end users.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-sellers, `NotFound` if the end user is not the
    /// caller's.
    pub async fn delete_end_user(
        &self,
        principal: &Principal,
        id: EndUserId,
    ) -> Result<(), PanelError> {
        let seller_id = require_seller(principal)?;
        self.coordinator.delete_end_user(id, seller_id).await
    }
}
