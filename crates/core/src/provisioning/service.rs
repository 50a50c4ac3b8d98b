//! Cross-table writes: provisioning, seller removal, end-user edits.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use reseller_shared::types::{EndUserId, SellerId};

use super::types::{Provisioned, ProvisioningReport, ProvisioningState, SellerDeletion};
use crate::auth::CredentialVerifier;
use crate::error::PanelError;
use crate::ledger::SellerLedger;
use crate::store::{EndUser, EndUserChanges, NewEndUser, PanelStore, Seller};

/// Credits charged per end user.
const PROVISION_COST: i64 = 1;

/// Sequences writes that span the `sellers` and `end_users` tables.
#[derive(Debug)]
pub struct ProvisioningCoordinator<S, V> {
    store: Arc<S>,
    ledger: SellerLedger<S>,
    verifier: Arc<V>,
}

impl<S, V> Clone for ProvisioningCoordinator<S, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ledger: self.ledger.clone(),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

/// Records the states an attempt passes through.
struct Attempt {
    seller_id: SellerId,
    trail: Vec<ProvisioningState>,
}

impl Attempt {
    fn start(seller_id: SellerId) -> Self {
        Self {
            seller_id,
            trail: vec![ProvisioningState::Idle],
        }
    }

    fn advance(&mut self, to: ProvisioningState) {
        let from = self.trail.last().copied().unwrap_or(ProvisioningState::Idle);
        debug_assert!(
            ProvisioningState::is_valid_transition(from, to),
            "invalid provisioning transition {from} -> {to}"
        );
        debug!(seller_id = %self.seller_id, from = %from, to = %to, "Provisioning transition");
        self.trail.push(to);
    }

    fn finish(self, result: Result<Provisioned, PanelError>) -> ProvisioningReport {
        ProvisioningReport {
            trail: self.trail,
            result,
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl<S: PanelStore, V: CredentialVerifier> ProvisioningCoordinator<S, V> {
    /// Creates a coordinator.
    pub fn new(store: Arc<S>, verifier: Arc<V>) -> Self {
        Self {
            ledger: SellerLedger::new(Arc::clone(&store)),
            store,
            verifier,
        }
    }

    /// Returns the ledger this coordinator debits.
    pub const fn ledger(&self) -> &SellerLedger<S> {
        &self.ledger
    }

    /// Creates an end user owned by `seller` and charges one credit.
    ///
    /// # Errors
    ///
    /// See [`Self::provision_with_report`]; the report's error is returned
    /// as is.
    pub async fn provision_end_user(
        &self,
        seller: &Seller,
        username: &str,
        password: &str,
    ) -> Result<Provisioned, PanelError> {
        self.provision_with_report(seller, username, password)
            .await?
            .into_result()
    }

    /// Creates an end user owned by `seller` and reports every state the
    /// attempt went through.
    ///
    /// `seller.credits` is the precondition check; the debit itself is a
    /// conditional update, so a stale balance cannot overdraw the seller.
    ///
    /// # Errors
    ///
    /// The outer error is only for input rejected before the attempt starts
    /// (`InvalidArgument`, or `Internal` if hashing fails). Every failure
    /// after that is in the report:
    /// - `InsufficientCredits`: no writes.
    /// - `InsertFailed`: no writes.
    /// - `CreditDebitFailed`: the insert was undone.
    /// - `CompensationFailed`: the insert could not be undone.
    pub async fn provision_with_report(
        &self,
        seller: &Seller,
        username: &str,
        password: &str,
    ) -> Result<ProvisioningReport, PanelError> {
        if is_blank(username) {
            return Err(PanelError::InvalidArgument("username is required".to_string()));
        }
        if is_blank(password) {
            return Err(PanelError::InvalidArgument("password is required".to_string()));
        }

        let mut attempt = Attempt::start(seller.id);

        if seller.credits < PROVISION_COST {
            attempt.advance(ProvisioningState::InsufficientCredits);
            info!(
                seller_id = %seller.id,
                credits = seller.credits,
                "Provisioning refused: no credits"
            );
            return Ok(attempt.finish(Err(PanelError::InsufficientCredits {
                seller_id: seller.id,
                available: seller.credits,
            })));
        }

        let password_hash = self
            .verifier
            .hash(password)
            .map_err(|e| PanelError::Internal(e.to_string()))?;

        // Step A
        let end_user = match self
            .store
            .insert_end_user(NewEndUser {
                username: username.to_string(),
                password_hash,
                seller_id: seller.id,
            })
            .await
        {
            Ok(end_user) => end_user,
            Err(e) => {
                attempt.advance(ProvisioningState::InsertFailed);
                warn!(seller_id = %seller.id, error = %e, "End user insert failed");
                return Ok(attempt.finish(Err(PanelError::InsertFailed(e))));
            }
        };
        attempt.advance(ProvisioningState::UserInserted);

        // Step B
        let debit_error = match self.ledger.decrement(seller.id, PROVISION_COST).await {
            Ok(seller) => {
                attempt.advance(ProvisioningState::CreditDebited);
                info!(
                    seller_id = %seller.id,
                    end_user_id = %end_user.id,
                    credits = seller.credits,
                    "End user provisioned"
                );
                return Ok(attempt.finish(Ok(Provisioned { end_user, seller })));
            }
            Err(e) => e,
        };

        attempt.advance(ProvisioningState::CompensationAttempted);
        let result = match self.store.delete_end_user(end_user.id, seller.id).await {
            Ok(_) => {
                attempt.advance(ProvisioningState::Compensated);
                warn!(
                    seller_id = %seller.id,
                    end_user_id = %end_user.id,
                    error = %debit_error,
                    "Credit debit failed; end user removed"
                );
                PanelError::CreditDebitFailed {
                    seller_id: seller.id,
                    reason: debit_error.to_string(),
                }
            }
            Err(compensation_error) => {
                attempt.advance(ProvisioningState::CompensationFailed);
                error!(
                    target: "reconciliation",
                    seller_id = %seller.id,
                    end_user_id = %end_user.id,
                    debit_error = %debit_error,
                    compensation_error = %compensation_error,
                    "End user exists without a credit debit"
                );
                PanelError::CompensationFailed {
                    end_user_id: end_user.id,
                    seller_id: seller.id,
                    debit_error: debit_error.to_string(),
                    compensation_error: compensation_error.to_string(),
                }
            }
        };

        Ok(attempt.finish(Err(result)))
    }

    /// Removes a seller and every end user it owns.
    ///
    /// End users are deleted explicitly by `seller_id` before the seller
    /// row, whether or not the schema would cascade.
    ///
    /// # Errors
    ///
    /// `NotFound` if the seller does not exist, `Storage` if a delete fails.
    /// If the seller delete fails after its end users were removed, the
    /// seller is left with no end users.
    pub async fn delete_seller(&self, seller_id: SellerId) -> Result<SellerDeletion, PanelError> {
        self.ledger.seller(seller_id).await?;

        let end_users_removed = self.store.delete_end_users_by_seller(seller_id).await?;
        let removed = self.store.delete_seller(seller_id).await?;
        if removed == 0 {
            return Err(PanelError::NotFound(format!("seller {seller_id}")));
        }

        info!(
            seller_id = %seller_id,
            end_users_removed = end_users_removed,
            "Seller deleted"
        );
        Ok(SellerDeletion {
            seller_id,
            end_users_removed,
        })
    }

    /// Renames an end user and optionally replaces its password.
    ///
    /// A blank `password` (or `None`) keeps the stored credential.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a blank username.
    /// - `NotFound` if no end user has this ID under `seller_id`.
    /// - `Conflict` if the new username is taken.
    pub async fn update_end_user(
        &self,
        id: EndUserId,
        seller_id: SellerId,
        username: &str,
        password: Option<&str>,
    ) -> Result<EndUser, PanelError> {
        if is_blank(username) {
            return Err(PanelError::InvalidArgument("username is required".to_string()));
        }

        let password_hash = match password.filter(|p| !is_blank(p)) {
            Some(p) => Some(
                self.verifier
                    .hash(p)
                    .map_err(|e| PanelError::Internal(e.to_string()))?,
            ),
            None => None,
        };
        let password_changed = password_hash.is_some();

        let changes = EndUserChanges {
            username: Some(username.to_string()),
            password_hash,
        };
        let end_user = self
            .store
            .update_end_user(id, seller_id, changes)
            .await?
            .ok_or_else(|| PanelError::NotFound(format!("end user {id}")))?;

        info!(
            seller_id = %seller_id,
            end_user_id = %id,
            password_changed = password_changed,
            "End user updated"
        );
        Ok(end_user)
    }

    /// Deletes an end user owned by `seller_id`. The credit is not refunded.
    ///
    /// # Errors
    ///
    /// `NotFound` if no end user has this ID under `seller_id`.
    pub async fn delete_end_user(&self, id: EndUserId, seller_id: SellerId) -> Result<(), PanelError> {
        let removed = self.store.delete_end_user(id, seller_id).await?;
        if removed == 0 {
            return Err(PanelError::NotFound(format!("end user {id}")));
        }

        info!(seller_id = %seller_id, end_user_id = %id, "End user deleted");
        Ok(())
    }
}
