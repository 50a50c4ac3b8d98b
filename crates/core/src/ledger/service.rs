//! Balance reads and writes for sellers.

use std::sync::Arc;

use tracing::{debug, info};

use reseller_shared::types::SellerId;

use crate::error::PanelError;
use crate::store::{PanelStore, Seller};

/// Reads and mutates seller credit balances.
#[derive(Debug)]
pub struct SellerLedger<S> {
    store: Arc<S>,
}

impl<S> Clone for SellerLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PanelStore> SellerLedger<S> {
    /// Creates a ledger over a store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Loads a seller row.
    ///
    /// # Errors
    ///
    /// `NotFound` if the seller does not exist, `Storage` if the read fails.
    pub async fn seller(&self, seller_id: SellerId) -> Result<Seller, PanelError> {
        self.store
            .find_seller(seller_id)
            .await?
            .ok_or_else(|| PanelError::NotFound(format!("seller {seller_id}")))
    }

    /// Returns the current balance.
    ///
    /// # Errors
    ///
    /// `NotFound` if the seller does not exist, `Storage` if the read fails.
    pub async fn get_balance(&self, seller_id: SellerId) -> Result<i64, PanelError> {
        Ok(self.seller(seller_id).await?.credits)
    }

    /// Returns true when the seller can pay for at least one end user.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_balance`].
    pub async fn has_credit(&self, seller_id: SellerId) -> Result<bool, PanelError> {
        Ok(self.get_balance(seller_id).await? > 0)
    }

    /// Overwrites the balance with an absolute value.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a negative value (nothing is written),
    /// `NotFound` if the seller does not exist.
    pub async fn set_balance(&self, seller_id: SellerId, credits: i64) -> Result<Seller, PanelError> {
        if credits < 0 {
            return Err(PanelError::InvalidArgument(format!(
                "credits must be zero or more, got {credits}"
            )));
        }

        let seller = self
            .store
            .set_seller_credits(seller_id, credits)
            .await?
            .ok_or_else(|| PanelError::NotFound(format!("seller {seller_id}")))?;

        info!(seller_id = %seller_id, credits = credits, "Seller balance set");
        Ok(seller)
    }

    /// Subtracts `by` credits if the balance covers it.
    ///
    /// The check and the write are one conditional update in the store, so
    /// two concurrent decrements can never take the balance below zero.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `by` is not positive.
    /// - `InsufficientCredits` if the balance is below `by`.
    /// - `NotFound` if the seller does not exist.
    /// - `Storage` if the update fails.
    pub async fn decrement(&self, seller_id: SellerId, by: i64) -> Result<Seller, PanelError> {
        if by <= 0 {
            return Err(PanelError::InvalidArgument(format!(
                "decrement must be positive, got {by}"
            )));
        }

        if let Some(seller) = self.store.debit_seller_credits(seller_id, by).await? {
            debug!(seller_id = %seller_id, by = by, credits = seller.credits, "Seller debited");
            return Ok(seller);
        }

        // No row matched: tell a missing seller apart from an empty balance.
        let available = self.get_balance(seller_id).await?;
        Err(PanelError::InsufficientCredits {
            seller_id,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, StoreOp};

    fn setup(credits: i64) -> (Arc<MemoryStore>, SellerLedger<MemoryStore>, SellerId) {
        let store = Arc::new(MemoryStore::new());
        let admin = store.add_admin("root", "h");
        let seller = store.add_seller(admin.id, "s1", "h", credits);
        (Arc::clone(&store), SellerLedger::new(store), seller.id)
    }

    #[tokio::test]
    async fn test_get_balance_and_has_credit() {
        let (_, ledger, id) = setup(1);
        assert_eq!(ledger.get_balance(id).await.unwrap(), 1);
        assert!(ledger.has_credit(id).await.unwrap());

        let (_, ledger, id) = setup(0);
        assert!(!ledger.has_credit(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_seller_is_not_found() {
        let (_, ledger, _) = setup(1);
        let err = ledger.get_balance(SellerId::new()).await.unwrap_err();
        assert!(matches!(err, PanelError::NotFound(_)));

        let err = ledger.decrement(SellerId::new(), 1).await.unwrap_err();
        assert!(matches!(err, PanelError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_balance_rejects_negative_without_writing() {
        let (store, ledger, id) = setup(4);
        store.clear_calls();

        let err = ledger.set_balance(id, -1).await.unwrap_err();
        assert!(matches!(err, PanelError::InvalidArgument(_)));
        assert!(store.calls().is_empty());
        assert_eq!(store.seller(id).unwrap().credits, 4);
    }

    #[tokio::test]
    async fn test_set_balance_overwrites() {
        let (_, ledger, id) = setup(4);
        assert_eq!(ledger.set_balance(id, 0).await.unwrap().credits, 0);
        assert_eq!(ledger.set_balance(id, 25).await.unwrap().credits, 25);
    }

    #[tokio::test]
    async fn test_decrement_to_zero_then_refuse() {
        let (_, ledger, id) = setup(1);
        assert_eq!(ledger.decrement(id, 1).await.unwrap().credits, 0);

        let err = ledger.decrement(id, 1).await.unwrap_err();
        assert!(matches!(
            err,
            PanelError::InsufficientCredits { available: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_decrement_rejects_non_positive() {
        let (_, ledger, id) = setup(3);
        for by in [0, -1] {
            let err = ledger.decrement(id, by).await.unwrap_err();
            assert!(matches!(err, PanelError::InvalidArgument(_)));
        }
        assert_eq!(ledger.get_balance(id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_decrement_storage_failure() {
        let (store, ledger, id) = setup(3);
        store.fail(StoreOp::DebitSellerCredits);
        let err = ledger.decrement(id, 1).await.unwrap_err();
        assert!(matches!(err, PanelError::Storage(_)));
    }
}
