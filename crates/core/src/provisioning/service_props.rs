//! Property-based tests for `ProvisioningCoordinator`.
//!
//! - No free accounts: a success costs exactly one credit, and any end user
//!   left in storage was either paid for or reported as `CompensationFailed`.
//! - Compensation restores storage whenever it is reported as done.
//! - Deleting a seller leaves no end users pointing at it.
//! - A blank password on update never changes the stored credential.

use std::sync::Arc;

use futures::executor::block_on;
use proptest::prelude::*;

use super::service::ProvisioningCoordinator;
use super::types::ProvisioningState;
use crate::auth::{Argon2Verifier, CredentialVerifier};
use crate::error::PanelError;
use crate::store::memory::{MemoryStore, StoreOp};

fn verifier() -> Arc<Argon2Verifier> {
    Arc::new(Argon2Verifier::with_cost(8, 1, 1).unwrap())
}

fn fault_strategy() -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(
        prop_oneof![
            Just(StoreOp::InsertEndUser),
            Just(StoreOp::DebitSellerCredits),
            Just(StoreOp::DeleteEndUser),
            Just(StoreOp::FindSeller),
        ],
        0..3,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_no_free_accounts(credits in 0i64..3, faults in fault_strategy()) {
        let store = Arc::new(MemoryStore::new());
        let admin = store.add_admin("root", "h");
        let seller = store.add_seller(admin.id, "s1", "h", credits);
        for op in &faults {
            store.fail(*op);
        }
        let coordinator = ProvisioningCoordinator::new(Arc::clone(&store), verifier());

        let report = block_on(coordinator.provision_with_report(&seller, "alice", "pw")).unwrap();
        let state = report.state();
        prop_assert!(state.is_terminal());

        let balance = store.seller(seller.id).map(|s| s.credits);
        let persisted = store.end_users().len();

        match &report.result {
            Ok(provisioned) => {
                prop_assert_eq!(state, ProvisioningState::CreditDebited);
                prop_assert_eq!(balance, Some(credits - 1));
                prop_assert_eq!(provisioned.seller.credits, credits - 1);
                prop_assert_eq!(persisted, 1);
            }
            Err(PanelError::CompensationFailed { .. }) => {
                prop_assert_eq!(state, ProvisioningState::CompensationFailed);
                prop_assert_eq!(balance, Some(credits));
                prop_assert_eq!(persisted, 1);
            }
            Err(_) => {
                prop_assert!(state.is_consistent());
                prop_assert_eq!(balance, Some(credits));
                prop_assert_eq!(persisted, 0);
            }
        }
        prop_assert!(balance.unwrap_or(0) >= 0);
    }

    #[test]
    fn prop_cascade_leaves_no_orphans(mine in 0usize..6, theirs in 0usize..6) {
        let store = Arc::new(MemoryStore::new());
        let admin = store.add_admin("root", "h");
        let target = store.add_seller(admin.id, "s1", "h", 0);
        let other = store.add_seller(admin.id, "s2", "h", 0);
        for i in 0..mine {
            store.add_end_user(target.id, &format!("mine-{i}"));
        }
        for i in 0..theirs {
            store.add_end_user(other.id, &format!("theirs-{i}"));
        }
        let coordinator = ProvisioningCoordinator::new(Arc::clone(&store), verifier());

        let deletion = block_on(coordinator.delete_seller(target.id)).unwrap();

        prop_assert_eq!(deletion.end_users_removed, mine as u64);
        let remaining = store.end_users();
        prop_assert!(remaining.iter().all(|u| u.seller_id != target.id));
        prop_assert_eq!(remaining.len(), theirs);
    }

    #[test]
    fn prop_blank_password_update_is_noop(
        padding in "[ \t]{0,4}",
        replacement in "[a-z]{1,8}",
    ) {
        let store = Arc::new(MemoryStore::new());
        let verifier = verifier();
        let admin = store.add_admin("root", "h");
        let seller = store.add_seller(admin.id, "s1", "h", 1);
        let coordinator = ProvisioningCoordinator::new(Arc::clone(&store), Arc::clone(&verifier));
        let provisioned = block_on(coordinator.provision_end_user(&seller, "alice", "original")).unwrap();
        let id = provisioned.end_user.id;
        let original_hash = store.end_user(id).unwrap().password_hash;

        let kept = block_on(coordinator.update_end_user(id, seller.id, "alice", Some(&padding))).unwrap();
        prop_assert_eq!(&kept.password_hash, &original_hash);

        let changed = block_on(coordinator.update_end_user(id, seller.id, "alice", Some(&replacement))).unwrap();
        prop_assert_ne!(&changed.password_hash, &original_hash);
        prop_assert!(verifier.verify(&replacement, &changed.password_hash).unwrap());
    }
}
