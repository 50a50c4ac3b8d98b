//! Property-based tests for `SellerLedger`.
//!
//! - Balance never goes negative under any mix of `set_balance` and
//!   `decrement`, and always equals a simple model of the two operations.

use std::sync::Arc;

use futures::executor::block_on;
use proptest::prelude::*;

use super::service::SellerLedger;
use crate::error::PanelError;
use crate::store::memory::MemoryStore;

#[derive(Debug, Clone)]
enum Op {
    Set(i64),
    Decrement(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-5i64..20).prop_map(Op::Set),
        (-1i64..4).prop_map(Op::Decrement),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_balance_never_negative(
        initial in 0i64..10,
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let store = Arc::new(MemoryStore::new());
        let admin = store.add_admin("root", "h");
        let seller = store.add_seller(admin.id, "s1", "h", initial);
        let ledger = SellerLedger::new(Arc::clone(&store));
        let mut model = initial;

        for op in ops {
            match op {
                Op::Set(value) => {
                    let result = block_on(ledger.set_balance(seller.id, value));
                    if value < 0 {
                        let is_invalid = matches!(result, Err(PanelError::InvalidArgument(_)));
                        prop_assert!(is_invalid);
                    } else {
                        prop_assert!(result.is_ok());
                        model = value;
                    }
                }
                Op::Decrement(by) => {
                    let result = block_on(ledger.decrement(seller.id, by));
                    if by <= 0 {
                        let is_invalid = matches!(result, Err(PanelError::InvalidArgument(_)));
                        prop_assert!(is_invalid);
                    } else if model >= by {
                        prop_assert!(result.is_ok());
                        model -= by;
                    } else {
                        let is_insufficient =
                            matches!(result, Err(PanelError::InsufficientCredits { .. }));
                        prop_assert!(is_insufficient);
                    }
                }
            }

            let balance = store.seller(seller.id).map(|s| s.credits);
            prop_assert_eq!(balance, Some(model));
            prop_assert!(model >= 0);
        }
    }
}
