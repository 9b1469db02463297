//! Property-based tests for [`ShopState`] over a fault-injecting store.
//!
//! After every operation, committed or refused, `store.load()` must equal
//! the mirror, and a refused operation must leave both untouched.

use proptest::prelude::*;
use proptest::sample::Index;

use super::ShopState;
use dukaan_core::input::{CheckoutRequest, NewCustomer, NewProduct, NewSupplier, PaymentRequest, RestockRequest};
use dukaan_core::{Money, PartyType, PaymentStatus, Product, RecordStore, SaleItem, ShopSnapshot};
use dukaan_db::MemoryStore;

#[derive(Debug, Clone)]
enum Op {
    CreateProduct {
        stock: i64,
        purchase: i64,
        selling: i64,
        on_credit: bool,
    },
    Restock {
        pick: Index,
        quantity: i64,
        purchase: i64,
        on_credit: bool,
    },
    Checkout {
        pick: Index,
        quantity: i64,
        unpaid: bool,
    },
    Payment {
        from_customer: bool,
        amount: i64,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..30, 1i64..50_000, 1i64..90_000, any::<bool>()).prop_map(|(stock, purchase, selling, on_credit)| {
            Op::CreateProduct {
                stock,
                purchase,
                selling,
                on_credit,
            }
        }),
        (any::<Index>(), 1i64..30, 1i64..50_000, any::<bool>()).prop_map(|(pick, quantity, purchase, on_credit)| {
            Op::Restock {
                pick,
                quantity,
                purchase,
                on_credit,
            }
        }),
        (any::<Index>(), 1i64..40, any::<bool>()).prop_map(|(pick, quantity, unpaid)| Op::Checkout {
            pick,
            quantity,
            unpaid,
        }),
        (any::<bool>(), 1i64..200_000).prop_map(|(from_customer, amount)| Op::Payment { from_customer, amount }),
    ]
}

struct Parties {
    customer_id: String,
    supplier_id: String,
}

async fn open_shop(store: &MemoryStore) -> (ShopState<MemoryStore>, Parties) {
    let shop = ShopState::open(store.clone()).await.unwrap();

    let supplier = shop
        .create_supplier(NewSupplier {
            name: "Ali Traders".to_string(),
            contact_person: "Ali".to_string(),
            phone: String::new(),
            opening_balance: Money::zero(),
        })
        .await
        .unwrap();
    let customer = shop
        .create_customer(NewCustomer {
            name: "Bilal".to_string(),
            phone: String::new(),
            address: String::new(),
            opening_balance: Money::zero(),
        })
        .await
        .unwrap();

    let parties = Parties {
        customer_id: customer.id,
        supplier_id: supplier.id,
    };
    (shop, parties)
}

fn pick_product<'a>(snapshot: &'a ShopSnapshot, pick: &Index) -> Option<&'a Product> {
    if snapshot.products.is_empty() {
        return None;
    }
    snapshot.products.get(pick.index(snapshot.products.len()))
}

/// Runs one operation and reports whether it committed. `None` when there
/// was no product to act on.
async fn run_op(shop: &ShopState<MemoryStore>, parties: &Parties, op: &Op) -> Option<bool> {
    let mirror = shop.snapshot().await;

    let committed = match op {
        Op::CreateProduct {
            stock,
            purchase,
            selling,
            on_credit,
        } => {
            let input = NewProduct {
                name: "Daal Chana 1kg".to_string(),
                category: "Grocery".to_string(),
                supplier_id: Some(parties.supplier_id.clone()),
                stock: *stock,
                purchase_price: Money::from_minor(*purchase),
                selling_price: Money::from_minor(*selling),
            };
            shop.create_product(input, *on_credit).await.is_ok()
        }

        Op::Restock {
            pick,
            quantity,
            purchase,
            on_credit,
        } => {
            let product = pick_product(&mirror, pick)?;
            let req = RestockRequest {
                product_id: product.id.clone(),
                quantity: *quantity,
                purchase_price: Money::from_minor(*purchase),
                on_credit: *on_credit,
            };
            shop.restock_product(req).await.is_ok()
        }

        Op::Checkout { pick, quantity, unpaid } => {
            let product = pick_product(&mirror, pick)?;
            let req = CheckoutRequest {
                items: vec![SaleItem::from_product(product, *quantity)],
                customer_id: Some(parties.customer_id.clone()),
                payment_status: if *unpaid {
                    PaymentStatus::Unpaid
                } else {
                    PaymentStatus::Paid
                },
            };
            shop.checkout(req).await.is_ok()
        }

        Op::Payment { from_customer, amount } => {
            let (party, party_id) = if *from_customer {
                (PartyType::Customer, &parties.customer_id)
            } else {
                (PartyType::Supplier, &parties.supplier_id)
            };
            let req = PaymentRequest {
                party,
                party_id: party_id.clone(),
                amount: Money::from_minor(*amount),
            };
            shop.receive_payment(req).await.is_ok()
        }
    };

    Some(committed)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// *For any* sequence of operations with store faults injected at random
    /// points, the store and the mirror never disagree.
    #[test]
    fn prop_store_matches_mirror_after_every_operation(
        steps in prop::collection::vec((op_strategy(), any::<bool>()), 1..30),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        rt.block_on(async {
            let store = MemoryStore::new();
            let (shop, parties) = open_shop(&store).await;

            for (op, fault) in &steps {
                if *fault {
                    store.fail_next_apply();
                }
                let armed = store.fault_pending();
                let before = shop.snapshot().await;
                let applied = store.applied_count();

                let Some(committed) = run_op(&shop, &parties, op).await else {
                    continue;
                };

                let mirror = shop.snapshot().await;
                prop_assert_eq!(&store.load().await.unwrap(), &mirror);
                prop_assert!(mirror.products.iter().all(|p| p.stock >= 0));

                if committed {
                    prop_assert!(!armed, "operation committed through a failing store");
                    prop_assert_eq!(store.applied_count(), applied + 1);
                } else {
                    prop_assert_eq!(&mirror, &before);
                    prop_assert_eq!(store.applied_count(), applied);
                }
            }

            let reopened = ShopState::open(store.clone()).await.unwrap();
            prop_assert_eq!(reopened.snapshot().await, shop.snapshot().await);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
