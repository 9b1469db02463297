//! Property-based tests for ledger plans applied to a [`ShopSnapshot`].
//!
//! Random sequences of product creation, restock, checkout and payment are
//! run against a snapshot next to a plain running tally kept by the test.
//!
//! - Stock never goes negative; an oversold checkout changes nothing
//! - Every sale's profit is exactly Σ (selling − purchase) × quantity
//! - Receivables and payables equal credit given minus payments received

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use proptest::sample::Index;

use crate::input::{CheckoutRequest, NewCustomer, NewProduct, NewSupplier, PaymentRequest, RestockRequest};
use crate::ledger::{
    plan_checkout, plan_create_customer, plan_create_product, plan_create_supplier, plan_receive_payment,
    plan_restock,
};
use crate::report::DashboardStats;
use crate::{CoreError, Money, PartyType, PaymentStatus, SaleItem, ShopSnapshot};

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
        lines: Vec<(Index, i64)>,
        unpaid: bool,
    },
    Payment {
        from_customer: bool,
        amount: i64,
    },
}

/// Strategy for a single shop operation. Amounts are in paisa.
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..50, 1i64..100_000, 1i64..200_000, any::<bool>()).prop_map(|(stock, purchase, selling, on_credit)| {
            Op::CreateProduct {
                stock,
                purchase,
                selling,
                on_credit,
            }
        }),
        (any::<Index>(), 1i64..50, 1i64..100_000, any::<bool>()).prop_map(|(pick, quantity, purchase, on_credit)| {
            Op::Restock {
                pick,
                quantity,
                purchase,
                on_credit,
            }
        }),
        (prop::collection::vec((any::<Index>(), 1i64..20), 1..5), any::<bool>())
            .prop_map(|(lines, unpaid)| Op::Checkout { lines, unpaid }),
        (any::<bool>(), 1i64..500_000).prop_map(|(from_customer, amount)| Op::Payment { from_customer, amount }),
    ]
}

/// Running totals computed from the operations alone, in plain `i64`.
#[derive(Debug, Default)]
struct Tally {
    units: i64,
    profit: i64,
    receivable: i64,
    payable: i64,
}

fn opened_shop() -> ShopSnapshot {
    let now = Utc::now();
    let mut shop = ShopSnapshot::default();

    let supplier = NewSupplier {
        name: "Ali Traders".to_string(),
        contact_person: "Ali".to_string(),
        phone: String::new(),
        opening_balance: Money::zero(),
    };
    shop.apply(&plan_create_supplier(supplier, "s-1".to_string(), now).unwrap())
        .unwrap();

    let customer = NewCustomer {
        name: "Bilal".to_string(),
        phone: String::new(),
        address: String::new(),
        opening_balance: Money::zero(),
    };
    shop.apply(&plan_create_customer(customer, "c-1".to_string(), now).unwrap())
        .unwrap();

    shop
}

fn step(shop: &mut ShopSnapshot, tally: &mut Tally, n: usize, op: &Op) -> Result<(), TestCaseError> {
    let now = Utc::now();

    match op {
        Op::CreateProduct {
            stock,
            purchase,
            selling,
            on_credit,
        } => {
            let input = NewProduct {
                name: format!("Item {n}"),
                category: "General".to_string(),
                supplier_id: Some("s-1".to_string()),
                stock: *stock,
                purchase_price: Money::from_minor(*purchase),
                selling_price: Money::from_minor(*selling),
            };
            let plan = plan_create_product(input, *on_credit, format!("p-{n}"), now);
            prop_assert!(plan.is_ok());
            prop_assert!(shop.apply(&plan.unwrap()).is_ok());

            tally.units += stock;
            if *on_credit {
                tally.payable += stock * purchase;
            }
        }

        Op::Restock {
            pick,
            quantity,
            purchase,
            on_credit,
        } => {
            if shop.products.is_empty() {
                return Ok(());
            }
            let product_id = shop.products[pick.index(shop.products.len())].id.clone();
            let req = RestockRequest {
                product_id: product_id.clone(),
                quantity: *quantity,
                purchase_price: Money::from_minor(*purchase),
                on_credit: *on_credit,
            };
            let plan = plan_restock(shop, req);
            prop_assert!(plan.is_ok());
            prop_assert!(shop.apply(&plan.unwrap()).is_ok());

            prop_assert_eq!(shop.product(&product_id).unwrap().purchase_price.minor(), *purchase);
            tally.units += quantity;
            if *on_credit {
                tally.payable += quantity * purchase;
            }
        }

        Op::Checkout { lines, unpaid } => {
            if shop.products.is_empty() {
                return Ok(());
            }

            let mut items = Vec::new();
            let mut demand: HashMap<String, i64> = HashMap::new();
            for (pick, quantity) in lines {
                let product = &shop.products[pick.index(shop.products.len())];
                *demand.entry(product.id.clone()).or_default() += quantity;
                items.push(SaleItem::from_product(product, *quantity));
            }
            let fits = demand
                .iter()
                .all(|(id, wanted)| shop.product(id).is_some_and(|p| p.stock >= *wanted));

            let sold: i64 = items.iter().map(|i| i.quantity).sum();
            let revenue: i64 = items.iter().map(|i| i.selling_price.minor() * i.quantity).sum();
            let cost: i64 = items.iter().map(|i| i.purchase_price.minor() * i.quantity).sum();

            let req = CheckoutRequest {
                items,
                customer_id: Some("c-1".to_string()),
                payment_status: if *unpaid {
                    PaymentStatus::Unpaid
                } else {
                    PaymentStatus::Paid
                },
            };
            let plan = plan_checkout(req, format!("sale-{n}"), now);
            prop_assert!(plan.is_ok());

            let before = shop.clone();
            match shop.apply(&plan.unwrap()) {
                Ok(()) => {
                    prop_assert!(fits, "checkout beyond stock was accepted");
                    tally.units -= sold;
                    tally.profit += revenue - cost;
                    if *unpaid {
                        tally.receivable += revenue;
                    }
                }
                Err(e) => {
                    prop_assert!(!fits, "checkout within stock was rejected: {e}");
                    let insufficient = matches!(e, CoreError::InsufficientStock { .. });
                    prop_assert!(insufficient);
                    prop_assert_eq!(&*shop, &before);
                }
            }
        }

        Op::Payment { from_customer, amount } => {
            let (party, party_id) = if *from_customer {
                (PartyType::Customer, "c-1")
            } else {
                (PartyType::Supplier, "s-1")
            };
            let req = PaymentRequest {
                party,
                party_id: party_id.to_string(),
                amount: Money::from_minor(*amount),
            };
            let plan = plan_receive_payment(req);
            prop_assert!(plan.is_ok());
            prop_assert!(shop.apply(&plan.unwrap()).is_ok());

            if *from_customer {
                tally.receivable -= amount;
            } else {
                tally.payable -= amount;
            }
        }
    }

    Ok(())
}

fn check(shop: &ShopSnapshot, tally: &Tally) -> Result<(), TestCaseError> {
    for product in &shop.products {
        prop_assert!(product.stock >= 0, "{} went negative: {}", product.id, product.stock);
    }

    for sale in &shop.sales {
        let line_profit: i64 = sale
            .items
            .iter()
            .map(|i| (i.selling_price.minor() - i.purchase_price.minor()) * i.quantity)
            .sum();
        prop_assert_eq!(sale.profit, sale.total_amount - sale.total_cost);
        prop_assert_eq!(sale.profit.minor(), line_profit);
    }

    let stats = DashboardStats::compute(shop);
    let units: i64 = shop.products.iter().map(|p| p.stock).sum();
    prop_assert_eq!(units, tally.units);
    prop_assert_eq!(stats.total_profit.minor(), tally.profit);
    prop_assert_eq!(stats.receivables.minor(), tally.receivable);
    prop_assert_eq!(stats.payables.minor(), tally.payable);

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of operations, each step either commits whole or
    /// leaves the snapshot untouched, and the ledger totals match the tally.
    #[test]
    fn prop_ledger_totals_match_operations(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut shop = opened_shop();
        let mut tally = Tally::default();

        for (n, op) in ops.iter().enumerate() {
            step(&mut shop, &mut tally, n, op)?;
            check(&shop, &tally)?;
        }
    }

    /// *For any* cart whose total quantity exceeds stock, checkout is
    /// rejected and no record changes.
    #[test]
    fn prop_oversold_checkout_changes_nothing(
        stock in 0i64..20,
        extra in 1i64..20,
        unpaid in any::<bool>(),
    ) {
        let mut shop = opened_shop();
        let input = NewProduct {
            name: "Sugar 1kg".to_string(),
            category: "Grocery".to_string(),
            supplier_id: None,
            stock,
            purchase_price: Money::from_minor(12_000),
            selling_price: Money::from_minor(15_000),
        };
        shop.apply(&plan_create_product(input, false, "p-1".to_string(), Utc::now()).unwrap()).unwrap();

        let product = shop.product("p-1").unwrap().clone();
        let req = CheckoutRequest {
            items: vec![SaleItem::from_product(&product, stock + extra)],
            customer_id: Some("c-1".to_string()),
            payment_status: if unpaid { PaymentStatus::Unpaid } else { PaymentStatus::Paid },
        };
        let before = shop.clone();

        let err = shop.apply(&plan_checkout(req, "sale-1".to_string(), Utc::now()).unwrap()).unwrap_err();
        let insufficient = matches!(err, CoreError::InsufficientStock { .. });
        prop_assert!(insufficient);
        prop_assert_eq!(shop, before);
    }
}
