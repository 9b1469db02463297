//! # State Module
//!
//! Application state for the shop.
//!
//! Each state type has one job, and each command asks only for the state it
//! needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   ShopState      │  │   CartState      │  │   ConfigState        │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  RecordStore     │  │  Arc<Mutex<      │  │  shop_name           │  │
//! │  │  + RwLock<       │  │    Cart          │  │  currency_symbol     │  │
//! │  │    ShopSnapshot> │  │  >>              │  │  database_path       │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ShopState: writes serialized by the mirror's write lock             │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod shop;

#[cfg(test)]
mod shop_props;

pub use cart::{Cart, CartError, CartState, CartTotals};
pub use config::ConfigState;
pub use shop::ShopState;
