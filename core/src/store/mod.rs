// cartsync/src/store/mod.rs

//! The item store: one generic state manager, instantiated as the cart and the
//! wishlist.

pub mod cart;
pub mod definition;
pub mod load;
pub mod mutation;
pub mod options;
pub mod wishlist;

pub use definition::{CartStore, ItemStore, WishlistStore};
pub use options::{MergePolicy, StoreOptions, DEFAULT_TAX_RATE};
